use crate::components::nav::normalize_path;
use crate::components::selector;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, LiveContent, Notification, Team};
use crate::state::messages::{NetworkRequest, RequestKind};
use chrono::Local;
use log::{debug, error};
use pitchside_api::{FixtureList, LiveBoard, MatchDetail};

pub const ERROR_LOADING_FIXTURES: &str = "Error Loading Fixtures";
pub const ERROR_LOADING_LEAGUE: &str = "Error Loading League Data";
pub const ERROR_LOADING_MATCH: &str = "Error Loading Match Data";

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Heatmap,
    Live,
    Help,
}

impl MenuItem {
    /// Site path the page lives at; the help overlay has none.
    pub fn path(&self) -> Option<&'static str> {
        match self {
            MenuItem::Heatmap => Some("/"),
            MenuItem::Live => Some("/live"),
            MenuItem::Help => None,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match normalize_path(path).as_str() {
            "/" | "/heatmap" => Some(MenuItem::Heatmap),
            "/live" => Some(MenuItem::Live),
            _ => None,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let state = AppState::new(&settings.default_league_id, &settings.season);
        Self { settings, state }
    }

    /// Requests issued once the UI is up.
    pub fn startup_requests(&mut self) -> Vec<NetworkRequest> {
        vec![NetworkRequest::LoadNav, self.load_fixtures(), self.refresh_live()]
    }

    // -----------------------------------------------------------------------
    // Heatmap page
    // -----------------------------------------------------------------------

    pub fn load_fixtures(&mut self) -> NetworkRequest {
        let page = &mut self.state.heatmap;
        page.begin_fixture_load();
        self.state.generations.invalidate(RequestKind::MatchDetail);
        NetworkRequest::LoadFixtures {
            league_id: page.league_id().to_string(),
            season: page.season.clone(),
            generation: self.state.generations.issue(RequestKind::Fixtures),
        }
    }

    pub fn on_fixtures_loaded(&mut self, list: FixtureList, generation: u64) -> Option<NetworkRequest> {
        if !self.state.generations.is_current(RequestKind::Fixtures, generation) {
            debug!("discarding stale fixture list #{generation}");
            return None;
        }

        let page = &mut self.state.heatmap;
        page.league_display = league_display(&list.league_name, list.season.as_deref());
        let (picker, current) = selector::fixture_selector(&list.fixtures, &self.settings.default_match_id);
        page.fixtures = list.fixtures;
        page.fixture_picker = picker;
        page.current_match_id = current;
        self.load_match_detail()
    }

    /// Commit the fixture under the cursor.
    pub fn select_fixture(&mut self) -> Option<NetworkRequest> {
        let page = &mut self.state.heatmap;
        page.current_match_id = page.fixture_picker.commit();
        if page.current_match_id.is_some() {
            return self.load_match_detail();
        }
        page.clear_match();
        self.state.generations.invalidate(RequestKind::MatchDetail);
        None
    }

    pub fn load_match_detail(&mut self) -> Option<NetworkRequest> {
        let page = &mut self.state.heatmap;
        let match_id = page.current_match_id.clone()?;
        page.begin_match_load();
        Some(NetworkRequest::LoadMatchDetail {
            league_id: page.league_id().to_string(),
            match_id,
            season: page.season.clone(),
            generation: self.state.generations.issue(RequestKind::MatchDetail),
        })
    }

    pub fn on_match_detail_loaded(&mut self, detail: MatchDetail, generation: u64) {
        if !self.state.generations.is_current(RequestKind::MatchDetail, generation) {
            debug!("discarding stale match data #{generation}");
            return;
        }

        let page = &mut self.state.heatmap;
        page.clear_match();
        page.info.date = format!("Match Date: {}", detail.match_date);
        page.info.score = format!("{} {} {}", detail.local_name, detail.final_score, detail.visitor_name);
        page.info.status = status_text(&detail);
        page.local.title = detail.local_name.clone();
        page.visitor.title = detail.visitor_name.clone();
        page.local.picker = selector::player_selector(&detail.local_players);
        page.visitor.picker = selector::player_selector(&detail.visitor_players);
        page.detail = Some(detail);
    }

    /// Commit the player under the cursor and show their heatmap.
    pub fn select_player(&mut self, team: Team) {
        let page = &mut self.state.heatmap;
        page.panel_mut(team).picker.commit();
        page.show_selected_player(team);
    }

    // -----------------------------------------------------------------------
    // Live page
    // -----------------------------------------------------------------------

    pub fn refresh_live(&mut self) -> NetworkRequest {
        let live = &mut self.state.live;
        live.content = LiveContent::Loading;
        NetworkRequest::LoadLiveBoard {
            feed: live.feed,
            generation: self.state.generations.issue(RequestKind::LiveBoard),
        }
    }

    pub fn toggle_live_feed(&mut self) -> NetworkRequest {
        self.state.live.feed = self.state.live.feed.toggle();
        self.state.live.scroll = 0;
        self.refresh_live()
    }

    pub fn on_live_loaded(&mut self, board: LiveBoard, generation: u64) {
        if !self.state.generations.is_current(RequestKind::LiveBoard, generation) {
            debug!("discarding stale live board #{generation}");
            return;
        }
        let live = &mut self.state.live;
        live.matches = board.matches;
        live.updated = board.updated;
        live.fetched_at = Some(Local::now());
        live.content = LiveContent::Loaded;
        let max = live.visible_matches().len().saturating_sub(1);
        live.scroll = live.scroll.min(max);
    }

    pub fn live_scroll_down(&mut self) {
        let live = &mut self.state.live;
        let max = live.visible_matches().len().saturating_sub(1);
        live.scroll = (live.scroll + 1).min(max);
    }

    pub fn live_scroll_up(&mut self) {
        self.state.live.scroll = self.state.live.scroll.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn on_nav_loaded(&mut self, html: Option<String>) {
        let path = self.current_path();
        self.state.nav.load(html.as_deref(), path);
    }

    /// Route to the page behind nav link `index`.
    pub fn select_nav_link(&mut self, index: usize) {
        let Some(target) = self.state.nav.links.get(index).map(|l| l.target.clone()) else {
            return;
        };
        match MenuItem::from_path(&target) {
            Some(page) => self.update_tab(page),
            None => debug!("no page for nav target {target}"),
        }
    }

    fn current_path(&self) -> &'static str {
        self.state.active_tab.path().unwrap_or("/")
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if let Some(path) = next.path() {
            self.state.nav.mark_active(path);
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    pub fn on_error(&mut self, origin: RequestKind, generation: u64, message: String) {
        if !self.state.generations.is_current(origin, generation) {
            debug!("discarding stale {origin:?} error #{generation}");
            return;
        }
        error!("{origin:?} request failed: {message}");

        match origin {
            RequestKind::Fixtures => {
                let page = &mut self.state.heatmap;
                page.fixture_picker = selector::error_selector(ERROR_LOADING_FIXTURES);
                page.league_display = ERROR_LOADING_LEAGUE.to_string();
                self.notify("Fixtures", format!("Error loading fixtures: {message}"));
            }
            RequestKind::MatchDetail => {
                self.state.heatmap.info.date = ERROR_LOADING_MATCH.to_string();
                self.notify("Match Data", format!("Error loading match data: {message}"));
            }
            RequestKind::LiveBoard => {
                self.state.live.content = LiveContent::Failed(format!("⚠️ {message}"));
            }
            RequestKind::Nav => {}
        }
    }

    fn notify(&mut self, title: &str, message: String) {
        self.state.notification = Some(Notification { title: title.to_string(), message });
    }
}

fn league_display(league_name: &str, season: Option<&str>) -> String {
    match season {
        Some(season) => format!("{league_name} ({season})"),
        None => format!("{league_name} (Current Season)"),
    }
}

fn status_text(detail: &MatchDetail) -> String {
    match detail.live_minute.as_deref() {
        Some(minute) if detail.is_live() => format!("Status: {} (Min {minute}')", detail.status),
        _ => format!("Status: {}", detail.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::heatmap::NO_PLAYER_SELECTED;
    use crate::components::selector::{NO_FIXTURES, SELECT_MATCH};
    use pitchside_api::{Fixture, HeatPoint, Match, Player, Roster};

    fn app() -> App {
        App::new(AppSettings { default_match_id: "2".into(), ..AppSettings::default() })
    }

    fn fixture_list(ids: &[&str]) -> FixtureList {
        FixtureList {
            league_id: "1204".into(),
            season: None,
            league_name: "Premier League".into(),
            fixtures: ids
                .iter()
                .map(|id| Fixture { match_id: id.to_string(), display: format!("Match {id}") })
                .collect(),
        }
    }

    fn detail() -> MatchDetail {
        let roster: Roster = [
            ("10", Player { name: "Zola".into(), heatmap: vec![HeatPoint { x: 50.0, y: 50.0, value: 2.0 }] }),
            ("11", Player { name: "alonso".into(), heatmap: Vec::new() }),
        ]
        .into_iter()
        .collect();
        MatchDetail {
            match_date: "01.05.2024".into(),
            local_name: "Arsenal".into(),
            visitor_name: "Chelsea".into(),
            final_score: "2-1".into(),
            status: "Live".into(),
            live_minute: Some("67".into()),
            local_players: roster,
            visitor_players: Roster::new(),
        }
    }

    fn fixtures_generation(request: &NetworkRequest) -> u64 {
        match request {
            NetworkRequest::LoadFixtures { generation, .. } => *generation,
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn default_fixture_triggers_match_load() {
        let mut app = app();
        let generation = fixtures_generation(&app.load_fixtures());
        let follow_up = app.on_fixtures_loaded(fixture_list(&["1", "2"]), generation);

        let page = &app.state.heatmap;
        assert_eq!(page.league_display, "Premier League (Current Season)");
        assert_eq!(page.current_match_id.as_deref(), Some("2"));
        assert_eq!(page.fixture_picker.labels()[0], SELECT_MATCH);
        match follow_up {
            Some(NetworkRequest::LoadMatchDetail { league_id, match_id, season, .. }) => {
                assert_eq!(league_id, "1204");
                assert_eq!(match_id, "2");
                assert_eq!(season, "");
            }
            other => panic!("expected match load, got {other:?}"),
        }
        assert_eq!(app.state.heatmap.info.date, "Loading Match Data...");
    }

    #[test]
    fn fixtures_without_default_issue_nothing() {
        let mut app = app();
        let generation = fixtures_generation(&app.load_fixtures());
        let follow_up = app.on_fixtures_loaded(
            FixtureList { season: Some("2023/2024".into()), ..fixture_list(&["7"]) },
            generation,
        );
        assert!(follow_up.is_none());
        assert_eq!(app.state.heatmap.league_display, "Premier League (2023/2024)");
        assert_eq!(app.state.heatmap.current_match_id, None);
    }

    #[test]
    fn empty_fixture_list_shows_disabled_entry() {
        let mut app = app();
        let generation = fixtures_generation(&app.load_fixtures());
        assert!(app.on_fixtures_loaded(fixture_list(&[]), generation).is_none());
        assert_eq!(app.state.heatmap.fixture_picker.labels(), vec![NO_FIXTURES]);
    }

    #[test]
    fn stale_fixture_list_is_ignored() {
        let mut app = app();
        let stale = fixtures_generation(&app.load_fixtures());
        let fresh = fixtures_generation(&app.load_fixtures());
        assert!(app.on_fixtures_loaded(fixture_list(&["2"]), stale).is_none());
        assert!(app.state.heatmap.fixtures.is_empty());
        assert!(app.on_fixtures_loaded(fixture_list(&["2"]), fresh).is_some());
    }

    #[test]
    fn match_detail_fills_info_and_pickers() {
        let mut app = app();
        app.state.heatmap.current_match_id = Some("2".into());
        let Some(NetworkRequest::LoadMatchDetail { generation, .. }) = app.load_match_detail() else {
            panic!("expected match load");
        };
        app.on_match_detail_loaded(detail(), generation);

        let page = &app.state.heatmap;
        assert_eq!(page.info.date, "Match Date: 01.05.2024");
        assert_eq!(page.info.score, "Arsenal 2-1 Chelsea");
        assert_eq!(page.info.status, "Status: Live (Min 67')");
        assert_eq!(page.local.title, "Arsenal");
        assert_eq!(page.local.picker.labels(), vec!["Select a Player", "alonso", "Zola"]);
        assert_eq!(page.visitor.picker.labels(), vec!["No Players Found"]);
        assert_eq!(page.local.region.message(), Some(NO_PLAYER_SELECTED));
    }

    #[test]
    fn status_without_minute_when_not_live() {
        let finished = MatchDetail { status: "FT".into(), live_minute: Some("90".into()), ..detail() };
        assert_eq!(status_text(&finished), "Status: FT");
        let live_no_minute = MatchDetail { live_minute: None, ..detail() };
        assert_eq!(status_text(&live_no_minute), "Status: Live");
    }

    #[test]
    fn selecting_player_shows_heatmap() {
        let mut app = app();
        app.state.heatmap.current_match_id = Some("2".into());
        let Some(NetworkRequest::LoadMatchDetail { generation, .. }) = app.load_match_detail() else {
            panic!("expected match load");
        };
        app.on_match_detail_loaded(detail(), generation);
        app.state.heatmap.local.picker.move_down();
        app.state.heatmap.local.picker.move_down();
        app.select_player(Team::Local);
        assert_eq!(app.state.heatmap.local.region.player_name(), Some("Zola"));
        assert_eq!(app.state.heatmap.local.region.message(), None);
    }

    #[test]
    fn selecting_placeholder_fixture_clears_match() {
        let mut app = app();
        let generation = fixtures_generation(&app.load_fixtures());
        app.on_fixtures_loaded(fixture_list(&["1", "2"]), generation);
        app.state.heatmap.detail = Some(detail());
        app.state.heatmap.fixture_picker.move_up();
        app.state.heatmap.fixture_picker.move_up();
        assert!(app.select_fixture().is_none());
        assert_eq!(app.state.heatmap.current_match_id, None);
        assert!(app.state.heatmap.detail.is_none());
    }

    #[test]
    fn fixture_error_sets_fallback_text_and_notification() {
        let mut app = app();
        let generation = fixtures_generation(&app.load_fixtures());
        app.on_error(RequestKind::Fixtures, generation, "League not found".into());
        let page = &app.state.heatmap;
        assert_eq!(page.fixture_picker.labels(), vec![ERROR_LOADING_FIXTURES]);
        assert_eq!(page.league_display, ERROR_LOADING_LEAGUE);
        let note = app.state.notification.as_ref().unwrap();
        assert_eq!(note.message, "Error loading fixtures: League not found");
        app.dismiss_notification();
        assert!(app.state.notification.is_none());
    }

    #[test]
    fn match_error_replaces_date_line() {
        let mut app = app();
        app.state.heatmap.current_match_id = Some("2".into());
        let Some(request) = app.load_match_detail() else {
            panic!("expected match load");
        };
        app.on_error(RequestKind::MatchDetail, request.generation(), "HTTP status 500".into());
        assert_eq!(app.state.heatmap.info.date, ERROR_LOADING_MATCH);
        assert!(app.state.notification.is_some());
    }

    #[test]
    fn live_error_replaces_content() {
        let mut app = app();
        let request = app.refresh_live();
        app.on_error(RequestKind::LiveBoard, request.generation(), "Failed to load matches".into());
        assert_eq!(app.state.live.content, LiveContent::Failed("⚠️ Failed to load matches".into()));
        assert!(app.state.notification.is_none());
    }

    #[test]
    fn live_board_and_feed_toggle() {
        let mut app = app();
        let stale = app.refresh_live();
        let request = app.toggle_live_feed();
        let NetworkRequest::LoadLiveBoard { feed, generation } = request else {
            panic!("expected live board load");
        };
        assert_eq!(feed, pitchside_api::endpoint::LiveFeed::Today);

        let board = LiveBoard { matches: vec![Match::default(), Match::default()], updated: None };
        app.on_live_loaded(board.clone(), stale.generation());
        assert!(app.state.live.matches.is_empty());
        app.on_live_loaded(board, generation);
        assert_eq!(app.state.live.matches.len(), 2);
        assert_eq!(app.state.live.content, LiveContent::Loaded);
        assert!(app.state.live.fetched_line().is_some_and(|l| l.starts_with("fetched ")));

        app.live_scroll_down();
        app.live_scroll_down();
        assert_eq!(app.state.live.scroll, 1);
    }

    #[test]
    fn nav_links_route_to_pages() {
        let mut app = app();
        app.on_nav_loaded(None);
        assert_eq!(app.state.nav.active_index(), Some(0));
        app.select_nav_link(1);
        assert_eq!(app.state.active_tab, MenuItem::Live);
        assert_eq!(app.state.nav.active_index(), Some(1));
        app.select_nav_link(2);
        assert_eq!(app.state.active_tab, MenuItem::Heatmap);
        assert_eq!(app.state.nav.active_index(), Some(0));
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Live);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Live);
    }

    #[test]
    fn page_paths() {
        assert_eq!(MenuItem::from_path("/live/"), Some(MenuItem::Live));
        assert_eq!(MenuItem::from_path(""), Some(MenuItem::Heatmap));
        assert_eq!(MenuItem::from_path("/about"), None);
    }
}
