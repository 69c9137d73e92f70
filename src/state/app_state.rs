use crate::app::MenuItem;
use crate::components::heatmap::HeatmapRegion;
use crate::components::match_card::filter_matches;
use crate::components::nav::{self, NavLink};
use crate::components::selector::{self, SELECT_PLAYER, Selector};
use crate::state::messages::RequestKind;
use chrono::{DateTime, Local};
use pitchside_api::endpoint::LiveFeed;
use pitchside_api::{Fixture, Match, MatchDetail};

pub const LOADING_FIXTURES: &str = "Loading Fixtures...";
pub const LOADING_MATCH: &str = "Loading Match Data...";
pub const LOADING_LIVE: &str = "Loading live matches...";
pub const NO_MATCHES: &str = "No matches found";

// ---------------------------------------------------------------------------
// Request ordering
// ---------------------------------------------------------------------------

/// Latest issued id per request kind. A response is applied only when it
/// carries the latest id for its kind.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    fixtures: u64,
    match_detail: u64,
    live_board: u64,
}

impl RequestGenerations {
    pub fn issue(&mut self, kind: RequestKind) -> u64 {
        match self.slot(kind) {
            Some(slot) => {
                *slot += 1;
                *slot
            }
            None => 0,
        }
    }

    pub fn is_current(&self, kind: RequestKind, generation: u64) -> bool {
        match kind {
            RequestKind::Fixtures => self.fixtures == generation,
            RequestKind::MatchDetail => self.match_detail == generation,
            RequestKind::LiveBoard => self.live_board == generation,
            RequestKind::Nav => true,
        }
    }

    /// Drop anything still in flight for `kind`.
    pub fn invalidate(&mut self, kind: RequestKind) {
        self.issue(kind);
    }

    fn slot(&mut self, kind: RequestKind) -> Option<&mut u64> {
        match kind {
            RequestKind::Fixtures => Some(&mut self.fixtures),
            RequestKind::MatchDetail => Some(&mut self.match_detail),
            RequestKind::LiveBoard => Some(&mut self.live_board),
            RequestKind::Nav => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

/// Single-line input. Edits go to a draft that only replaces the value on
/// commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    draft: Option<String>,
}

impl TextInput {
    pub fn new(value: &str) -> Self {
        Self { value: value.to_string(), draft: None }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// What to show: the draft while editing, the value otherwise.
    pub fn display(&self) -> &str {
        self.draft.as_deref().unwrap_or(&self.value)
    }

    pub fn begin_edit(&mut self) {
        self.draft = Some(self.value.clone());
    }

    pub fn push(&mut self, c: char) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push(c);
        }
    }

    pub fn pop(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
        }
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Store the trimmed draft and return it.
    pub fn commit(&mut self) -> &str {
        if let Some(draft) = self.draft.take() {
            self.value = draft.trim().to_string();
        }
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.draft = None;
    }
}

// ---------------------------------------------------------------------------
// Heatmap page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeatmapFocus {
    League,
    Season,
    #[default]
    Fixtures,
    LocalPlayers,
    VisitorPlayers,
}

impl HeatmapFocus {
    const ORDER: [HeatmapFocus; 5] = [
        HeatmapFocus::League,
        HeatmapFocus::Season,
        HeatmapFocus::Fixtures,
        HeatmapFocus::LocalPlayers,
        HeatmapFocus::VisitorPlayers,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Local,
    Visitor,
}

/// Player picker and heatmap region for one side.
#[derive(Debug, Clone)]
pub struct TeamPanel {
    pub title: String,
    pub picker: Selector,
    pub region: HeatmapRegion,
}

impl TeamPanel {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            picker: selector::placeholder_selector(SELECT_PLAYER),
            region: HeatmapRegion::default(),
        }
    }

    fn reset(&mut self, title: &str) {
        *self = Self::new(title);
    }
}

/// Match info block shown above the heatmaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchInfo {
    pub date: String,
    pub score: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct HeatmapPageState {
    pub league_input: TextInput,
    pub season_input: TextInput,
    /// Season the loaded fixture list belongs to; used for heatmap fetches.
    pub season: String,
    pub current_match_id: Option<String>,
    pub fixtures: Vec<Fixture>,
    pub league_display: String,
    pub fixture_picker: Selector,
    pub info: MatchInfo,
    pub detail: Option<MatchDetail>,
    pub local: TeamPanel,
    pub visitor: TeamPanel,
    pub focus: HeatmapFocus,
}

impl HeatmapPageState {
    pub fn new(league_id: &str, season: &str) -> Self {
        Self {
            league_input: TextInput::new(league_id),
            season_input: TextInput::new(season),
            season: season.to_string(),
            current_match_id: None,
            fixtures: Vec::new(),
            league_display: String::new(),
            fixture_picker: selector::placeholder_selector(LOADING_FIXTURES),
            info: MatchInfo::default(),
            detail: None,
            local: TeamPanel::new("Local Team"),
            visitor: TeamPanel::new("Visitor Team"),
            focus: HeatmapFocus::default(),
        }
    }

    pub fn league_id(&self) -> &str {
        &self.league_input.value
    }

    /// Everything derived from a previous fixture list is dropped.
    pub fn begin_fixture_load(&mut self) {
        self.season = self.season_input.value.trim().to_string();
        self.current_match_id = None;
        self.fixtures.clear();
        self.fixture_picker = selector::placeholder_selector(LOADING_FIXTURES);
        self.info = MatchInfo::default();
        self.clear_match();
    }

    pub fn begin_match_load(&mut self) {
        self.info = MatchInfo { date: LOADING_MATCH.to_string(), ..MatchInfo::default() };
        self.local.title = "Local Team".to_string();
        self.visitor.title = "Visitor Team".to_string();
    }

    /// Drop roster data and reset both pickers and regions.
    pub fn clear_match(&mut self) {
        self.detail = None;
        self.local.reset("Local Team");
        self.visitor.reset("Visitor Team");
    }

    pub fn panel_mut(&mut self, team: Team) -> &mut TeamPanel {
        match team {
            Team::Local => &mut self.local,
            Team::Visitor => &mut self.visitor,
        }
    }

    /// Show the heatmap of the player currently selected in `team`'s picker.
    pub fn show_selected_player(&mut self, team: Team) {
        let detail = self.detail.as_ref();
        let panel = match team {
            Team::Local => &mut self.local,
            Team::Visitor => &mut self.visitor,
        };
        let player = panel.picker.selected_value().and_then(|id| {
            detail.and_then(|d| match team {
                Team::Local => d.local_players.get(id),
                Team::Visitor => d.visitor_players.get(id),
            })
        });
        panel.region.show_player(player);
    }
}

// ---------------------------------------------------------------------------
// Live page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveContent {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LivePageState {
    pub feed: LiveFeed,
    pub matches: Vec<Match>,
    pub league_filter: Option<String>,
    pub filter_input: TextInput,
    pub updated: Option<String>,
    /// Local time the current board arrived.
    pub fetched_at: Option<DateTime<Local>>,
    pub content: LiveContent,
    /// Index of the first visible match; drawing starts at its grid row.
    pub scroll: usize,
}

impl Default for LivePageState {
    fn default() -> Self {
        Self {
            feed: LiveFeed::Live,
            matches: Vec::new(),
            league_filter: None,
            filter_input: TextInput::default(),
            updated: None,
            fetched_at: None,
            content: LiveContent::Loading,
            scroll: 0,
        }
    }
}

impl LivePageState {
    pub fn visible_matches(&self) -> Vec<&Match> {
        filter_matches(&self.matches, self.league_filter.as_deref())
    }

    pub fn updated_line(&self) -> String {
        format!("Last updated: {}", self.updated.as_deref().unwrap_or("Just now"))
    }

    pub fn fetched_line(&self) -> Option<String> {
        self.fetched_at.map(|t| format!("fetched {}", t.format("%H:%M:%S")))
    }

    pub fn count_line(&self) -> String {
        format!("Total Matches: {}", self.visible_matches().len())
    }

    /// Apply the filter input. A blank input leaves the active filter alone.
    pub fn apply_filter(&mut self) {
        let value = self.filter_input.commit().to_string();
        if !value.is_empty() {
            self.league_filter = Some(value);
            self.scroll = 0;
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter_input.clear();
        self.league_filter = None;
        self.scroll = 0;
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NavState {
    pub links: Vec<NavLink>,
    pub loaded: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self { links: nav::fallback_links(), loaded: false }
    }
}

impl NavState {
    pub fn load(&mut self, html: Option<&str>, current_path: &str) {
        self.links = nav::resolve_links(html, current_path);
        self.loaded = true;
    }

    pub fn mark_active(&mut self, current_path: &str) {
        nav::mark_active(&mut self.links, current_path);
    }

    pub fn active_index(&self) -> Option<usize> {
        self.links.iter().position(|l| l.active)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

/// Blocking popup; any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub notification: Option<Notification>,
    pub heatmap: HeatmapPageState,
    pub live: LivePageState,
    pub nav: NavState,
    pub generations: RequestGenerations,
}

impl AppState {
    pub fn new(league_id: &str, season: &str) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            notification: None,
            heatmap: HeatmapPageState::new(league_id, season),
            live: LivePageState::default(),
            nav: NavState::default(),
            generations: RequestGenerations::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_api::{HeatPoint, League, Player, Roster};

    #[test]
    fn generations_only_accept_latest() {
        let mut generations = RequestGenerations::default();
        let first = generations.issue(RequestKind::Fixtures);
        let second = generations.issue(RequestKind::Fixtures);
        assert!(second > first);
        assert!(!generations.is_current(RequestKind::Fixtures, first));
        assert!(generations.is_current(RequestKind::Fixtures, second));

        let detail = generations.issue(RequestKind::MatchDetail);
        assert!(generations.is_current(RequestKind::MatchDetail, detail));
        assert!(generations.is_current(RequestKind::Fixtures, second));

        generations.invalidate(RequestKind::MatchDetail);
        assert!(!generations.is_current(RequestKind::MatchDetail, detail));
        assert!(generations.is_current(RequestKind::Nav, 0));
    }

    #[test]
    fn text_input_commits_trimmed_draft() {
        let mut input = TextInput::new("1204");
        input.begin_edit();
        input.pop();
        input.pop();
        input.pop();
        input.pop();
        for c in " 1005 ".chars() {
            input.push(c);
        }
        assert_eq!(input.value, "1204");
        assert_eq!(input.display(), " 1005 ");
        assert_eq!(input.commit(), "1005");
        assert!(!input.is_editing());

        input.begin_edit();
        input.push('9');
        input.cancel();
        assert_eq!(input.display(), "1005");
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(HeatmapFocus::VisitorPlayers.next(), HeatmapFocus::League);
        assert_eq!(HeatmapFocus::League.prev(), HeatmapFocus::VisitorPlayers);
        assert_eq!(HeatmapFocus::Fixtures.next(), HeatmapFocus::LocalPlayers);
    }

    #[test]
    fn fixture_load_resets_match_state() {
        let mut page = HeatmapPageState::new("1204", "");
        page.current_match_id = Some("42".into());
        page.detail = Some(MatchDetail::default());
        page.season_input.value = " 2023/2024 ".into();
        page.begin_fixture_load();
        assert_eq!(page.current_match_id, None);
        assert!(page.detail.is_none());
        assert_eq!(page.season, "2023/2024");
        assert_eq!(page.fixture_picker.labels(), vec![LOADING_FIXTURES]);
        assert_eq!(page.local.picker.labels(), vec![SELECT_PLAYER]);
    }

    #[test]
    fn selected_player_reaches_region() {
        let mut page = HeatmapPageState::new("1204", "");
        let roster: Roster = [(
            "7",
            Player { name: "Saka".into(), heatmap: vec![HeatPoint { x: 80.0, y: 20.0, value: 1.0 }] },
        )]
        .into_iter()
        .collect();
        page.detail = Some(MatchDetail { local_players: roster.clone(), ..MatchDetail::default() });
        page.local.picker = selector::player_selector(&roster);
        page.local.picker.move_down();
        page.local.picker.commit();
        page.show_selected_player(Team::Local);
        assert_eq!(page.local.region.player_name(), Some("Saka"));
        assert_eq!(page.local.region.message(), None);

        page.show_selected_player(Team::Visitor);
        assert_eq!(page.visitor.region.player_name(), None);
    }

    #[test]
    fn live_filter_needs_non_blank_input() {
        let mut live = LivePageState::default();
        live.matches = vec![
            Match { league: League { id: "1204".into(), ..League::default() }, ..Match::default() },
            Match { league: League { id: "1005".into(), ..League::default() }, ..Match::default() },
        ];
        live.filter_input.begin_edit();
        live.filter_input.push('1');
        live.filter_input.push('0');
        live.filter_input.push('0');
        live.filter_input.push('5');
        live.apply_filter();
        assert_eq!(live.league_filter.as_deref(), Some("1005"));
        assert_eq!(live.count_line(), "Total Matches: 1");

        live.filter_input.begin_edit();
        live.filter_input.pop();
        live.filter_input.pop();
        live.filter_input.pop();
        live.filter_input.pop();
        live.apply_filter();
        assert_eq!(live.league_filter.as_deref(), Some("1005"));

        live.clear_filter();
        assert_eq!(live.league_filter, None);
        assert_eq!(live.visible_matches().len(), 2);
    }

    #[test]
    fn updated_line_defaults_to_just_now() {
        let mut live = LivePageState::default();
        assert_eq!(live.updated_line(), "Last updated: Just now");
        live.updated = Some("2024-05-01 12:00".into());
        assert_eq!(live.updated_line(), "Last updated: 2024-05-01 12:00");
    }
}
