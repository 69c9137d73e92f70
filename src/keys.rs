use crate::app::{App, MenuItem};
use crate::state::app_state::{HeatmapFocus, Team, TextInput};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Clone, Copy, Debug, PartialEq)]
enum InputTarget {
    League,
    Season,
    LiveFilter,
}

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let requests = apply_key(&mut guard, key_event);
    drop(guard);

    for request in requests {
        let _ = network_requests.send(request).await;
    }
}

/// Apply one key press and return the fetches it calls for.
fn apply_key(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    let mut requests = Vec::new();

    if app.state.notification.is_some() {
        app.dismiss_notification();
        return requests;
    }

    if let Some(target) = active_input(app) {
        edit_input(app, target, key_event, &mut requests);
        return requests;
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching, by position in the nav bar
        (_, Char(c @ '1'..='9'), _) => {
            let index = c as usize - '1' as usize;
            app.select_nav_link(index);
        }
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),

        // Heatmap page
        (MenuItem::Heatmap, KeyCode::Tab, _) => {
            app.state.heatmap.focus = app.state.heatmap.focus.next();
        }
        (MenuItem::Heatmap, KeyCode::BackTab, _) => {
            app.state.heatmap.focus = app.state.heatmap.focus.prev();
        }
        (MenuItem::Heatmap, Char('j') | KeyCode::Down, _) => move_cursor(app, true),
        (MenuItem::Heatmap, Char('k') | KeyCode::Up, _) => move_cursor(app, false),
        (MenuItem::Heatmap, KeyCode::Enter, _) => match app.state.heatmap.focus {
            HeatmapFocus::League => app.state.heatmap.league_input.begin_edit(),
            HeatmapFocus::Season => app.state.heatmap.season_input.begin_edit(),
            HeatmapFocus::Fixtures => requests.extend(app.select_fixture()),
            HeatmapFocus::LocalPlayers => app.select_player(Team::Local),
            HeatmapFocus::VisitorPlayers => app.select_player(Team::Visitor),
        },
        (MenuItem::Heatmap, Char('r'), _) => requests.push(app.load_fixtures()),

        // Live page
        (MenuItem::Live, Char('r'), _) => requests.push(app.refresh_live()),
        (MenuItem::Live, Char('t'), _) => requests.push(app.toggle_live_feed()),
        (MenuItem::Live, Char('/'), _) => app.state.live.filter_input.begin_edit(),
        (MenuItem::Live, Char('c'), _) => app.state.live.clear_filter(),
        (MenuItem::Live, Char('j') | KeyCode::Down, _) => app.live_scroll_down(),
        (MenuItem::Live, Char('k') | KeyCode::Up, _) => app.live_scroll_up(),

        // Global
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }

    requests
}

fn move_cursor(app: &mut App, down: bool) {
    let page = &mut app.state.heatmap;
    let focus = page.focus;
    let picker = match focus {
        HeatmapFocus::Fixtures => &mut page.fixture_picker,
        HeatmapFocus::LocalPlayers => &mut page.panel_mut(Team::Local).picker,
        HeatmapFocus::VisitorPlayers => &mut page.panel_mut(Team::Visitor).picker,
        HeatmapFocus::League | HeatmapFocus::Season => return,
    };
    if down {
        picker.move_down();
    } else {
        picker.move_up();
    }
}

fn active_input(app: &App) -> Option<InputTarget> {
    let state = &app.state;
    match state.active_tab {
        MenuItem::Heatmap if state.heatmap.league_input.is_editing() => Some(InputTarget::League),
        MenuItem::Heatmap if state.heatmap.season_input.is_editing() => Some(InputTarget::Season),
        MenuItem::Live if state.live.filter_input.is_editing() => Some(InputTarget::LiveFilter),
        _ => None,
    }
}

fn input_mut(app: &mut App, target: InputTarget) -> &mut TextInput {
    match target {
        InputTarget::League => &mut app.state.heatmap.league_input,
        InputTarget::Season => &mut app.state.heatmap.season_input,
        InputTarget::LiveFilter => &mut app.state.live.filter_input,
    }
}

fn edit_input(app: &mut App, target: InputTarget, key_event: KeyEvent, requests: &mut Vec<NetworkRequest>) {
    match key_event.code {
        KeyCode::Enter => match target {
            InputTarget::League | InputTarget::Season => {
                input_mut(app, target).commit();
                requests.push(app.load_fixtures());
            }
            InputTarget::LiveFilter => app.state.live.apply_filter(),
        },
        KeyCode::Esc => input_mut(app, target).cancel(),
        KeyCode::Backspace => input_mut(app, target).pop(),
        Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => input_mut(app, target).push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use crate::state::app_state::Notification;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            apply_key(app, press(Char(c)));
        }
    }

    #[test]
    fn league_edit_reloads_fixtures() {
        let mut app = App::new(AppSettings::default());
        app.state.heatmap.focus = HeatmapFocus::League;
        assert!(apply_key(&mut app, press(KeyCode::Enter)).is_empty());
        for _ in 0..4 {
            apply_key(&mut app, press(KeyCode::Backspace));
        }
        type_text(&mut app, "1005");
        let requests = apply_key(&mut app, press(KeyCode::Enter));
        match requests.as_slice() {
            [NetworkRequest::LoadFixtures { league_id, .. }] => assert_eq!(league_id, "1005"),
            other => panic!("unexpected requests {other:?}"),
        }
    }

    #[test]
    fn typing_q_while_editing_does_not_quit() {
        let mut app = App::new(AppSettings::default());
        app.update_tab(MenuItem::Live);
        apply_key(&mut app, press(Char('/')));
        type_text(&mut app, "q1");
        assert_eq!(app.state.live.filter_input.display(), "q1");
        apply_key(&mut app, press(KeyCode::Esc));
        assert!(!app.state.live.filter_input.is_editing());
        assert_eq!(app.state.live.league_filter, None);
    }

    #[test]
    fn live_keys_refresh_and_filter() {
        let mut app = App::new(AppSettings::default());
        apply_key(&mut app, press(Char('2')));
        assert_eq!(app.state.active_tab, MenuItem::Live);
        assert!(matches!(
            apply_key(&mut app, press(Char('r'))).as_slice(),
            [NetworkRequest::LoadLiveBoard { .. }]
        ));
        apply_key(&mut app, press(Char('/')));
        type_text(&mut app, "1204");
        assert!(apply_key(&mut app, press(KeyCode::Enter)).is_empty());
        assert_eq!(app.state.live.league_filter.as_deref(), Some("1204"));
        apply_key(&mut app, press(Char('c')));
        assert_eq!(app.state.live.league_filter, None);
    }

    #[test]
    fn any_key_dismisses_notification() {
        let mut app = App::new(AppSettings::default());
        app.state.notification = Some(Notification { title: "Fixtures".into(), message: "boom".into() });
        assert!(apply_key(&mut app, press(Char('r'))).is_empty());
        assert!(app.state.notification.is_none());
    }

    #[test]
    fn focus_and_cursor_on_heatmap_page() {
        let mut app = App::new(AppSettings::default());
        apply_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.state.heatmap.focus, HeatmapFocus::LocalPlayers);
        apply_key(&mut app, press(KeyCode::BackTab));
        apply_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.state.heatmap.focus, HeatmapFocus::Season);
        apply_key(&mut app, press(Char('j')));
        assert_eq!(app.state.heatmap.fixture_picker.cursor(), 0);
    }
}
