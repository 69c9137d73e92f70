use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::heatmap::{HeatmapConfig, HeatmapView};
use crate::components::match_card::{MatchCardView, build_match_card, card_height};
use crate::components::selector::SelectorView;
use crate::state::app_state::{HeatmapFocus, LiveContent, NO_MATCHES, LOADING_LIVE, TeamPanel, TextInput};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

const CARD_MIN_WIDTH: u16 = 46;
const FIXTURE_PICKER_HEIGHT: u16 = 8;
const PLAYER_PICKER_HEIGHT: u16 = 7;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Heatmap => draw_heatmap_page(f, layout.main, app),
            MenuItem::Live => draw_live_page(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
        draw_notification(f, f.area(), app);
    });

    if let Err(e) = result {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn focus_border<'a>(focused: bool) -> Block<'a> {
    default_border(if focused { Color::Yellow } else { Color::DarkGray })
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let titles: Vec<Line> = app
        .state
        .nav
        .links
        .iter()
        .enumerate()
        .map(|(i, link)| Line::from(format!("{} {}", i + 1, link.label)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(app.state.nav.active_index())
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Heatmap page
// ---------------------------------------------------------------------------

fn draw_heatmap_page(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.state.heatmap;
    let [inputs, selection, teams] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(FIXTURE_PICKER_HEIGHT),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [league, season, display] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Fill(1),
    ])
    .areas(inputs);
    draw_input(f, league, " League ID ", &page.league_input, page.focus == HeatmapFocus::League);
    draw_input(f, season, " Season ", &page.season_input, page.focus == HeatmapFocus::Season);
    f.render_widget(
        Paragraph::new(page.league_display.as_str())
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .block(default_border(Color::DarkGray).title(" League ")),
        display,
    );

    let [fixtures, info] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(selection);
    f.render_widget(
        SelectorView {
            selector: &page.fixture_picker,
            block: focus_border(page.focus == HeatmapFocus::Fixtures).title(" Fixture "),
            focused: page.focus == HeatmapFocus::Fixtures,
        },
        fixtures,
    );
    let info_lines = vec![
        Line::from(Span::styled(page.info.date.as_str(), Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            page.info.score.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(page.info.status.as_str(), Style::default().fg(Color::LightRed))),
    ];
    f.render_widget(
        Paragraph::new(info_lines)
            .wrap(Wrap { trim: true })
            .block(default_border(Color::DarkGray).title(" Match ")),
        info,
    );

    let [local, visitor] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(teams);
    draw_team_panel(f, local, &page.local, page.focus == HeatmapFocus::LocalPlayers);
    draw_team_panel(f, visitor, &page.visitor, page.focus == HeatmapFocus::VisitorPlayers);
}

fn draw_input(f: &mut Frame, area: Rect, title: &str, input: &TextInput, focused: bool) {
    let mut text = input.display().to_string();
    if input.is_editing() {
        text.push('▏');
    }
    let style = if input.is_editing() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    f.render_widget(
        Paragraph::new(text)
            .style(style)
            .block(focus_border(focused).title(title.to_string())),
        area,
    );
}

fn draw_team_panel(f: &mut Frame, area: Rect, panel: &TeamPanel, focused: bool) {
    let [picker, heatmap] = Layout::vertical([
        Constraint::Length(PLAYER_PICKER_HEIGHT),
        Constraint::Fill(1),
    ])
    .areas(area);

    f.render_widget(
        SelectorView {
            selector: &panel.picker,
            block: focus_border(focused).title(format!(" {} ", panel.title)),
            focused,
        },
        picker,
    );

    let title = match panel.region.player_name() {
        Some(name) => format!(" {name} "),
        None => " Heatmap ".to_string(),
    };
    f.render_widget(
        HeatmapView {
            region: &panel.region,
            block: default_border(Color::DarkGray).title(title),
            config: HeatmapConfig::default(),
        },
        heatmap,
    );
}

// ---------------------------------------------------------------------------
// Live page
// ---------------------------------------------------------------------------

fn draw_live_page(f: &mut Frame, area: Rect, app: &App) {
    let live = &app.state.live;
    let [header, content] = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let filter = if live.filter_input.is_editing() {
        format!("{}▏", live.filter_input.display())
    } else {
        live.league_filter.clone().unwrap_or_else(|| "all".to_string())
    };
    let summary = Line::from(vec![
        Span::styled(format!("{} ", live.feed.label()), Style::default().fg(Color::LightRed)),
        Span::raw("│ "),
        Span::raw(live.count_line()),
        Span::raw(" │ "),
        Span::styled(live.updated_line(), Style::default().fg(Color::Gray)),
        Span::styled(
            live.fetched_line().map(|l| format!(" ({l})")).unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" │ League: "),
        Span::styled(filter, Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(
        Paragraph::new(summary).block(default_border(Color::White).title(" Live Matches ")),
        header,
    );

    match &live.content {
        LiveContent::Loading => draw_placeholder(f, content, LOADING_LIVE, Color::DarkGray),
        LiveContent::Failed(message) => draw_placeholder(f, content, message, Color::Red),
        LiveContent::Loaded => draw_match_grid(f, content, app),
    }
}

fn draw_match_grid(f: &mut Frame, area: Rect, app: &App) {
    let live = &app.state.live;
    let matches = live.visible_matches();
    if matches.is_empty() {
        draw_placeholder(f, area, NO_MATCHES, Color::DarkGray);
        return;
    }

    let cols = (area.width / CARD_MIN_WIDTH).max(1) as usize;
    let col_width = area.width / cols as u16;
    let first = (live.scroll / cols) * cols;

    let mut y = area.y;
    for row in matches.get(first..).unwrap_or(&[]).chunks(cols) {
        let cards: Vec<_> = row.iter().map(|m| build_match_card(m)).collect();
        let height = cards.iter().map(card_height).max().unwrap_or(0);
        let available = area.bottom().saturating_sub(y);
        if available == 0 {
            break;
        }
        for (i, card) in cards.iter().enumerate() {
            let x = area.x + i as u16 * col_width;
            f.render_widget(MatchCardView { card }, Rect::new(x, y, col_width, height.min(available)));
        }
        y = y.saturating_add(height);
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let rows = [
        ("q / Ctrl-c", "quit"),
        ("1-9", "open nav link"),
        ("?", "help (Esc to close)"),
        ("\"", "toggle log pane"),
        ("f", "toggle full screen"),
        ("", ""),
        ("Heatmap page", ""),
        ("Tab / Shift-Tab", "move focus"),
        ("j / k", "move in picker"),
        ("Enter", "select, or edit league / season"),
        ("r", "reload fixtures"),
        ("", ""),
        ("Live page", ""),
        ("r", "refresh"),
        ("t", "switch live / today"),
        ("/", "filter by league id"),
        ("c", "clear filter"),
        ("j / k", "scroll"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>16}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(default_border(Color::White).title(" Help ")), area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str, color: Color) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_notification(f: &mut Frame, area: Rect, app: &App) {
    let Some(note) = app.state.notification.as_ref() else {
        return;
    };
    let width = area.width.saturating_sub(4).min(60);
    let height = 7.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let lines = vec![
        Line::from(note.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(default_border(Color::Red).title(format!(" {} ", note.title))),
        popup,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
