use pitchside_api::{Event, EventKind, Match, StatPair};
use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

/// Most recent events shown on a card.
pub const MAX_CARD_EVENTS: usize = 4;

/// Rows a card needs when it has no events; each event adds one.
pub const CARD_BASE_HEIGHT: u16 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Finished,
    Halftime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    /// `None` is the generic in-play styling.
    pub class: Option<StatusClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leader {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatBox {
    pub label: &'static str,
    pub home: u32,
    pub away: u32,
    pub leader: Option<Leader>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Goal,
    Yellow,
    Red,
    Sub,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub icon: &'static str,
    pub class: Option<EventClass>,
    pub player: String,
    /// `"H"`/`"A"`.
    pub side: &'static str,
    pub assist: Option<String>,
    pub minute: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PossessionBar {
    pub home: u32,
    pub away: u32,
}

/// Everything one live match card shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub league_badge: String,
    pub kickoff: String,
    pub status: StatusBadge,
    /// Running clock and half-time score, e.g. `⏱ 67' · HT 1 - 0`.
    pub clock: Option<String>,
    pub home_name: String,
    pub away_name: String,
    pub home_id: String,
    pub away_id: String,
    /// `"{h} - {a}"`.
    pub score: String,
    /// `"{home} {score} {away}"`.
    pub headline: String,
    pub stats: Vec<StatBox>,
    /// Shown in a smaller line under the stat rows.
    pub shots_off_target: StatPair,
    pub red_cards: StatPair,
    pub possession: PossessionBar,
    pub events: Vec<EventRow>,
}

pub fn build_match_card(m: &Match) -> MatchCard {
    let icon = if m.league.is_cup { "🏆" } else { "⚽" };
    let score = format!("{} - {}", m.home.goals, m.away.goals);
    let s = &m.stats;

    MatchCard {
        league_badge: format!("{icon} {}", m.league.name),
        kickoff: format!("{} {}", m.date, m.time).trim().to_string(),
        status: status_badge(&m.status),
        clock: clock_line(m),
        home_name: m.home.name.clone(),
        away_name: m.away.name.clone(),
        home_id: m.home.id.clone(),
        away_id: m.away.id.clone(),
        headline: format!("{} {} {}", m.home.name, score, m.away.name),
        score,
        stats: vec![
            stat_box("Possession", s.possession),
            stat_box("Shots on Target", s.shots_on_target),
            stat_box("Corners", s.corners),
            stat_box("Yellow Cards", s.yellow_cards),
            stat_box("Attacks", s.attacks),
            stat_box("Dangerous Attacks", s.dangerous_attacks),
        ],
        shots_off_target: s.shots_off_target,
        red_cards: s.red_cards,
        possession: possession_bar(s.possession),
        events: m.events.iter().take(MAX_CARD_EVENTS).map(event_row).collect(),
    }
}

pub fn status_badge(code: &str) -> StatusBadge {
    let (label, class) = match code {
        "FT" | "90" => ("🏁 Full Time".to_string(), Some(StatusClass::Finished)),
        "HT" | "45" => ("⏸ Half Time".to_string(), Some(StatusClass::Halftime)),
        "PST" => ("🏁 Post-Match".to_string(), Some(StatusClass::Finished)),
        "NOT" => ("⏳ Not Started".to_string(), None),
        other => (format!("🔴 {other}'"), None),
    };
    StatusBadge { label, class }
}

fn clock_line(m: &Match) -> Option<String> {
    let parts: Vec<String> = [
        m.timer.as_ref().map(|t| format!("⏱ {t}'")),
        m.halftime_score.as_ref().map(|s| format!("HT {s}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

pub fn stat_box(label: &'static str, pair: StatPair) -> StatBox {
    let leader = match pair.home.cmp(&pair.away) {
        std::cmp::Ordering::Greater => Some(Leader::Home),
        std::cmp::Ordering::Less => Some(Leader::Away),
        std::cmp::Ordering::Equal => None,
    };
    StatBox { label, home: pair.home, away: pair.away, leader }
}

/// A side with no possession figure shows as an even share.
fn possession_bar(pair: StatPair) -> PossessionBar {
    let share = |v: u32| if v == 0 { 50 } else { v.min(100) };
    PossessionBar { home: share(pair.home), away: share(pair.away) }
}

pub fn event_row(event: &Event) -> EventRow {
    let (icon, class) = match &event.kind {
        EventKind::Goal => ("⚽", Some(EventClass::Goal)),
        EventKind::YellowCard => ("🟨", Some(EventClass::Yellow)),
        EventKind::RedCard => ("🟥", Some(EventClass::Red)),
        EventKind::Substitution => ("🔄", Some(EventClass::Sub)),
        EventKind::Unknown | EventKind::Other(_) => ("•", None),
    };

    EventRow {
        icon,
        class,
        player: event.player.clone().unwrap_or_else(|| "Event".to_string()),
        side: event.side.tag(),
        assist: event.assist.clone(),
        minute: format!("{}'", event.minute),
    }
}

/// Client-side league filter; `None` keeps everything.
pub fn filter_matches<'a>(matches: &'a [Match], league_id: Option<&str>) -> Vec<&'a Match> {
    match league_id {
        Some(id) => matches.iter().filter(|m| m.league.id == id).collect(),
        None => matches.iter().collect(),
    }
}

/// Rows needed to draw `card` in full.
pub fn card_height(card: &MatchCard) -> u16 {
    let events = card.events.len() as u16;
    CARD_BASE_HEIGHT + if events > 0 { events + 1 } else { 0 }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

const HOME_COLOR: Color = Color::Rgb(0x60, 0xa5, 0xfa);
const AWAY_COLOR: Color = Color::Rgb(0xf8, 0x71, 0x71);

pub struct MatchCardView<'a> {
    pub card: &'a MatchCard,
}

impl Widget for MatchCardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let card = self.card;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", card.league_badge))
            .title_bottom(Line::from(format!(" {} ", card.kickoff)).alignment(Alignment::Right));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 10 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let mut lines: Vec<Line> = Vec::with_capacity(inner.height as usize);

        lines.push(Line::from(Span::styled(card.status.label.as_str(), status_style(card.status.class))).centered());
        lines.push(Line::from(Span::styled(
            card.clock.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        )).centered());
        lines.push(Line::from(vec![
            Span::styled(card.home_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(card.score.as_str(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(card.away_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]).centered());
        lines.push(Line::from(Span::styled(
            format!("{}  ·  {}", card.home_id, card.away_id),
            Style::default().fg(Color::DarkGray),
        )).centered());
        lines.push(Line::from(""));

        for stat in &card.stats {
            lines.push(stat_line(stat, width));
        }
        lines.push(Line::from(Span::styled(
            format!(
                "Off target {} - {}  ·  🟥 {} - {}",
                card.shots_off_target.home, card.shots_off_target.away, card.red_cards.home, card.red_cards.away
            ),
            Style::default().fg(Color::DarkGray),
        )).centered());
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Possession ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}%", card.possession.home), Style::default().fg(HOME_COLOR)),
            Span::raw(" - "),
            Span::styled(format!("{}%", card.possession.away), Style::default().fg(AWAY_COLOR)),
        ]));
        lines.push(possession_line(&card.possession, width));

        if !card.events.is_empty() {
            lines.push(Line::from(Span::styled("Recent Events", Style::default().fg(Color::Gray))));
            for event in &card.events {
                lines.push(event_line(event, width));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

fn status_style(class: Option<StatusClass>) -> Style {
    match class {
        Some(StatusClass::Finished) => Style::default().fg(Color::Gray),
        Some(StatusClass::Halftime) => Style::default().fg(Color::Yellow),
        None => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
    }
}

fn stat_line(stat: &StatBox, width: usize) -> Line<'static> {
    let lead = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let plain = Style::default().fg(Color::White);
    let (home_style, away_style) = match stat.leader {
        Some(Leader::Home) => (lead, plain),
        Some(Leader::Away) => (plain, lead),
        None => (plain, plain),
    };
    let home = format!("{:>3}", stat.home);
    let away = format!("{:<3}", stat.away);
    let label_width = width.saturating_sub(8);
    let label = format!("{:^label_width$}", stat.label);
    Line::from(vec![
        Span::styled(home, home_style),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(away, away_style),
    ])
}

fn possession_line(bar: &PossessionBar, width: usize) -> Line<'static> {
    let total = (bar.home + bar.away).max(1) as usize;
    let home_cells = (width * bar.home as usize + total / 2) / total;
    let away_cells = width.saturating_sub(home_cells);
    Line::from(vec![
        Span::styled("█".repeat(home_cells), Style::default().fg(HOME_COLOR)),
        Span::styled("█".repeat(away_cells), Style::default().fg(AWAY_COLOR)),
    ])
}

fn event_line(event: &EventRow, width: usize) -> Line<'static> {
    let style = match event.class {
        Some(EventClass::Goal) => Style::default().fg(Color::Green),
        Some(EventClass::Yellow) => Style::default().fg(Color::Yellow),
        Some(EventClass::Red) => Style::default().fg(Color::Red),
        Some(EventClass::Sub) => Style::default().fg(Color::Cyan),
        None => Style::default().fg(Color::White),
    };
    let assist = event
        .assist
        .as_ref()
        .map(|a| format!("Assist: {a}"))
        .unwrap_or_default();
    let text = format!("{} {} ({} • {})", event.icon, event.player, event.side, assist);
    let minute_width = event.minute.chars().count() + 1;
    let clipped: String = text.chars().take(width.saturating_sub(minute_width)).collect();
    let pad = width.saturating_sub(clipped.chars().count() + minute_width);
    Line::from(vec![
        Span::styled(clipped, style),
        Span::raw(" ".repeat(pad + 1)),
        Span::styled(event.minute.clone(), Style::default().fg(Color::Gray)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_api::{League, MatchStats, Minute, Side, TeamRef};

    fn sample_match() -> Match {
        Match {
            id: "77".into(),
            league: League { id: "1204".into(), name: "Premier League".into(), is_cup: false },
            date: "Oct 18".into(),
            time: "13:00".into(),
            status: "67".into(),
            timer: Some("67".into()),
            halftime_score: Some("1 - 0".into()),
            home: TeamRef { id: "9260".into(), name: "Arsenal".into(), goals: 2 },
            away: TeamRef { id: "9092".into(), name: "Chelsea".into(), goals: 1 },
            stats: MatchStats {
                possession: StatPair { home: 58, away: 42 },
                corners: StatPair { home: 3, away: 3 },
                red_cards: StatPair { home: 0, away: 1 },
                ..MatchStats::default()
            },
            events: (0..6)
                .map(|i| Event {
                    kind: EventKind::Goal,
                    minute: Minute { base: 60 - i, extra: None },
                    player: Some(format!("Player {i}")),
                    assist: None,
                    side: Side::Home,
                })
                .collect(),
            ..Match::default()
        }
    }

    #[test]
    fn status_table() {
        assert_eq!(status_badge("FT"), StatusBadge { label: "🏁 Full Time".into(), class: Some(StatusClass::Finished) });
        assert_eq!(status_badge("90").class, Some(StatusClass::Finished));
        assert_eq!(status_badge("HT").label, "⏸ Half Time");
        assert_eq!(status_badge("45").class, Some(StatusClass::Halftime));
        assert_eq!(status_badge("PST").label, "🏁 Post-Match");
        assert_eq!(status_badge("NOT"), StatusBadge { label: "⏳ Not Started".into(), class: None });
    }

    #[test]
    fn unmapped_status_is_live_badge() {
        assert_eq!(status_badge("1H"), StatusBadge { label: "🔴 1H'".into(), class: None });
        assert_eq!(status_badge("67").label, "🔴 67'");
    }

    #[test]
    fn stat_leader_is_strictly_greater_side() {
        assert_eq!(stat_box("Corners", StatPair { home: 4, away: 4 }).leader, None);
        assert_eq!(stat_box("Corners", StatPair { home: 5, away: 4 }).leader, Some(Leader::Home));
        assert_eq!(stat_box("Corners", StatPair { home: 0, away: 1 }).leader, Some(Leader::Away));
    }

    #[test]
    fn card_carries_names_score_and_six_stats() {
        let card = build_match_card(&sample_match());
        assert_eq!(card.home_name, "Arsenal");
        assert_eq!(card.away_name, "Chelsea");
        assert_eq!(card.score, "2 - 1");
        assert_eq!(card.headline, "Arsenal 2 - 1 Chelsea");
        assert_eq!(card.league_badge, "⚽ Premier League");
        assert_eq!(card.kickoff, "Oct 18 13:00");
        assert_eq!(card.status.label, "🔴 67'");
        let labels: Vec<&str> = card.stats.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["Possession", "Shots on Target", "Corners", "Yellow Cards", "Attacks", "Dangerous Attacks"]
        );
        assert_eq!(card.stats[0].leader, Some(Leader::Home));
        assert_eq!(card.stats[2].leader, None);
        assert_eq!(card.red_cards, StatPair { home: 0, away: 1 });
    }

    #[test]
    fn clock_line_joins_timer_and_halftime_score() {
        let card = build_match_card(&sample_match());
        assert_eq!(card.clock.as_deref(), Some("⏱ 67' · HT 1 - 0"));

        let m = Match { timer: None, ..sample_match() };
        assert_eq!(build_match_card(&m).clock.as_deref(), Some("HT 1 - 0"));
        let m = Match { timer: None, halftime_score: None, ..sample_match() };
        assert_eq!(build_match_card(&m).clock, None);
    }

    #[test]
    fn card_keeps_four_most_recent_events_in_order() {
        let card = build_match_card(&sample_match());
        let players: Vec<&str> = card.events.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(players, vec!["Player 0", "Player 1", "Player 2", "Player 3"]);
        assert_eq!(card.events[0].minute, "60'");
    }

    #[test]
    fn missing_stats_read_as_zero() {
        let m = Match { stats: MatchStats::default(), ..sample_match() };
        let card = build_match_card(&m);
        assert!(card.stats.iter().all(|s| s.home == 0 && s.away == 0 && s.leader.is_none()));
        assert_eq!(card.possession, PossessionBar { home: 50, away: 50 });
    }

    #[test]
    fn cup_league_gets_trophy() {
        let mut m = sample_match();
        m.league.is_cup = true;
        assert!(build_match_card(&m).league_badge.starts_with("🏆"));
    }

    #[test]
    fn event_rows_use_type_table() {
        let event = Event {
            kind: EventKind::Other("var".into()),
            minute: Minute { base: 90, extra: Some(4) },
            player: None,
            assist: Some("Saka".into()),
            side: Side::Away,
        };
        let row = event_row(&event);
        assert_eq!(row.icon, "•");
        assert_eq!(row.class, None);
        assert_eq!(row.player, "Event");
        assert_eq!(row.side, "A");
        assert_eq!(row.assist.as_deref(), Some("Saka"));
        assert_eq!(row.minute, "90+4'");

        let red = event_row(&Event { kind: EventKind::RedCard, ..event.clone() });
        assert_eq!((red.icon, red.class), ("🟥", Some(EventClass::Red)));
        let sub = event_row(&Event { kind: EventKind::Substitution, ..event });
        assert_eq!((sub.icon, sub.class), ("🔄", Some(EventClass::Sub)));
    }

    #[test]
    fn league_filter_is_exact_match() {
        let mut other = sample_match();
        other.league.id = "1005".into();
        let matches = vec![sample_match(), other];
        assert_eq!(filter_matches(&matches, Some("1005")).len(), 1);
        assert_eq!(filter_matches(&matches, Some("999")).len(), 0);
        assert_eq!(filter_matches(&matches, None).len(), 2);
    }

    #[test]
    fn card_widget_draws_team_names() {
        let card = build_match_card(&sample_match());
        let area = Rect::new(0, 0, 48, card_height(&card));
        let mut buf = Buffer::empty(area);
        MatchCardView { card: &card }.render(area, &mut buf);
        let text: String = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Arsenal"));
        assert!(text.contains("Chelsea"));
        assert!(text.contains("2 - 1"));
        assert!(text.contains("Off target 0 - 0"));
        assert!(text.contains("Player 3"), "last event row was cut off:\n{text}");
    }
}
