pub mod client;
pub mod endpoint;
pub mod wire;

use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// One selectable entry of a league's fixture list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixture {
    pub match_id: String,
    pub display: String,
}

/// Fixtures of one league and season, tagged with what was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureList {
    pub league_id: String,
    /// `None` for the current season.
    pub season: Option<String>,
    pub league_name: String,
    pub fixtures: Vec<Fixture>,
}

/// A positional sample. `x` and `y` are percentages of the pitch (0–100).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub name: String,
    pub heatmap: Vec<HeatPoint>,
}

/// Player id → player mapping for one team, in the order the server sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<(String, Player)>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a player; an id that is already present is replaced in place.
    pub fn insert(&mut self, id: impl Into<String>, player: Player) {
        let id = id.into();
        match self.players.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = player,
            None => self.players.push((id, player)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, player)| player)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Player)> {
        self.players.iter().map(|(id, player)| (id.as_str(), player))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Player)> for Roster {
    fn from_iter<I: IntoIterator<Item = (K, Player)>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for (id, player) in iter {
            roster.insert(id, player);
        }
        roster
    }
}

/// Everything the heatmap page shows for one match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchDetail {
    pub match_date: String,
    pub local_name: String,
    pub visitor_name: String,
    pub final_score: String,
    pub status: String,
    /// `None` when the server reports the "N/A" sentinel.
    pub live_minute: Option<String>,
    pub local_players: Roster,
    pub visitor_players: Roster,
}

impl MatchDetail {
    pub fn is_live(&self) -> bool {
        self.status == "Live"
    }
}

// ---------------------------------------------------------------------------
// Live board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveBoard {
    pub matches: Vec<Match>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub id: String,
    pub league: League,
    pub date: String,
    pub time: String,
    pub status: String,
    pub timer: Option<String>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub halftime_score: Option<String>,
    pub stats: MatchStats,
    /// Most recent first, exactly as received.
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct League {
    pub id: String,
    pub name: String,
    pub is_cup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    pub goals: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatPair {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub possession: StatPair,
    pub shots_on_target: StatPair,
    pub shots_off_target: StatPair,
    pub corners: StatPair,
    pub yellow_cards: StatPair,
    pub red_cards: StatPair,
    pub attacks: StatPair,
    pub dangerous_attacks: StatPair,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventKind {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    #[default]
    Unknown,
    Other(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "goal" => EventKind::Goal,
            "yellowcard" => EventKind::YellowCard,
            "redcard" => EventKind::RedCard,
            "substitution" => EventKind::Substitution,
            "" => EventKind::Unknown,
            _ => EventKind::Other(lowered),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    pub fn tag(&self) -> &'static str {
        match self {
            Side::Home => "H",
            Side::Away => "A",
        }
    }
}

/// Match minute with optional stoppage time, e.g. `45+2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minute {
    pub base: u16,
    pub extra: Option<u16>,
}

impl Minute {
    /// Parses `"67"`, `"45+2"` and tolerates stray whitespace or a trailing `'`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_end_matches('\'');
        let (base, extra) = match trimmed.split_once('+') {
            Some((base, extra)) => (base, Some(extra)),
            None => (trimmed, None),
        };
        let base = base.trim().parse().ok()?;
        let extra = extra.and_then(|e| e.trim().parse().ok()).filter(|e| *e > 0);
        Some(Minute { base, extra })
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extra {
            Some(extra) => write!(f, "{}+{}", self.base, extra),
            None => write!(f, "{}", self.base),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub minute: Minute,
    pub player: Option<String>,
    pub assist: Option<String>,
    pub side: Side,
}
