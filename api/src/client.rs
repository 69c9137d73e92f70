use crate::endpoint::{Endpoint, LiveFeed};
use crate::wire::{
    ErrorBody, FixturesResponse, HeatmapResponse, LiveResponse, Scalar, WireEvent, WireMatch,
    WireRoster, WireStatPair, WireStats, value_message,
};
use crate::{
    Event, EventKind, Fixture, FixtureList, HeatPoint, League, LiveBoard, Match, MatchDetail,
    MatchStats, Minute, Player, Roster, Side, StatPair, TeamRef,
};
use reqwest::header::{CACHE_CONTROL, HeaderValue, PRAGMA};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type RemoteResult<T> = Result<T, RemoteError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client for the football backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

/// Everything a fetch can fail with. All variants surface the same way to
/// the user; the split only matters for diagnostics.
#[derive(Debug)]
pub enum RemoteError {
    /// Network failure or a non-2xx status.
    Transport { url: String, message: String },
    /// 2xx response whose payload carries an `error` field.
    Api { url: String, message: String },
    /// 2xx response that is not the JSON we expect.
    Parsing { url: String, message: String },
    InvalidUrl(String),
}

impl RemoteError {
    /// The text shown to the user.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Transport { message, .. }
            | RemoteError::Api { message, .. }
            | RemoteError::Parsing { message, .. }
            | RemoteError::InvalidUrl(message) => message,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Transport { url, message } => write!(f, "Transport error for {url}: {message}"),
            RemoteError::Api { url, message } => write!(f, "API error for {url}: {message}"),
            RemoteError::Parsing { url, message } => write!(f, "Parse error for {url}: {message}"),
            RemoteError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

impl FootballApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("pitchside/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: Duration::from_secs(15),
        }
    }

    /// Parse `base_url` and build a client for it.
    pub fn with_base_url(base_url: &str) -> RemoteResult<Self> {
        let url = Url::parse(base_url.trim())
            .map_err(|e| RemoteError::InvalidUrl(format!("{base_url}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(format!("{base_url}: not a base URL")));
        }
        Ok(Self::new(url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fixture list for a league; `season = None` means the current season.
    pub async fn fetch_fixtures(&self, league_id: &str, season: Option<&str>) -> RemoteResult<FixtureList> {
        let endpoint = Endpoint::fixtures(league_id, season);
        let raw: FixturesResponse = self.get_json(&endpoint).await?;
        Ok(map_fixtures(raw, &endpoint))
    }

    /// Rosters, positional samples and header data for one match.
    pub async fn fetch_match_detail(
        &self,
        league_id: &str,
        match_id: &str,
        season: Option<&str>,
    ) -> RemoteResult<MatchDetail> {
        let endpoint = Endpoint::heatmap(league_id, match_id, season);
        let raw: HeatmapResponse = self.get_json(&endpoint).await?;
        Ok(map_match_detail(raw))
    }

    pub async fn fetch_live_board(&self, feed: LiveFeed) -> RemoteResult<LiveBoard> {
        let raw: LiveResponse = self.get_json(&Endpoint::LiveBoard(feed)).await?;
        Ok(map_live_board(raw))
    }

    /// Raw markup of the shared navigation include, bypassing caches.
    pub async fn fetch_nav_fragment(&self) -> RemoteResult<String> {
        let url = self.url_for(&Endpoint::NavFragment)?;
        let request = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"));
        let (status, body) = self.send(request, &url).await?;
        if !status.is_success() {
            return Err(transport_failure(&url, status, &body));
        }
        Ok(body)
    }

    fn url_for(&self, endpoint: &Endpoint) -> RemoteResult<Url> {
        endpoint
            .url(&self.base_url)
            .ok_or_else(|| RemoteError::InvalidUrl(format!("cannot join {endpoint:?} onto {}", self.base_url)))
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> RemoteResult<(reqwest::StatusCode, String)> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RemoteError::Transport { url: url.to_string(), message: e.to_string() })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport { url: url.to_string(), message: e.to_string() })?;
        Ok((status, body))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, endpoint: &Endpoint) -> RemoteResult<T> {
        let url = self.url_for(endpoint)?;
        let (status, body) = self.send(self.client.get(url.clone()), &url).await?;
        if !status.is_success() {
            return Err(transport_failure(&url, status, &body));
        }
        decode_payload(&url, &body)
    }
}

/// Message from a `{detail}`/`{error}` body, else a generic status line.
fn transport_failure(url: &Url, status: reqwest::StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| format!("HTTP status {}", status.as_u16()));
    RemoteError::Transport { url: url.to_string(), message }
}

/// Decode a 2xx body, turning an embedded `error` field into `RemoteError::Api`.
fn decode_payload<T: serde::de::DeserializeOwned>(url: &Url, body: &str) -> RemoteResult<T> {
    let parsing = |e: serde_json::Error| RemoteError::Parsing { url: url.to_string(), message: e.to_string() };
    let value: Value = serde_json::from_str(body).map_err(parsing)?;
    if let Some(message) = value.get("error").and_then(value_message) {
        return Err(RemoteError::Api { url: url.to_string(), message });
    }
    serde_json::from_value(value).map_err(parsing)
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn text(value: Option<Scalar>) -> String {
    value.map(|v| v.as_text()).unwrap_or_default()
}

fn map_fixtures(raw: FixturesResponse, endpoint: &Endpoint) -> FixtureList {
    let (league_id, season) = match endpoint {
        Endpoint::Fixtures { league_id, season } => (league_id.clone(), season.clone()),
        _ => (String::new(), None),
    };
    let fixtures = raw
        .fixtures
        .unwrap_or_default()
        .into_iter()
        .filter_map(|f| {
            let match_id = text(f.match_id);
            if match_id.is_empty() {
                return None;
            }
            let display = f.display.unwrap_or_else(|| match_id.clone());
            Some(Fixture { match_id, display })
        })
        .collect();

    FixtureList {
        league_id,
        season,
        league_name: raw.league_name.unwrap_or_default(),
        fixtures,
    }
}

fn map_match_detail(raw: HeatmapResponse) -> MatchDetail {
    let live_minute = raw
        .live_minute
        .map(|m| m.as_text().trim().to_owned())
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("N/A"));

    MatchDetail {
        match_date: raw.match_date.unwrap_or_default(),
        local_name: raw.localteam_name.unwrap_or_default(),
        visitor_name: raw.visitorteam_name.unwrap_or_default(),
        final_score: raw.final_score.unwrap_or_default(),
        status: raw.match_status.unwrap_or_default(),
        live_minute,
        local_players: map_roster(raw.localteam_players),
        visitor_players: map_roster(raw.visitorteam_players),
    }
}

fn map_roster(raw: Option<WireRoster>) -> Roster {
    raw.unwrap_or_default()
        .0
        .into_iter()
        .map(|(id, p)| {
            let heatmap = p
                .heatmap_data
                .unwrap_or_default()
                .into_iter()
                .filter_map(|point| {
                    let x = point.x.as_ref().and_then(Scalar::as_f64)?;
                    let y = point.y.as_ref().and_then(Scalar::as_f64)?;
                    let value = point.value.as_ref().and_then(Scalar::as_f64).unwrap_or(0.0);
                    Some(HeatPoint {
                        x: x.clamp(0.0, 100.0),
                        y: y.clamp(0.0, 100.0),
                        value: value.max(0.0),
                    })
                })
                .collect();
            (id, Player { name: p.name.unwrap_or_default(), heatmap })
        })
        .collect()
}

fn map_live_board(raw: LiveResponse) -> LiveBoard {
    LiveBoard {
        matches: raw.matches.unwrap_or_default().into_iter().map(map_match).collect(),
        updated: raw.updated.filter(|u| !u.trim().is_empty()),
    }
}

fn map_match(m: WireMatch) -> Match {
    let league = m.league.unwrap_or_default();
    let home = m.home_team.unwrap_or_default();
    let away = m.away_team.unwrap_or_default();

    Match {
        id: text(m.match_id),
        league: League {
            id: text(league.id),
            name: league.name.unwrap_or_default(),
            is_cup: league.is_cup.as_ref().and_then(Scalar::as_bool).unwrap_or(false),
        },
        date: m.date.unwrap_or_default(),
        time: m.time.unwrap_or_default(),
        status: text(m.status),
        timer: m.timer.map(|t| t.as_text()).filter(|t| !t.is_empty()),
        home: TeamRef {
            id: text(home.id),
            name: home.name.unwrap_or_default(),
            goals: home.goals.as_ref().and_then(Scalar::as_u32).unwrap_or(0),
        },
        away: TeamRef {
            id: text(away.id),
            name: away.name.unwrap_or_default(),
            goals: away.goals.as_ref().and_then(Scalar::as_u32).unwrap_or(0),
        },
        halftime_score: m.halftime_score.filter(|s| !s.is_empty()),
        stats: map_stats(m.stats.unwrap_or_default()),
        events: m.events.unwrap_or_default().into_iter().map(map_event).collect(),
    }
}

fn map_stats(s: WireStats) -> MatchStats {
    let pair = |p: Option<WireStatPair>| {
        let p = p.unwrap_or_default();
        StatPair {
            home: p.home.as_ref().and_then(Scalar::as_u32).unwrap_or(0),
            away: p.away.as_ref().and_then(Scalar::as_u32).unwrap_or(0),
        }
    };

    MatchStats {
        possession: pair(s.possession),
        shots_on_target: pair(s.shots_on_target),
        shots_off_target: pair(s.shots_off_target),
        corners: pair(s.corners),
        yellow_cards: pair(s.yellow_cards),
        red_cards: pair(s.red_cards),
        attacks: pair(s.attacks),
        dangerous_attacks: pair(s.dangerous_attacks),
    }
}

fn map_event(e: WireEvent) -> Event {
    let mut minute = e
        .minute
        .map(|m| m.as_text())
        .and_then(|m| Minute::parse(&m))
        .unwrap_or_default();
    if minute.extra.is_none() {
        minute.extra = e
            .extra_min
            .as_ref()
            .and_then(Scalar::as_u32)
            .and_then(|x| u16::try_from(x).ok())
            .filter(|x| *x > 0);
    }

    let side = match e.team.as_deref() {
        Some("home") => Side::Home,
        _ => Side::Away,
    };

    Event {
        kind: e.kind.as_deref().map(EventKind::parse).unwrap_or_default(),
        minute,
        player: e.player.filter(|p| !p.trim().is_empty()),
        assist: e.assist.filter(|a| !a.trim().is_empty()),
        side,
    }
}
