use log::LevelFilter;
use pitchside_api::client::DEFAULT_BASE_URL;
use std::time::Duration;

pub const DEFAULT_LEAGUE_ID: &str = "1204";
pub const DEFAULT_MATCH_ID: &str = "3838001";
const MIN_REFRESH_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_base_url: String,
    pub default_league_id: String,
    /// Fixture pre-selected whenever a fixture list loads.
    pub default_match_id: String,
    /// Empty means the server's current season.
    pub season: String,
    /// Live board auto refresh; `None` leaves refreshing to the user.
    pub live_refresh: Option<Duration>,
    pub full_screen: bool,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            default_league_id: DEFAULT_LEAGUE_ID.to_string(),
            default_match_id: DEFAULT_MATCH_ID.to_string(),
            season: String::new(),
            live_refresh: None,
            full_screen: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            api_base_url: get("PITCHSIDE_API_URL").unwrap_or(defaults.api_base_url),
            default_league_id: get("PITCHSIDE_LEAGUE_ID").unwrap_or(defaults.default_league_id),
            default_match_id: get("PITCHSIDE_MATCH_ID").unwrap_or(defaults.default_match_id),
            season: get("PITCHSIDE_SEASON").unwrap_or_default(),
            live_refresh: get("PITCHSIDE_REFRESH_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(|secs| Duration::from_secs(secs.max(MIN_REFRESH_SECS))),
            full_screen: false,
            log_level: get("PITCHSIDE_LOG")
                .and_then(|level| level.parse().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}
