use reqwest::Url;

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Which live feed the live page reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiveFeed {
    /// Matches currently in progress.
    #[default]
    Live,
    /// Every match scheduled for today, finished ones included.
    Today,
}

impl LiveFeed {
    pub fn label(&self) -> &'static str {
        match self {
            LiveFeed::Live => "Live",
            LiveFeed::Today => "Today",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LiveFeed::Live => LiveFeed::Today,
            LiveFeed::Today => LiveFeed::Live,
        }
    }
}

/// A backend resource. Each variant knows its own path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Fixtures {
        league_id: String,
        season: Option<String>,
    },
    Heatmap {
        league_id: String,
        match_id: String,
        season: Option<String>,
    },
    LiveBoard(LiveFeed),
    NavFragment,
}

impl Endpoint {
    pub fn fixtures(league_id: &str, season: Option<&str>) -> Self {
        Endpoint::Fixtures {
            league_id: league_id.trim().to_owned(),
            season: normalize_season(season),
        }
    }

    pub fn heatmap(league_id: &str, match_id: &str, season: Option<&str>) -> Self {
        Endpoint::Heatmap {
            league_id: league_id.trim().to_owned(),
            match_id: match_id.trim().to_owned(),
            season: normalize_season(season),
        }
    }

    /// Unescaped path segments; escaping happens when joined onto a base URL.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = Vec::with_capacity(6);
        match self {
            Endpoint::Fixtures { league_id, season } => {
                segments.extend(API_PREFIX);
                segments.extend(["fixtures", league_id.as_str()]);
                segments.extend(season.as_deref());
            }
            Endpoint::Heatmap { league_id, match_id, season } => {
                segments.extend(API_PREFIX);
                segments.extend(["heatmap", league_id.as_str(), match_id.as_str()]);
                segments.extend(season.as_deref());
            }
            Endpoint::LiveBoard(LiveFeed::Live) => {
                segments.extend(API_PREFIX);
                segments.extend(["football", "live"]);
            }
            Endpoint::LiveBoard(LiveFeed::Today) => {
                segments.extend(API_PREFIX);
                segments.extend(["football", "today"]);
            }
            Endpoint::NavFragment => segments.extend(["static", "includes", "topnav.html"]),
        }
        segments
    }

    /// Join this endpoint onto `base`, keeping any path prefix the base carries.
    pub fn url(&self, base: &Url) -> Option<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().ok()?;
            path.pop_if_empty();
            path.extend(self.segments());
        }
        Some(url)
    }
}

/// Blank seasons mean "server default", which is the path without a season.
fn normalize_season(season: Option<&str>) -> Option<String> {
    season
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000").unwrap()
    }

    #[test]
    fn fixtures_without_season() {
        let url = Endpoint::fixtures("1204", None).url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/fixtures/1204");
    }

    #[test]
    fn blank_season_is_dropped() {
        let url = Endpoint::fixtures("1204", Some("  ")).url(&base()).unwrap();
        assert_eq!(url.path(), "/api/v1/fixtures/1204");
    }

    #[test]
    fn season_is_path_escaped() {
        let url = Endpoint::heatmap("1204", "3838001", Some("2009/2010"))
            .url(&base())
            .unwrap();
        assert_eq!(url.path(), "/api/v1/heatmap/1204/3838001/2009%2F2010");

        let url = Endpoint::fixtures("1204", Some("2023 24")).url(&base()).unwrap();
        assert_eq!(url.path(), "/api/v1/fixtures/1204/2023%2024");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = Url::parse("https://example.com/football/").unwrap();
        let url = Endpoint::LiveBoard(LiveFeed::Live).url(&base).unwrap();
        assert_eq!(url.as_str(), "https://example.com/football/api/v1/football/live");
    }

    #[test]
    fn today_feed_and_nav_fragment_paths() {
        let today = Endpoint::LiveBoard(LiveFeed::Today).url(&base()).unwrap();
        assert_eq!(today.path(), "/api/v1/football/today");
        let nav = Endpoint::NavFragment.url(&base()).unwrap();
        assert_eq!(nav.path(), "/static/includes/topnav.html");
    }

    #[test]
    fn live_feed_toggles() {
        assert_eq!(LiveFeed::Live.toggle(), LiveFeed::Today);
        assert_eq!(LiveFeed::Today.toggle().label(), "Live");
    }
}
