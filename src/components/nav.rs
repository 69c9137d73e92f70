use scraper::{ElementRef, Html, Selector};

const NAV_LINK_SELECTOR: &str = ".top-nav .nav-link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub target: String,
    pub active: bool,
}

impl NavLink {
    fn new(label: &str, target: &str) -> Self {
        Self { label: label.to_string(), target: target.to_string(), active: false }
    }
}

/// Links used when the shared include can't be fetched or holds none.
pub fn fallback_links() -> Vec<NavLink> {
    vec![NavLink::new("Home", "/"), NavLink::new("Live", "/live"), NavLink::new("HeatMap", "/")]
}

/// Links of a navigation fragment, in document order. The target is
/// `data-path`, else `href`, else `/`.
pub fn parse_links(html: &str) -> Vec<NavLink> {
    let Ok(selector) = Selector::parse(NAV_LINK_SELECTOR) else {
        return Vec::new();
    };
    Html::parse_fragment(html)
        .select(&selector)
        .map(|element| {
            let attrs = element.value();
            let target = attrs
                .attr("data-path")
                .or_else(|| attrs.attr("href"))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or("/");
            let label = link_text(&element);
            let label = if label.is_empty() { target.to_string() } else { label };
            NavLink::new(&label, target)
        })
        .collect()
}

fn link_text(element: &ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Trailing slashes stripped, empty becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
}

/// Mark the first link whose target matches `current_path`; all others are
/// cleared.
pub fn mark_active(links: &mut [NavLink], current_path: &str) {
    let current = normalize_path(current_path);
    let mut found = false;
    for link in links.iter_mut() {
        link.active = !found && normalize_path(&link.target) == current;
        found |= link.active;
    }
}

/// Links for the tab bar: the fragment's when it has any, otherwise the
/// fallback set, with the current page marked.
pub fn resolve_links(html: Option<&str>, current_path: &str) -> Vec<NavLink> {
    let mut links = html.map(parse_links).unwrap_or_default();
    if links.is_empty() {
        links = fallback_links();
    }
    mark_active(&mut links, current_path);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r#"
        <nav class="top-nav">
          <a class="nav-link" href="/" data-path="/">Home</a>
          <a class="nav-link" href="/live/">Live
             Scores</a>
          <a class="nav-link">Misc</a>
          <a class="brand" href="/about">About</a>
        </nav>
        <a class="nav-link" href="/outside">Outside</a>
    "#;

    #[test]
    fn parses_links_inside_top_nav_only() {
        let links = parse_links(FRAGMENT);
        let pairs: Vec<(&str, &str)> = links.iter().map(|l| (l.label.as_str(), l.target.as_str())).collect();
        assert_eq!(pairs, vec![("Home", "/"), ("Live Scores", "/live/"), ("Misc", "/")]);
    }

    #[test]
    fn data_path_wins_over_href() {
        let links = parse_links(r#"<div class="top-nav"><a class="nav-link" href="/x" data-path="/live">L</a></div>"#);
        assert_eq!(links[0].target, "/live");
    }

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_path("/live/"), "/live");
        assert_eq!(normalize_path("/live///"), "/live");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn at_most_one_active_link() {
        let mut links = fallback_links();
        mark_active(&mut links, "/");
        let active: Vec<&str> = links.iter().filter(|l| l.active).map(|l| l.label.as_str()).collect();
        assert_eq!(active, vec!["Home"]);

        mark_active(&mut links, "/live/");
        let active: Vec<&str> = links.iter().filter(|l| l.active).map(|l| l.label.as_str()).collect();
        assert_eq!(active, vec!["Live"]);

        mark_active(&mut links, "/nowhere");
        assert!(links.iter().all(|l| !l.active));
    }

    #[test]
    fn failed_or_empty_fragment_uses_fallback() {
        assert_eq!(resolve_links(None, "/").len(), 3);
        let links = resolve_links(Some("<p>maintenance</p>"), "/live");
        assert_eq!(links.iter().map(|l| l.label.as_str()).collect::<Vec<_>>(), vec!["Home", "Live", "HeatMap"]);
        assert!(links[1].active);
    }

    #[test]
    fn fetched_fragment_is_marked() {
        let links = resolve_links(Some(FRAGMENT), "/live");
        assert!(links[1].active);
        assert!(!links[0].active);
    }
}
