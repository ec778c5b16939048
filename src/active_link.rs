use percent_encoding::percent_decode_str;
use url::Url;

use crate::header::NAV_LINK_CLASS;
use crate::page::{self, Page};

const ACTIVE_CLASS: &str = "active";

/// Last path segment of `location`, percent-decoded so it compares against
/// raw `href` values, with the site root mapped to `home`.
pub fn current_filename(location: &Url, home: &str) -> String {
    let last = location
        .path_segments()
        .and_then(|mut segs| segs.next_back())
        .unwrap_or("");
    if last.is_empty() {
        home.to_string()
    } else {
        percent_decode_str(last).decode_utf8_lossy().into_owned()
    }
}

pub fn link_matches(href: &str, current: &str, home: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    if href == current {
        return true;
    }
    if (current.is_empty() || current == home) && href == home {
        return true;
    }
    strip_html(href) == strip_html(current)
}

fn strip_html(s: &str) -> &str {
    s.strip_suffix(".html").unwrap_or(s)
}

/// Clear every nav link, then mark the ones matching the page location.
/// Returns the hrefs now marked active.
pub fn highlight_active_links(page: &Page, home: &str) -> Vec<String> {
    let current = current_filename(page.location(), home);
    let mut active = Vec::new();
    for link in page.select_all(&format!(".{NAV_LINK_CLASS}")) {
        page::remove_class(&link, ACTIVE_CLASS);
        let href = page::attr(&link, "href").unwrap_or_default();
        if link_matches(&href, &current, home) {
            page::add_class(&link, ACTIVE_CLASS);
            active.push(href);
        }
    }
    tracing::debug!(%current, ?active, "nav links highlighted");
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChromeConfig, NavLink};
    use crate::header::inject_header;
    use crate::store::MemoryStore;

    fn page_at(url: &str, config: &ChromeConfig) -> Page {
        let p = Page::parse(
            "<body></body>",
            Url::parse(url).unwrap(),
            1024,
            Box::new(MemoryStore::new()),
        );
        inject_header(&p, config);
        p
    }

    #[test]
    fn filename_from_location() {
        let u = Url::parse("https://site.example/app/clients.html?x=1#top").unwrap();
        assert_eq!(current_filename(&u, "index.html"), "clients.html");
        let root = Url::parse("https://site.example/app/").unwrap();
        assert_eq!(current_filename(&root, "index.html"), "index.html");
    }

    #[test]
    fn non_ascii_filename_matches_raw_href() {
        let u = Url::parse("http://localhost/serviços.html").unwrap();
        assert_eq!(u.path(), "/servi%C3%A7os.html");
        assert_eq!(current_filename(&u, "index.html"), "serviços.html");

        let mut cfg = ChromeConfig::default();
        cfg.nav_links[1].href = "serviços.html".to_string();
        let p = page_at("http://localhost/servi%C3%A7os", &cfg);
        assert_eq!(highlight_active_links(&p, &cfg.home_href), ["serviços.html"]);
    }

    #[test]
    fn matching_rules() {
        assert!(link_matches("dashboard.html", "dashboard.html", "index.html"));
        assert!(link_matches("index.html", "", "index.html"));
        assert!(link_matches("dashboard.html", "dashboard", "index.html"));
        assert!(link_matches("dashboard", "dashboard.html", "index.html"));
        assert!(!link_matches("dashboard.html", "clients.html", "index.html"));
        assert!(!link_matches("", "", "index.html"));
    }

    #[test]
    fn exactly_dashboard_is_active() {
        let cfg = ChromeConfig::default();
        let p = page_at("http://localhost/dashboard.html", &cfg);
        assert_eq!(highlight_active_links(&p, &cfg.home_href), ["dashboard.html"]);
        let active = p.select_all(".nav-link.active");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text_contents(), "Dashboard");
    }

    #[test]
    fn site_root_selects_home_link() {
        let mut cfg = ChromeConfig::default();
        cfg.nav_links.insert(
            0,
            NavLink {
                label: "Home".to_string(),
                href: "index.html".to_string(),
            },
        );
        let p = page_at("http://localhost/", &cfg);
        assert_eq!(highlight_active_links(&p, &cfg.home_href), ["index.html"]);
        assert_eq!(p.select_all(".nav-link.active").len(), 1);
    }

    #[test]
    fn rerun_clears_stale_marks() {
        let cfg = ChromeConfig::default();
        let mut p = page_at("http://localhost/dashboard.html", &cfg);
        highlight_active_links(&p, &cfg.home_href);
        p.set_location(Url::parse("http://localhost/profile").unwrap());
        assert_eq!(highlight_active_links(&p, &cfg.home_href), ["profile.html"]);
        assert_eq!(p.select_all(".nav-link.active").len(), 1);
    }
}
