use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use url::Url;

/// One step of a replayed browsing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpec {
    /// Click the first element matching a CSS selector.
    Click(String),
    Key(String),
    Resize(u32),
    PageShow(Option<Url>),
    /// Call the exported theme switch directly, without a click.
    ToggleTheme,
}

impl FromStr for EventSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };
        match (kind, arg) {
            ("click", Some(sel)) if !sel.trim().is_empty() => Ok(Self::Click(sel.to_string())),
            ("key", Some(key)) if !key.is_empty() => Ok(Self::Key(key.to_string())),
            ("resize", Some(w)) => Ok(Self::Resize(w.trim().parse().map_err(|_| {
                anyhow::anyhow!("resize width must be a non-negative integer, got {w:?}")
            })?)),
            ("pageshow", None) => Ok(Self::PageShow(None)),
            ("pageshow", Some(url)) => Ok(Self::PageShow(Some(Url::parse(url)?))),
            ("toggle-theme", None) => Ok(Self::ToggleTheme),
            _ => anyhow::bail!(
                "unrecognized event {s:?} (expected click:<selector>, key:<name>, resize:<width>, pageshow[:<url>] or toggle-theme)"
            ),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Static HTML page to install the site header into.
    #[arg(long)]
    pub input: PathBuf,

    /// Location the page is served at; its last path segment drives link highlighting.
    #[arg(long, default_value = "http://localhost/index.html")]
    pub url: Url,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// JSON file overriding brand, links, breakpoint, storage key and labels.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON preference file standing in for browser local storage.
    ///
    /// Read before install and written back after the replay. Without it, preferences live in memory only.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Events to replay after install, in order.
    ///
    /// `click:<selector>`, `key:<name>`, `resize:<width>`, `pageshow[:<url>]`, `toggle-theme`.
    #[arg(long = "event")]
    pub events: Vec<EventSpec>,

    /// Where to write the resulting HTML. Defaults to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write a JSON summary of the final header, menu, theme and active-link state here.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_specs() {
        assert_eq!(
            "click:#menuBtn".parse::<EventSpec>().unwrap(),
            EventSpec::Click("#menuBtn".to_string())
        );
        assert_eq!(
            "click:a[href='x.html']".parse::<EventSpec>().unwrap(),
            EventSpec::Click("a[href='x.html']".to_string())
        );
        assert_eq!(
            "key:Escape".parse::<EventSpec>().unwrap(),
            EventSpec::Key("Escape".to_string())
        );
        assert_eq!("resize:800".parse::<EventSpec>().unwrap(), EventSpec::Resize(800));
        assert_eq!("pageshow".parse::<EventSpec>().unwrap(), EventSpec::PageShow(None));
        assert_eq!(
            "pageshow:http://localhost/clients.html".parse::<EventSpec>().unwrap(),
            EventSpec::PageShow(Some(Url::parse("http://localhost/clients.html").unwrap()))
        );
        assert_eq!("toggle-theme".parse::<EventSpec>().unwrap(), EventSpec::ToggleTheme);
    }

    #[test]
    fn rejects_bad_event_specs() {
        for bad in ["click", "click:", "resize:-3", "resize:wide", "hover:#x", "toggle-theme:now"] {
            assert!(bad.parse::<EventSpec>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn args_accept_repeated_events() {
        let args = Args::try_parse_from([
            "site-chrome",
            "--input",
            "page.html",
            "--event",
            "click:#menuBtn",
            "--event",
            "key:Escape",
        ])
        .unwrap();
        assert_eq!(args.events.len(), 2);
        assert_eq!(args.width, 1024);
    }
}
