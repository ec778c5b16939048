mod active_link;
mod chrome;
mod cli;
mod config;
mod header;
mod menu;
mod page;
mod store;
mod theme;

use anyhow::Context as _;
use cli::{Args, EventSpec};

pub use chrome::{Event, SiteChrome, Summary};
pub use cli::{Args as CliArgs, EventSpec as CliEvent};
pub use config::{ChromeConfig, Labels, NavLink};
pub use header::HeaderOutcome;
pub use menu::{MenuState, MenuTrigger, Viewport};
pub use page::Page;
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};
pub use theme::{Theme, toggle_theme};

pub fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ChromeConfig::load(path)?,
        None => ChromeConfig::default(),
    };

    let store: Box<dyn PreferenceStore> = match &args.store {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };

    let html = std::fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let mut page = Page::parse(&html, args.url.clone(), args.width, store);

    let mut chrome = SiteChrome::install(&page, config);
    for (index, spec) in args.events.iter().enumerate() {
        replay(&mut chrome, &mut page, spec).with_context(|| format!("event #{}", index + 1))?;
    }

    page.store().flush().context("save preferences")?;

    let out = page.to_html()?;
    match &args.out {
        Some(path) => {
            write_creating_parent(path, out.as_bytes())?;
        }
        None => print!("{out}"),
    }

    if let Some(path) = &args.summary {
        let summary = chrome.summary(&page);
        tracing::info!(menu = ?summary.menu, theme = %summary.theme, "replay finished");
        let json = serde_json::to_vec_pretty(&summary).context("encode summary")?;
        write_creating_parent(path, &json)?;
    }
    Ok(())
}

fn replay(chrome: &mut SiteChrome, page: &mut Page, spec: &EventSpec) -> anyhow::Result<()> {
    let event = match spec {
        EventSpec::Click(selector) => {
            let target = page
                .select_first(selector)
                .with_context(|| format!("no element matches {selector:?}"))?;
            Event::Click(target)
        }
        EventSpec::Key(key) => Event::KeyDown(key.clone()),
        EventSpec::Resize(width) => Event::Resize(*width),
        EventSpec::PageShow(url) => Event::PageShow(url.clone()),
        EventSpec::ToggleTheme => {
            chrome.toggle_theme(page);
            return Ok(());
        }
    };
    chrome.dispatch(page, &event);
    Ok(())
}

fn write_creating_parent(path: &std::path::Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}
