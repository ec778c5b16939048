use anyhow::Context as _;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;
use url::Url;

use crate::store::PreferenceStore;

/// The host a chrome installs into: a parsed document plus the bits of
/// browser state the controllers query (location, viewport, storage).
pub struct Page {
    document: NodeRef,
    location: Url,
    viewport_width: u32,
    store: Box<dyn PreferenceStore>,
}

impl Page {
    pub fn parse(
        html: &str,
        location: Url,
        viewport_width: u32,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
            location,
            viewport_width,
            store,
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> Option<NodeRef> {
        self.select_first("html")
    }

    pub fn body(&self) -> Option<NodeRef> {
        self.select_first("body")
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.select_first(&format!("#{id}"))
    }

    pub fn select_first(&self, selector: &str) -> Option<NodeRef> {
        self.document
            .select_first(selector)
            .ok()
            .map(|n| n.as_node().clone())
    }

    pub fn select_all(&self, selector: &str) -> Vec<NodeRef> {
        match self.document.select(selector) {
            Ok(nodes) => nodes.map(|n| n.as_node().clone()).collect(),
            Err(()) => Vec::new(),
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn set_location(&mut self, location: Url) {
        self.location = location;
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn PreferenceStore {
        self.store.as_mut()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.document
            .serialize(&mut out)
            .context("serialize document")?;
        String::from_utf8(out).context("document html not utf-8")
    }
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let el = node.as_element()?;
    el.attributes.borrow().get(name).map(|s| s.to_string())
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

pub fn add_class(node: &NodeRef, class: &str) {
    if has_class(node, class) {
        return;
    }
    let current = attr(node, "class").unwrap_or_default();
    let next = if current.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {}", current.trim(), class)
    };
    set_attr(node, "class", &next);
}

pub fn remove_class(node: &NodeRef, class: &str) {
    let Some(current) = attr(node, "class") else {
        return;
    };
    let next: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    set_attr(node, "class", &next.join(" "));
}

/// Replace all children of `node` with a single text node.
pub fn set_text(node: &NodeRef, text: &str) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// Whether `node` is `ancestor` or lives somewhere beneath it.
pub fn contains(ancestor: &NodeRef, node: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|n| n == *ancestor)
}

/// Split an inline style into declarations. `;` inside parentheses or quotes
/// (`url(data:...;base64,...)`, `content: "a;b"`) does not end a declaration.
fn style_declarations(style: &str) -> Vec<&str> {
    let mut decls = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                decls.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    decls.push(&style[start..]);
    decls
        .into_iter()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect()
}

fn declares(decl: &str, property: &str) -> Option<String> {
    let (name, value) = decl.split_once(':')?;
    name.trim()
        .eq_ignore_ascii_case(property)
        .then(|| value.trim().to_string())
}

pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    let style = attr(node, "style")?;
    style_declarations(&style)
        .into_iter()
        .find_map(|decl| declares(decl, property))
}

/// Set (or with `None`, clear) one inline style declaration, leaving the rest alone.
pub fn set_style_property(node: &NodeRef, property: &str, value: Option<&str>) {
    let current = attr(node, "style").unwrap_or_default();
    let mut decls: Vec<String> = style_declarations(&current)
        .into_iter()
        .filter(|d| declares(d, property).is_none())
        .map(str::to_string)
        .collect();
    if let Some(value) = value {
        decls.push(format!("{property}: {value}"));
    }

    let Some(el) = node.as_element() else {
        return;
    };
    let mut attrs = el.attributes.borrow_mut();
    if decls.is_empty() {
        attrs.remove("style");
    } else {
        attrs.insert("style", decls.join("; "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn page(html: &str) -> Page {
        Page::parse(
            html,
            Url::parse("http://localhost/index.html").unwrap(),
            1024,
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn class_helpers_keep_other_classes() {
        let p = page(r#"<div id="x" class="a  b"></div>"#);
        let x = p.element_by_id("x").unwrap();
        add_class(&x, "show");
        add_class(&x, "show");
        assert_eq!(attr(&x, "class").as_deref(), Some("a  b show"));
        remove_class(&x, "a");
        assert!(!has_class(&x, "a"));
        assert!(has_class(&x, "b"));
        assert!(has_class(&x, "show"));
    }

    #[test]
    fn style_override_is_removable() {
        let p = page(r#"<body style="color: red"></body>"#);
        let body = p.body().unwrap();
        set_style_property(&body, "overflow", Some("hidden"));
        assert_eq!(style_property(&body, "overflow").as_deref(), Some("hidden"));
        assert_eq!(style_property(&body, "color").as_deref(), Some("red"));

        set_style_property(&body, "overflow", None);
        assert_eq!(style_property(&body, "overflow"), None);
        assert_eq!(attr(&body, "style").as_deref(), Some("color: red"));

        set_style_property(&body, "color", None);
        assert_eq!(attr(&body, "style"), None);
    }

    #[test]
    fn style_edits_keep_semicolons_inside_values() {
        let p = page(
            r#"<body style="background: url(data:image/png;base64,AAAA); content: 'a;b'"></body>"#,
        );
        let body = p.body().unwrap();
        set_style_property(&body, "overflow", Some("hidden"));
        set_style_property(&body, "overflow", None);
        assert_eq!(
            attr(&body, "style").as_deref(),
            Some("background: url(data:image/png;base64,AAAA); content: 'a;b'")
        );
        assert_eq!(
            style_property(&body, "background").as_deref(),
            Some("url(data:image/png;base64,AAAA)")
        );
        assert_eq!(style_property(&body, "content").as_deref(), Some("'a;b'"));
    }

    #[test]
    fn contains_walks_ancestors() {
        let p = page(r#"<nav id="m"><a id="l"><span id="s">x</span></a></nav><p id="o"></p>"#);
        let m = p.element_by_id("m").unwrap();
        assert!(contains(&m, &p.element_by_id("s").unwrap()));
        assert!(contains(&m, &m));
        assert!(!contains(&m, &p.element_by_id("o").unwrap()));
    }
}
