use softnav::config::SiteConfig;
use softnav::Url;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::bridge::CONFIG_SCRIPT_ID;

pub(super) fn window() -> Result<Window, String> {
    web_sys::window().ok_or("no window".to_string())
}

pub(super) fn document() -> Result<Document, String> {
    window()?.document().ok_or("no document".to_string())
}

pub(super) fn location_url(window: &Window) -> Result<Url, String> {
    let href = window
        .location()
        .href()
        .map_err(|_| "location: href threw".to_string())?;
    Url::parse(&href).map_err(|e| format!("location: {e}"))
}

pub(super) fn query(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Toggle the loading class on the root element.
pub(super) fn set_loading(document: &Document, class: &str, loading: bool) {
    if let Some(root) = document.document_element() {
        let _ = root.class_list().toggle_with_force(class, loading);
    }
}

/// Root of a query: the whole document or one subtree.
#[derive(Clone)]
pub(super) enum Scope {
    Document(Document),
    Element(Element),
}

impl Scope {
    pub(super) fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self {
            Scope::Document(d) => d.query_selector_all(selector),
            Scope::Element(e) => e.query_selector_all(selector),
        };
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    pub(super) fn is_document(&self) -> bool {
        matches!(self, Scope::Document(_))
    }
}

pub(super) fn scroll_to_id(document: &Document, id: &str, behavior: ScrollBehavior) {
    let Some(el) = document.get_element_by_id(id) else {
        return;
    };
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(behavior);
    opts.set_block(ScrollLogicalPosition::Start);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}

/// Defaults, overlaid with `<script type="application/json" id="softnav-config">` when present.
pub(super) fn load_config(document: &Document) -> SiteConfig {
    let Some(script) = document.get_element_by_id(CONFIG_SCRIPT_ID) else {
        return SiteConfig::default();
    };
    let raw = script.text_content().unwrap_or_default();
    match SiteConfig::from_json(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "ignoring config overlay");
            SiteConfig::default()
        }
    }
}
