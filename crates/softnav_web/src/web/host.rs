use softnav::config::SiteConfig;
use softnav::enhance::reinitialize_all;
use softnav::history::HistoryState;
use softnav::swap::{HeadElement, HeadTag, Host, PageMeta, ParsedPage};
use softnav::Url;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomParser, Element, ScrollBehavior, ScrollToOptions, SupportedType, Window};

use super::dom::{self, Scope};
use super::enhance::WebEnhancer;

/// The live page, borrowed for the duration of one swap step.
pub(super) struct PageHost<'a> {
    cfg: &'a SiteConfig,
    window: Window,
    document: Document,
    enhancer: &'a mut WebEnhancer,
    /// Used if `location.href` ever fails to parse.
    fallback_location: Url,
    /// Nav links as of the last `nav_hrefs` call.
    nav_links: Vec<Element>,
}

impl<'a> PageHost<'a> {
    pub(super) fn new(
        cfg: &'a SiteConfig,
        window: Window,
        document: Document,
        enhancer: &'a mut WebEnhancer,
        fallback_location: Url,
    ) -> Self {
        Self {
            cfg,
            window,
            document,
            enhancer,
            fallback_location,
            nav_links: Vec::new(),
        }
    }
}

fn head_element(doc: &Document, tag: HeadTag) -> Option<HeadElement<Element>> {
    let node = dom::query(doc, tag.selector())?;
    let value = node.get_attribute(tag.value_attribute()).unwrap_or_default();
    Some(HeadElement { value, node })
}

fn read_page(doc: &Document, cfg: &SiteConfig) -> ParsedPage<Element> {
    ParsedPage {
        meta: PageMeta {
            title: dom::query(doc, "title").map(|t| t.text_content().unwrap_or_default()),
            page_id: doc.body().and_then(|b| b.get_attribute(&cfg.page_attribute)),
        },
        description: head_element(doc, HeadTag::Description),
        canonical: head_element(doc, HeadTag::Canonical),
        container: dom::query(doc, &cfg.container_selector),
    }
}

impl<'a> Host for PageHost<'a> {
    type Node = Element;

    fn location(&self) -> Url {
        dom::location_url(&self.window).unwrap_or_else(|_| self.fallback_location.clone())
    }

    fn has_container(&self) -> bool {
        dom::query(&self.document, &self.cfg.container_selector).is_some()
    }

    fn set_loading(&mut self, loading: bool) {
        dom::set_loading(&self.document, &self.cfg.loading_class, loading);
    }

    fn parse(&mut self, html: &str) -> ParsedPage<Element> {
        let parsed = DomParser::new()
            .and_then(|p| p.parse_from_string(html, SupportedType::TextHtml));
        match parsed {
            Ok(doc) => read_page(&doc, self.cfg),
            Err(e) => {
                warn!(error = ?e, "DOMParser failed");
                ParsedPage::empty()
            }
        }
    }

    fn set_page_id(&mut self, id: &str) {
        if let Some(body) = self.document.body() {
            let _ = body.set_attribute(&self.cfg.page_attribute, id);
        }
    }

    fn set_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn has_head(&self, tag: HeadTag) -> bool {
        dom::query(&self.document, tag.selector()).is_some()
    }

    fn update_head(&mut self, tag: HeadTag, value: &str) {
        if let Some(el) = dom::query(&self.document, tag.selector()) {
            let _ = el.set_attribute(tag.value_attribute(), value);
        }
    }

    fn append_head(&mut self, tag: HeadTag, node: Element) {
        let Some(head) = self.document.head() else {
            return;
        };
        let appended = node
            .clone_node_with_deep(true)
            .and_then(|copy| head.append_child(&copy));
        if let Err(e) = appended {
            warn!(tag = ?tag, error = ?e, "head append failed");
        }
    }

    fn replace_container(&mut self, container: Element) {
        let Some(current) = dom::query(&self.document, &self.cfg.container_selector) else {
            return;
        };
        if let Err(e) = current.replace_with_with_node_1(&container) {
            warn!(error = ?e, "container replace failed");
        }
    }

    fn nav_hrefs(&mut self) -> Vec<String> {
        self.nav_links = Scope::Document(self.document.clone()).query_all(&self.cfg.nav_link_selector);
        self.nav_links
            .iter()
            .map(|a| a.get_attribute("href").unwrap_or_default())
            .collect()
    }

    fn set_nav_active(&mut self, index: usize, active: bool) {
        if let Some(link) = self.nav_links.get(index) {
            let _ = link.class_list().toggle_with_force("active", active);
        }
    }

    fn push_history(&mut self, state: &HistoryState) {
        let Ok(history) = self.window.history() else {
            return;
        };
        let value = match serde_wasm_bindgen::to_value(state) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "history state not serializable");
                return;
            }
        };
        if let Err(e) = history.push_state_with_url(&value, "", Some(&state.url)) {
            warn!(error = ?e, "pushState failed");
        }
    }

    fn schedule_fragment_scroll(&mut self, id: &str) {
        let document = self.document.clone();
        let id = id.to_string();
        let cb = Closure::once_into_js(move || {
            dom::scroll_to_id(&document, &id, ScrollBehavior::Auto);
        });
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0);
        if scheduled.is_err() {
            warn!("setTimeout threw; fragment scroll skipped");
        }
    }

    fn scroll_to_top(&mut self) {
        let opts = ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(ScrollBehavior::Auto);
        self.window.scroll_to_with_scroll_to_options(&opts);
    }

    fn reinitialize(&mut self) {
        reinitialize_all(&mut *self.enhancer);
    }

    fn hard_navigate(&mut self, url: &Url) {
        if let Err(e) = self.window.location().set_href(url.as_str()) {
            warn!(error = ?e, "location assignment failed");
        }
    }
}
