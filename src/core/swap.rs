//! The soft-navigation swap sequence.
//!
//! The browser binding owns the network and the DOM; this module owns the
//! order of operations and every decision in between. A swap is split in two
//! halves around the fetch await:
//!
//! 1. [`Navigator::begin`] claims a generation and raises the loading flag.
//! 2. [`Navigator::complete`] takes the fetch result and either applies the
//!    new page or falls back to a full navigation. The loading flag is always
//!    lowered, unless a newer request has superseded this one.

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SiteConfig;
use crate::history::{pop_target, HistoryState};
use crate::paths::nav_link_active;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    /// Network failure or non-success HTTP status.
    #[error("fetch failed: {message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },
    /// The fetched document lacks the content container.
    #[error("response has no `{0}` element")]
    MissingContainer(String),
}

impl SwapError {
    pub fn network(message: impl Into<String>) -> Self {
        SwapError::Fetch {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        SwapError::Fetch {
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }
}

/// A response as the binding received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Title and body metadata lifted from a fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    /// The body's page attribute. Empty values are ignored.
    pub page_id: Option<String>,
}

/// Head elements carried over from a fetched document on every swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadTag {
    Description,
    Canonical,
}

impl HeadTag {
    pub fn all() -> [HeadTag; 2] {
        [HeadTag::Description, HeadTag::Canonical]
    }

    pub fn selector(self) -> &'static str {
        match self {
            HeadTag::Description => r#"meta[name="description"]"#,
            HeadTag::Canonical => r#"link[rel="canonical"]"#,
        }
    }

    /// The attribute holding the value copied onto an existing element.
    pub fn value_attribute(self) -> &'static str {
        match self {
            HeadTag::Description => "content",
            HeadTag::Canonical => "href",
        }
    }
}

/// One head element of a fetched document: its value, and the element itself
/// for when the current head has nothing to update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElement<N> {
    pub value: String,
    pub node: N,
}

/// A fetched document after parsing. `container` is `None` when the document
/// has no element matching the container selector.
#[derive(Debug, Clone)]
pub struct ParsedPage<N> {
    pub meta: PageMeta,
    pub description: Option<HeadElement<N>>,
    pub canonical: Option<HeadElement<N>>,
    pub container: Option<N>,
}

impl<N> ParsedPage<N> {
    /// A document with nothing the swap can use.
    pub fn empty() -> Self {
        Self {
            meta: PageMeta::default(),
            description: None,
            canonical: None,
            container: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub url: Url,
    pub push: bool,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    FellBack(SwapError),
    /// A newer request started before this one settled; nothing was applied.
    Superseded,
}

/// The current page, as the swap sequence sees it.
pub trait Host {
    /// Elements of a parsed document: the replacement container and head tags.
    type Node;

    fn location(&self) -> Url;
    fn has_container(&self) -> bool;
    fn set_loading(&mut self, loading: bool);

    fn parse(&mut self, html: &str) -> ParsedPage<Self::Node>;

    fn set_page_id(&mut self, id: &str);
    fn set_title(&mut self, title: &str);
    fn has_head(&self, tag: HeadTag) -> bool;
    /// Set the value attribute of the existing `tag` element.
    fn update_head(&mut self, tag: HeadTag, value: &str);
    /// Append a copy of a parsed head element.
    fn append_head(&mut self, tag: HeadTag, node: Self::Node);
    fn replace_container(&mut self, container: Self::Node);

    /// Hrefs of the nav links, in document order. `set_nav_active` indexes
    /// into the list returned by the latest call.
    fn nav_hrefs(&mut self) -> Vec<String>;
    fn set_nav_active(&mut self, index: usize, active: bool);

    fn push_history(&mut self, state: &HistoryState);
    /// Scroll the element with `id` into view on the next task, without smoothing.
    fn schedule_fragment_scroll(&mut self, id: &str);
    fn scroll_to_top(&mut self);

    fn reinitialize(&mut self);
    /// Full browser navigation.
    fn hard_navigate(&mut self, url: &Url);
}

#[derive(Debug)]
pub struct Navigator {
    config: SiteConfig,
    generation: u64,
}

impl Navigator {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, req: &NavRequest) -> bool {
        req.generation == self.generation
    }

    /// Start a request. Returns `None` when the current page has no container
    /// to swap into, in which case nothing changes.
    pub fn begin<H: Host + ?Sized>(&mut self, host: &mut H, url: Url, push: bool) -> Option<NavRequest> {
        if !host.has_container() {
            debug!(url = %url, "no container on current page; not intercepting");
            return None;
        }
        self.generation += 1;
        host.set_loading(true);
        debug!(url = %url, push, generation = self.generation, "soft navigation started");
        Some(NavRequest {
            url,
            push,
            generation: self.generation,
        })
    }

    /// Start a back/forward replay of the recorded (or current) URL.
    pub fn begin_pop<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        state: Option<&HistoryState>,
    ) -> Option<NavRequest> {
        let location = host.location();
        let target = pop_target(state, location.as_str());
        let url = match location.join(&target) {
            Ok(u) => u,
            Err(e) => {
                warn!(target = %target, error = %e, "unparsable history url");
                return None;
            }
        };
        self.begin(host, url, false)
    }

    /// Settle a request with its fetch result.
    pub fn complete<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        req: &NavRequest,
        response: Result<FetchedPage, SwapError>,
    ) -> SwapOutcome {
        if !self.is_current(req) {
            debug!(url = %req.url, generation = req.generation, "superseded response dropped");
            return SwapOutcome::Superseded;
        }

        let outcome = match self.apply(host, req, response) {
            Ok(()) => {
                info!(url = %req.url, "swapped");
                SwapOutcome::Swapped
            }
            Err(err) => {
                warn!(url = %req.url, error = %err, "soft navigation failed; full page load");
                host.hard_navigate(&req.url);
                SwapOutcome::FellBack(err)
            }
        };
        host.set_loading(false);
        outcome
    }

    fn apply<H: Host + ?Sized>(
        &self,
        host: &mut H,
        req: &NavRequest,
        response: Result<FetchedPage, SwapError>,
    ) -> Result<(), SwapError> {
        let page = response?;
        if !page.is_success() {
            return Err(SwapError::status(page.status));
        }

        let ParsedPage {
            meta,
            description,
            canonical,
            container,
        } = host.parse(&page.body);
        let container = container
            .ok_or_else(|| SwapError::MissingContainer(self.config.container_selector.clone()))?;

        if let Some(id) = meta.page_id.as_deref().filter(|id| !id.is_empty()) {
            host.set_page_id(id);
        }
        if let Some(title) = &meta.title {
            host.set_title(title);
        }
        for (tag, element) in HeadTag::all().into_iter().zip([description, canonical]) {
            let Some(element) = element else {
                continue;
            };
            if host.has_head(tag) {
                host.update_head(tag, &element.value);
            } else {
                host.append_head(tag, element.node);
            }
        }

        host.replace_container(container);
        mark_active_nav(host, &req.url);

        if req.push {
            host.push_history(&HistoryState::new(req.url.as_str()));
        }

        match req.url.fragment() {
            Some(id) if !id.is_empty() => host.schedule_fragment_scroll(id),
            _ => host.scroll_to_top(),
        }

        host.reinitialize();
        Ok(())
    }
}

/// Toggle the active state of every nav link against `current`.
pub fn mark_active_nav<H: Host + ?Sized>(host: &mut H, current: &Url) {
    let base = host.location();
    let hrefs = host.nav_hrefs();
    for (i, href) in hrefs.iter().enumerate() {
        if let Some(active) = nav_link_active(href, &base, current) {
            host.set_nav_active(i, active);
        }
    }
}
