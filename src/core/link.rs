//! Click classification: which anchor clicks become soft navigations.

use url::Url;

use crate::config::SiteConfig;

/// What the click handler saw on the anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCandidate {
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
}

impl LinkCandidate {
    pub fn new(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            ..Self::default()
        }
    }
}

/// Mouse state of the click event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickInfo {
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub default_prevented: bool,
}

impl ClickInfo {
    fn wants_browser_default(&self) -> bool {
        self.default_prevented
            || self.button != 0
            || self.meta
            || self.ctrl
            || self.shift
            || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoHref,
    Modified,
    PseudoProtocol,
    Download,
    ForeignTarget,
    Resource,
    CrossOrigin,
    Unparsable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Let the browser handle the click.
    Ignore(IgnoreReason),
    /// Same-page fragment: smooth scroll to the element id, no request.
    ScrollToFragment(String),
    /// Fetch and swap the resolved absolute URL.
    SoftNavigate(Url),
}

const PSEUDO_PROTOCOLS: [&str; 3] = ["mailto:", "tel:", "javascript:"];

/// Decide what a click on `link` should do, relative to the page at `base`.
pub fn classify_click(
    link: &LinkCandidate,
    click: &ClickInfo,
    base: &Url,
    cfg: &SiteConfig,
) -> LinkAction {
    let href = link.href.as_deref().unwrap_or("");

    // Fragment links are handled before any of the modifier checks.
    if let Some(id) = href.strip_prefix('#') {
        return LinkAction::ScrollToFragment(id.to_string());
    }

    if click.wants_browser_default() {
        return LinkAction::Ignore(IgnoreReason::Modified);
    }

    match eligible_url(link, base, cfg) {
        Ok(url) => LinkAction::SoftNavigate(url),
        Err(reason) => LinkAction::Ignore(reason),
    }
}

/// Resolve `link` to an absolute URL if it may be fetched and swapped in.
pub fn eligible_url(link: &LinkCandidate, base: &Url, cfg: &SiteConfig) -> Result<Url, IgnoreReason> {
    let href = match link.href.as_deref() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(IgnoreReason::NoHref),
    };
    if PSEUDO_PROTOCOLS.iter().any(|p| href.starts_with(p)) {
        return Err(IgnoreReason::PseudoProtocol);
    }
    if link.download {
        return Err(IgnoreReason::Download);
    }
    if let Some(target) = link.target.as_deref() {
        if !target.is_empty() && target != "_self" {
            return Err(IgnoreReason::ForeignTarget);
        }
    }
    if href.starts_with('#') {
        return Err(IgnoreReason::NoHref);
    }

    let url = base.join(href).map_err(|_| IgnoreReason::Unparsable)?;
    if cfg.is_excluded_resource(url.path()) {
        return Err(IgnoreReason::Resource);
    }
    if url.origin() != base.origin() {
        return Err(IgnoreReason::CrossOrigin);
    }
    Ok(url)
}
