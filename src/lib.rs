//! # softnav
//!
//! Progressive enhancement for a static site: soft navigation between pages by
//! swapping a content container, history management, deferred image loading
//! and re-initialization of decorative plugins after every swap.
//!
//! This crate holds the browser-independent parts. The wasm binding lives in
//! `crates/softnav_web` and implements the traits defined here over `web-sys`.
//!
//! ## Feature Flags
//!
//! - `serde` (default): config overlays from JSON, serializable history state
//!
//! ## Modules
//!
//! - [`link`]: which clicks become soft navigations
//! - [`swap`]: the fetch-and-swap sequence and its fallback
//! - [`lazy`]: one-shot deferred image reveal
//! - [`enhance`]: decorative reinitialization order
//! - [`scroll`], [`registry`]: parallax state and plugin instance ownership

#[path = "core/config.rs"]
pub mod config;

#[path = "core/enhance.rs"]
pub mod enhance;

#[path = "core/history.rs"]
pub mod history;

#[path = "core/lazy.rs"]
pub mod lazy;

#[path = "core/link.rs"]
pub mod link;

#[path = "core/paths.rs"]
pub mod paths;

#[path = "core/registry.rs"]
pub mod registry;

#[path = "core/scroll.rs"]
pub mod scroll;

#[path = "core/swap.rs"]
pub mod swap;

pub use url::Url;

/// Prelude module for convenient imports.
///
/// ```
/// use softnav::prelude::*;
///
/// let cfg = SiteConfig::default();
/// let base = Url::parse("https://example.com/").unwrap();
/// let action = classify_click(
///     &LinkCandidate::new("/about.html"),
///     &ClickInfo::default(),
///     &base,
///     &cfg,
/// );
/// assert!(matches!(action, LinkAction::SoftNavigate(_)));
/// ```
pub mod prelude {
    pub use crate::config::{GridOptions, SiteConfig};
    pub use crate::enhance::{reinitialize_all, EnhanceError, Enhancement, Enhancer};
    pub use crate::history::HistoryState;
    pub use crate::lazy::LazyImage;
    pub use crate::link::{classify_click, ClickInfo, LinkAction, LinkCandidate};
    pub use crate::registry::{Plugin, PluginRegistry};
    pub use crate::scroll::{FrameGate, ListenerSlot};
    pub use crate::swap::{
        FetchedPage, HeadElement, HeadTag, Host, NavRequest, Navigator, PageMeta, ParsedPage, SwapError,
        SwapOutcome,
    };
    pub use url::Url;
}
