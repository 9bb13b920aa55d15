//! Decorative reinitialization run after load and after every swap.

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enhancement {
    LazyImages,
    AnimateOnScroll,
    MasonryGrid,
    Parallax,
}

impl Enhancement {
    pub fn label(self) -> &'static str {
        match self {
            Enhancement::LazyImages => "lazy-images",
            Enhancement::AnimateOnScroll => "animate-on-scroll",
            Enhancement::MasonryGrid => "masonry-grid",
            Enhancement::Parallax => "parallax",
        }
    }

    /// Run order: images first so the grid measures loaded content as early as possible.
    pub fn all() -> &'static [Enhancement] {
        &[
            Enhancement::LazyImages,
            Enhancement::AnimateOnScroll,
            Enhancement::MasonryGrid,
            Enhancement::Parallax,
        ]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnhanceError {
    /// Optional global or element absent; not a failure worth reporting.
    #[error("{0} not present")]
    Unavailable(&'static str),
    #[error("{what}: {message}")]
    Failed { what: &'static str, message: String },
}

pub trait Enhancer {
    fn run(&mut self, enhancement: Enhancement) -> Result<(), EnhanceError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnhanceReport {
    pub ran: Vec<Enhancement>,
    pub skipped: Vec<Enhancement>,
    pub failed: Vec<Enhancement>,
}

/// Run every enhancement in order. Errors are logged and swallowed; a failing
/// step never stops the ones after it.
pub fn reinitialize_all<E: Enhancer + ?Sized>(enhancer: &mut E) -> EnhanceReport {
    let mut report = EnhanceReport::default();
    for &e in Enhancement::all() {
        match enhancer.run(e) {
            Ok(()) => report.ran.push(e),
            Err(EnhanceError::Unavailable(what)) => {
                debug!(enhancement = e.label(), what, "skipped");
                report.skipped.push(e);
            }
            Err(err) => {
                warn!(enhancement = e.label(), error = %err, "reinitialization failed");
                report.failed.push(e);
            }
        }
    }
    report
}
