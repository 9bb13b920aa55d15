#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// State object pushed with every soft navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryState {
    pub url: String,
}

impl HistoryState {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// URL a popstate should load: the recorded state's url, else the current location.
pub fn pop_target(state: Option<&HistoryState>, location: &str) -> String {
    match state {
        Some(s) if !s.url.is_empty() => s.url.clone(),
        _ => location.to_string(),
    }
}
