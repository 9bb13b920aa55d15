//! Site configuration: the DOM contract and request details.
//!
//! Every field has a default matching the site's markup, so pages that ship no
//! configuration behave exactly like the defaults. Pages can override fields with
//! a JSON blob (see [`SiteConfig::from_json`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config field `{0}` must not be empty")]
    Empty(&'static str),
    #[error("config json: {0}")]
    Json(String),
}

/// Options forwarded to the masonry constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GridOptions {
    pub item_selector: String,
    pub percent_position: bool,
    pub column_width: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            item_selector: ".grid-item".to_string(),
            percent_position: true,
            column_width: ".grid-sizer".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SiteConfig {
    /// Element swapped on every soft navigation.
    pub container_selector: String,
    /// Links whose `active` class tracks the current path.
    pub nav_link_selector: String,
    /// Attribute holding a deferred image source.
    pub lazy_attribute: String,
    /// Intersection observer root margin for deferred images.
    pub lazy_root_margin: String,
    /// Class toggled on the document element while a request is in flight.
    pub loading_class: String,
    /// Body attribute carried over from the fetched page.
    pub page_attribute: String,
    /// Header marking a request as a soft navigation.
    pub request_header: (String, String),
    /// Path extensions that always take a full browser navigation.
    pub excluded_extensions: Vec<String>,
    pub grid_selector: String,
    pub grid_options: GridOptions,
    pub parallax_selector: String,
    /// Body style property receiving the normalized scroll offset.
    pub scroll_variable: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            container_selector: "#pjax-container".to_string(),
            nav_link_selector: ".dt-navbar a.nav-link".to_string(),
            lazy_attribute: "data-lazy".to_string(),
            lazy_root_margin: "200px 0px".to_string(),
            loading_class: "dt-loading".to_string(),
            page_attribute: "data-page".to_string(),
            request_header: ("X-Requested-With".to_string(), "fetch".to_string()),
            excluded_extensions: ["pdf", "zip", "mp4", "mp3", "png", "jpg", "jpeg", "webp", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            grid_selector: ".grid".to_string(),
            grid_options: GridOptions::default(),
            parallax_selector: ".parallax".to_string(),
            scroll_variable: "--scrollY".to_string(),
        }
    }
}

impl SiteConfig {
    /// Selector for images that still carry a deferred source.
    pub fn lazy_image_selector(&self) -> String {
        format!("img[{}]", self.lazy_attribute)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("container_selector", &self.container_selector),
            ("nav_link_selector", &self.nav_link_selector),
            ("lazy_attribute", &self.lazy_attribute),
            ("loading_class", &self.loading_class),
            ("request_header", &self.request_header.0),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        Ok(())
    }

    /// Parse a config overlay. Missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: SiteConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Whether `path` ends in one of the excluded resource extensions.
    pub fn is_excluded_resource(&self, path: &str) -> bool {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        // An extension never contains a path separator.
        if ext.contains('/') {
            return false;
        }
        self.excluded_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
