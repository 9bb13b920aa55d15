//! Names shared with the page's scripts and markup.
//!
//! Kept out of the wasm-only `web` module so they can be unit-tested on the host.

/// Element id of the optional JSON config overlay.
pub const CONFIG_SCRIPT_ID: &str = "softnav-config";

/// Attribute tagging a grid container with its registry key.
pub const GRID_KEY_ATTR: &str = "data-softnav-grid";

/// Global installed on `window` so page scripts can re-run lazy loading after
/// inserting markup: `window.initLazyLoad(scope?)`.
pub const INIT_LAZY_LOAD_GLOBAL: &str = "initLazyLoad";

/// Globals probed on `window`.
pub const AOS_GLOBAL: &str = "AOS";
pub const MASONRY_GLOBAL: &str = "Masonry";

/// Masonry option names, in constructor-options order.
pub const MASONRY_ITEM_SELECTOR: &str = "itemSelector";
pub const MASONRY_PERCENT_POSITION: &str = "percentPosition";
pub const MASONRY_COLUMN_WIDTH: &str = "columnWidth";

pub fn parse_grid_key(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// Selector matching the grid container tagged with `key`.
pub fn grid_key_selector(key: u32) -> String {
    format!("[{GRID_KEY_ATTR}=\"{key}\"]")
}

/// The `hash` part handed to the fragment scroll, without the leading `#`.
pub fn fragment_id(hash: &str) -> Option<&str> {
    let id = hash.strip_prefix('#').unwrap_or(hash);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
