use std::rc::Rc;

use softnav::config::SiteConfig;
use softnav::enhance::{EnhanceError, Enhancement, Enhancer};
use softnav::registry::PluginRegistry;
use softnav::scroll::ListenerSlot;

use super::dom::{self, Scope};
use super::lazy::LazyLoader;
use super::plugins::{self, MasonryGrid};
use super::scroll::ScrollBinding;
use crate::bridge::{grid_key_selector, parse_grid_key, GRID_KEY_ATTR};

/// Owns every decorative subscription: lazy observers, masonry instances and
/// the parallax scroll listener.
pub(super) struct WebEnhancer {
    cfg: Rc<SiteConfig>,
    pub(super) lazy: LazyLoader,
    grids: PluginRegistry<u32, MasonryGrid>,
    next_grid_key: u32,
    scroll: ListenerSlot<ScrollBinding>,
}

fn failed(what: &'static str) -> impl Fn(String) -> EnhanceError {
    move |message| EnhanceError::Failed { what, message }
}

impl WebEnhancer {
    pub(super) fn new(cfg: Rc<SiteConfig>) -> Self {
        Self {
            lazy: LazyLoader::new(&cfg),
            cfg,
            grids: PluginRegistry::new(),
            next_grid_key: 0,
            scroll: ListenerSlot::new(),
        }
    }

    fn lazy_images(&mut self) -> Result<(), EnhanceError> {
        let document = dom::document().map_err(failed("lazy images"))?;
        self.lazy
            .init(&Scope::Document(document))
            .map(|_| ())
            .map_err(failed("lazy images"))
    }

    fn masonry(&mut self) -> Result<(), EnhanceError> {
        let ctor = plugins::masonry_constructor().ok_or(EnhanceError::Unavailable("Masonry"))?;
        let document = dom::document().map_err(failed("masonry"))?;

        // Grids swapped out with the old container take their instances with them.
        self.grids
            .retain(|key| dom::query(&document, &grid_key_selector(*key)).is_some());

        let grid = dom::query(&document, &self.cfg.grid_selector)
            .ok_or(EnhanceError::Unavailable("grid container"))?;
        let key = match grid.get_attribute(GRID_KEY_ATTR).as_deref().and_then(parse_grid_key) {
            Some(k) => k,
            None => {
                self.next_grid_key += 1;
                let k = self.next_grid_key;
                let _ = grid.set_attribute(GRID_KEY_ATTR, &k.to_string());
                k
            }
        };

        let opts = &self.cfg.grid_options;
        self.grids
            .rebuild(key, || MasonryGrid::construct(&ctor, &grid, opts))
            .map(|_| ())
    }

    fn parallax(&mut self) -> Result<(), EnhanceError> {
        let document = dom::document().map_err(failed("parallax"))?;
        let Some(cover) = dom::query(&document, &self.cfg.parallax_selector) else {
            self.scroll.clear();
            return Err(EnhanceError::Unavailable("parallax cover"));
        };
        let body = document
            .body()
            .ok_or_else(|| failed("parallax")("no body".to_string()))?;
        let window = dom::window().map_err(failed("parallax"))?;
        let variable = self.cfg.scroll_variable.clone();

        self.scroll
            .replace_with(|| ScrollBinding::bind(window, cover, body, variable));
        Ok(())
    }
}

impl Enhancer for WebEnhancer {
    fn run(&mut self, enhancement: Enhancement) -> Result<(), EnhanceError> {
        match enhancement {
            Enhancement::LazyImages => self.lazy_images(),
            Enhancement::AnimateOnScroll => plugins::aos_refresh_hard(),
            Enhancement::MasonryGrid => self.masonry(),
            Enhancement::Parallax => self.parallax(),
        }
    }
}
