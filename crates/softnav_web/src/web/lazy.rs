use softnav::config::SiteConfig;
use softnav::lazy::{self, LazyImage, LazyStrategy};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::Scope;

struct LazyImg(Element);

impl LazyImage for LazyImg {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// An observer together with the callback it invokes. Dropping it disconnects
/// the observer before the callback is freed.
struct LazyObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for LazyObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub(super) struct LazyLoader {
    marker: String,
    selector: String,
    root_margin: String,
    observers: Vec<LazyObserver>,
}

impl LazyLoader {
    pub(super) fn new(cfg: &SiteConfig) -> Self {
        Self {
            marker: cfg.lazy_attribute.clone(),
            selector: cfg.lazy_image_selector(),
            root_margin: cfg.lazy_root_margin.clone(),
            observers: Vec::new(),
        }
    }

    /// Reveal or observe every pending image in `scope`. Returns how many were found.
    ///
    /// A whole-document run replaces all earlier observers: every image still
    /// pending anywhere is picked up again by the new one.
    pub(super) fn init(&mut self, scope: &Scope) -> Result<usize, String> {
        let images = scope.query_all(&self.selector);
        if scope.is_document() {
            self.observers.clear();
        }

        match lazy::strategy(images.len(), observer_available()) {
            LazyStrategy::Nothing => {}
            LazyStrategy::Immediate => {
                let imgs: Vec<LazyImg> = images.iter().cloned().map(LazyImg).collect();
                let n = lazy::reveal_all(&imgs, &self.marker);
                debug!(revealed = n, "no IntersectionObserver; loaded eagerly");
            }
            LazyStrategy::Observe => {
                let observer = self.observe(&images)?;
                self.observers.push(observer);
            }
        }
        Ok(images.len())
    }

    fn observe(&self, images: &[Element]) -> Result<LazyObserver, String> {
        let marker = self.marker.clone();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let entries = entries.iter().filter_map(|v| {
                    let entry = v.dyn_into::<IntersectionObserverEntry>().ok()?;
                    Some((LazyImg(entry.target()), entry.is_intersecting()))
                });
                lazy::handle_entries(entries, &marker, |img| observer.unobserve(&img.0));
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let opts = IntersectionObserverInit::new();
        opts.set_root_margin(&self.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts)
                .map_err(|_| "lazy: IntersectionObserver::new threw".to_string())?;
        for img in images {
            observer.observe(img);
        }
        debug!(count = images.len(), "observing deferred images");

        Ok(LazyObserver {
            observer,
            _callback: callback,
        })
    }
}

fn observer_available() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
        .unwrap_or(false)
}
