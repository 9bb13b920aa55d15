//! Bridges to the optional page globals `AOS` and `Masonry`.

use softnav::config::GridOptions;
use softnav::enhance::EnhanceError;
use softnav::registry::Plugin;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::bridge::{
    AOS_GLOBAL, MASONRY_COLUMN_WIDTH, MASONRY_GLOBAL, MASONRY_ITEM_SELECTOR,
    MASONRY_PERCENT_POSITION,
};

fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let v = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if v.is_undefined() || v.is_null() {
        None
    } else {
        Some(v)
    }
}

fn call_method(target: &JsValue, name: &str) -> Result<JsValue, String> {
    let f = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map_err(|_| format!("{name}: lookup threw"))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| format!("{name}: not a function"))?;
    f.call0(target).map_err(|e| format!("{name}: {e:?}"))
}

/// `AOS`, only when it exposes `init`.
fn aos() -> Option<JsValue> {
    let aos = global(AOS_GLOBAL)?;
    let init = js_sys::Reflect::get(&aos, &JsValue::from_str("init")).ok()?;
    init.is_function().then_some(aos)
}

pub(super) fn aos_init() -> Result<(), EnhanceError> {
    let aos = aos().ok_or(EnhanceError::Unavailable("AOS"))?;
    call_method(&aos, "init")
        .map(|_| ())
        .map_err(|message| EnhanceError::Failed {
            what: "AOS.init",
            message,
        })
}

pub(super) fn aos_refresh_hard() -> Result<(), EnhanceError> {
    let aos = aos().ok_or(EnhanceError::Unavailable("AOS"))?;
    call_method(&aos, "refreshHard")
        .map(|_| ())
        .map_err(|message| EnhanceError::Failed {
            what: "AOS.refreshHard",
            message,
        })
}

pub(super) fn masonry_constructor() -> Option<js_sys::Function> {
    global(MASONRY_GLOBAL)?.dyn_into::<js_sys::Function>().ok()
}

/// A live masonry layout attached to one grid container.
pub(super) struct MasonryGrid {
    instance: JsValue,
}

impl MasonryGrid {
    pub(super) fn construct(
        ctor: &js_sys::Function,
        element: &Element,
        opts: &GridOptions,
    ) -> Result<Self, EnhanceError> {
        let failed = |message: String| EnhanceError::Failed {
            what: "Masonry",
            message,
        };

        let options = js_sys::Object::new();
        let entries = [
            (MASONRY_ITEM_SELECTOR, JsValue::from_str(&opts.item_selector)),
            (MASONRY_PERCENT_POSITION, JsValue::from_bool(opts.percent_position)),
            (MASONRY_COLUMN_WIDTH, JsValue::from_str(&opts.column_width)),
        ];
        for (key, value) in entries {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &value)
                .map_err(|_| failed(format!("options: set {key} threw")))?;
        }

        let args = js_sys::Array::of2(element, &options);
        let instance =
            js_sys::Reflect::construct(ctor, &args).map_err(|e| failed(format!("{e:?}")))?;
        Ok(Self { instance })
    }
}

impl Plugin for MasonryGrid {
    fn destroy(&mut self) {
        if let Err(e) = call_method(&self.instance, "destroy") {
            debug!(error = %e, "masonry destroy skipped");
        }
    }
}
