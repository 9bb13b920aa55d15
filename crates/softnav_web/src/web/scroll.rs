use std::cell::Cell;
use std::rc::Rc;

use softnav::scroll::{format_progress, scroll_progress, FrameGate};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, HtmlElement, Window};

fn write_progress(window: &Window, cover: &Element, body: &HtmlElement, variable: &str) {
    let y = window.scroll_y().unwrap_or(0.0);
    let p = scroll_progress(y, cover.client_height() as f64);
    let _ = body.style().set_property(variable, &format_progress(p));
}

/// Passive scroll listener driving the parallax style variable.
///
/// Scroll events are folded into at most one pending animation frame. Dropping
/// the binding removes the listener and cancels a pending frame.
pub(super) struct ScrollBinding {
    window: Window,
    on_scroll: Closure<dyn FnMut()>,
    frame: Rc<Cell<Option<i32>>>,
    // Referenced by `on_scroll`; kept alive with it.
    _update: Rc<Closure<dyn FnMut()>>,
}

impl ScrollBinding {
    pub(super) fn bind(window: Window, cover: Element, body: HtmlElement, variable: String) -> Self {
        write_progress(&window, &cover, &body, &variable);

        let gate = Rc::new(FrameGate::new());
        let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let update = {
            let window = window.clone();
            let gate = gate.clone();
            let frame = frame.clone();
            Rc::new(Closure::wrap(Box::new(move || {
                frame.set(None);
                write_progress(&window, &cover, &body, &variable);
                gate.complete();
            }) as Box<dyn FnMut()>))
        };

        let on_scroll = {
            let window = window.clone();
            let update = update.clone();
            let frame = frame.clone();
            Closure::wrap(Box::new(move || {
                if !gate.try_schedule() {
                    return;
                }
                match window.request_animation_frame((*update).as_ref().unchecked_ref()) {
                    Ok(id) => frame.set(Some(id)),
                    Err(_) => gate.complete(),
                }
            }) as Box<dyn FnMut()>)
        };

        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        if window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                on_scroll.as_ref().unchecked_ref(),
                &opts,
            )
            .is_err()
        {
            warn!("parallax: addEventListener threw");
        }

        Self {
            window,
            on_scroll,
            frame,
            _update: update,
        }
    }
}

impl Drop for ScrollBinding {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        if let Some(id) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
