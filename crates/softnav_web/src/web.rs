use std::cell::RefCell;
use std::rc::Rc;

use softnav::config::SiteConfig;
use softnav::enhance::EnhanceError;
use softnav::history::HistoryState;
use softnav::link::{classify_click, ClickInfo, LinkAction, LinkCandidate};
use softnav::swap::{mark_active_nav, Host, NavRequest, Navigator, SwapOutcome};
use softnav::Url;
use tracing::{debug, info, trace, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AbortController, Element, MouseEvent, PopStateEvent, ScrollBehavior, Window};

mod dom;
mod enhance;
mod fetch;
mod host;
mod lazy;
mod plugins;
mod scroll;

use crate::bridge::{fragment_id, INIT_LAZY_LOAD_GLOBAL};
use dom::Scope;
use enhance::WebEnhancer;
use host::PageHost;
use lazy::LazyLoader;

struct App {
    cfg: Rc<SiteConfig>,
    navigator: RefCell<Navigator>,
    enhancer: RefCell<WebEnhancer>,
    in_flight: RefCell<Option<AbortController>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
    /// Serves `initLazyLoad` until navigation boots, or for good if it never does.
    static STANDALONE_LAZY: RefCell<Option<LazyLoader>> = const { RefCell::new(None) };
}

impl App {
    fn new(cfg: SiteConfig) -> Self {
        let cfg = Rc::new(cfg);
        Self {
            navigator: RefCell::new(Navigator::new((*cfg).clone())),
            enhancer: RefCell::new(WebEnhancer::new(cfg.clone())),
            in_flight: RefCell::new(None),
            cfg,
        }
    }

    /// Run `f` against the live page.
    fn with_host<R>(&self, f: impl FnOnce(&mut PageHost<'_>, &mut Navigator) -> R) -> Result<R, String> {
        let window = dom::window()?;
        let document = window.document().ok_or("no document".to_string())?;
        let fallback_location = dom::location_url(&window)?;

        let mut enhancer = self
            .enhancer
            .try_borrow_mut()
            .map_err(|_| "enhancer busy".to_string())?;
        let mut navigator = self
            .navigator
            .try_borrow_mut()
            .map_err(|_| "navigator busy".to_string())?;

        let mut host = PageHost::new(
            self.cfg.as_ref(),
            window,
            document,
            &mut *enhancer,
            fallback_location,
        );
        Ok(f(&mut host, &mut *navigator))
    }

    /// Give up on `req` without the swap machinery: drop the request and the
    /// loading flag, then let the browser load the page.
    fn abandon(&self, req: &NavRequest) {
        self.in_flight.replace(None);
        if let Ok(document) = dom::document() {
            dom::set_loading(&document, &self.cfg.loading_class, false);
        }
        if let Some(w) = web_sys::window() {
            if let Err(e) = w.location().set_href(req.url.as_str()) {
                warn!(error = ?e, "location assignment failed");
            }
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let Ok(window) = dom::window() else {
        return;
    };
    if let Err(e) = expose_init_lazy_load(&window) {
        warn!(error = %e, "initLazyLoad not installed on window");
    }

    let Ok(document) = dom::document() else {
        return;
    };
    if document.ready_state() == "loading" {
        let cb = Closure::once_into_js(boot);
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref());
    } else {
        boot();
    }
}

fn expose_init_lazy_load(window: &Window) -> Result<(), String> {
    let f = Closure::wrap(Box::new(init_lazy_load) as Box<dyn FnMut(JsValue)>);
    js_sys::Reflect::set(window, &JsValue::from_str(INIT_LAZY_LOAD_GLOBAL), f.as_ref())
        .map_err(|_| format!("window: setting {INIT_LAZY_LOAD_GLOBAL} threw"))?;
    // Page-lifetime global.
    f.forget();
    Ok(())
}

/// Re-run deferred image loading over `scope` (an element), or the whole document.
///
/// Also installed as `window.initLazyLoad`. Works whether or not soft
/// navigation has booted.
#[wasm_bindgen(js_name = initLazyLoad)]
pub fn init_lazy_load(scope: JsValue) {
    let Ok(document) = dom::document() else {
        return;
    };
    let scope = match scope.dyn_into::<Element>() {
        Ok(el) => Scope::Element(el),
        Err(_) => Scope::Document(document.clone()),
    };

    let result = match APP.with(|slot| slot.borrow().clone()) {
        Some(app) => {
            let Ok(mut enhancer) = app.enhancer.try_borrow_mut() else {
                warn!("initLazyLoad called during a swap; skipped");
                return;
            };
            enhancer.lazy.init(&scope)
        }
        None => STANDALONE_LAZY.with(|slot| {
            let mut slot = slot.borrow_mut();
            let loader =
                slot.get_or_insert_with(|| LazyLoader::new(&dom::load_config(&document)));
            loader.init(&scope)
        }),
    };
    if let Err(e) = result {
        warn!(error = %e, "initLazyLoad failed");
    }
}

fn boot() {
    if let Err(e) = try_boot() {
        warn!(error = %e, "soft navigation disabled");
    }
}

fn try_boot() -> Result<(), String> {
    let window = dom::window()?;
    let document = dom::document()?;
    let app = Rc::new(App::new(dom::load_config(&document)));
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    let click = {
        let app = app.clone();
        Closure::wrap(Box::new(move |ev: MouseEvent| on_click(&app, ev)) as Box<dyn FnMut(MouseEvent)>)
    };
    document
        .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
        .map_err(|_| "document: addEventListener(click) threw".to_string())?;
    // Page-lifetime listener.
    click.forget();

    let pop = {
        let app = app.clone();
        Closure::wrap(
            Box::new(move |ev: PopStateEvent| on_pop_state(&app, ev)) as Box<dyn FnMut(PopStateEvent)>
        )
    };
    window
        .add_event_listener_with_callback("popstate", pop.as_ref().unchecked_ref())
        .map_err(|_| "window: addEventListener(popstate) threw".to_string())?;
    pop.forget();

    app.with_host(|host, _| {
        let current = host.location();
        mark_active_nav(host, &current);
    })?;

    match plugins::aos_init() {
        Ok(()) | Err(EnhanceError::Unavailable(_)) => {}
        Err(e) => warn!(error = %e, "AOS.init failed"),
    }

    // The lazy run below re-observes whatever the standalone loader still watched.
    STANDALONE_LAZY.with(|slot| drop(slot.borrow_mut().take()));
    app.with_host(|host, _| host.reinitialize())?;
    info!("soft navigation ready");
    Ok(())
}

fn on_click(app: &Rc<App>, ev: MouseEvent) {
    let Some(anchor) = ev
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
    else {
        return;
    };

    let link = LinkCandidate {
        href: anchor.get_attribute("href"),
        target: anchor.get_attribute("target"),
        download: anchor.has_attribute("download"),
    };
    let click = ClickInfo {
        button: ev.button(),
        meta: ev.meta_key(),
        ctrl: ev.ctrl_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
        default_prevented: ev.default_prevented(),
    };
    let Ok(base) = dom::window().and_then(|w| dom::location_url(&w)) else {
        return;
    };

    match classify_click(&link, &click, &base, &app.cfg) {
        LinkAction::Ignore(reason) => trace!(?reason, "click left to the browser"),
        LinkAction::ScrollToFragment(hash) => {
            ev.prevent_default();
            if let (Some(id), Ok(document)) = (fragment_id(&hash), dom::document()) {
                dom::scroll_to_id(&document, id, ScrollBehavior::Smooth);
            }
        }
        LinkAction::SoftNavigate(url) => {
            if navigate(app, url, true) {
                ev.prevent_default();
            }
        }
    }
}

fn on_pop_state(app: &Rc<App>, ev: PopStateEvent) {
    let state: Option<HistoryState> = serde_wasm_bindgen::from_value(ev.state()).ok();
    match app.with_host(|host, nav| nav.begin_pop(host, state.as_ref())) {
        Ok(Some(req)) => spawn_swap(app, req),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "popstate ignored"),
    }
}

/// Start a soft navigation. Returns false when the page cannot take one, in
/// which case the browser should handle the click itself.
fn navigate(app: &Rc<App>, url: Url, push: bool) -> bool {
    match app.with_host(|host, nav| nav.begin(host, url, push)) {
        Ok(Some(req)) => {
            spawn_swap(app, req);
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "navigation not intercepted");
            false
        }
    }
}

fn spawn_swap(app: &Rc<App>, req: NavRequest) {
    let controller = AbortController::new().ok();
    if let Some(prev) = app.in_flight.replace(controller.clone()) {
        debug!("aborting superseded request");
        prev.abort();
    }

    let app = app.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let signal = controller.as_ref().map(|c| c.signal());
        let result = fetch::fetch_page(&req.url, &app.cfg, signal.as_ref()).await;

        match app.with_host(|host, nav| nav.complete(host, &req, result)) {
            Ok(SwapOutcome::Superseded) => {}
            Ok(_) => {
                app.in_flight.replace(None);
            }
            Err(e) => {
                warn!(error = %e, "swap could not run; full page load");
                app.abandon(&req);
            }
        }
    });
}
