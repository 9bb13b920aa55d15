use softnav::config::SiteConfig;
use softnav::swap::{FetchedPage, SwapError};
use softnav::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Headers, Request, RequestInit, Response};

/// GET `url` as a soft request.
///
/// Only transport failures are errors here. Any HTTP response comes back as a
/// [`FetchedPage`]; the body is read only for success statuses.
pub(super) async fn fetch_page(
    url: &Url,
    cfg: &SiteConfig,
    signal: Option<&AbortSignal>,
) -> Result<FetchedPage, SwapError> {
    let window = web_sys::window().ok_or_else(|| SwapError::network("no window"))?;

    let headers = Headers::new().map_err(|e| SwapError::network(format!("headers: {e:?}")))?;
    let (name, value) = &cfg.request_header;
    headers
        .set(name, value)
        .map_err(|e| SwapError::network(format!("headers: {e:?}")))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_headers(&headers);
    opts.set_signal(signal);

    let request = Request::new_with_str_and_init(url.as_str(), &opts)
        .map_err(|e| SwapError::network(format!("request error: {e:?}")))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| SwapError::network(format!("fetch error: {e:?}")))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| SwapError::network("response is not a Response"))?;

    let status = resp.status();
    if !resp.ok() {
        return Ok(FetchedPage {
            status,
            body: String::new(),
        });
    }

    let text = JsFuture::from(
        resp.text()
            .map_err(|e| SwapError::network(format!("text promise error: {e:?}")))?,
    )
    .await
    .map_err(|e| SwapError::network(format!("body error: {e:?}")))?;

    Ok(FetchedPage {
        status,
        body: text.as_string().unwrap_or_default(),
    })
}
