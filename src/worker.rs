//! Offline cache service worker for the PWA
//!
//! `sw.js` loads this module and forwards install/activate/fetch events to the
//! exported `sw_*` functions. The app shell is served stale-while-revalidate;
//! API calls always go straight to the network.

use futures::channel::oneshot;
use js_sys::{Array, Promise};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise, spawn_local};
use web_sys::{Cache, CacheStorage, FetchEvent, Request, Response, ServiceWorkerGlobalScope};

pub const CACHE_NAME: &str = "nb-shares-v1";

pub const API_PREFIX: &str = "/api/";

pub const APP_SHELL: [&str; 7] = [
    "/",
    "/index.html",
    "/app.css",
    "/app.js",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Leave the request alone; the browser fetches it uncached
    PassThrough,
    /// Serve the cached copy if there is one, refresh it from the network
    StaleWhileRevalidate,
}

impl FetchPolicy {
    /// The Cache API only stores GET responses, so anything else passes through
    pub fn for_request(method: &str, path: &str) -> Self {
        if path.starts_with(API_PREFIX) || !method.eq_ignore_ascii_case("GET") {
            FetchPolicy::PassThrough
        } else {
            FetchPolicy::StaleWhileRevalidate
        }
    }

    pub fn for_url(method: &str, url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) => Self::for_request(method, parsed.path()),
            Err(_) => FetchPolicy::PassThrough,
        }
    }
}

fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

fn caches() -> Result<CacheStorage, JsValue> {
    scope().caches()
}

async fn open_cache() -> Result<Cache, JsValue> {
    let cache = JsFuture::from(caches()?.open(CACHE_NAME)).await?;
    Ok(cache.unchecked_into())
}

/// Pre-cache the app shell and activate without waiting for old workers
#[wasm_bindgen]
pub fn sw_install() -> Promise {
    future_to_promise(async move {
        let cache = open_cache().await?;
        let shell: Array = APP_SHELL.iter().map(|path| JsValue::from_str(path)).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&shell)).await?;
        log::info!("cached {} app shell entries in {}", APP_SHELL.len(), CACHE_NAME);

        JsFuture::from(scope().skip_waiting()?).await?;
        Ok(JsValue::UNDEFINED)
    })
}

/// Drop every cache but the current one, then take over open pages
#[wasm_bindgen]
pub fn sw_activate() -> Promise {
    future_to_promise(async move {
        let caches = caches()?;
        let keys: Array = JsFuture::from(caches.keys()).await?.unchecked_into();

        for key in keys.iter().filter_map(|k| k.as_string()) {
            if key != CACHE_NAME {
                JsFuture::from(caches.delete(&key)).await?;
                log::info!("deleted stale cache {}", key);
            }
        }

        JsFuture::from(scope().clients().claim()).await?;
        Ok(JsValue::UNDEFINED)
    })
}

/// Decide synchronously whether to answer the request; pass-through
/// requests never call `respondWith`
#[wasm_bindgen]
pub fn sw_fetch(event: FetchEvent) -> Result<(), JsValue> {
    let request = event.request();

    if FetchPolicy::for_url(&request.method(), &request.url()) == FetchPolicy::PassThrough {
        return Ok(());
    }

    event.respond_with(&future_to_promise(stale_while_revalidate(request)))
}

/// Cached response wins when present, otherwise the network result.
/// The network fetch always runs and a successful response refreshes the
/// cache whichever one was returned.
pub async fn stale_while_revalidate(request: Request) -> Result<JsValue, JsValue> {
    let network = scope().fetch_with_request(&request);
    let cache_key = request.clone()?;
    let (tx, rx) = oneshot::channel();

    spawn_local(refresh(cache_key, network, tx));

    let cached = JsFuture::from(caches()?.match_with_request(&request)).await?;
    if !cached.is_undefined() {
        return Ok(cached);
    }

    match rx.await {
        Ok(result) => result,
        Err(_) => Err(JsValue::from_str("network task dropped")),
    }
}

async fn refresh(
    request: Request,
    network: Promise,
    tx: oneshot::Sender<Result<JsValue, JsValue>>,
) {
    let result = match JsFuture::from(network).await {
        Ok(value) => {
            let response: Response = value.unchecked_into();
            if response.ok() {
                match response.clone() {
                    Ok(copy) => spawn_local(store(request, copy)),
                    Err(e) => log::warn!("could not clone response: {:?}", e),
                }
            }
            Ok(response.into())
        }
        Err(e) => {
            log::debug!("network fetch failed for {}: {:?}", request.url(), e);
            Err(e)
        }
    };

    // The receiver is gone when the cached copy was already returned
    let _ = tx.send(result);
}

async fn store(request: Request, response: Response) {
    let result = async {
        let cache = open_cache().await?;
        JsFuture::from(cache.put_with_request(&request, &response)).await
    }
    .await;

    if let Err(e) = result {
        log::warn!("cache put failed for {}: {:?}", request.url(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_requests_pass_through() {
        assert_eq!(FetchPolicy::for_request("POST", "/api/v1/shares"), FetchPolicy::PassThrough);
        assert_eq!(FetchPolicy::for_request("GET", "/api/v1/shares"), FetchPolicy::PassThrough);
        assert_eq!(FetchPolicy::for_request("GET", "/api/user"), FetchPolicy::PassThrough);
        assert_eq!(
            FetchPolicy::for_url("GET", "https://shares.nickbell.dev/api/v1/shares?x=1"),
            FetchPolicy::PassThrough
        );
    }

    #[test]
    fn test_shell_requests_are_cached() {
        for path in APP_SHELL {
            assert_eq!(
                FetchPolicy::for_request("GET", path),
                FetchPolicy::StaleWhileRevalidate,
                "{} should be served from cache",
                path
            );
        }
        assert_eq!(
            FetchPolicy::for_url("get", "https://shares.nickbell.dev/app.css"),
            FetchPolicy::StaleWhileRevalidate
        );
    }

    #[test]
    fn test_non_get_and_lookalike_paths() {
        assert_eq!(FetchPolicy::for_request("POST", "/"), FetchPolicy::PassThrough);
        assert_eq!(FetchPolicy::for_request("GET", "/apix"), FetchPolicy::StaleWhileRevalidate);
        assert_eq!(FetchPolicy::for_url("GET", "not a url"), FetchPolicy::PassThrough);
    }

    #[test]
    fn test_app_shell_list() {
        assert_eq!(CACHE_NAME, "nb-shares-v1");
        assert!(APP_SHELL.contains(&"/manifest.json"));
        assert!(APP_SHELL.iter().all(|path| path.starts_with('/')));
    }
}
