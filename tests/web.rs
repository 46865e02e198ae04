//! Browser-only tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use nb_shares::api::{ShareClient, ShareRequest};
use nb_shares::error::ShareError;
use nb_shares::settings::{LocalStorage, Settings, SettingsStore};
use nb_shares::share_target::extract_shared_url;
use nb_shares::ui::pwa::service_worker_supported;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn local_storage_round_trip() {
    let store = LocalStorage;
    store
        .save(&Settings {
            api_url: "https://api.example.com/".to_string(),
            api_token: "tok".to_string(),
        })
        .await
        .unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.api_url, "https://api.example.com");
    assert_eq!(loaded.api_token, "tok");
    assert!(store.has_settings().await.unwrap());
}

#[wasm_bindgen_test]
fn share_target_from_page_query() {
    assert_eq!(
        extract_shared_url("?text=Check this out https://example.com/x"),
        "https://example.com/x"
    );
}

#[wasm_bindgen_test]
async fn submit_to_silent_host_times_out() {
    // Non-routable address: the connection never completes
    let settings = Settings::new("http://10.255.255.1", "tok");
    let client = ShareClient::with_timeout(&settings, Duration::from_millis(50));

    let err = client
        .submit_share(&ShareRequest::new("https://example.com", ""))
        .await
        .unwrap_err();
    assert_eq!(err, ShareError::Network("Request timed out".to_string()));

    let err = client.test_connection().await.unwrap_err();
    assert_eq!(err.connection_message(), "Connection error: Request timed out");
}

#[wasm_bindgen_test]
fn service_worker_support_is_detected() {
    let navigator = web_sys::window().unwrap().navigator();
    assert!(service_worker_supported(&navigator));

    let bare: web_sys::Navigator = js_sys::Object::new().unchecked_into();
    assert!(!service_worker_supported(&bare));
}
