/// Bridge to the chrome.* extension APIs (see extension.js)
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getSyncStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setSyncStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openOptionsPage() -> Result<(), JsValue>;
}

pub async fn sync_get(keys: &[&str]) -> Result<JsValue, String> {
    let keys_js = serde_wasm_bindgen::to_value(&keys)
        .map_err(|e| format!("Failed to serialize keys: {:?}", e))?;

    getSyncStorage(keys_js)
        .await
        .map_err(|e| format!("Failed to read sync storage: {:?}", e))
}

pub async fn sync_set(items: JsValue) -> Result<(), String> {
    setSyncStorage(items)
        .await
        .map_err(|e| format!("Failed to write sync storage: {:?}", e))
}

/// URL of the active tab in the current window, empty when there is none
pub async fn active_tab_url() -> Result<String, String> {
    let url = getActiveTabUrl()
        .await
        .map_err(|e| format!("Failed to query tabs: {:?}", e))?;

    Ok(url.as_string().unwrap_or_default())
}

pub async fn open_options_page() -> Result<(), String> {
    openOptionsPage()
        .await
        .map_err(|e| format!("Failed to open options: {:?}", e))
}
