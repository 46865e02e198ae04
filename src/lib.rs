/// nb-shares - share the page you are looking at to nickbell.dev
/// Built with Rust + WASM + Yew: extension popup, options page, PWA and its
/// offline cache worker all come from this one module

pub mod api;
pub mod controller;
pub mod error;
mod extension;
pub mod settings;
pub mod share_target;
pub mod source;
pub mod ui;
pub mod worker;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export pure helpers for JavaScript access
#[wasm_bindgen]
pub fn detect_source_type(url: &str) -> String {
    source::detect_source_type(url).as_str().to_string()
}

#[wasm_bindgen]
pub fn extract_shared_url(query: &str) -> String {
    share_target::extract_shared_url(query)
}

// Start the Yew app for the extension popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the extension options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}

// Start the Yew app for the PWA
#[wasm_bindgen]
pub fn start_pwa() {
    yew::Renderer::<ui::pwa::PwaApp>::new().render();
}
