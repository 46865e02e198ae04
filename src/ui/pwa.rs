/// Installable web app: setup, share, loading and success screens

use crate::controller::{Action, Controller, Screen};
use crate::settings::{LocalStorage, Settings, SettingsStore};
use crate::share_target::extract_shared_url;
use crate::ui::components::{ErrorText, Loading, ShareForm, focus_share_form};
use crate::ui::{input_value, save_settings, submit_share};
use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Navigator, RegistrationOptions};
use yew::prelude::*;

const SERVICE_WORKER_PATH: &str = "sw.js";

#[function_component(PwaApp)]
pub fn pwa_app() -> Html {
    let controller = use_reducer_eq(Controller::default);
    let ready = use_state(|| false);
    let api_url_input = use_state(String::new);
    let api_token_input = use_state(String::new);
    let token_visible = use_state(|| false);
    let url_ref = use_node_ref();
    let commentary_ref = use_node_ref();

    // Read the share-target payload and load settings, then register the worker
    {
        let controller = controller.clone();
        let ready = ready.clone();
        let api_url_input = api_url_input.clone();

        use_effect_with((), move |_| {
            let initial_url = take_shared_url();

            spawn_local(async move {
                let settings = LocalStorage.load().await.unwrap_or_else(|e| {
                    log::warn!("could not load settings: {}", e);
                    Settings::default()
                });

                api_url_input.set(settings.api_url.clone());
                controller.dispatch(Action::Start { settings, initial_url });
                ready.set(true);
            });

            register_service_worker();
            || ()
        });
    }

    {
        let url_ref = url_ref.clone();
        let commentary_ref = commentary_ref.clone();
        let has_url = !controller.url.is_empty();

        use_effect_with(controller.screen, move |screen| {
            if *screen == Screen::Share {
                focus_share_form(&url_ref, &commentary_ref, has_url);
            }
            || ()
        });
    }

    let on_api_url_input = {
        let api_url_input = api_url_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                api_url_input.set(value);
            }
        })
    };

    let on_api_token_input = {
        let api_token_input = api_token_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                api_token_input.set(value);
            }
        })
    };

    let on_toggle_token = {
        let token_visible = token_visible.clone();
        Callback::from(move |_: MouseEvent| token_visible.set(!*token_visible))
    };

    let on_save = {
        let controller = controller.clone();
        let api_url_input = api_url_input.clone();
        let api_token_input = api_token_input.clone();

        Callback::from(move |_: MouseEvent| {
            save_settings(&controller, LocalStorage, &api_url_input, &api_token_input);
        })
    };

    let on_submit = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| submit_share(&controller))
    };

    let on_open_settings = {
        let controller = controller.clone();
        let api_url_input = api_url_input.clone();

        Callback::from(move |_: MouseEvent| {
            api_url_input.set(controller.settings.api_url.clone());
            controller.dispatch(Action::OpenSettings);
        })
    };

    let on_share_another = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.dispatch(Action::ShareAnother))
    };

    if !*ready {
        return html! { <Loading message="Loading..." /> };
    }

    let screen = match controller.screen {
        Screen::Setup => html! {
            <section class="screen setup-screen">
                <h1 class="main-title">{"Connect"}</h1>
                <div class="flex-column-gap">
                    <label class="field-label" for="setup-api-url">{"API URL"}</label>
                    <input
                        id="setup-api-url"
                        type="url"
                        class="text-input"
                        placeholder="https://api.example.com"
                        value={(*api_url_input).clone()}
                        oninput={on_api_url_input}
                    />

                    <label class="field-label" for="setup-api-token">{"API Token"}</label>
                    <div class="token-row">
                        <input
                            id="setup-api-token"
                            type={if *token_visible { "text" } else { "password" }}
                            class="text-input"
                            value={(*api_token_input).clone()}
                            oninput={on_api_token_input}
                        />
                        <Button onclick={on_toggle_token} variant={ButtonVariant::Secondary}>
                            {if *token_visible { "🙈" } else { "👁" }}
                        </Button>
                    </div>

                    <ErrorText message={controller.error.clone()} />

                    <Button
                        onclick={on_save}
                        disabled={controller.in_flight}
                        variant={ButtonVariant::Primary}
                        block={true}
                    >
                        {if controller.in_flight { "Testing..." } else { "Save & Continue" }}
                    </Button>
                </div>
            </section>
        },
        Screen::Share => html! {
            <section class="screen share-screen">
                <div class="header">
                    <h1 class="main-title">{"Share"}</h1>
                    <Button onclick={on_open_settings} variant={ButtonVariant::Secondary}>
                        {"⚙"}
                    </Button>
                </div>
                <ShareForm
                    controller={controller.clone()}
                    on_submit={on_submit}
                    url_ref={url_ref}
                    commentary_ref={commentary_ref}
                />
            </section>
        },
        Screen::Loading => html! {
            <section class="screen loading-screen">
                <Loading message="Sharing..." />
            </section>
        },
        Screen::Success => html! {
            <section class="screen success-screen">
                <h1 class="main-title">{"Shared!"}</h1>
                <div class="flex-column-gap">
                    <a
                        href={controller.result_link.clone().unwrap_or_default()}
                        target="_blank"
                        rel="noopener"
                    >
                        {"View share"}
                    </a>
                    <Button onclick={on_share_another} variant={ButtonVariant::Primary} block={true}>
                        {"Share another"}
                    </Button>
                </div>
            </section>
        },
    };

    html! {
        <div class="container">
            {screen}
        </div>
    }
}

/// Browsers without `navigator.serviceWorker` (plain http, some webviews)
/// still get a working app, just no offline cache
pub fn service_worker_supported(navigator: &Navigator) -> bool {
    js_sys::Reflect::has(navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false)
}

/// sw.js is an ES module (it imports the wasm-bindgen glue), so register it
/// with `type: "module"`
fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };

    let navigator = window.navigator();
    if !service_worker_supported(&navigator) {
        log::info!("service workers unavailable, running without offline cache");
        return;
    }

    let options = RegistrationOptions::new();
    options.set_type("module");

    let promise = navigator
        .service_worker()
        .register_with_options(SERVICE_WORKER_PATH, &options);

    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => log::debug!("service worker registered"),
            Err(e) => log::warn!("service worker registration failed: {:?}", e),
        }
    });
}

/// Read the share-target query, then drop it from the address bar so a
/// refresh does not share the same thing twice
fn take_shared_url() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };

    let search = window.location().search().unwrap_or_default();
    if search.is_empty() {
        return String::new();
    }

    let url = extract_shared_url(&search);
    log::debug!("share target payload {} -> {:?}", search, url);

    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some("/")) {
            log::warn!("could not clear share target query: {:?}", e);
        }
    }

    url
}
