/// Extension options page: edit and test the API settings

use crate::api::ShareClient;
use crate::controller::{OptionsStatus, options_save_check, options_test_check, options_test_status};
use crate::settings::{DEFAULT_API_URL, SettingsStore, SyncStorage};
use crate::ui::input_value;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let api_url = use_state(String::new);
    let api_token = use_state(String::new);
    let token_visible = use_state(|| false);
    let testing = use_state(|| false);
    let status = use_state(|| OptionsStatus::Hidden);

    // Load saved settings on mount
    {
        let api_url = api_url.clone();
        let api_token = api_token.clone();
        let status = status.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match SyncStorage.load().await {
                    Ok(settings) => {
                        api_url.set(if settings.api_url.is_empty() {
                            DEFAULT_API_URL.to_string()
                        } else {
                            settings.api_url
                        });
                        api_token.set(settings.api_token);
                    }
                    Err(e) => {
                        api_url.set(DEFAULT_API_URL.to_string());
                        status.set(OptionsStatus::Error(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_url_input = {
        let api_url = api_url.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                api_url.set(value);
            }
        })
    };

    let on_token_input = {
        let api_token = api_token.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                api_token.set(value);
            }
        })
    };

    let on_toggle_token = {
        let token_visible = token_visible.clone();
        Callback::from(move |_: MouseEvent| token_visible.set(!*token_visible))
    };

    let on_save = {
        let api_url = api_url.clone();
        let api_token = api_token.clone();
        let status = status.clone();

        Callback::from(move |_: MouseEvent| {
            let settings = match options_save_check(&api_url, &api_token) {
                Ok(settings) => settings,
                Err(rejected) => {
                    status.set(rejected);
                    return;
                }
            };

            let status = status.clone();
            spawn_local(async move {
                match SyncStorage.save(&settings).await {
                    Ok(()) => status.set(OptionsStatus::Success("Settings saved.".to_string())),
                    Err(e) => status.set(OptionsStatus::Error(e.to_string())),
                }
            });
        })
    };

    let on_test = {
        let api_url = api_url.clone();
        let api_token = api_token.clone();
        let testing = testing.clone();
        let status = status.clone();

        Callback::from(move |_: MouseEvent| {
            if *testing {
                return;
            }

            let settings = match options_test_check(&api_url, &api_token) {
                Ok(settings) => settings,
                Err(rejected) => {
                    status.set(rejected);
                    return;
                }
            };

            testing.set(true);
            status.set(OptionsStatus::Hidden);

            let testing = testing.clone();
            let status = status.clone();
            spawn_local(async move {
                let result = ShareClient::new(&settings).test_connection().await;
                status.set(options_test_status(&result));
                testing.set(false);
            });
        })
    };

    html! {
        <div class="container">
            <h1 class="main-title">{"Share Settings"}</h1>

            <div class="flex-column-gap">
                <label class="field-label" for="api-url">{"API URL"}</label>
                <input
                    id="api-url"
                    type="url"
                    class="text-input"
                    value={(*api_url).clone()}
                    oninput={on_url_input}
                />

                <label class="field-label" for="api-token">{"API Token"}</label>
                <div class="token-row">
                    <input
                        id="api-token"
                        type={if *token_visible { "text" } else { "password" }}
                        class="text-input"
                        value={(*api_token).clone()}
                        oninput={on_token_input}
                    />
                    <Button onclick={on_toggle_token} variant={ButtonVariant::Secondary}>
                        {if *token_visible { "🙈" } else { "👁" }}
                    </Button>
                </div>

                <div class="button-row">
                    <Button onclick={on_save} variant={ButtonVariant::Primary}>
                        {"Save"}
                    </Button>
                    <Button onclick={on_test} disabled={*testing} variant={ButtonVariant::Secondary}>
                        {if *testing { "Testing..." } else { "Test Connection" }}
                    </Button>
                </div>

                {match &*status {
                    OptionsStatus::Hidden => html! {},
                    OptionsStatus::Success(msg) => html! {
                        <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}>
                        </Alert>
                    },
                    OptionsStatus::Error(msg) => html! {
                        <Alert r#type={AlertType::Danger} title={msg.clone()} inline={true}>
                        </Alert>
                    },
                }}
            </div>
        </div>
    }
}
