/// Popup UI: share the active tab

use crate::controller::{Action, Controller, Screen};
use crate::extension;
use crate::settings::{Settings, SettingsStore, SyncStorage};
use crate::ui::components::{Loading, ShareForm, focus_share_form};
use crate::ui::submit_share;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let controller = use_reducer_eq(Controller::default);
    let ready = use_state(|| false);
    let url_ref = use_node_ref();
    let commentary_ref = use_node_ref();

    // Load settings and the active tab on mount
    {
        let controller = controller.clone();
        let ready = ready.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let settings = SyncStorage.load().await.unwrap_or_else(|e| {
                    log::warn!("could not load settings: {}", e);
                    Settings::default()
                });

                let initial_url = if settings.is_complete() {
                    extension::active_tab_url().await.unwrap_or_else(|e| {
                        log::warn!("{}", e);
                        String::new()
                    })
                } else {
                    String::new()
                };

                controller.dispatch(Action::Start { settings, initial_url });
                ready.set(true);
            });
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

    let on_submit = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| submit_share(&controller))
    };

    let on_open_options = Callback::from(|_: MouseEvent| {
        spawn_local(async move {
            if let Err(e) = extension::open_options_page().await {
                log::warn!("{}", e);
            }
        });
    });

    let body = if !*ready {
        html! { <Loading message="Loading..." /> }
    } else {
        match controller.screen {
            Screen::Setup => html! {
                <div class="flex-column-gap">
                    <p class="message-text">
                        {"Set your API URL and token before sharing."}
                    </p>
                    <Button onclick={on_open_options} variant={ButtonVariant::Primary} block={true}>
                        {"Open Settings"}
                    </Button>
                </div>
            },
            Screen::Share => html! {
                <ShareForm
                    controller={controller.clone()}
                    on_submit={on_submit}
                    url_ref={url_ref}
                    commentary_ref={commentary_ref}
                />
            },
            Screen::Loading => html! { <Loading message="Sharing..." /> },
            Screen::Success => html! {
                <div class="flex-column-gap">
                    <p class="message-text">{"Shared!"}</p>
                    <a
                        href={controller.result_link.clone().unwrap_or_default()}
                        target="_blank"
                        rel="noopener"
                    >
                        {"View share"}
                    </a>
                </div>
            },
        }
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Share"}</h1>
            {body}
        </div>
    }
}
