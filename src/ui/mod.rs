/// UI surfaces and the async glue they share
use crate::api::ShareClient;
use crate::controller::{Action, Controller, SubmitBlocked};
use crate::error::ShareError;
use crate::settings::SettingsStore;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

pub mod components;
pub mod options;
pub mod popup;
pub mod pwa;

/// Validate the share form and, if it passes, submit it in the background
pub(crate) fn submit_share(controller: &UseReducerHandle<Controller>) {
    let request = match controller.prepare_submit() {
        Ok(request) => request,
        Err(SubmitBlocked::Busy) => return,
        Err(SubmitBlocked::Invalid(msg)) => {
            controller.dispatch(Action::SubmitRejected(msg.to_string()));
            return;
        }
    };

    controller.dispatch(Action::SubmitStarted);

    let client = ShareClient::new(&controller.settings);
    let controller = controller.clone();
    spawn_local(async move {
        let result = client.submit_share(&request).await;
        match &result {
            Ok(response) => log::info!("shared {} -> {}", request.url, response.result_link()),
            Err(e) => log::warn!("share failed: {}", e),
        }
        controller.dispatch(Action::SubmitFinished(result));
    });
}

/// Test the connection and persist the settings only if it succeeds
pub(crate) fn save_settings<S>(
    controller: &UseReducerHandle<Controller>,
    store: S,
    api_url: &str,
    api_token: &str,
) where
    S: SettingsStore + 'static,
{
    let settings = match controller.prepare_save(api_url, api_token) {
        Ok(settings) => settings,
        Err(SubmitBlocked::Busy) => return,
        Err(SubmitBlocked::Invalid(msg)) => {
            controller.dispatch(Action::SaveRejected(msg.to_string()));
            return;
        }
    };

    controller.dispatch(Action::SaveStarted);

    let controller = controller.clone();
    spawn_local(async move {
        let result = match ShareClient::new(&settings).test_connection().await {
            Ok(_) => match store.save(&settings).await {
                Ok(()) => Ok(settings),
                Err(e) => Err(ShareError::Network(e.to_string())),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            log::warn!("settings not saved: {}", e);
        }
        controller.dispatch(Action::SaveFinished(result));
    });
}

pub(crate) fn input_value(e: &InputEvent) -> Option<String> {
    if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
        return Some(input.value());
    }
    e.target_dyn_into::<HtmlTextAreaElement>()
        .map(|area| area.value())
}
