/// Reusable UI components

use crate::controller::{Action, Controller};
use crate::source::SourceType;
use crate::ui::input_value;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SourceIconProps {
    pub source: SourceType,
}

#[function_component(SourceIcon)]
pub fn source_icon(props: &SourceIconProps) -> Html {
    let source = props.source;

    html! {
        <span
            class={classes!("source-icon", source.css_class())}
            title={source.label()}
            aria-label={source.label()}
        >
            {source.glyph()}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorTextProps {
    pub message: Option<String>,
}

#[function_component(ErrorText)]
pub fn error_text(props: &ErrorTextProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                {message.clone()}
            </Alert>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct ShareFormProps {
    pub controller: UseReducerHandle<Controller>,
    pub on_submit: Callback<MouseEvent>,
    #[prop_or_default]
    pub url_ref: NodeRef,
    #[prop_or_default]
    pub commentary_ref: NodeRef,
}

/// URL + commentary form used by both the popup and the PWA
#[function_component(ShareForm)]
pub fn share_form(props: &ShareFormProps) -> Html {
    let controller = &props.controller;

    let on_url_input = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                controller.dispatch(Action::SetUrl(value));
            }
        })
    };

    let on_commentary_input = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                controller.dispatch(Action::SetCommentary(value));
            }
        })
    };

    html! {
        <div class="flex-column-gap">
            <label class="field-label" for="share-url">{"URL"}</label>
            <div class="url-row">
                <SourceIcon source={controller.source} />
                <input
                    id="share-url"
                    type="url"
                    class="text-input"
                    placeholder="https://"
                    ref={props.url_ref.clone()}
                    value={controller.url.clone()}
                    oninput={on_url_input}
                />
            </div>

            <label class="field-label" for="share-commentary">{"Commentary (optional)"}</label>
            <textarea
                id="share-commentary"
                class="text-input"
                rows="4"
                ref={props.commentary_ref.clone()}
                value={controller.commentary.clone()}
                oninput={on_commentary_input}
            />

            <ErrorText message={controller.error.clone()} />

            <Button
                onclick={props.on_submit.clone()}
                disabled={controller.in_flight}
                variant={ButtonVariant::Primary}
                block={true}
            >
                {"Share"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    pub message: AttrValue,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="loading-text-center">
            <Spinner />
            <p class="loading-text">{props.message.clone()}</p>
        </div>
    }
}

/// Focus the commentary when a URL is already filled in, otherwise the URL
pub fn focus_share_form(url_ref: &NodeRef, commentary_ref: &NodeRef, has_url: bool) {
    let target = if has_url { commentary_ref } else { url_ref };
    if let Some(element) = target.cast::<web_sys::HtmlElement>() {
        let _ = element.focus();
    }
}
