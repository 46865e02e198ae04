/// Share workflow state machine shared by the popup and the PWA
///
/// Every screen change goes through [`Controller::apply`]. Surfaces render
/// with a single `match` on [`Controller::screen`], so exactly one screen is
/// ever visible.
use crate::api::{ShareRequest, ShareResponse, UserIdentity};
use crate::error::ShareError;
use crate::settings::Settings;
use crate::share_target::is_valid_url;
use crate::source::{SourceType, detect_source_type};
use std::rc::Rc;
use yew::Reducible;

pub const MSG_SETTINGS_REQUIRED: &str = "Both fields are required.";
pub const MSG_URL_REQUIRED: &str = "URL is required.";
pub const MSG_URL_INVALID: &str = "Enter a valid URL (starting with http:// or https://).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Settings missing or being edited ("configure" in the popup)
    Setup,
    Share,
    Loading,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Settings loaded and the initial URL known
    Start { settings: Settings, initial_url: String },
    SaveStarted,
    SaveRejected(String),
    SaveFinished(Result<Settings, ShareError>),
    OpenSettings,
    SetUrl(String),
    SetCommentary(String),
    SubmitStarted,
    SubmitRejected(String),
    SubmitFinished(Result<ShareResponse, ShareError>),
    ShareAnother,
}

/// Why a submission was not sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A submission is already in flight
    Busy,
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub screen: Screen,
    pub settings: Settings,
    pub url: String,
    pub commentary: String,
    pub source: SourceType,
    pub error: Option<String>,
    pub result_link: Option<String>,
    /// A connection test or submission is running
    pub in_flight: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Controller {
            screen: Screen::Setup,
            settings: Settings::default(),
            url: String::new(),
            commentary: String::new(),
            source: SourceType::Webpage,
            error: None,
            result_link: None,
            in_flight: false,
        }
    }
}

impl Controller {
    pub fn start(settings: Settings, initial_url: &str) -> Self {
        let mut controller = Controller::default();
        controller.apply(Action::Start {
            settings,
            initial_url: initial_url.to_string(),
        });
        controller
    }

    /// Validate setup form input before testing the connection
    pub fn prepare_save(&self, api_url: &str, api_token: &str) -> Result<Settings, SubmitBlocked> {
        if self.in_flight {
            return Err(SubmitBlocked::Busy);
        }

        let settings = Settings::new(api_url, api_token);
        if settings.is_complete() {
            Ok(settings)
        } else {
            Err(SubmitBlocked::Invalid(MSG_SETTINGS_REQUIRED))
        }
    }

    /// Validate the share form; only an `Ok` may reach the network
    pub fn prepare_submit(&self) -> Result<ShareRequest, SubmitBlocked> {
        if self.in_flight || self.screen != Screen::Share {
            return Err(SubmitBlocked::Busy);
        }

        let url = self.url.trim();
        if url.is_empty() {
            return Err(SubmitBlocked::Invalid(MSG_URL_REQUIRED));
        }
        if !is_valid_url(url) {
            return Err(SubmitBlocked::Invalid(MSG_URL_INVALID));
        }

        Ok(ShareRequest::new(url, &self.commentary))
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Start {
                settings,
                initial_url,
            } => {
                self.settings = settings;
                self.set_url(initial_url);
                self.error = None;
                self.screen = if self.settings.is_complete() {
                    Screen::Share
                } else {
                    Screen::Setup
                };
            }
            Action::SaveStarted => {
                self.error = None;
                self.in_flight = true;
            }
            Action::SaveRejected(message) => {
                self.error = Some(message);
            }
            Action::SaveFinished(Ok(settings)) => {
                self.in_flight = false;
                self.settings = settings;
                self.error = None;
                self.screen = Screen::Share;
            }
            Action::SaveFinished(Err(err)) => {
                self.in_flight = false;
                self.error = Some(err.connection_message());
                self.screen = Screen::Setup;
            }
            Action::OpenSettings => {
                if !self.in_flight {
                    self.error = None;
                    self.screen = Screen::Setup;
                }
            }
            Action::SetUrl(url) => self.set_url(url),
            Action::SetCommentary(commentary) => self.commentary = commentary,
            Action::SubmitStarted => {
                self.error = None;
                self.in_flight = true;
                self.screen = Screen::Loading;
            }
            Action::SubmitRejected(message) => {
                self.error = Some(message);
            }
            Action::SubmitFinished(Ok(response)) => {
                self.in_flight = false;
                self.result_link = Some(response.result_link());
                self.screen = Screen::Success;
            }
            Action::SubmitFinished(Err(err)) => {
                self.in_flight = false;
                self.error = Some(err.to_string());
                self.screen = Screen::Share;
            }
            Action::ShareAnother => {
                self.set_url(String::new());
                self.commentary.clear();
                self.error = None;
                self.result_link = None;
                self.screen = Screen::Share;
            }
        }
    }

    fn set_url(&mut self, url: String) {
        self.source = detect_source_type(&url);
        self.url = url;
    }
}

impl Reducible for Controller {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let from = self.screen;
        let mut next = (*self).clone();
        next.apply(action);

        if next.screen != from {
            log::debug!("screen {:?} -> {:?}", from, next.screen);
        }
        Rc::new(next)
    }
}

/// Status line on the extension options page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsStatus {
    Hidden,
    Success(String),
    Error(String),
}

pub fn options_save_check(api_url: &str, api_token: &str) -> Result<Settings, OptionsStatus> {
    let settings = Settings::new(api_url, api_token);

    if settings.api_url.is_empty() {
        return Err(OptionsStatus::Error("API URL is required.".to_string()));
    }
    if settings.api_token.is_empty() {
        return Err(OptionsStatus::Error("API Token is required.".to_string()));
    }
    Ok(settings)
}

pub fn options_test_check(api_url: &str, api_token: &str) -> Result<Settings, OptionsStatus> {
    let settings = Settings::new(api_url, api_token);

    if settings.is_complete() {
        Ok(settings)
    } else {
        Err(OptionsStatus::Error("Fill in both fields first.".to_string()))
    }
}

pub fn options_test_status(result: &Result<UserIdentity, ShareError>) -> OptionsStatus {
    match result {
        Ok(identity) => OptionsStatus::Success(format!(
            "Connected as {} ({})",
            identity.name.as_deref().unwrap_or("unknown"),
            identity.email.as_deref().unwrap_or("no email")
        )),
        Err(ShareError::Auth) => OptionsStatus::Error(
            "Invalid token. Generate a new one with the artisan command.".to_string(),
        ),
        Err(err) => OptionsStatus::Error(err.connection_message()),
    }
}
