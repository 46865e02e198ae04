//! Client for the remote shares API
//!
//! Response interpretation is split from the transport: `interpret_*` are
//! pure functions of (status, body) and carry all of the error mapping.
//! The transport is a bounded `fetch` through web-sys.

use crate::error::ShareError;
use crate::settings::Settings;
use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, RequestMode, Response};

pub const USER_PATH: &str = "/api/user";
pub const SHARES_PATH: &str = "/api/v1/shares";

/// Public listing of shares, and the prefix of every share's page
pub const SHARES_BASE_URL: &str = "https://nickbell.dev/shares";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body of `POST /api/v1/shares`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

impl ShareRequest {
    /// Blank commentary is left out of the request entirely
    pub fn new(url: &str, commentary: &str) -> Self {
        let commentary = commentary.trim();
        ShareRequest {
            url: url.trim().to_string(),
            commentary: (!commentary.is_empty()).then(|| commentary.to_string()),
        }
    }
}

/// Created share as far as the client cares: only `data.slug` is read, and
/// any other shape of JSON body still counts as a success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareResponse {
    pub slug: Option<String>,
}

impl ShareResponse {
    pub fn from_body(body: &Value) -> Self {
        let slug = body
            .get("data")
            .and_then(|data| data.get("slug"))
            .and_then(Value::as_str)
            .filter(|slug| !slug.is_empty())
            .map(str::to_string);

        ShareResponse { slug }
    }

    pub fn result_link(&self) -> String {
        result_link(self.slug.as_deref())
    }
}

/// Page for a created share, or the listing when no slug came back
pub fn result_link(slug: Option<&str>) -> String {
    match slug.filter(|s| !s.is_empty()) {
        Some(slug) => format!("{}/{}", SHARES_BASE_URL, slug),
        None => SHARES_BASE_URL.to_string(),
    }
}

/// Identity returned by `GET /api/user`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Map<String, Value>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Every message of a 422 body, in the order the body lists them
fn validation_messages(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    let messages: Vec<&str> = parsed
        .errors
        .values()
        .flat_map(|field| match field {
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            Value::String(message) => vec![message.as_str()],
            _ => Vec::new(),
        })
        .collect();

    Some(messages.join(", "))
}

pub fn interpret_submit(status: u16, body: &str) -> Result<ShareResponse, ShareError> {
    if is_success(status) {
        return serde_json::from_str::<Value>(body)
            .map(|value| ShareResponse::from_body(&value))
            .map_err(|e| ShareError::Network(format!("Invalid response: {}", e)));
    }

    match status {
        401 => Err(ShareError::Auth),
        422 => match validation_messages(body) {
            Some(messages) => Err(ShareError::Validation(messages)),
            None => Err(ShareError::Http(status)),
        },
        _ => Err(ShareError::Http(status)),
    }
}

pub fn interpret_identity(status: u16, body: &str) -> Result<UserIdentity, ShareError> {
    match status {
        s if is_success(s) => Ok(serde_json::from_str(body).unwrap_or_default()),
        401 => Err(ShareError::Auth),
        s => Err(ShareError::Http(s)),
    }
}

/// Authenticated client bound to one set of settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShareClient {
    settings: Settings,
    timeout: Duration,
}

impl ShareClient {
    pub fn new(settings: &Settings) -> Self {
        Self::with_timeout(settings, REQUEST_TIMEOUT)
    }

    /// Same client with a different per-request deadline
    pub fn with_timeout(settings: &Settings, timeout: Duration) -> Self {
        ShareClient {
            settings: settings.normalized(),
            timeout,
        }
    }

    /// Check the URL and token against the identity endpoint
    pub async fn test_connection(&self) -> Result<UserIdentity, ShareError> {
        let (status, body) = self.send("GET", USER_PATH, None).await?;
        log::debug!("GET {} -> {}", USER_PATH, status);
        interpret_identity(status, &body)
    }

    pub async fn submit_share(&self, request: &ShareRequest) -> Result<ShareResponse, ShareError> {
        let body = serde_json::to_string(request)
            .map_err(|e| ShareError::Network(format!("Failed to serialize: {}", e)))?;

        let (status, body) = self.send("POST", SHARES_PATH, Some(body)).await?;
        log::debug!("POST {} -> {}", SHARES_PATH, status);
        interpret_submit(status, &body)
    }

    /// Fetch with a deadline; on timeout the request is aborted
    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<(u16, String), ShareError> {
        let abort = AbortController::new().map_err(js_error)?;
        let request = self.build_request(method, path, body, &abort)?;

        let fetch = Box::pin(fetch_text(request));
        let deadline = TimeoutFuture::new(self.timeout.as_millis() as u32);

        match select(fetch, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                abort.abort();
                log::warn!("{} {} timed out after {:?}", method, path, self.timeout);
                Err(ShareError::Network("Request timed out".to_string()))
            }
        }
    }

    fn build_request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        abort: &AbortController,
    ) -> Result<Request, ShareError> {
        let headers = Headers::new().map_err(js_error)?;
        headers.set("Accept", "application/json").map_err(js_error)?;
        headers
            .set("Authorization", &format!("Bearer {}", self.settings.api_token))
            .map_err(js_error)?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_signal(Some(&abort.signal()));

        if let Some(body) = body {
            headers.set("Content-Type", "application/json").map_err(js_error)?;
            opts.set_body(&body.into());
        }
        opts.set_headers(&headers);

        Request::new_with_str_and_init(&self.settings.endpoint(path), &opts).map_err(js_error)
    }
}

async fn fetch_text(request: Request) -> Result<(u16, String), ShareError> {
    let window = web_sys::window().ok_or_else(|| ShareError::Network("no window".to_string()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| ShareError::Network("response is not a Response".to_string()))?;

    // An unreadable error body must not mask the status
    let text = match resp.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    Ok((resp.status(), text))
}

/// Turn a rejected JS promise into a network error carrying its message
fn js_error(err: wasm_bindgen::JsValue) -> ShareError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ShareError::Network(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_request_omits_blank_commentary() {
        let request = ShareRequest::new("https://example.com", "   ");
        assert_eq!(request.commentary, None);

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"url":"https://example.com"}"#);
    }

    #[test]
    fn test_share_request_with_commentary() {
        let request = ShareRequest::new(" https://example.com ", " worth a read ");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"url":"https://example.com","commentary":"worth a read"}"#);
    }

    #[test]
    fn test_submit_success() {
        let body = r#"{"data":{"slug":"abc123","url":"https://example.com","id":7}}"#;
        let response = interpret_submit(201, body).unwrap();

        assert_eq!(response.slug.as_deref(), Some("abc123"));
        assert_eq!(response.result_link(), "https://nickbell.dev/shares/abc123");
    }

    #[test]
    fn test_submit_success_without_slug() {
        let response = interpret_submit(200, r#"{"data":{}}"#).unwrap();
        assert_eq!(response.result_link(), "https://nickbell.dev/shares");
        assert_eq!(result_link(Some("")), "https://nickbell.dev/shares");
    }

    #[test]
    fn test_submit_success_with_unexpected_json_shape() {
        let bodies = [
            "{}",
            r#"{"data":null}"#,
            r#"{"data":[]}"#,
            r#"{"data":{"slug":null}}"#,
            r#"{"data":{"slug":123}}"#,
            r#"{"data":{"slug":""}}"#,
            "[]",
            "null",
            r#""created""#,
        ];

        for body in bodies {
            let response = interpret_submit(201, body).unwrap();
            assert_eq!(response, ShareResponse::default(), "body {}", body);
            assert_eq!(response.result_link(), "https://nickbell.dev/shares");
        }
    }

    #[test]
    fn test_client_timeout() {
        let settings = Settings::new("https://api.example.com/", "tok");
        assert_eq!(ShareClient::new(&settings).timeout, REQUEST_TIMEOUT);

        let client = ShareClient::with_timeout(&settings, Duration::from_millis(50));
        assert_eq!(client.timeout, Duration::from_millis(50));
        assert_eq!(client.settings.api_url, "https://api.example.com");
    }

    #[test]
    fn test_submit_success_with_garbage_body() {
        let err = interpret_submit(200, "<html>").unwrap_err();
        assert!(matches!(err, ShareError::Network(_)));
    }

    #[test]
    fn test_submit_unauthorized() {
        let err = interpret_submit(401, r#"{"message":"Unauthenticated."}"#).unwrap_err();
        assert_eq!(err, ShareError::Auth);
        assert_eq!(err.to_string(), "Invalid API token. Check your settings.");
    }

    #[test]
    fn test_submit_validation_errors_joined_in_body_order() {
        let body = r#"{"errors":{"url":["must be a valid URL"],"commentary":["too long"]}}"#;
        let err = interpret_submit(422, body).unwrap_err();
        assert_eq!(err.to_string(), "must be a valid URL, too long");
    }

    #[test]
    fn test_submit_validation_order_not_sorted() {
        let body = r#"{"errors":{"url":["b first","b second"],"commentary":["a third"]}}"#;
        let err = interpret_submit(422, body).unwrap_err();
        assert_eq!(err, ShareError::Validation("b first, b second, a third".to_string()));
    }

    #[test]
    fn test_submit_422_without_error_map() {
        assert_eq!(interpret_submit(422, "not json").unwrap_err(), ShareError::Http(422));
        assert_eq!(interpret_submit(422, r#"{"message":"x"}"#).unwrap_err(), ShareError::Http(422));
        assert_eq!(interpret_submit(422, "").unwrap_err(), ShareError::Http(422));
    }

    #[test]
    fn test_submit_other_status() {
        assert_eq!(interpret_submit(500, "").unwrap_err(), ShareError::Http(500));
        assert_eq!(interpret_submit(404, "{}").unwrap_err().to_string(), "Request failed (404)");
    }

    #[test]
    fn test_identity() {
        let identity =
            interpret_identity(200, r#"{"name":"Nick","email":"nick@example.com"}"#).unwrap();
        assert_eq!(identity.name.as_deref(), Some("Nick"));
        assert_eq!(identity.email.as_deref(), Some("nick@example.com"));

        assert_eq!(interpret_identity(204, "").unwrap(), UserIdentity::default());
        assert_eq!(interpret_identity(401, "").unwrap_err(), ShareError::Auth);
        assert_eq!(interpret_identity(503, "").unwrap_err(), ShareError::Http(503));
    }
}
