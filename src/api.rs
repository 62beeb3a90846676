//! JSON request pipeline shared by every feature.
//!
//! Each call shows the busy overlay, talks to the backend, parses the
//! `{ success, message?, ... }` envelope and hides the overlay again on every
//! exit path. Logical failures and transport failures both end in an error
//! toast and a `None` return, so callers only ever branch on "did I get an
//! envelope back".

use std::future::Future;

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;
use yew::Callback;

use crate::toast::ToastLevel;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Standard response shape of the dashboard API. Endpoint-specific fields
/// stay available through [`Envelope::field`].
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Envelope {
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// Deserialize one endpoint-specific field, e.g. the `categories` list.
    pub fn parse_field<T>(&self, name: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self.extra.get(name)?.clone();
        serde_json::from_value(value).ok()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (unreachable, CORS, aborted).
    #[error("{0}")]
    Transport(String),
    /// Response arrived but was not a valid envelope.
    #[error("{0}")]
    Decode(String),
}

/// Cloneable client wired to the busy overlay and the toast stack at
/// construction time. Provided via context by the app shell.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    busy: Callback<bool>,
    notify: Callback<(ToastLevel, String)>,
}

impl ApiClient {
    pub fn new(busy: Callback<bool>, notify: Callback<(ToastLevel, String)>) -> Self {
        Self { busy, notify }
    }

    pub async fn get(&self, endpoint: &str) -> Option<Envelope> {
        self.execute(Method::Get, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, payload: serde_json::Value) -> Option<Envelope> {
        self.execute(Method::Post, endpoint, Some(payload)).await
    }

    pub async fn put(&self, endpoint: &str, payload: serde_json::Value) -> Option<Envelope> {
        self.execute(Method::Put, endpoint, Some(payload)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Option<Envelope> {
        self.execute(Method::Delete, endpoint, None).await
    }

    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<serde_json::Value>,
    ) -> Option<Envelope> {
        self.run(fetch_envelope(method, endpoint, payload)).await
    }

    /// Busy on, await the call, settle. The overlay is released exactly once
    /// per call no matter how the future resolves.
    async fn run<F>(&self, call: F) -> Option<Envelope>
    where
        F: Future<Output = Result<Envelope, ApiError>>,
    {
        self.busy.emit(true);
        let outcome = call.await;
        self.settle(outcome)
    }

    fn settle(&self, outcome: Result<Envelope, ApiError>) -> Option<Envelope> {
        self.busy.emit(false);
        match outcome {
            Ok(envelope) if envelope.success => {
                if let Some(message) = &envelope.message {
                    self.notify.emit((ToastLevel::Success, message.clone()));
                }
                Some(envelope)
            }
            Ok(envelope) => {
                let message = envelope.message.unwrap_or_else(|| "Error".to_string());
                self.notify.emit((ToastLevel::Error, message));
                None
            }
            Err(err) => {
                self.notify
                    .emit((ToastLevel::Error, format!("Network error: {err}")));
                None
            }
        }
    }
}

async fn fetch_envelope(
    method: Method,
    endpoint: &str,
    payload: Option<serde_json::Value>,
) -> Result<Envelope, ApiError> {
    let builder = match method {
        Method::Get => Request::get(endpoint),
        Method::Post => Request::post(endpoint),
        Method::Put => Request::put(endpoint),
        Method::Delete => Request::delete(endpoint),
    };

    // A JSON body also sets the `Content-Type: application/json` header.
    let request = match payload {
        Some(body) if method != Method::Get => builder
            .json(&body)
            .map_err(|e| ApiError::Transport(e.to_string()))?,
        _ => builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?,
    };

    let response = request.send().await.map_err(|e| {
        gloo_console::error!(format!("{method:?} {endpoint} failed: {e}"));
        ApiError::Transport(e.to_string())
    })?;

    response
        .json::<Envelope>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
