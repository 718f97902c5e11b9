//! Last-resort acquisition through a relay that answers with a callback
//! invocation, `callback_name({"contents": "<html>..."})`.
//!
//! Each attempt registers a uniquely named callback in a [`CallbackRegistry`],
//! dispatches the request on a background task and waits for the callback to
//! fire or for the deadline to pass. A failed request completes its own
//! registration with the underlying error. The registration and the in-flight
//! request are released on every exit path by guards.

use super::relay::URL_PLACEHOLDER;
use super::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use uuid::Uuid;

pub const CALLBACK_PLACEHOLDER: &str = "{callback}";
pub const DEFAULT_JSONP_ENDPOINT: &str = "https://api.allorigins.win/get?url={url}&callback={callback}";
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

const CALLBACK_PREFIX: &str = "recipe_scraper_cb_";

/// What a pending callback is completed with
pub type CallbackOutcome = Result<String, FetchError>;

/// Pending callbacks keyed by their generated name
#[derive(Default)]
pub struct CallbackRegistry {
    pending: Mutex<HashMap<String, oneshot::Sender<CallbackOutcome>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, oneshot::Sender<CallbackOutcome>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a fresh callback. The returned guard unregisters it on drop.
    pub fn register(&self) -> (Registration<'_>, oneshot::Receiver<CallbackOutcome>) {
        let name = format!("{CALLBACK_PREFIX}{}", Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        self.lock().insert(name.clone(), tx);
        (
            Registration {
                registry: self,
                name,
            },
            rx,
        )
    }

    /// Completes the callback called `name`. Returns `false` if no such
    /// callback is waiting.
    pub fn fire(&self, name: &str, outcome: CallbackOutcome) -> bool {
        match self.lock().remove(name) {
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                debug!("No pending callback named '{}'", name);
                false
            }
        }
    }

    /// Drops the callback called `name` without invoking it, waking its
    /// waiter with an error.
    pub fn cancel(&self, name: &str) {
        self.lock().remove(name);
    }

    /// Number of callbacks still waiting to fire
    pub fn pending(&self) -> usize {
        self.lock().len()
    }
}

/// Keeps a callback registered for as long as it is alive
pub struct Registration<'a> {
    registry: &'a CallbackRegistry,
    name: String,
}

impl Registration<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.cancel(&self.name);
    }
}

/// Aborts the dispatched request task when dropped
struct InjectedRequest(JoinHandle<()>);

impl Drop for InjectedRequest {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Debug, Deserialize)]
struct CallbackPayload {
    contents: Option<String>,
}

/// Splits `name({...});` into the callback name and its JSON argument
pub fn parse_callback_body(body: &str) -> Result<(&str, &str), FetchError> {
    let body = body.trim().trim_end_matches(';').trim_end();
    let (name, rest) = body
        .split_once('(')
        .ok_or_else(|| FetchError::MalformedCallback("missing '('".to_string()))?;
    let argument = rest
        .strip_suffix(')')
        .ok_or_else(|| FetchError::MalformedCallback("missing ')'".to_string()))?;

    let name = name.trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
    {
        return Err(FetchError::MalformedCallback(format!(
            "invalid callback name '{name}'"
        )));
    }

    Ok((name, argument.trim()))
}

/// Fetches the page through a callback-style relay
pub struct JsonpFetcher {
    endpoint: String,
    client: Client,
    registry: Arc<CallbackRegistry>,
    timeout: Duration,
}

impl JsonpFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        client: Client,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let endpoint = endpoint.into();
        if !endpoint.contains(URL_PLACEHOLDER) || !endpoint.contains(CALLBACK_PLACEHOLDER) {
            return Err(FetchError::InvalidTemplate(endpoint));
        }
        Ok(Self {
            endpoint,
            client,
            registry: Arc::new(CallbackRegistry::new()),
            timeout,
        })
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    fn request_url(&self, target: &str, callback: &str) -> String {
        self.endpoint
            .replace(URL_PLACEHOLDER, &urlencoding::encode(target))
            .replace(CALLBACK_PLACEHOLDER, callback)
    }

    fn inject(&self, request_url: String, callback: String) -> InjectedRequest {
        let client = self.client.clone();
        let registry = Arc::clone(&self.registry);

        InjectedRequest(tokio::spawn(async move {
            let outcome = deliver(&client, &request_url, &callback).await;
            if let Err(e) = &outcome {
                warn!("Callback request for '{}' failed: {}", callback, e);
            }
            registry.fire(&callback, outcome);
        }))
    }
}

/// Performs the request dispatched for `callback` and unwraps the page it
/// carries. A response invoking any other callback is rejected.
async fn deliver(client: &Client, request_url: &str, callback: &str) -> CallbackOutcome {
    let body = super::request::get_text(client, request_url).await?;
    let (name, argument) = parse_callback_body(&body)?;
    if name != callback {
        return Err(FetchError::MalformedCallback(format!(
            "response invoked '{name}' instead of '{callback}'"
        )));
    }

    let payload: CallbackPayload = serde_json::from_str(argument)
        .map_err(|e| FetchError::MalformedCallback(e.to_string()))?;
    payload
        .contents
        .ok_or_else(|| FetchError::MalformedCallback("no contents".to_string()))
}

#[async_trait]
impl Fetcher for JsonpFetcher {
    fn name(&self) -> &str {
        "jsonp"
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let (registration, callback_fired) = self.registry.register();
        let callback = registration.name().to_string();
        debug!("Registered callback '{}' for {}", callback, url);

        let _request = self.inject(self.request_url(url, &callback), callback.clone());

        match timeout(self.timeout, callback_fired).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(FetchError::CallbackAbsent(callback)),
            Err(_) => Err(FetchError::CallbackTimeout {
                callback,
                timeout: self.timeout,
            }),
        }
    }
}
