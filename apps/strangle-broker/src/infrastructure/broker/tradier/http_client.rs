//! HTTP client wrapper with cancellation and rate-limit hints.
//!
//! Requests are sent once. Retries belong to the caller, which sees
//! transience through `BrokerError::is_transient`.

use std::time::Instant;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::config::TradierConfig;
use super::error::TradierError;
use crate::observability::record_broker_request;

const RATE_LIMIT_AVAILABLE: &str = "x-ratelimit-available";
const RATE_LIMIT_EXPIRY: &str = "x-ratelimit-expiry";

/// HTTP client for the Tradier API.
#[derive(Debug, Clone)]
pub struct TradierHttpClient {
    client: Client,
    base_url: String,
    rate_limit_warn_threshold: u32,
}

impl TradierHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &TradierConfig) -> Result<Self, TradierError> {
        if config.access_token.trim().is_empty() {
            return Err(TradierError::MissingCredentials("access token"));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token.trim()))
            .map_err(|e| TradierError::Http(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TradierError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            rate_limit_warn_threshold: config.rate_limit_warn_threshold,
        })
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<T, TradierError> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request, path, cancel).await
    }

    /// Make a form-encoded POST request.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<T, TradierError> {
        let request = self.client.post(self.url(path)).form(form);
        self.send(request, path, cancel).await
    }

    /// Make a DELETE request.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, TradierError> {
        let request = self.client.delete(self.url(path));
        self.send(request, path, cancel).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, TradierError> {
        let endpoint = endpoint_label(path);
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TradierError::Cancelled),
            result = self.exchange(request) => result,
        };

        record_broker_request(
            &endpoint,
            &outcome_label(&result),
            started.elapsed().as_secs_f64(),
        );

        let (status, body) = match result {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Broker request failed");
                return Err(e);
            }
        };

        decode(status, &body)
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<(u16, String), TradierError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        self.check_rate_limit(response.headers());

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(TradierError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok((status.as_u16(), body))
    }

    fn check_rate_limit(&self, headers: &HeaderMap) {
        let Some(available) = headers
            .get(RATE_LIMIT_AVAILABLE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
        else {
            return;
        };

        if available < self.rate_limit_warn_threshold {
            let expiry = headers
                .get(RATE_LIMIT_EXPIRY)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            tracing::warn!(
                available,
                threshold = self.rate_limit_warn_threshold,
                expiry = %expiry,
                "Broker rate limit nearly exhausted"
            );
        }
    }
}

/// Decode a 2xx body. Tradier reports some rejections as a 2xx carrying an
/// `errors` object; those become [`TradierError::Api`].
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, TradierError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| TradierError::JsonParse(e.to_string()))?;

    if value.get("errors").is_some() {
        return Err(TradierError::Api {
            status,
            body: body.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| TradierError::JsonParse(e.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> TradierError {
    if err.is_timeout() {
        TradierError::Timeout
    } else if err.is_builder() {
        TradierError::Http(err.to_string())
    } else {
        TradierError::Network(err.to_string())
    }
}

fn outcome_label<T>(result: &Result<T, TradierError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(TradierError::Api { status, .. }) => status.to_string(),
        Err(TradierError::Timeout) => "timeout".to_string(),
        Err(TradierError::Cancelled) => "cancelled".to_string(),
        Err(_) => "transport".to_string(),
    }
}

/// Metric label for a request path, with account and order ids replaced by
/// placeholders.
pub(crate) fn endpoint_label(path: &str) -> String {
    let mut segments = Vec::new();
    let mut previous = "";
    for segment in path.split('/') {
        segments.push(match previous {
            "accounts" => "{id}",
            "orders" => "{order_id}",
            _ => segment,
        });
        previous = segment;
    }
    segments.join("/")
}
