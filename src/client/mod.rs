pub mod config;
pub mod env;
pub mod factory;
pub mod token;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

use crate::types::channel::{
    Channel, ConnectChannelRequest, ShopifyConnectRequest, ShopifyConnectResponse,
};
use crate::types::finance::{AnalyticsOverview, FinanceOverview};
use crate::types::inventory::InventoryItem;
use crate::types::order::{BulkActionRequest, BulkActionResult, LabelResponse, Order, OrderStatus};
use crate::types::request::Query;
use crate::types::settlement::Settlement;
use crate::types::user::{LoginRequest, TokenResponse, User};
use crate::types::webhook::Webhook;
use crate::types::worker::SyncJob;

use self::config::Deployment;
use self::env::Environment;
use self::token::resolve_token;

#[derive(Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
    env: Arc<dyn Environment>,
    deployment: Deployment,
}

#[derive(Error, Debug)]
pub enum RequestError {
    /// Transport-level failure, the host is unreachable or the connection
    /// dropped mid-request.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. The message is whatever the server said, or a
    /// synthesized fallback when it said nothing useful.
    #[error("{message}")]
    Status { code: u16, message: String },

    #[error("Invalid JSON response")]
    InvalidJson,

    #[error("Authentication required. Please login again.")]
    AuthRequired,

    #[error("Client error: {0}")]
    Client(String),
}

impl RequestError {
    /// Whether another attempt could plausibly succeed. Only transport
    /// failures and 5xx responses qualify; client errors are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            RequestError::Network(_) => true,
            RequestError::Status { code, .. } => *code >= 500,
            _ => false,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, RequestError::AuthRequired)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::Status { code, .. } if *code == 404)
    }
}

impl Client {
    /// Extra attempts after the first failure, so 3 attempts in total.
    pub const RETRY_ATTEMPTS: usize = 2;
    /// Fixed pause between attempts. No backoff, no jitter.
    pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(url: &str, env: Arc<dyn Environment>, deployment: Deployment) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }
        if parsed.path() != "/" {
            bail!(
                "invalid server url, path should be '/', not '{}'",
                parsed.path()
            );
        }

        Ok(Client {
            url: url.to_string(),
            client: reqwest::Client::new(),
            env,
            deployment,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Unauthenticated request with bounded retry. Transport failures and
    /// 5xx responses get up to [`Self::RETRY_ATTEMPTS`] extra attempts with
    /// a fixed [`Self::RETRY_DELAY`] pause; everything else is terminal on
    /// the first failure.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, HeaderMap::new())
            .await
    }

    /// Authenticated request. The bearer token is resolved fresh on every
    /// call; with no credential anywhere this fails before any network
    /// traffic and points the user at login.
    pub async fn auth_request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        self.auth_request_with_headers(method, path, body, &[])
            .await
    }

    /// Same as [`Self::auth_request`], with extra headers. Caller headers
    /// override the defaults on conflict.
    pub async fn auth_request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let token = match resolve_token(self.env.as_ref()) {
            Some(token) => token,
            None => {
                self.env.navigate_login();
                return Err(RequestError::AuthRequired);
            }
        };

        let mut merged = HeaderMap::new();
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        merged.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let auth = match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => value,
            Err(_) => {
                return Err(RequestError::Client(String::from(
                    "stored token contains characters not allowed in a header",
                )))
            }
        };
        merged.insert(AUTHORIZATION, auth);

        for (name, value) in headers {
            let header_name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(header_name) => header_name,
                Err(_) => {
                    return Err(RequestError::Client(format!("invalid header name '{name}'")))
                }
            };
            let header_value = match HeaderValue::from_str(value) {
                Ok(header_value) => header_value,
                Err(_) => {
                    return Err(RequestError::Client(format!(
                        "invalid header value for '{name}'"
                    )))
                }
            };
            merged.insert(header_name, header_value);
        }

        self.request_with_headers(method, path, body, merged).await
    }

    async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: HeaderMap,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self
                .execute(method.clone(), path, body.as_ref(), headers.clone())
                .await
            {
                Ok(value) => {
                    return match serde_json::from_value(value) {
                        Ok(data) => Ok(data),
                        Err(_) => Err(RequestError::InvalidJson),
                    };
                }
                Err(err) if err.is_retryable() && attempt < Self::RETRY_ATTEMPTS => {
                    attempt += 1;
                    debug!("Request {method} {path} failed: {err}, retry attempt {attempt}");
                    sleep(Self::RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt on the wire, resolving to the parsed JSON body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value, RequestError> {
        let url = format!("{}/{}", self.url, path.trim_start_matches('/'));
        let mut req = self.client.request(method, &url);
        if !headers.is_empty() {
            req = req.headers(headers);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => return Err(self.network_error(err)),
        };

        let status = resp.status();
        // Read the body as text first, empty bodies are legal.
        let text = match resp.text().await {
            Ok(text) => text,
            Err(err) => return Err(self.network_error(err)),
        };

        if !status.is_success() {
            return Err(RequestError::Status {
                code: status.as_u16(),
                message: extract_message(status.as_u16(), &text),
            });
        }

        if text.trim().is_empty() {
            // Callers must not crash on an absent payload.
            return Ok(Value::Object(serde_json::Map::new()));
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) => Err(RequestError::InvalidJson),
        }
    }

    fn network_error(&self, err: reqwest::Error) -> RequestError {
        let mut message = err.to_string();
        if self.deployment != Deployment::Local && self.url_looks_local() {
            message.push_str(
                ", the server url looks like a local placeholder, check the client config",
            );
        }
        RequestError::Network(message)
    }

    fn url_looks_local(&self) -> bool {
        self.url.contains("127.0.0.1") || self.url.contains("localhost")
    }

    fn list_path(base: &str, query: &Query) -> String {
        let qs = query.to_query_string();
        if qs.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{qs}")
        }
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, RequestError> {
        let body = serde_json::to_value(req).unwrap();
        self.request(Method::POST, "auth/login", Some(body)).await
    }

    pub async fn me(&self) -> Result<User, RequestError> {
        self.auth_request(Method::GET, "auth/me", None).await
    }

    pub async fn list_orders(&self, query: &Query) -> Result<Vec<Order>, RequestError> {
        let path = Self::list_path("orders", query);
        self.auth_request(Method::GET, &path, None).await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, RequestError> {
        self.auth_request(Method::GET, &format!("orders/{id}"), None)
            .await
    }

    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, RequestError> {
        let body = serde_json::json!({ "status": status });
        self.auth_request(Method::PATCH, &format!("orders/{id}"), Some(body))
            .await
    }

    pub async fn bulk_order_action(
        &self,
        req: &BulkActionRequest,
    ) -> Result<BulkActionResult, RequestError> {
        let body = serde_json::to_value(req).unwrap();
        self.auth_request(Method::POST, "orders/bulk", Some(body))
            .await
    }

    pub async fn order_label(&self, id: &str) -> Result<LabelResponse, RequestError> {
        self.auth_request(Method::POST, &format!("orders/{id}/label"), None)
            .await
    }

    pub async fn list_inventory(&self, query: &Query) -> Result<Vec<InventoryItem>, RequestError> {
        let path = Self::list_path("inventory", query);
        self.auth_request(Method::GET, &path, None).await
    }

    pub async fn list_settlements(&self, query: &Query) -> Result<Vec<Settlement>, RequestError> {
        let path = Self::list_path("settlements", query);
        self.auth_request(Method::GET, &path, None).await
    }

    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, RequestError> {
        self.auth_request(Method::GET, "webhooks", None).await
    }

    pub async fn list_sync_jobs(&self) -> Result<Vec<SyncJob>, RequestError> {
        self.auth_request(Method::GET, "workers", None).await
    }

    pub async fn finance_overview(&self) -> Result<FinanceOverview, RequestError> {
        self.auth_request(Method::GET, "finance/overview", None)
            .await
    }

    pub async fn analytics_overview(&self) -> Result<AnalyticsOverview, RequestError> {
        self.auth_request(Method::GET, "analytics/overview", None)
            .await
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>, RequestError> {
        self.auth_request(Method::GET, "integrations/channels", None)
            .await
    }

    pub async fn connect_channel(
        &self,
        req: &ConnectChannelRequest,
    ) -> Result<Channel, RequestError> {
        let body = serde_json::to_value(req).unwrap();
        self.auth_request(Method::POST, "integrations/channels", Some(body))
            .await
    }

    pub async fn connect_shopify(
        &self,
        req: &ShopifyConnectRequest,
    ) -> Result<ShopifyConnectResponse, RequestError> {
        let body = serde_json::to_value(req).unwrap();
        self.auth_request(Method::POST, "integrations/shopify/connect", Some(body))
            .await
    }

    pub async fn disconnect_channel(&self, id: &str) -> Result<(), RequestError> {
        self.auth_request::<Value>(Method::DELETE, &format!("integrations/channels/{id}"), None)
            .await
            .map(|_| ())
    }
}

/// Extract a human-readable message from a failure body. Prefers the
/// `detail`, `error`, then `message` fields when the body is JSON,
/// stringifying non-string values; falls back to the raw text; when even
/// that is empty, synthesizes "Request failed with status <code>".
fn extract_message(code: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["detail", "error", "message"] {
            match value.get(field) {
                Some(Value::Null) | None => continue,
                Some(Value::String(message)) => {
                    if message.is_empty() {
                        continue;
                    }
                    return message.clone();
                }
                Some(other) => return other.to_string(),
            }
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    format!("Request failed with status {code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::client::env::MemoryEnvironment;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(400, r#"{"detail": "Order not editable"}"#),
            "Order not editable"
        );
        // detail wins over error and message
        assert_eq!(
            extract_message(400, r#"{"message": "c", "error": "b", "detail": "a"}"#),
            "a"
        );
        assert_eq!(extract_message(400, r#"{"error": "Bad request"}"#), "Bad request");
        assert_eq!(extract_message(400, r#"{"message": "Nope"}"#), "Nope");
        // Non-string values are stringified
        assert_eq!(
            extract_message(422, r#"{"detail": [{"loc": "status"}]}"#),
            r#"[{"loc":"status"}]"#
        );
        // Null and empty fields fall through to the next candidate
        assert_eq!(
            extract_message(400, r#"{"detail": null, "error": "", "message": "used"}"#),
            "used"
        );
        // Unparseable body: raw text
        assert_eq!(extract_message(500, "upstream exploded"), "upstream exploded");
        // Nothing at all: synthesized
        assert_eq!(extract_message(502, ""), "Request failed with status 502");
        assert_eq!(extract_message(502, "  \n"), "Request failed with status 502");
        // JSON body without any known field: raw text
        assert_eq!(extract_message(500, r#"{"code": 13}"#), r#"{"code": 13}"#);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RequestError::AuthRequired.to_string(),
            "Authentication required. Please login again."
        );
        assert_eq!(RequestError::InvalidJson.to_string(), "Invalid JSON response");
        let err = RequestError::Status {
            code: 502,
            message: extract_message(502, ""),
        };
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_retry_classification() {
        assert!(RequestError::Network(String::from("connection refused")).is_retryable());
        assert!(RequestError::Status {
            code: 500,
            message: String::new()
        }
        .is_retryable());
        assert!(RequestError::Status {
            code: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!RequestError::Status {
            code: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!RequestError::Status {
            code: 401,
            message: String::new()
        }
        .is_retryable());
        assert!(!RequestError::InvalidJson.is_retryable());
        assert!(!RequestError::AuthRequired.is_retryable());
    }

    #[test]
    fn test_new_validates_url() {
        let env = || Arc::new(MemoryEnvironment::new()) as Arc<dyn Environment>;

        assert!(Client::new("http://127.0.0.1:8800", env(), Deployment::Local).is_ok());
        // Trailing slash is normalized away
        let client = Client::new("http://127.0.0.1:8800/", env(), Deployment::Local).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8800");

        assert!(Client::new("not a url", env(), Deployment::Local).is_err());
        assert!(Client::new("ftp://example.com", env(), Deployment::Local).is_err());
        assert!(Client::new("http://example.com/api", env(), Deployment::Local).is_err());
    }

    #[test]
    fn test_list_path() {
        assert_eq!(Client::list_path("orders", &Query::default()), "orders");
        let query = Query {
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(Client::list_path("orders", &query), "orders?limit=5");
    }
}
