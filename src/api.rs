//! Gateway to the remote posting API.
//!
//! Every call goes through [`ApiClient::request`], which attaches the JSON
//! content type and, when a token is supplied, the bearer authorization.
//! Failures of any kind are logged, reported to the user as one generic
//! notification, and surface to the caller as `None`.

use crate::notify::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const CONNECTION_ERROR_MESSAGE: &str = "Could not connect to the server";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid request body: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Moves one request over the wire and hands back the parsed JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    notifier: Notifier,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, notifier: Notifier) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            notifier,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        ApiRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body,
        }
    }

    /// Issues one call. `None` means the failure was already reported.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Option<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.try_request(method, endpoint, body, token).await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(method = method.as_str(), endpoint, error = %err, "API error");
                self.notifier.error(CONNECTION_ERROR_MESSAGE);
                None
            }
        }
    }

    async fn try_request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| GatewayError::Encode(err.to_string()))?;
        let request = self.build_request(method, endpoint, body, token);
        tracing::debug!(method = method.as_str(), url = %request.url, "API request");
        let value = self.transport.send(request).await?;
        serde_json::from_value(value).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Option<T> {
        self.request::<T, Value>(Method::Get, endpoint, None, token)
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Option<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Post, endpoint, Some(body), token).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Option<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Put, endpoint, Some(body), token).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> Option<T> {
        self.request::<T, Value>(Method::Delete, endpoint, None, token)
            .await
    }
}
