//! REST client module.
//!
//! Thin JSON wrapper over `reqwest` used by every store. Each call carries the configured
//! timeout; there is no automatic retry.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::errors::{server_message, AppError};

/// Shared HTTP client pointed at the backend's base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config.api_url.clone(), config.api_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for a resource path such as `/events/abc`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        self.decode(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        self.decode(response).await
    }

    /// PATCH a partial JSON body and decode the JSON response.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PATCH, path).json(body))
            .await?;
        self.decode(response).await
    }

    /// DELETE `path`; any success status counts as confirmation.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        self.client.request(method, self.url(path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body);
        tracing::warn!("Backend returned {}: {:?}", status, message);

        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, AppError> {
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            tracing::warn!("Request timed out after {:?}", self.timeout);
            AppError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}
