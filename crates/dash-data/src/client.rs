//! Backend fetch client.

use crate::envelope::ApiEnvelope;
use crate::timeout::TimeoutConfig;
use crate::FetchError;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// HTTP client bound to one backend.
///
/// Paths are appended to the base URL; every response is decoded as an
/// [`ApiEnvelope`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl FetchClient {
    /// Create a client for `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: TimeoutConfig) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, FetchError> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    /// POST `body` to `path`.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    /// PUT `body` to `path`.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiEnvelope<T>, FetchError> {
        self.send::<T, ()>(Method::DELETE, path, None).await
    }

    /// Send a request and decode the envelope.
    ///
    /// A non-2xx status whose body is still an envelope is reported through
    /// the envelope, so the backend's result code is kept.
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, %url, status = status.as_u16(), bytes = bytes.len(), "backend response");

        match ApiEnvelope::from_slice(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => {
                warn!(%method, %url, status = status.as_u16(), "backend error without envelope");
                Err(FetchError::HttpError {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&bytes).chars().take(200).collect(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_base_url() {
        let result = FetchClient::new("api.example.com", TimeoutConfig::default());
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_joining() {
        let client = FetchClient::new("http://localhost:8080/", TimeoutConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/get-cart"), "http://localhost:8080/api/get-cart");
        assert_eq!(client.url("api/get-cart"), "http://localhost:8080/api/get-cart");
    }
}
