//! HTTP client for the tag-listing API and the image registry.
//!
//! A thin layer over reqwest. It translates transport failures and HTTP
//! status codes into [`CudexError`] and performs the OCI token handshake
//! when the registry answers with a `WWW-Authenticate` challenge.

use crate::auth::{AuthChallenge, Credentials, TokenResponse};
use crate::digest::Digest;
use crate::error::{CudexError, Result};
use crate::oci::MANIFEST_ACCEPT;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, RETRY_AFTER, WWW_AUTHENTICATE};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;


/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libcudex::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// assert_eq!(config.timeout_seconds, 60);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client shared by the tag source and the image inspector.
///
/// Cloning is cheap; clones share the connection pool and the bearer token
/// obtained from the registry's token endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://registry-1.docker.io")
    registry_url: String,
    credentials: Option<Credentials>,
    token: Arc<RwLock<Option<String>>>,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client for the registry with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::client::Client;
    ///
    /// let client = Client::new("https://registry-1.docker.io", None).unwrap();
    /// assert_eq!(client.registry_url(), "https://registry-1.docker.io");
    /// ```
    pub fn new(registry_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        Self::with_config(registry_url, credentials, ClientConfig::default())
    }

    /// Creates a new client with custom configuration.
    pub fn with_config(
        registry_url: &str,
        credentials: Option<Credentials>,
        config: ClientConfig,
    ) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(concat!("cudex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CudexError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            credentials,
            token: Arc::new(RwLock::new(None)),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(CudexError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Fetches an absolute URL and decodes its JSON body.
    ///
    /// Used for the tag-listing API, which lives outside the registry and
    /// needs no token.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        let response = Self::check_response_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| CudexError::network_with_source(format!("Failed to read {}", url), e))?;

        serde_json::from_slice(&body)
            .map_err(|e| CudexError::format_with_source(format!("Failed to decode {}", url), e))
    }

    /// Fetches the raw manifest (or index) for a tag or digest.
    pub async fn fetch_manifest(&self, repository: &str, reference: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, reference
        );

        let response = self.send_registry(&url, Some(MANIFEST_ACCEPT)).await?;

        let manifest_bytes = response
            .bytes()
            .await
            .map_err(|e| CudexError::network_with_source("Failed to read manifest response", e))?;

        Ok(manifest_bytes.to_vec())
    }

    /// Fetches a blob and verifies it against its digest.
    ///
    /// Registries usually redirect blob downloads to a CDN; reqwest follows the
    /// redirect and drops the Authorization header when the host changes.
    pub async fn fetch_blob(&self, repository: &str, digest: &Digest) -> Result<Vec<u8>> {
        let url = format!("{}/v2/{}/blobs/{}", self.registry_url, repository, digest);

        let response = self.send_registry(&url, None).await?;

        let blob_bytes = response
            .bytes()
            .await
            .map_err(|e| CudexError::network_with_source("Failed to read blob response", e))?;

        digest.verify(&blob_bytes)?;

        Ok(blob_bytes.to_vec())
    }

    /// Sends a registry GET, answering one authentication challenge if needed.
    async fn send_registry(&self, url: &str, accept: Option<&str>) -> Result<Response> {
        let response = self.send(url, accept, self.current_authorization()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_response_status(response).await;
        }

        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(AuthChallenge::parse)
            .transpose()?;

        let authorization = match challenge {
            Some(challenge) if challenge.is_bearer() => {
                let token = self.fetch_token(&challenge).await?;
                format!("Bearer {}", token)
            }
            _ => match self.credentials.as_ref().and_then(|c| c.to_header_value()) {
                Some(header) => header,
                None => return Self::check_response_status(response).await,
            },
        };

        let retry = self.send(url, accept, Some(authorization)).await?;
        Self::check_response_status(retry).await
    }

    async fn send(
        &self,
        url: &str,
        accept: Option<&str>,
        authorization: Option<String>,
    ) -> Result<Response> {
        let mut request = self.http_client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url))
    }

    /// Authorization header for the first attempt of a registry request.
    fn current_authorization(&self) -> Option<String> {
        if let Some(Credentials::Bearer { token }) = &self.credentials {
            return Some(format!("Bearer {}", token));
        }

        self.token
            .read()
            .ok()
            .and_then(|token| token.clone())
            .map(|token| format!("Bearer {}", token))
    }

    /// Exchanges a bearer challenge for a token and remembers it.
    async fn fetch_token(&self, challenge: &AuthChallenge) -> Result<String> {
        let url = challenge.token_url()?;
        debug!(realm = %challenge.realm, scope = ?challenge.scope, "requesting registry token");

        let mut request = self.http_client.get(url.clone());
        if let Some(creds @ Credentials::Basic { .. }) = &self.credentials
            && let Some(header) = creds.to_header_value()
        {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url.as_str()))?;
        let response = Self::check_response_status(response).await?;

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            CudexError::format_with_source(format!("Failed to decode token from {}", url), e)
        })?;
        let token = token_response.into_token()?;

        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.clone());
        }

        Ok(token)
    }

    /// Translates a reqwest error into a CudexError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> CudexError {
        if error.is_timeout() {
            CudexError::network(format!(
                "Request to {} timed out after {} seconds",
                url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            CudexError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_request() {
            CudexError::network_with_source(format!("Failed to send request to {}", url), error)
        } else {
            CudexError::network_with_source(format!("Network error communicating with {}", url), error)
        }
    }

    /// Checks the HTTP response status and translates errors to CudexError.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let retry_after = Self::parse_retry_after(response.headers());
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(CudexError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(CudexError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(CudexError::not_found("endpoint", url.as_str())),
            StatusCode::TOO_MANY_REQUESTS => Err(CudexError::rate_limit(
                format!("Rate limit exceeded for {}", url),
                retry_after,
            )),
            s if s.is_server_error() => Err(CudexError::server(
                format!("Server error from {}: {}", url, error_body),
                status.as_u16(),
            )),
            _ => Err(CudexError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }

    /// Reads a `Retry-After` header given in seconds.
    fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
        headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }
}
