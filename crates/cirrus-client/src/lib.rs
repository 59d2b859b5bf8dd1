//! Shared HTTP client for the Cirrus API.
//!
//! Provides a minimal client with configurable auth (Bearer token or X-API-Key),
//! generic GET/POST helpers, and the domain surfaces (storage, hosting, cloud
//! functions) built on the bulk upload pipeline. The CLI uses this client
//! directly.

pub mod archive;
pub mod cloud_functions;
pub mod hosting;
pub mod storage;
pub mod upload;

use std::time::Duration;

use cirrus_core::constants::DEFAULT_API_URL;
use cirrus_core::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// HTTP client for the Cirrus API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

/// Structured error body the platform API returns on rejection.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        Self::with_timeout(base_url, auth, Duration::from_secs(60))
    }

    /// Client with a custom request timeout. The timeout applies to every
    /// call made through this client, including the direct byte transfers
    /// to upload targets.
    pub fn with_timeout(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from environment: CIRRUS_API_URL, CIRRUS_API_KEY.
    /// Uses X-API-Key auth by default.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("CIRRUS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_key = std::env::var("CIRRUS_API_KEY")
            .map_err(|_| Error::validation("Missing API key. Set CIRRUS_API_KEY"))?;

        Self::new(base_url, Auth::XApiKey(api_key))
    }

    /// Create client from environment using Bearer token auth.
    pub fn from_env_bearer() -> Result<Self> {
        let base_url =
            std::env::var("CIRRUS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let token = std::env::var("CIRRUS_API_KEY")
            .map_err(|_| Error::validation("Missing token. Set CIRRUS_API_KEY"))?;

        Self::new(base_url, Auth::Bearer(token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// GET request. Deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request.send().await?;
        let response = ensure_success(path, response).await?;

        Ok(response.json().await?)
    }

    /// POST JSON body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));

        let response = request.send().await?;
        let response = ensure_success(path, response).await?;

        Ok(response.json().await?)
    }

    /// POST JSON body, discarding the response payload.
    pub async fn post_unit<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));

        let response = request.send().await?;
        ensure_success(path, response).await?;

        Ok(())
    }

    /// Raw client for requests outside the API, such as PUTs to upload
    /// targets. No auth headers are applied; the URL itself carries any
    /// authorization it needs.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Pass a successful response through, or turn a non-success status into
/// [`Error::RemoteApi`] with the decoded body.
pub(crate) async fn ensure_success(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(remote_api_error(endpoint, status.as_u16(), &body))
}

/// Build a [`Error::RemoteApi`] from a raw response body. Structured
/// platform errors contribute their code and message; anything else is
/// carried verbatim.
pub(crate) fn remote_api_error(endpoint: &str, status: u16, body: &str) -> Error {
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => (parsed.code, parsed.message.unwrap_or_else(|| body.to_string())),
        Err(_) => (None, body.to_string()),
    };

    Error::RemoteApi {
        status,
        endpoint: endpoint.to_string(),
        code,
        message,
    }
}

// Re-export domain types for convenient imports.
pub use cirrus_core::models::{
    Deployment, DeploymentEnvironment, DeploymentStatus, FileMetadata, FunctionJob, JobStatus,
    UploadOutcome, UploadParams, UploadedFile,
};
