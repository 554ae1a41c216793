//! Blocking HTTP implementation of the registry boundary.
//!
//! Deliberately thin: no retries and no backoff (transient-failure handling
//! is scoped to the registry side of the boundary), one fixed timeout, and a
//! base URL taken from `AGENTPM_REGISTRY` when set.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{AgentPmError, Result};
use crate::registry::{CollectionManifest, PackageMetadata, RegistryClient, VersionMetadata};
use crate::router::Format;

/// Default registry endpoint
pub const DEFAULT_REGISTRY: &str = "https://registry.agentpm.dev";

/// Environment variable overriding the registry endpoint
pub const REGISTRY_ENV: &str = "AGENTPM_REGISTRY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpRegistryClient {
    base_url: String,
    http: Client,
}

impl HttpRegistryClient {
    /// Build a client against `AGENTPM_REGISTRY` or the default endpoint.
    pub fn new() -> Result<Self> {
        let base_url =
            std::env::var(REGISTRY_ENV).unwrap_or_else(|_| DEFAULT_REGISTRY.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("agentpm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { base_url, http })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        self.http
            .get(url)
            .send()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn parse_json<T: serde::de::DeserializeOwned>(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T> {
        response
            .json()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url: url.to_string(),
                reason: format!("invalid response body: {e}"),
            })
    }
}

impl RegistryClient for HttpRegistryClient {
    fn package_metadata(&self, id: &str) -> Result<PackageMetadata> {
        let url = format!("{}/v1/packages/{id}", self.base_url);
        let response = self.get(&url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(AgentPmError::PackageNotFound { id: id.to_string() }),
            status if status.is_success() => Self::parse_json(&url, response),
            status => Err(AgentPmError::RegistryRequestFailed {
                url,
                reason: format!("unexpected status {status}"),
            }),
        }
    }

    fn version_metadata(&self, id: &str, version: &str) -> Result<VersionMetadata> {
        let url = format!("{}/v1/packages/{id}/versions/{version}", self.base_url);
        let response = self.get(&url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(AgentPmError::VersionNotFound {
                id: id.to_string(),
                version: version.to_string(),
            }),
            status if status.is_success() => Self::parse_json(&url, response),
            status => Err(AgentPmError::RegistryRequestFailed {
                url,
                reason: format!("unexpected status {status}"),
            }),
        }
    }

    fn download(&self, url: &str, target_format: Option<Format>) -> Result<Vec<u8>> {
        let mut request = self.http.get(url);
        if let Some(format) = target_format {
            request = request.query(&[("format", format.to_string())]);
        }
        let response = request
            .send()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(AgentPmError::RegistryRequestFailed {
                url: url.to_string(),
                reason: format!("unexpected status {}", response.status()),
            });
        }
        let bytes = response
            .bytes()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }

    fn record_download(&self, id: &str, version: &str, format: Format) -> Result<()> {
        let url = format!("{}/v1/packages/{id}/downloads", self.base_url);
        let body = serde_json::json!({
            "version": version,
            "client": concat!("agentpm/", env!("CARGO_PKG_VERSION")),
            "format": format.to_string(),
        });
        self.http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| AgentPmError::RegistryRequestFailed {
                url,
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn collection(&self, reference: &str) -> Result<CollectionManifest> {
        let slug = reference.trim_start_matches('@');
        let url = format!("{}/v1/collections/{slug}", self.base_url);
        let response = self.get(&url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(AgentPmError::CollectionNotFound {
                reference: reference.to_string(),
            }),
            status if status.is_success() => Self::parse_json(&url, response),
            status => Err(AgentPmError::RegistryRequestFailed {
                url,
                reason: format!("unexpected status {status}"),
            }),
        }
    }
}
