//! Geolocation lookup — resolves a visitor's remote address to a coarse
//! city/country pair.
//!
//! Pure I/O adapter, no business logic. Two implementations:
//! - [`StubGeoLocator`] returns a fixed location (tests, demos).
//! - [`IpInfoLocator`] performs the live lookup over HTTP, optionally
//!   resolving the caller's own public address first.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeoConfig;
use crate::error::GeoError;

/// Coarse location of a visitor. Either field may be absent when the
/// upstream service cannot resolve it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Resolves a remote network address into a [`GeoLocation`].
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, remote_address: &str) -> Result<GeoLocation, GeoError>;
}

// ── Stub locator ────────────────────────────────────────────────────

/// Deterministic locator returning a fixed location.
#[derive(Debug, Clone)]
pub struct StubGeoLocator {
    location: GeoLocation,
}

impl StubGeoLocator {
    pub fn new(city: &str, country: &str) -> Self {
        Self {
            location: GeoLocation {
                city: Some(city.to_string()),
                country: Some(country.to_string()),
            },
        }
    }
}

impl Default for StubGeoLocator {
    fn default() -> Self {
        Self::new("Ulaanbaatar", "Mongolia")
    }
}

#[async_trait]
impl GeoLocator for StubGeoLocator {
    async fn locate(&self, _remote_address: &str) -> Result<GeoLocation, GeoError> {
        Ok(self.location.clone())
    }
}

// ── Live locator ────────────────────────────────────────────────────

/// Live locator backed by an ipinfo-style HTTP endpoint.
pub struct IpInfoLocator {
    client: reqwest::Client,
    config: GeoConfig,
}

#[derive(Deserialize)]
struct IpEchoResponse {
    ip: String,
}

#[derive(Deserialize)]
struct IpInfoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl IpInfoLocator {
    pub fn new(config: GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GeoError::Network {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Ask the echo endpoint which public address our requests egress from.
    async fn public_ip(&self) -> Result<String, GeoError> {
        let resp = self
            .client
            .get(&self.config.ip_echo_url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !resp.status().is_success() {
            return Err(GeoError::Network {
                reason: format!("IP echo endpoint returned {}", resp.status()),
            });
        }

        let body: IpEchoResponse =
            resp.json().await.map_err(|e| GeoError::MalformedResponse {
                reason: format!("IP echo body: {e}"),
            })?;

        Ok(body.ip)
    }

    fn map_request_error(&self, e: reqwest::Error) -> GeoError {
        if e.is_timeout() {
            GeoError::Timeout {
                after: self.config.request_timeout,
            }
        } else {
            GeoError::Network {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl GeoLocator for IpInfoLocator {
    async fn locate(&self, remote_address: &str) -> Result<GeoLocation, GeoError> {
        let ip = if self.config.resolve_public_ip {
            self.public_ip().await?
        } else {
            remote_address.to_string()
        };

        let url = format!("{}/{ip}/json", self.config.geo_url_base.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !resp.status().is_success() {
            return Err(GeoError::Network {
                reason: format!("geolocation endpoint returned {}", resp.status()),
            });
        }

        let body: IpInfoResponse =
            resp.json().await.map_err(|e| GeoError::MalformedResponse {
                reason: format!("geolocation body: {e}"),
            })?;

        tracing::debug!(
            city = body.city.as_deref().unwrap_or("?"),
            country = body.country.as_deref().unwrap_or("?"),
            "Resolved visitor location"
        );

        Ok(GeoLocation {
            city: body.city,
            country: body.country,
        })
    }
}
