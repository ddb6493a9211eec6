//! Configuration types.

use std::time::Duration;

/// Geolocation lookup configuration.
///
/// Selected and constructed by the caller; the library never branches on
/// ambient process state to decide between stub and live behavior.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Bound on each geolocation HTTP round trip.
    pub request_timeout: Duration,
    /// Resolve the caller's own public address first (for callers behind a
    /// proxy whose remote address is not routable).
    pub resolve_public_ip: bool,
    /// Endpoint that echoes the caller's public IP as `{"ip": "..."}`.
    pub ip_echo_url: String,
    /// Base URL of the ipinfo-style geolocation endpoint.
    pub geo_url_base: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            resolve_public_ip: false,
            ip_echo_url: "https://jsonip.com".to_string(),
            geo_url_base: "https://ipinfo.io".to_string(),
        }
    }
}
