//! Live geolocation adapter tests — each test spins up a local Axum server
//! standing in for the IP echo / geolocation endpoints.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use auto_engage::config::GeoConfig;
use auto_engage::error::GeoError;
use auto_engage::geo::{GeoLocator, IpInfoLocator};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> GeoConfig {
    GeoConfig {
        request_timeout: Duration::from_secs(2),
        resolve_public_ip: false,
        ip_echo_url: format!("http://{addr}/"),
        geo_url_base: format!("http://{addr}"),
    }
}

#[tokio::test]
async fn parses_city_and_country() {
    let app = Router::new().route(
        "/{ip}/json",
        get(|Path(ip): Path<String>| async move {
            Json(json!({"ip": ip, "city": "Ulaanbaatar", "country": "MN"}))
        }),
    );
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(config(addr)).unwrap();
    let location = locator.locate("203.0.113.7").await.unwrap();
    assert_eq!(location.city.as_deref(), Some("Ulaanbaatar"));
    assert_eq!(location.country.as_deref(), Some("MN"));
}

#[tokio::test]
async fn missing_fields_are_absent_not_errors() {
    let app = Router::new().route(
        "/{ip}/json",
        get(|| async { Json(json!({"ip": "203.0.113.7"})) }),
    );
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(config(addr)).unwrap();
    let location = locator.locate("203.0.113.7").await.unwrap();
    assert!(location.city.is_none());
    assert!(location.country.is_none());
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let app = Router::new().route("/{ip}/json", get(|| async { "certainly not json" }));
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(config(addr)).unwrap();
    let err = locator.locate("203.0.113.7").await.unwrap_err();
    assert!(matches!(err, GeoError::MalformedResponse { .. }));
}

#[tokio::test]
async fn error_status_is_a_network_error() {
    let app = Router::new().route(
        "/{ip}/json",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(config(addr)).unwrap();
    let err = locator.locate("203.0.113.7").await.unwrap_err();
    assert!(matches!(err, GeoError::Network { .. }));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route(
        "/{ip}/json",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"city": "Too", "country": "Late"}))
        }),
    );
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(GeoConfig {
        request_timeout: Duration::from_millis(200),
        ..config(addr)
    })
    .unwrap();
    let err = locator.locate("203.0.113.7").await.unwrap_err();
    assert!(matches!(err, GeoError::Timeout { .. }));
}

#[tokio::test]
async fn resolves_own_public_address_first() {
    // The echo endpoint reports a public IP; the geolocation route echoes
    // the IP it was asked about so the test can observe the chaining.
    let app = Router::new()
        .route("/", get(|| async { Json(json!({"ip": "198.51.100.7"})) }))
        .route(
            "/{ip}/json",
            get(|Path(ip): Path<String>| async move {
                Json(json!({"city": ip, "country": "XX"}))
            }),
        );
    let addr = serve(app).await;

    let locator = IpInfoLocator::new(GeoConfig {
        resolve_public_ip: true,
        ..config(addr)
    })
    .unwrap();
    let location = locator.locate("10.0.0.1").await.unwrap();
    assert_eq!(location.city.as_deref(), Some("198.51.100.7"));
}

#[tokio::test]
async fn unreachable_echo_endpoint_fails_the_lookup() {
    let geo_app = Router::new().route(
        "/{ip}/json",
        get(|| async { Json(json!({"city": "Ulaanbaatar", "country": "MN"})) }),
    );
    let addr = serve(geo_app).await;

    let locator = IpInfoLocator::new(GeoConfig {
        resolve_public_ip: true,
        // Nothing listens here: reserved TEST-NET port on localhost.
        ip_echo_url: "http://127.0.0.1:9/".into(),
        ..config(addr)
    })
    .unwrap();
    let err = locator.locate("10.0.0.1").await.unwrap_err();
    assert!(matches!(
        err,
        GeoError::Network { .. } | GeoError::Timeout { .. }
    ));
}
