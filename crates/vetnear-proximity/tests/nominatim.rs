//! Integration tests for `NominatimClient` using wiremock HTTP mocks.

use std::time::Duration;

use vetnear_core::GeoPoint;
use vetnear_proximity::{FetchError, NominatimClient, ProviderConfig, RetryPolicy};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NominatimClient {
    NominatimClient::new(&ProviderConfig {
        base_url: base_url.to_owned(),
        timeout: Duration::from_secs(5),
        user_agent: "vetnear-test/0.1 (ops@example.org)".to_owned(),
        retry: RetryPolicy::immediate(3),
    })
    .expect("client construction should not fail")
}

fn delhi() -> GeoPoint {
    GeoPoint::new(28.6139, 77.209).expect("valid point")
}

#[tokio::test]
async fn reverse_returns_location_context() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "place_id": 1234,
        "display_name": "Janpath, Connaught Place, New Delhi, Delhi, 110001, India",
        "address": {
            "road": "Janpath",
            "city": "New Delhi",
            "state_district": "New Delhi",
            "state": "Delhi",
            "postcode": "110001",
            "country": "India",
            "country_code": "in"
        }
    });

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("lat", "28.6139"))
        .and(query_param("lon", "77.209"))
        .and(header("user-agent", "vetnear-test/0.1 (ops@example.org)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = test_client(&server.uri())
        .reverse(delhi())
        .await
        .expect("should parse reverse geocode");

    assert_eq!(ctx.city.as_deref(), Some("New Delhi"));
    assert_eq!(ctx.state.as_deref(), Some("Delhi"));
    assert_eq!(ctx.postcode.as_deref(), Some("110001"));
    assert_eq!(ctx.country.as_deref(), Some("India"));
    assert_eq!(ctx.country_code.as_deref(), Some("IN"));
    assert!(ctx
        .display_address
        .as_deref()
        .is_some_and(|d| d.starts_with("Janpath")));
}

#[tokio::test]
async fn unable_to_geocode_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Unable to geocode" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).reverse(delhi()).await;
    match result {
        Err(FetchError::MalformedResponse { reason, .. }) => {
            assert!(reason.contains("Unable to geocode"), "got: {reason}");
        }
        other => panic!("expected MalformedResponse, got: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_errors_exhaust_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).reverse(delhi()).await;
    assert!(matches!(
        result,
        Err(FetchError::ProviderUnavailable {
            provider: "nominatim",
            attempts: 4,
            ..
        })
    ));
}
