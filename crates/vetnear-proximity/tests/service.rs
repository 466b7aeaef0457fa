//! End-to-end tests for `ProximityService` against mocked providers.

use std::time::Duration;

use vetnear_core::{SearchRequest, ValidationError};
use vetnear_proximity::{ProviderConfig, ProximityConfig, ProximityService, RetryPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const INTERPRETER: &str = "/api/interpreter";

/// Matches when the Overpass `data` parameter contains the given text.
struct DataContains(&'static str);

impl Match for DataContains {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(k, v)| k == "data" && v.contains(self.0))
    }
}

fn provider(base_url: String) -> ProviderConfig {
    ProviderConfig {
        base_url,
        timeout: Duration::from_secs(5),
        user_agent: "vetnear-test/0.1".to_owned(),
        retry: RetryPolicy::immediate(3),
    }
}

fn test_service(server: &MockServer) -> ProximityService {
    ProximityService::new(&ProximityConfig {
        overpass: provider(format!("{}{INTERPRETER}", server.uri())),
        nominatim: provider(server.uri()),
        default_radius_km: 10.0,
    })
    .expect("service construction should not fail")
}

fn delhi_request(radius_km: Option<f64>) -> SearchRequest {
    SearchRequest::new(Some(28.6139), Some(77.2090), radius_km, 10.0).expect("valid request")
}

async fn mount_reverse_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Connaught Place, New Delhi, Delhi, India",
            "address": { "city": "New Delhi", "state": "Delhi", "country": "India" }
        })))
        .mount(server)
        .await;
}

async fn mount_overpass(server: &MockServer, filter: &'static str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(INTERPRETER))
        .and(DataContains(filter))
        .respond_with(template)
        .mount(server)
        .await;
}

fn elements(elements: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "elements": elements }))
}

#[tokio::test]
async fn shelter_outage_does_not_affect_veterinarians() {
    let server = MockServer::start().await;

    mount_overpass(
        &server,
        "veterinary",
        elements(serde_json::json!([{
            "type": "node",
            "id": 1,
            "lat": 28.6150,
            "lon": 77.2100,
            "tags": { "amenity": "veterinary", "name": "City Pet Clinic" }
        }])),
    )
    .await;
    mount_overpass(&server, "animal_shelter", ResponseTemplate::new(503)).await;
    mount_reverse_ok(&server).await;

    let bundle = test_service(&server).search(&delhi_request(Some(10.0))).await;

    assert_eq!(bundle.veterinarians.len(), 1);
    let clinic = &bundle.veterinarians[0];
    assert_eq!(clinic.name, "City Pet Clinic");
    assert!((clinic.distance_km - 0.16).abs() < 1e-9, "got {}", clinic.distance_km);
    assert!(bundle.ngos.is_empty());
    assert_eq!(bundle.counts.veterinarians, 1);
    assert_eq!(bundle.counts.ngos, 0);
    assert_eq!(
        bundle
            .user_location
            .as_ref()
            .and_then(|l| l.city.as_deref()),
        Some("New Delhi")
    );
}

#[tokio::test]
async fn every_provider_down_still_returns_a_bundle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let bundle = test_service(&server).search(&delhi_request(None)).await;

    assert!(bundle.veterinarians.is_empty());
    assert!(bundle.ngos.is_empty());
    assert!(bundle.user_location.is_none());
    assert_eq!(bundle.counts.veterinarians, 0);
    assert!((bundle.radius_km - 10.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn ngo_search_uses_widened_radius() {
    let server = MockServer::start().await;

    mount_overpass(&server, "veterinary", elements(serde_json::json!([]))).await;
    Mock::given(method("GET"))
        .and(path(INTERPRETER))
        .and(DataContains("animal_shelter"))
        .and(DataContains("(around:15000,"))
        .respond_with(elements(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    mount_reverse_ok(&server).await;

    let bundle = test_service(&server).search(&delhi_request(Some(10.0))).await;
    assert!((bundle.ngo_radius_km - 15.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn address_and_name_fallbacks_end_to_end() {
    let server = MockServer::start().await;

    mount_overpass(
        &server,
        "veterinary",
        elements(serde_json::json!([
            {
                "type": "node",
                "id": 10,
                "lat": 28.6200,
                "lon": 77.2090,
                "tags": { "amenity": "veterinary", "addr:full": "12 MG Road" }
            },
            {
                "type": "way",
                "id": 11,
                "center": { "lat": 28.6300, "lon": 77.2090 },
                "tags": { "healthcare": "veterinary", "name": "Govt. Veterinary Hospital" }
            }
        ])),
    )
    .await;
    mount_overpass(&server, "animal_shelter", elements(serde_json::json!([]))).await;
    mount_reverse_ok(&server).await;

    let bundle = test_service(&server).search(&delhi_request(None)).await;

    assert_eq!(bundle.veterinarians.len(), 2);
    let first = &bundle.veterinarians[0];
    assert_eq!(first.name, "Veterinary Clinic");
    assert_eq!(first.address, "12 MG Road");
    let second = &bundle.veterinarians[1];
    assert_eq!(second.id, "way/11");
    assert_eq!(second.address, "Address not available");
    assert!(first.distance_km <= second.distance_km);
}

#[tokio::test]
async fn duplicate_node_and_way_are_collapsed() {
    let server = MockServer::start().await;

    mount_overpass(
        &server,
        "animal_shelter",
        elements(serde_json::json!([
            {
                "type": "node",
                "id": 20,
                "lat": 28.640001,
                "lon": 77.220001,
                "tags": { "amenity": "animal_shelter", "name": "Friendicoes" }
            },
            {
                "type": "way",
                "id": 21,
                "center": { "lat": 28.640003, "lon": 77.219998 },
                "tags": { "amenity": "animal_shelter", "name": "Friendicoes" }
            }
        ])),
    )
    .await;
    mount_overpass(&server, "veterinary", elements(serde_json::json!([]))).await;
    mount_reverse_ok(&server).await;

    let bundle = test_service(&server).search(&delhi_request(None)).await;
    assert_eq!(bundle.ngos.len(), 1);
    assert_eq!(bundle.counts.ngos, 1);
    assert_eq!(bundle.ngos[0].id, "node/20");
}

#[tokio::test]
async fn invalid_coordinates_fail_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = test_service(&server);
    let err = service
        .search_coordinates(Some(90.0001), Some(77.2), None)
        .await
        .expect_err("latitude out of range");
    assert_eq!(err, ValidationError::LatitudeOutOfRange);

    let err = service
        .search_coordinates(None, Some(77.2), None)
        .await
        .expect_err("latitude missing");
    assert_eq!(err, ValidationError::MissingCoordinates);
}
