//! Geocoder client tests against a local mock HTTP server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moped_router::error::GeocodeError;
use moped_router::location::Coordinate;
use moped_router::nominatim::{NominatimClient, NominatimConfig};
use moped_router::traits::{Geocoder, LookupDetail};

fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn test_client(base_url: &str) -> NominatimClient {
    NominatimClient::new(NominatimConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..NominatimConfig::default()
    })
    .expect("client construction should not fail")
}

#[test]
fn forward_returns_best_match() {
    let (runtime, server) = start_server();

    let body = serde_json::json!([{
        "lat": "52.3791283",
        "lon": "4.9003063",
        "display_name": "Amsterdam Centraal, Stationsplein, Amsterdam, Noord-Holland, Nederland"
    }]);

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Amsterdam Central Station"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .and(query_param("countrycodes", "nl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let place = client
        .forward("Amsterdam Central Station")
        .expect("request should succeed")
        .expect("a match should be returned");

    assert_eq!(place.position, Coordinate::new(52.3791283, 4.9003063));
    assert!(place.display_name.starts_with("Amsterdam Centraal"));
}

#[test]
fn forward_empty_result_is_no_match() {
    let (runtime, server) = start_server();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let result = client.forward("Nowhere, NL").expect("request should succeed");
    assert!(result.is_none());
}

#[test]
fn forward_rejects_unparsable_coordinates() {
    let (runtime, server) = start_server();

    let body = serde_json::json!([{
        "lat": "not-a-number",
        "lon": "4.9",
        "display_name": "Broken"
    }]);

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let err = client.forward("Broken").unwrap_err();
    assert!(matches!(err, GeocodeError::Malformed(_)), "{err:?}");
}

#[test]
fn forward_surfaces_server_error_status() {
    let (runtime, server) = start_server();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let err = client.forward("Amsterdam").unwrap_err();
    assert!(matches!(err, GeocodeError::Status(status) if status.as_u16() == 503));
}

#[test]
fn reverse_requests_detail_sections() {
    let (runtime, server) = start_server();

    let body = serde_json::json!({
        "display_name": "Dam, Amsterdam, Noord-Holland, Nederland",
        "address": {
            "road": "Dam",
            "city": "Amsterdam",
            "country_code": "nl"
        },
        "extratags": { "wikidata": "Q9920" },
        "namedetails": { "name": "Dam" }
    });

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "52.373"))
            .and(query_param("lon", "4.8932"))
            .and(query_param("format", "json"))
            .and(query_param("addressdetails", "1"))
            .and(query_param("extratags", "1"))
            .and(query_param("namedetails", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let details = client
        .reverse(Coordinate::new(52.373, 4.8932), LookupDetail::full())
        .expect("request should succeed")
        .expect("an address should be returned");

    assert_eq!(details.display_name, "Dam, Amsterdam, Noord-Holland, Nederland");
    assert_eq!(details.address.get("city").map(String::as_str), Some("Amsterdam"));
    assert_eq!(details.extratags.get("wikidata").map(String::as_str), Some("Q9920"));
    assert_eq!(details.namedetails.get("name").map(String::as_str), Some("Dam"));
}

#[test]
fn reverse_tolerates_null_detail_sections() {
    let (runtime, server) = start_server();

    let body = serde_json::json!({
        "display_name": "Middle of the IJsselmeer",
        "extratags": null
    });

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let details = client
        .reverse(Coordinate::new(52.8, 5.4), LookupDetail::default())
        .expect("request should succeed")
        .expect("an address should be returned");
    assert!(details.extratags.is_empty());
    assert!(details.address.is_empty());
}

#[test]
fn reverse_miss_is_none() {
    let (runtime, server) = start_server();

    // the service reports a miss as 200 with an error field
    let body = serde_json::json!({ "error": "Unable to geocode" });

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server),
    );

    let client = test_client(&server.uri());
    let result = client
        .reverse(Coordinate::new(0.0, 0.0), LookupDetail::default())
        .expect("request should succeed");
    assert!(result.is_none());
}
