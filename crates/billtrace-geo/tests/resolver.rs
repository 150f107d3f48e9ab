//! Fallback-chain integration tests against mock providers.

use std::net::IpAddr;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billtrace_geo::{
    Coordinates, IpApiComProvider, IpApiProvider, LocationCache, LocationProvider,
    NominatimClient, Resolver,
};

const TEST_IP: &str = "8.8.8.8";
const TIMEOUT: Duration = Duration::from_secs(2);

fn test_ip() -> IpAddr {
    TEST_IP.parse().unwrap()
}

/// Resolver wired to two mock IP providers and a mock reverse geocoder.
fn resolver(ipapi: &MockServer, ipapi_com: &MockServer, nominatim: &MockServer) -> Resolver {
    let providers: Vec<Box<dyn LocationProvider>> = vec![
        Box::new(IpApiProvider::new(ipapi.uri(), TIMEOUT)),
        Box::new(IpApiComProvider::new(ipapi_com.uri(), TIMEOUT)),
    ];

    Resolver::new(
        providers,
        NominatimClient::new(nominatim.uri(), TIMEOUT),
        LocationCache::new(Duration::from_secs(3600)),
    )
}

async fn mock_servers() -> (MockServer, MockServer, MockServer) {
    (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    )
}

#[tokio::test]
async fn first_provider_success_short_circuits_the_chain() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .and(path(format!("/{TEST_IP}/json/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Austin",
            "region": "TX"
        })))
        .expect(1)
        .mount(&ipapi)
        .await;

    // The second provider must never be consulted.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ipapi_com)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(test_ip(), None)
        .await;

    assert_eq!(location.city, "Austin");
    assert_eq!(location.state, "Texas");
    assert!(location.approximate);
}

#[tokio::test]
async fn failure_falls_through_to_second_provider() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ipapi)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/json/{TEST_IP}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Mountain View",
            "regionName": "California"
        })))
        .expect(1)
        .mount(&ipapi_com)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(test_ip(), None)
        .await;

    assert_eq!(location.city, "Mountain View");
    assert_eq!(location.state, "California");
    assert!(location.approximate);
}

#[tokio::test]
async fn missing_fields_are_treated_as_failure() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    // 200 but no region field.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Austin"
        })))
        .expect(1)
        .mount(&ipapi)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Dallas",
            "regionName": "TX"
        })))
        .expect(1)
        .mount(&ipapi_com)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(test_ip(), None)
        .await;

    assert_eq!(location.city, "Dallas");
    assert_eq!(location.state, "Texas");
}

#[tokio::test]
async fn all_providers_failing_yields_the_fixed_default() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ipapi)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail"
        })))
        .mount(&ipapi_com)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(test_ip(), None)
        .await;

    assert_eq!(location.city, "New York");
    assert_eq!(location.state, "New York");
    assert!(location.approximate);
}

#[tokio::test]
async fn private_addresses_skip_ip_providers_entirely() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ipapi)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ipapi_com)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve("192.168.1.10".parse().unwrap(), None)
        .await;

    assert_eq!(location.city, "New York");
    assert_eq!(location.state, "New York");
}

#[tokio::test]
async fn second_resolve_within_ttl_is_served_from_cache() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Austin",
            "region": "TX"
        })))
        .expect(1)
        .mount(&ipapi)
        .await;

    let resolver = resolver(&ipapi, &ipapi_com, &nominatim);
    let first = resolver.resolve(test_ip(), None).await;
    let second = resolver.resolve(test_ip(), None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn client_coordinates_reverse_geocode_as_exact() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": {
                "town": "Round Rock",
                "state": "Texas"
            }
        })))
        .expect(1)
        .mount(&nominatim)
        .await;

    // Loopback client: only the coordinate path is available.
    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(
            "127.0.0.1".parse().unwrap(),
            Some(Coordinates {
                lat: 30.5083,
                lon: -97.6789,
            }),
        )
        .await;

    assert_eq!(location.city, "Round Rock");
    assert_eq!(location.state, "Texas");
    assert!(!location.approximate);
}

#[tokio::test]
async fn failed_reverse_geocoding_falls_back_to_default() {
    let (ipapi, ipapi_com, nominatim) = mock_servers().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&nominatim)
        .await;

    let location = resolver(&ipapi, &ipapi_com, &nominatim)
        .resolve(
            "127.0.0.1".parse().unwrap(),
            Some(Coordinates { lat: 0.0, lon: 0.0 }),
        )
        .await;

    assert_eq!(location.city, "New York");
    assert!(location.approximate);
}
