//! Aggregation cycles against a mock WeatherAPI server

mod common;

use std::sync::Arc;

use weatherpro::error::Section;
use weatherpro::location_resolver::NoDeviceLocation;
use weatherpro::{
    Aggregator, FetchError, LocationQuery, LocationResolver, LocationSignal, ProviderError,
    ResolutionError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    API_KEY, client, ip_berlin, paris_astronomy, paris_forecast, paris_marine, provider_error,
    search_results,
};

async fn mount_forecast(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", API_KEY))
        .and(query_param("q", "Paris"))
        .and(query_param("days", "3"))
        .and(query_param("aqi", "yes"))
        .and(query_param("alerts", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_forecast()))
        .expect(1)
        .mount(server)
        .await;
}

fn paris() -> LocationQuery {
    LocationQuery::FreeText("Paris".into())
}

#[tokio::test]
async fn test_paris_secondary_requests_use_canonical_coordinates() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;

    Mock::given(method("GET"))
        .and(path("/astronomy.json"))
        .and(query_param("q", "48.85,2.35"))
        .and(query_param("dt", "2024-05-03"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_astronomy()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marine.json"))
        .and(query_param("q", "48.85,2.35"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_marine()))
        .expect(1)
        .mount(&server)
        .await;

    let aggregator = Aggregator::new(client(&server), 3);
    let weather = aggregator.aggregate(&paris()).await.unwrap();

    assert_eq!(weather.location().display_name(), "Paris, France");
    assert_eq!(weather.forecast.days.len(), 3);
    assert_eq!(weather.forecast.days[0].hours.len(), 24);
    assert_eq!(
        weather.forecast.current.air_quality.as_ref().unwrap().us_epa_index,
        Some(1)
    );

    let astronomy = weather.astronomy.unwrap();
    assert_eq!(astronomy.moon_illumination, 24);
    assert_eq!(astronomy.sunrise, "06:31 AM");

    let marine = weather.marine.unwrap();
    assert_eq!(marine.days.len(), 1);
    assert_eq!(marine.days[0].tides.len(), 2);
    assert_eq!(marine.days[0].tides[1].tide_height_mt, -0.1);
}

#[tokio::test]
async fn test_marine_rejection_leaves_forecast_intact() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;

    Mock::given(method("GET"))
        .and(path("/astronomy.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_astronomy()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marine.json"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(provider_error(1006, "No matching location found.")),
        )
        .mount(&server)
        .await;

    let weather = Aggregator::new(client(&server), 3)
        .aggregate(&paris())
        .await
        .unwrap();

    assert_eq!(weather.forecast.location.name, "Paris");
    assert!(weather.astronomy.is_ok());
    assert_eq!(
        weather.marine,
        Err(FetchError::SecondaryUnavailable {
            section: Section::Marine,
            cause: ProviderError::Status {
                status: 400,
                message: "No matching location found.".into(),
            },
        })
    );
}

#[tokio::test]
async fn test_forecast_failure_ends_cycle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/astronomy.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_astronomy()))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marine.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_marine()))
        .expect(0)
        .mount(&server)
        .await;

    let result = Aggregator::new(client(&server), 3).aggregate(&paris()).await;

    assert_eq!(
        result,
        Err(FetchError::ForecastUnavailable(ProviderError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        }))
    );
}

#[tokio::test]
async fn test_malformed_forecast_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"location\": null}"))
        .mount(&server)
        .await;

    let result = Aggregator::new(client(&server), 3).aggregate(&paris()).await;
    let message = match result {
        Err(FetchError::ForecastUnavailable(ProviderError::InvalidResponse(message))) => message,
        other => panic!("expected an invalid forecast response, got {other:?}"),
    };
    assert!(message.starts_with("forecast"), "unexpected message: {message}");
    assert!(!message.contains(API_KEY));
    assert!(!message.contains("http://"));
}

#[tokio::test]
async fn test_unreadable_astronomy_is_recorded() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;

    let mut astronomy = paris_astronomy();
    astronomy["astronomy"]["astro"]["moon_illumination"] = "bright".into();
    Mock::given(method("GET"))
        .and(path("/astronomy.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(astronomy))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/marine.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_marine()))
        .mount(&server)
        .await;

    let weather = Aggregator::new(client(&server), 3)
        .aggregate(&paris())
        .await
        .unwrap();

    assert!(matches!(
        weather.astronomy,
        Err(FetchError::SecondaryUnavailable {
            section: Section::Astronomy,
            cause: ProviderError::InvalidResponse(_),
        })
    ));
    assert!(weather.marine.is_ok());
}

#[tokio::test]
async fn test_current_location_falls_back_to_ip_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ip.json"))
        .and(query_param("q", "auto:ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ip_berlin()))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(client(&server), Arc::new(NoDeviceLocation));
    let query = resolver
        .resolve(LocationSignal::CurrentLocation)
        .await
        .unwrap();

    assert_eq!(query.to_param(), "52.52,13.4");
}

#[tokio::test]
async fn test_failed_ip_lookup_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ip.json"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(provider_error(1006, "No location found.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(client(&server), Arc::new(NoDeviceLocation));
    let result = resolver.resolve(LocationSignal::CurrentLocation).await;

    assert_eq!(result, Err(ResolutionError::Unavailable));
}

#[tokio::test]
async fn test_search_returns_suggestions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "Par"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_results()))
        .mount(&server)
        .await;

    let suggestions = client(&server).search("Par").await.unwrap();

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].label(), "Paris, Ile-de-France, France");
    assert_eq!(suggestions[1].longitude, -95.56);
}
