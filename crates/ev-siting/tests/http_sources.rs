use ev_siting::config::SourcesConfig;
use ev_siting::feasibility::{Coordinate, RiskCategory, SiteClass};
use ev_siting::sources::http::{
    build_client, FemaFloodSource, NominatimGeocoder, OpenElevationSource,
    OpenMeteoClimateSource, OverpassRoadSource, UsgsSeismicSource,
};
use ev_siting::sources::{
    ClimateSource, ElevationSource, FloodZoneSource, Geocoder, RoadProximitySource,
    SeismicHazardSource, SourceError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    let config = SourcesConfig {
        timeout: Duration::from_secs(2),
        ..SourcesConfig::default()
    };
    build_client(&config).expect("client builds")
}

fn columbus() -> Coordinate {
    Coordinate::new(39.96, -82.99).expect("valid")
}

#[tokio::test]
async fn geocoder_parses_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "400 Logistics Dr"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "lat": "39.9612", "lon": "-82.9988" }])),
        )
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), &server.uri());
    let coordinate = geocoder
        .resolve("400 Logistics Dr")
        .await
        .expect("request succeeds")
        .expect("address matched");

    assert_eq!(coordinate.latitude(), 39.9612);
    assert_eq!(coordinate.longitude(), -82.9988);
}

#[tokio::test]
async fn geocoder_reports_no_match_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), &server.uri());
    let resolved = geocoder.resolve("nowhere").await.expect("request succeeds");

    assert!(resolved.is_none());
}

#[tokio::test]
async fn geocoder_rejects_out_of_range_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "123.0", "lon": "10.0" }])),
        )
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), &server.uri());
    let err = geocoder.resolve("broken").await.unwrap_err();

    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[tokio::test]
async fn elevation_reads_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/lookup"))
        .and(query_param("locations", "39.96,-82.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "latitude": 39.96, "longitude": -82.99, "elevation": 237.0 }]
        })))
        .mount(&server)
        .await;

    let source = OpenElevationSource::new(client(), &server.uri());
    let elevation = source.elevation(columbus()).await.expect("elevation");

    assert_eq!(elevation, 237.0);
}

#[tokio::test]
async fn elevation_service_errors_surface_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let source = OpenElevationSource::new(client(), &server.uri());
    let err = source.elevation(columbus()).await.unwrap_err();

    match err {
        SourceError::Status { service, status } => {
            assert_eq!(service, "open-elevation");
            assert_eq!(status, 504);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn flood_features_mark_hazard_layer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("geometry", "-82.99,39.96"))
        .and(query_param("f", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{ "attributes": { "FLD_ZONE": "AE", "ZONE_SUBTY": null } }]
        })))
        .mount(&server)
        .await;

    let source = FemaFloodSource::new(client(), &server.uri());
    let reading = source.flood_zone(columbus()).await.expect("flood reading");

    assert!(reading.in_hazard_layer);
    assert_eq!(reading.zone_code.as_deref(), Some("AE"));
}

#[tokio::test]
async fn flood_empty_features_is_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .mount(&server)
        .await;

    let source = FemaFloodSource::new(client(), &server.uri());
    let reading = source.flood_zone(columbus()).await.expect("flood reading");

    assert!(!reading.in_hazard_layer);
    assert!(reading.zone_code.is_none());
}

#[tokio::test]
async fn flood_error_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 400, "message": "Unable to complete operation." }
        })))
        .mount(&server)
        .await;

    let source = FemaFloodSource::new(client(), &server.uri());
    let err = source.flood_zone(columbus()).await.unwrap_err();

    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[tokio::test]
async fn seismic_sends_design_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/designmaps/asce7-16.json"))
        .and(query_param("latitude", "39.960000"))
        .and(query_param("longitude", "-82.990000"))
        .and(query_param("riskCategory", "III"))
        .and(query_param("siteClass", "D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {},
            "response": { "data": { "ss": 0.152, "s1": 0.071 } }
        })))
        .mount(&server)
        .await;

    let url = format!("{}/ws/designmaps/asce7-16.json", server.uri());
    let source = UsgsSeismicSource::new(client(), &url);
    let ss = source
        .design_parameter(columbus(), RiskCategory::III, SiteClass::D)
        .await
        .expect("ss value");

    assert_eq!(ss, 0.152);
}

#[tokio::test]
async fn seismic_missing_ss_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "data": { "ss": null } }
        })))
        .mount(&server)
        .await;

    let source = UsgsSeismicSource::new(client(), &server.uri());
    let err = source
        .design_parameter(columbus(), RiskCategory::II, SiteClass::C)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[tokio::test]
async fn overpass_counts_ways() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{ "type": "count", "id": 0, "tags": { "ways": "14", "total": "14" } }]
        })))
        .mount(&server)
        .await;

    let url = format!("{}/api/interpreter", server.uri());
    let source = OverpassRoadSource::new(client(), &url);

    assert!(source
        .has_road_within(columbus(), 0.5)
        .await
        .expect("road count"));
}

#[tokio::test]
async fn overpass_zero_ways_is_not_near_road() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{ "type": "count", "tags": { "ways": "0" } }]
        })))
        .mount(&server)
        .await;

    let source = OverpassRoadSource::new(client(), &server.uri());

    assert!(!source
        .has_road_within(columbus(), 0.5)
        .await
        .expect("road count"));
}

#[tokio::test]
async fn climate_reduces_daily_extremes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("start_date", "2023-01-01"))
        .and(query_param("end_date", "2023-12-31"))
        .and(query_param("latitude", "39.9600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {
                "time": ["2023-01-01", "2023-07-01", "2023-12-31"],
                "temperature_2m_max": [4.1, 33.5, null],
                "temperature_2m_min": [-12.4, 18.0, -3.0]
            }
        })))
        .mount(&server)
        .await;

    let url = format!("{}/v1/archive", server.uri());
    let source = OpenMeteoClimateSource::new(client(), &url);
    let range = source
        .annual_range(columbus(), 2023)
        .await
        .expect("temperature range");

    assert_eq!(range.min_c, -12.4);
    assert_eq!(range.max_c, 33.5);
}

#[tokio::test]
async fn climate_without_series_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": { "temperature_2m_max": [], "temperature_2m_min": [] }
        })))
        .mount(&server)
        .await;

    let source = OpenMeteoClimateSource::new(client(), &server.uri());
    let err = source.annual_range(columbus(), 2023).await.unwrap_err();

    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let uri = format!("http://127.0.0.1:{port}");
    let source = OpenElevationSource::new(client(), &uri);
    let err = source.elevation(columbus()).await.unwrap_err();

    assert!(matches!(err, SourceError::Transport { .. }));
}
