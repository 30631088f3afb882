// Everything to do with asking Google for the current travel times between
// two places.

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::endpoints::google_routes;
use crate::error::ApiError;
use crate::retrieve::authentication::ApiKeyAuthentication;
use crate::retrieve::endpoint::MaskedEndpoint;
use crate::retrieve::fetch;

static UNKNOWN_ROUTE: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    ToCollege,
    ToHome,
}

impl Direction {
    /// Both legs, in the order a run logs them.
    pub const ALL: [Direction; 2] = [Direction::ToCollege, Direction::ToHome];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::ToCollege => "TO_COLLEGE",
            Direction::ToHome => "TO_HOME",
        }
    }

    /// (origin, destination) place ids for this leg.
    pub fn places<'a>(&self, config: &'a Config) -> (&'a str, &'a str) {
        match self {
            Direction::ToCollege => (&config.home_id, &config.college_id),
            Direction::ToHome => (&config.college_id, &config.home_id),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One route alternative as it ends up in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteResult {
    pub name: String,
    /// `None` when the API sent a duration that isn't a number of seconds.
    pub duration_seconds: Option<u64>,
    pub static_duration_seconds: Option<u64>,
    pub distance_meters: u64,
}

// [Wire format]

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Waypoint<'a> {
    place_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    travel_mode: &'static str,
    routing_preference: &'static str,
    compute_alternative_routes: bool,
    language_code: &'a str,
    origin: Waypoint<'a>,
    destination: Waypoint<'a>,
}

// The API leaves out empty and zero valued fields, and answers `{}` when
// no route could be found at all.
#[derive(Debug, Default, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    duration: Option<String>,
    static_duration: Option<String>,
    #[serde(default)]
    distance_meters: u64,
    description: Option<String>,
}

impl From<ApiRoute> for RouteResult {
    fn from(route: ApiRoute) -> Self {
        RouteResult {
            name: route_name(route.description.as_deref()),
            duration_seconds: route.duration.as_deref().and_then(parse_duration),
            static_duration_seconds: route.static_duration.as_deref().and_then(parse_duration),
            distance_meters: route.distance_meters,
        }
    }
}

/// Parses a protobuf style duration such as `"123s"` into whole seconds.
///
/// Only the leading run of digits counts, so `"12.5s"` is 12. A leading
/// `+` is allowed; a `-` or anything else without leading digits gives
/// `None`.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let value = raw.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| value.len());
    value[..end].parse().ok()
}

/// Route descriptions go straight into an unquoted CSV column, so commas
/// are dropped.
pub fn route_name(description: Option<&str>) -> String {
    match description {
        Some(description) if !description.is_empty() => description.replace(',', ""),
        _ => UNKNOWN_ROUTE.to_string(),
    }
}

pub struct RoutesClient {
    client: Client,
    endpoint: MaskedEndpoint,
    authentication: ApiKeyAuthentication,
    language_code: String,
}

impl RoutesClient {
    pub fn new(config: &Config) -> Self {
        RoutesClient {
            client: Client::new(),
            endpoint: google_routes::compute_routes(&config.routes_host),
            authentication: ApiKeyAuthentication {
                api_key: config.api_key.clone(),
            },
            language_code: config.language_code.clone(),
        }
    }

    // [Retrieval]
    // Driving routes between two places with live traffic, best first.
    pub fn fetch_routes(
        &self,
        origin_id: &str,
        destination_id: &str,
    ) -> Result<Vec<RouteResult>, ApiError> {
        let request = ComputeRoutesRequest {
            travel_mode: "DRIVE",
            routing_preference: "TRAFFIC_AWARE_OPTIMAL",
            compute_alternative_routes: true,
            language_code: &self.language_code,
            origin: Waypoint { place_id: origin_id },
            destination: Waypoint {
                place_id: destination_id,
            },
        };
        let response: ComputeRoutesResponse =
            fetch::post(&self.client, &self.endpoint, &self.authentication, &request)?;
        info!("Found {} routes", response.routes.len());
        Ok(response.routes.into_iter().map(RouteResult::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::path::Path;

    fn test_config(host: &str) -> Config {
        Config::for_tests(host, Path::new("data"))
    }

    #[test]
    fn parse_duration_reads_seconds() {
        assert_eq!(parse_duration("123s"), Some(123));
        assert_eq!(parse_duration("0s"), Some(0));
        assert_eq!(parse_duration("  42s"), Some(42));
        assert_eq!(parse_duration("+7s"), Some(7));
    }

    #[test]
    fn parse_duration_keeps_leading_integer() {
        assert_eq!(parse_duration("12.5s"), Some(12));
        assert_eq!(parse_duration("90"), Some(90));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("-5s"), None);
    }

    #[test]
    fn route_name_strips_commas() {
        assert_eq!(route_name(Some("NH48, Ring Rd")), "NH48 Ring Rd");
        assert_eq!(route_name(Some("a,,b,")), "ab");
    }

    #[test]
    fn route_name_defaults_to_unknown() {
        assert_eq!(route_name(None), "Unknown");
        assert_eq!(route_name(Some("")), "Unknown");
    }

    #[test]
    fn api_route_with_missing_fields() {
        let route: ApiRoute = serde_json::from_value(json!({ "duration": "60s" })).unwrap();
        assert_eq!(
            RouteResult::from(route),
            RouteResult {
                name: "Unknown".to_string(),
                duration_seconds: Some(60),
                static_duration_seconds: None,
                distance_meters: 0,
            }
        );
    }

    #[test]
    fn direction_places_swap() {
        let config = test_config("http://localhost");
        assert_eq!(
            Direction::ToCollege.places(&config),
            ("home-place", "college-place")
        );
        assert_eq!(
            Direction::ToHome.places(&config),
            ("college-place", "home-place")
        );
        assert_eq!(Direction::ToCollege.to_string(), "TO_COLLEGE");
        assert_eq!(Direction::ToHome.to_string(), "TO_HOME");
    }

    #[test]
    fn fetch_routes_sends_expected_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/directions/v2:computeRoutes")
            .match_header("x-goog-api-key", "test-key")
            .match_header(
                "x-goog-fieldmask",
                "routes.duration,routes.distanceMeters,routes.staticDuration,routes.description",
            )
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "travelMode": "DRIVE",
                "routingPreference": "TRAFFIC_AWARE_OPTIMAL",
                "computeAlternativeRoutes": true,
                "languageCode": "en-IN",
                "origin": { "placeId": "home-place" },
                "destination": { "placeId": "college-place" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "routes": [
                        {
                            "distanceMeters": 12500,
                            "duration": "1500s",
                            "staticDuration": "1320s",
                            "description": "NH48, Ring Rd"
                        },
                        {
                            "distanceMeters": 14100,
                            "duration": "1710s",
                            "staticDuration": "1600s"
                        }
                    ]
                })
                .to_string(),
            )
            .create();

        let client = RoutesClient::new(&test_config(&server.url()));
        let routes = client.fetch_routes("home-place", "college-place").unwrap();

        mock.assert();
        assert_eq!(
            routes,
            vec![
                RouteResult {
                    name: "NH48 Ring Rd".to_string(),
                    duration_seconds: Some(1500),
                    static_duration_seconds: Some(1320),
                    distance_meters: 12500,
                },
                RouteResult {
                    name: "Unknown".to_string(),
                    duration_seconds: Some(1710),
                    static_duration_seconds: Some(1600),
                    distance_meters: 14100,
                },
            ]
        );
    }

    #[test]
    fn fetch_routes_empty_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/directions/v2:computeRoutes")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create();

        let client = RoutesClient::new(&test_config(&server.url()));
        let routes = client.fetch_routes("college-place", "home-place").unwrap();

        mock.assert();
        assert!(routes.is_empty());
    }

    #[test]
    fn fetch_routes_reports_error_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/directions/v2:computeRoutes")
            .with_status(403)
            .with_body(r#"{"error":{"message":"API key not valid."}}"#)
            .create();

        let client = RoutesClient::new(&test_config(&server.url()));
        let err = client.fetch_routes("home-place", "college-place").unwrap_err();

        mock.assert();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status.as_u16(), 403);
                assert!(body.contains("API key not valid."));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn fetch_routes_rejects_malformed_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/directions/v2:computeRoutes")
            .with_status(200)
            .with_body("not json")
            .create();

        let client = RoutesClient::new(&test_config(&server.url()));
        let err = client.fetch_routes("home-place", "college-place").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn fetch_routes_reports_transport_failure() {
        // Nothing listens on port 1.
        let client = RoutesClient::new(&test_config("http://127.0.0.1:1"));
        let err = client.fetch_routes("home-place", "college-place").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
