//! Timetable API v3 endpoint catalogue
//!
//! Each endpoint has a fixed path template and, where the API accepts them,
//! a typed options struct. Options are encoded in field declaration order and
//! fields left empty are not sent.

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::client::PtvClient;
use crate::dispatch::DispatchResult;
use crate::models::{DisruptionStatus, Expand, RouteType};
use crate::query::{OptionSet, path_segment};

/// Conversion of a typed options struct into query options
pub trait QueryOptions {
    /// Options in the order they are sent
    fn to_option_set(&self) -> OptionSet;
}

/// Options for departure boards
#[derive(Debug, Clone, Default)]
pub struct DeparturesOptions {
    /// Only these platforms
    pub platform_numbers: Vec<u32>,
    /// Only services heading in this direction
    pub direction_id: Option<u32>,
    /// Treat the stop ID as a GTFS stop ID
    pub gtfs: Option<bool>,
    /// Start of the board; defaults to now on the server
    pub date_utc: Option<DateTime<Utc>>,
    /// Departures per route
    pub max_results: Option<u32>,
    /// Include cancelled services
    pub include_cancelled: Option<bool>,
    /// Return departures before `date_utc`
    pub look_backwards: Option<bool>,
    /// Related objects to embed
    pub expand: Vec<Expand>,
    /// Include route geometry
    pub include_geopath: Option<bool>,
}

impl QueryOptions for DeparturesOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("platform_numbers", &self.platform_numbers);
        options.insert_opt("direction_id", self.direction_id);
        options.insert_opt("gtfs", self.gtfs);
        options.insert_opt("date_utc", self.date_utc);
        options.insert_opt("max_results", self.max_results);
        options.insert_opt("include_cancelled", self.include_cancelled);
        options.insert_opt("look_backwards", self.look_backwards);
        options.insert_list("expand", &self.expand);
        options.insert_opt("include_geopath", self.include_geopath);
        options
    }
}

/// Options for the disruption listing
#[derive(Debug, Clone, Default)]
pub struct DisruptionsOptions {
    /// Only these transport modes
    pub route_types: Vec<RouteType>,
    /// Only these disruption modes (see [`PtvClient::disruption_modes`])
    pub disruption_modes: Vec<u32>,
    /// Current or planned only
    pub disruption_status: Option<DisruptionStatus>,
}

impl QueryOptions for DisruptionsOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("route_types", &self.route_types);
        options.insert_list("disruption_modes", &self.disruption_modes);
        options.insert_opt("disruption_status", self.disruption_status);
        options
    }
}

/// Options for disruptions scoped to a route or stop
#[derive(Debug, Clone, Default)]
pub struct DisruptionStatusOptions {
    /// Current or planned only
    pub disruption_status: Option<DisruptionStatus>,
}

impl QueryOptions for DisruptionStatusOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_opt("disruption_status", self.disruption_status);
        options
    }
}

/// Options for a fare estimate
#[derive(Debug, Clone, Default)]
pub struct FareEstimateOptions {
    /// Touch-on time
    pub journey_touch_on_utc: Option<DateTime<Utc>>,
    /// Touch-off time
    pub journey_touch_off_utc: Option<DateTime<Utc>>,
    /// Journey is entirely within the free tram zone
    pub is_journey_in_free_tram_zone: Option<bool>,
    /// Modes used on the journey
    pub travelled_route_types: Vec<RouteType>,
}

impl QueryOptions for FareEstimateOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_opt("journey_touch_on_utc", self.journey_touch_on_utc);
        options.insert_opt("journey_touch_off_utc", self.journey_touch_off_utc);
        options.insert_opt(
            "is_journey_in_free_tram_zone",
            self.is_journey_in_free_tram_zone,
        );
        options.insert_list("travelled_route_types", &self.travelled_route_types);
        options
    }
}

/// Options for ticket outlet lookups
#[derive(Debug, Clone, Default)]
pub struct OutletsOptions {
    /// Search radius in metres (geolocation lookups only)
    pub max_distance: Option<u32>,
    /// Maximum number of outlets
    pub max_results: Option<u32>,
}

impl QueryOptions for OutletsOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_opt("max_distance", self.max_distance);
        options.insert_opt("max_results", self.max_results);
        options
    }
}

/// Options for a run's stopping pattern
#[derive(Debug, Clone, Default)]
pub struct PatternOptions {
    /// Related objects to embed
    pub expand: Vec<Expand>,
    /// Only the pattern from this stop
    pub stop_id: Option<u32>,
    /// Service date
    pub date_utc: Option<DateTime<Utc>>,
    /// Include stops the run passes without stopping
    pub include_skipped_stops: Option<bool>,
    /// Include route geometry
    pub include_geopath: Option<bool>,
}

impl QueryOptions for PatternOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("expand", &self.expand);
        options.insert_opt("stop_id", self.stop_id);
        options.insert_opt("date_utc", self.date_utc);
        options.insert_opt("include_skipped_stops", self.include_skipped_stops);
        options.insert_opt("include_geopath", self.include_geopath);
        options
    }
}

/// Options for the route listing
#[derive(Debug, Clone, Default)]
pub struct RoutesOptions {
    /// Only these transport modes
    pub route_types: Vec<RouteType>,
    /// Route name filter (partial match)
    pub route_name: Option<String>,
}

impl QueryOptions for RoutesOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("route_types", &self.route_types);
        options.insert_opt("route_name", self.route_name.clone());
        options
    }
}

/// Options for a single route
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Include route geometry
    pub include_geopath: Option<bool>,
    /// Geometry valid at this time
    pub geopath_utc: Option<DateTime<Utc>>,
}

impl QueryOptions for RouteOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_opt("include_geopath", self.include_geopath);
        options.insert_opt("geopath_utc", self.geopath_utc);
        options
    }
}

/// Options for run lookups
#[derive(Debug, Clone, Default)]
pub struct RunsOptions {
    /// Related objects to embed
    pub expand: Vec<Expand>,
    /// Service date
    pub date_utc: Option<DateTime<Utc>>,
}

impl QueryOptions for RunsOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("expand", &self.expand);
        options.insert_opt("date_utc", self.date_utc);
        options
    }
}

/// Options for free-text search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Only these transport modes
    pub route_types: Vec<RouteType>,
    /// Rank results by distance from this latitude
    pub latitude: Option<f64>,
    /// Rank results by distance from this longitude
    pub longitude: Option<f64>,
    /// Search radius in metres
    pub max_distance: Option<u32>,
    /// Include address matches
    pub include_addresses: Option<bool>,
    /// Include ticket outlets
    pub include_outlets: Option<bool>,
    /// Match stops by suburb name
    pub match_stop_by_suburb: Option<bool>,
    /// Match routes by suburb name
    pub match_route_by_suburb: Option<bool>,
    /// Treat the term as a GTFS stop ID
    pub match_stop_by_gtfs_stop_id: Option<bool>,
}

impl QueryOptions for SearchOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("route_types", &self.route_types);
        options.insert_opt("latitude", self.latitude);
        options.insert_opt("longitude", self.longitude);
        options.insert_opt("max_distance", self.max_distance);
        options.insert_opt("include_addresses", self.include_addresses);
        options.insert_opt("include_outlets", self.include_outlets);
        options.insert_opt("match_stop_by_suburb", self.match_stop_by_suburb);
        options.insert_opt("match_route_by_suburb", self.match_route_by_suburb);
        options.insert_opt(
            "match_stop_by_gtfs_stop_id",
            self.match_stop_by_gtfs_stop_id,
        );
        options
    }
}

/// Options for the stops along a route
#[derive(Debug, Clone, Default)]
pub struct StopsOnRouteOptions {
    /// Order stops for this direction
    pub direction_id: Option<u32>,
    /// Embed stop disruptions
    pub stop_disruptions: Option<bool>,
    /// Include route geometry
    pub include_geopath: Option<bool>,
    /// Include advertised interchange stops
    pub include_advertised_interchange: Option<bool>,
}

impl QueryOptions for StopsOnRouteOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_opt("direction_id", self.direction_id);
        options.insert_opt("stop_disruptions", self.stop_disruptions);
        options.insert_opt("include_geopath", self.include_geopath);
        options.insert_opt(
            "include_advertised_interchange",
            self.include_advertised_interchange,
        );
        options
    }
}

/// Options for stops near a location
#[derive(Debug, Clone, Default)]
pub struct StopsNearbyOptions {
    /// Only these transport modes
    pub route_types: Vec<RouteType>,
    /// Maximum number of stops
    pub max_results: Option<u32>,
    /// Search radius in metres
    pub max_distance: Option<u32>,
    /// Embed stop disruptions
    pub stop_disruptions: Option<bool>,
}

impl QueryOptions for StopsNearbyOptions {
    fn to_option_set(&self) -> OptionSet {
        let mut options = OptionSet::new();
        options.insert_list("route_types", &self.route_types);
        options.insert_opt("max_results", self.max_results);
        options.insert_opt("max_distance", self.max_distance);
        options.insert_opt("stop_disruptions", self.stop_disruptions);
        options
    }
}

/// Sections to include in stop details
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default)]
pub struct StopDetailsOptions {
    /// Location and suburb
    pub stop_location: bool,
    /// Amenities such as toilets and parking
    pub stop_amenities: bool,
    /// Accessibility features
    pub stop_accessibility: bool,
    /// Operator contact details
    pub stop_contact: bool,
    /// Ticketing information
    pub stop_ticket: bool,
    /// Treat the stop ID as a GTFS stop ID
    pub gtfs: bool,
    /// Staffing hours
    pub stop_staffing: bool,
    /// Embed stop disruptions
    pub stop_disruptions: bool,
}

impl QueryOptions for StopDetailsOptions {
    fn to_option_set(&self) -> OptionSet {
        let flags = [
            ("stop_location", self.stop_location),
            ("stop_amenities", self.stop_amenities),
            ("stop_accessibility", self.stop_accessibility),
            ("stop_contact", self.stop_contact),
            ("stop_ticket", self.stop_ticket),
            ("gtfs", self.gtfs),
            ("stop_staffing", self.stop_staffing),
            ("stop_disruptions", self.stop_disruptions),
        ];

        let mut options = OptionSet::new();
        for (name, enabled) in flags {
            if enabled {
                options.insert(name, true);
            }
        }
        options
    }
}

fn location_segment(latitude: f64, longitude: f64) -> String {
    format!("{latitude},{longitude}")
}

impl PtvClient {
    /// Departures from a stop across all routes
    #[instrument(skip(self, options))]
    pub async fn departures_by_stop(
        &self,
        route_type: RouteType,
        stop_id: u32,
        options: &DeparturesOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/departures/route_type/{}/stop/{stop_id}",
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Departures from a stop for one route
    #[instrument(skip(self, options))]
    pub async fn departures_by_stop_and_route(
        &self,
        route_type: RouteType,
        stop_id: u32,
        route_id: u32,
        options: &DeparturesOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/departures/route_type/{}/stop/{stop_id}/route/{route_id}",
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Directions served by a route
    #[instrument(skip(self))]
    pub async fn directions_by_route(&self, route_id: u32) -> DispatchResult {
        self.get(&format!("/v3/directions/route/{route_id}"), &OptionSet::new())
            .await
    }

    /// All routes travelling in a direction
    #[instrument(skip(self))]
    pub async fn directions_by_id(&self, direction_id: u32) -> DispatchResult {
        self.get(&format!("/v3/directions/{direction_id}"), &OptionSet::new())
            .await
    }

    /// Routes of one mode travelling in a direction
    #[instrument(skip(self))]
    pub async fn directions_by_id_and_route_type(
        &self,
        direction_id: u32,
        route_type: RouteType,
    ) -> DispatchResult {
        let path = format!(
            "/v3/directions/{direction_id}/route_type/{}",
            route_type.id()
        );
        self.get(&path, &OptionSet::new()).await
    }

    /// All disruptions
    #[instrument(skip(self, options))]
    pub async fn disruptions_all(&self, options: &DisruptionsOptions) -> DispatchResult {
        self.get("/v3/disruptions", &options.to_option_set()).await
    }

    /// Disruptions on a route
    #[instrument(skip(self, options))]
    pub async fn disruptions_by_route(
        &self,
        route_id: u32,
        options: &DisruptionStatusOptions,
    ) -> DispatchResult {
        let path = format!("/v3/disruptions/route/{route_id}");
        self.get(&path, &options.to_option_set()).await
    }

    /// Disruptions on a route at a stop
    #[instrument(skip(self, options))]
    pub async fn disruptions_by_route_and_stop(
        &self,
        route_id: u32,
        stop_id: u32,
        options: &DisruptionStatusOptions,
    ) -> DispatchResult {
        let path = format!("/v3/disruptions/route/{route_id}/stop/{stop_id}");
        self.get(&path, &options.to_option_set()).await
    }

    /// Disruptions at a stop
    #[instrument(skip(self, options))]
    pub async fn disruptions_by_stop(
        &self,
        stop_id: u32,
        options: &DisruptionStatusOptions,
    ) -> DispatchResult {
        let path = format!("/v3/disruptions/stop/{stop_id}");
        self.get(&path, &options.to_option_set()).await
    }

    /// A single disruption
    #[instrument(skip(self))]
    pub async fn disruption_by_id(&self, disruption_id: u64) -> DispatchResult {
        self.get(
            &format!("/v3/disruptions/{disruption_id}"),
            &OptionSet::new(),
        )
        .await
    }

    /// Disruption mode catalogue
    #[instrument(skip(self))]
    pub async fn disruption_modes(&self) -> DispatchResult {
        self.get("/v3/disruptions/modes", &OptionSet::new()).await
    }

    /// Fare for travel between two myki zones
    #[instrument(skip(self, options))]
    pub async fn fare_estimate(
        &self,
        min_zone: u8,
        max_zone: u8,
        options: &FareEstimateOptions,
    ) -> DispatchResult {
        let path = format!("/v3/fare_estimate/min_zone/{min_zone}/max_zone/{max_zone}");
        self.get(&path, &options.to_option_set()).await
    }

    /// All ticket outlets
    ///
    /// Only `max_results` applies here.
    #[instrument(skip(self, options))]
    pub async fn outlets_all(&self, options: &OutletsOptions) -> DispatchResult {
        let mut query = OptionSet::new();
        query.insert_opt("max_results", options.max_results);
        self.get("/v3/outlets", &query).await
    }

    /// Ticket outlets near a location
    #[instrument(skip(self, options))]
    pub async fn outlets_by_geolocation(
        &self,
        latitude: f64,
        longitude: f64,
        options: &OutletsOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/outlets/location/{}",
            location_segment(latitude, longitude)
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Stopping pattern of a run
    #[instrument(skip(self, options))]
    pub async fn stopping_pattern(
        &self,
        run_ref: &str,
        route_type: RouteType,
        options: &PatternOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/pattern/run/{}/route_type/{}",
            path_segment(run_ref),
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// All routes
    #[instrument(skip(self, options))]
    pub async fn routes_all(&self, options: &RoutesOptions) -> DispatchResult {
        self.get("/v3/routes", &options.to_option_set()).await
    }

    /// A single route
    #[instrument(skip(self, options))]
    pub async fn route_by_id(&self, route_id: u32, options: &RouteOptions) -> DispatchResult {
        let path = format!("/v3/routes/{route_id}");
        self.get(&path, &options.to_option_set()).await
    }

    /// Transport mode catalogue
    #[instrument(skip(self))]
    pub async fn route_types(&self) -> DispatchResult {
        self.get("/v3/route_types", &OptionSet::new()).await
    }

    /// Runs on a route
    #[instrument(skip(self, options))]
    pub async fn runs_by_route(&self, route_id: u32, options: &RunsOptions) -> DispatchResult {
        let path = format!("/v3/runs/route/{route_id}");
        self.get(&path, &options.to_option_set()).await
    }

    /// Runs on a route for one mode
    #[instrument(skip(self, options))]
    pub async fn runs_by_route_and_route_type(
        &self,
        route_id: u32,
        route_type: RouteType,
        options: &RunsOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/runs/route/{route_id}/route_type/{}",
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// All runs with a run reference
    #[instrument(skip(self, options))]
    pub async fn run_by_ref(&self, run_ref: &str, options: &RunsOptions) -> DispatchResult {
        let path = format!("/v3/runs/{}", path_segment(run_ref));
        self.get(&path, &options.to_option_set()).await
    }

    /// A run by reference for one mode
    #[instrument(skip(self, options))]
    pub async fn run_by_ref_and_route_type(
        &self,
        run_ref: &str,
        route_type: RouteType,
        options: &RunsOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/runs/{}/route_type/{}",
            path_segment(run_ref),
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Stops, routes and outlets matching free text
    #[instrument(skip(self, options))]
    pub async fn search(&self, term: &str, options: &SearchOptions) -> DispatchResult {
        let path = format!("/v3/search/{}", path_segment(term));
        self.get(&path, &options.to_option_set()).await
    }

    /// Stops along a route
    #[instrument(skip(self, options))]
    pub async fn stops_by_route(
        &self,
        route_id: u32,
        route_type: RouteType,
        options: &StopsOnRouteOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/stops/route/{route_id}/route_type/{}",
            route_type.id()
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Stops near a location
    #[instrument(skip(self, options))]
    pub async fn stops_by_geolocation(
        &self,
        latitude: f64,
        longitude: f64,
        options: &StopsNearbyOptions,
    ) -> DispatchResult {
        let path = format!(
            "/v3/stops/location/{}",
            location_segment(latitude, longitude)
        );
        self.get(&path, &options.to_option_set()).await
    }

    /// Details of a stop
    #[instrument(skip(self, options))]
    pub async fn stop_details(
        &self,
        stop_id: u32,
        route_type: RouteType,
        options: &StopDetailsOptions,
    ) -> DispatchResult {
        let path = format!("/v3/stops/{stop_id}/route_type/{}", route_type.id());
        self.get(&path, &options.to_option_set()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use super::*;
    use crate::config::{Credentials, PtvConfig};
    use crate::dispatch::{MockHttpTransport, TransportResponse};

    const BASE_URL: &str = "http://ptv.test";

    /// Client whose transport answers `{}` and records every URL after validation
    async fn recording_client() -> (PtvClient, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        let mut transport = MockHttpTransport::new();
        transport.expect_get().returning(move |url| {
            log.lock().unwrap().push(url.to_string());
            Ok(TransportResponse {
                status: 200,
                body: "{}".to_string(),
            })
        });

        let credentials = Credentials::new(1, "key1".to_string()).unwrap();
        let client = PtvClient::with_transport(
            &PtvConfig::for_testing(BASE_URL),
            credentials,
            Arc::new(transport),
        )
        .await
        .unwrap();

        seen.lock().unwrap().clear();
        (client, seen)
    }

    fn path_of(url: &str) -> String {
        let rest = url.strip_prefix(BASE_URL).unwrap();
        rest.split('?').next().unwrap().to_string()
    }

    #[test]
    fn test_departures_options_order_and_omission() {
        let options = DeparturesOptions {
            platform_numbers: vec![1, 2],
            direction_id: Some(10),
            max_results: Some(5),
            expand: vec![Expand::Run, Expand::Stop],
            ..Default::default()
        };
        assert_eq!(
            options.to_option_set().encode(),
            "platform_numbers=1&platform_numbers=2&direction_id=10&max_results=5\
             &expand=Run&expand=Stop"
        );
    }

    #[test]
    fn test_default_options_are_empty() {
        assert!(DeparturesOptions::default().to_option_set().is_empty());
        assert!(SearchOptions::default().to_option_set().is_empty());
        assert!(StopDetailsOptions::default().to_option_set().is_empty());
        assert!(FareEstimateOptions::default().to_option_set().is_empty());
    }

    #[test]
    fn test_search_options_route_types_as_ids() {
        let options = SearchOptions {
            route_types: vec![RouteType::Train, RouteType::VLine],
            include_outlets: Some(false),
            ..Default::default()
        };
        assert_eq!(
            options.to_option_set().encode(),
            "route_types=0&route_types=3&include_outlets=false"
        );
    }

    #[test]
    fn test_stop_details_only_sends_enabled_flags() {
        let options = StopDetailsOptions {
            stop_location: true,
            stop_ticket: true,
            ..Default::default()
        };
        assert_eq!(
            options.to_option_set().encode(),
            "stop_location=true&stop_ticket=true"
        );
    }

    #[test]
    fn test_fare_estimate_options() {
        let on = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let options = FareEstimateOptions {
            journey_touch_on_utc: Some(on),
            travelled_route_types: vec![RouteType::Train, RouteType::Tram],
            ..Default::default()
        };
        assert_eq!(
            options.to_option_set().encode(),
            "journey_touch_on_utc=2026-03-01T08%3A00%3A00Z\
             &travelled_route_types=0&travelled_route_types=1"
        );
    }

    #[test]
    fn test_disruption_options() {
        let options = DisruptionsOptions {
            route_types: vec![RouteType::Bus],
            disruption_modes: vec![1, 2],
            disruption_status: Some(DisruptionStatus::Current),
        };
        assert_eq!(
            options.to_option_set().encode(),
            "route_types=2&disruption_modes=1&disruption_modes=2&disruption_status=current"
        );
    }

    #[test]
    fn test_routes_options_encode_name() {
        let options = RoutesOptions {
            route_types: vec![],
            route_name: Some("Upfield Line".to_string()),
        };
        assert_eq!(options.to_option_set().encode(), "route_name=Upfield+Line");
    }

    #[test]
    fn test_location_segment() {
        assert_eq!(location_segment(-37.818, 144.952), "-37.818,144.952");
    }

    #[tokio::test]
    async fn test_endpoint_paths() {
        let (client, seen) = recording_client().await;
        let train = RouteType::Train;
        let tram = RouteType::Tram;

        client
            .departures_by_stop(train, 1071, &DeparturesOptions::default())
            .await
            .unwrap();
        client
            .departures_by_stop_and_route(train, 1071, 11, &DeparturesOptions::default())
            .await
            .unwrap();
        client.directions_by_route(11).await.unwrap();
        client.directions_by_id(10).await.unwrap();
        client.directions_by_id_and_route_type(10, tram).await.unwrap();
        client
            .disruptions_all(&DisruptionsOptions::default())
            .await
            .unwrap();
        let status = DisruptionStatusOptions::default();
        client.disruptions_by_route(11, &status).await.unwrap();
        client
            .disruptions_by_route_and_stop(11, 1071, &status)
            .await
            .unwrap();
        client.disruptions_by_stop(1071, &status).await.unwrap();
        client.disruption_by_id(204_917).await.unwrap();
        client.disruption_modes().await.unwrap();
        client
            .fare_estimate(1, 2, &FareEstimateOptions::default())
            .await
            .unwrap();
        client.outlets_all(&OutletsOptions::default()).await.unwrap();
        client
            .outlets_by_geolocation(-37.818, 144.952, &OutletsOptions::default())
            .await
            .unwrap();
        client
            .stopping_pattern("955", train, &PatternOptions::default())
            .await
            .unwrap();
        client.routes_all(&RoutesOptions::default()).await.unwrap();
        client
            .route_by_id(11, &RouteOptions::default())
            .await
            .unwrap();
        client.route_types().await.unwrap();
        client
            .runs_by_route(11, &RunsOptions::default())
            .await
            .unwrap();
        client
            .runs_by_route_and_route_type(11, train, &RunsOptions::default())
            .await
            .unwrap();
        client
            .run_by_ref("955", &RunsOptions::default())
            .await
            .unwrap();
        client
            .run_by_ref_and_route_type("955", train, &RunsOptions::default())
            .await
            .unwrap();
        client
            .search("South Yarra", &SearchOptions::default())
            .await
            .unwrap();
        client
            .stops_by_route(11, train, &StopsOnRouteOptions::default())
            .await
            .unwrap();
        client
            .stops_by_geolocation(-37.818, 144.952, &StopsNearbyOptions::default())
            .await
            .unwrap();
        client
            .stop_details(1071, tram, &StopDetailsOptions::default())
            .await
            .unwrap();

        let paths: Vec<String> = seen.lock().unwrap().iter().map(|u| path_of(u)).collect();
        assert_eq!(
            paths,
            vec![
                "/v3/departures/route_type/0/stop/1071",
                "/v3/departures/route_type/0/stop/1071/route/11",
                "/v3/directions/route/11",
                "/v3/directions/10",
                "/v3/directions/10/route_type/1",
                "/v3/disruptions",
                "/v3/disruptions/route/11",
                "/v3/disruptions/route/11/stop/1071",
                "/v3/disruptions/stop/1071",
                "/v3/disruptions/204917",
                "/v3/disruptions/modes",
                "/v3/fare_estimate/min_zone/1/max_zone/2",
                "/v3/outlets",
                "/v3/outlets/location/-37.818,144.952",
                "/v3/pattern/run/955/route_type/0",
                "/v3/routes",
                "/v3/routes/11",
                "/v3/route_types",
                "/v3/runs/route/11",
                "/v3/runs/route/11/route_type/0",
                "/v3/runs/955",
                "/v3/runs/955/route_type/0",
                "/v3/search/South%20Yarra",
                "/v3/stops/route/11/route_type/0",
                "/v3/stops/location/-37.818,144.952",
                "/v3/stops/1071/route_type/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_outlets_all_ignores_max_distance() {
        let (client, seen) = recording_client().await;
        let options = OutletsOptions {
            max_distance: Some(500),
            max_results: Some(3),
        };
        client.outlets_all(&options).await.unwrap();

        let url = seen.lock().unwrap()[0].clone();
        assert!(url.contains("/v3/outlets?max_results=3&devid=1&signature="));
    }

    #[tokio::test]
    async fn test_free_text_segments_keep_signature_in_query() {
        let (client, seen) = recording_client().await;

        client
            .search("Stop #5", &SearchOptions::default())
            .await
            .unwrap();
        client
            .run_by_ref("what?", &RunsOptions::default())
            .await
            .unwrap();

        let urls = seen.lock().unwrap().clone();
        let expected_paths = ["/v3/search/Stop%20%235", "/v3/runs/what%3F"];
        for (raw, expected_path) in urls.iter().zip(expected_paths) {
            let url = url::Url::parse(raw).unwrap();
            assert_eq!(url.path(), expected_path);
            assert!(url.fragment().is_none());

            let query = url.query().unwrap();
            assert!(query.starts_with("devid=1&signature="), "{query}");
            let sig = query.strip_prefix("devid=1&signature=").unwrap();
            assert_eq!(sig.len(), 40);
        }
    }
}
