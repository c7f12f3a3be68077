use std::sync::Arc;

use skybook_core::repository::{CatalogRepository, FlightRepository};
use skybook_core::search::FlightFilter;
use skybook_core::CoreResult;
use skybook_shared::{
    Airplane, AirplaneRecord, AirplaneType, Airport, Crew, FlightRecord, NewAirplane, NewAirplaneType,
    NewAirport, NewCrew, NewFlight, NewRoute, RouteRecord,
};

use crate::fleet::{validate_airplane, validate_airplane_type, validate_crew};
use crate::network::{validate_airport, validate_route};
use crate::schedule::validate_flight;

/// Reference data access. Every `create_*` validates the payload first and
/// touches storage only when it is admissible.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    flights: Arc<dyn FlightRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, flights: Arc<dyn FlightRepository>) -> Self {
        Self { catalog, flights }
    }

    // ------------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------------

    pub async fn create_airport(&self, airport: &NewAirport) -> CoreResult<Airport> {
        validate_airport(airport)?;
        let created = self.catalog.create_airport(airport).await?;
        tracing::info!(airport_id = created.id, name = %created.name, "airport created");
        Ok(created)
    }

    pub async fn list_airports(&self) -> CoreResult<Vec<Airport>> {
        self.catalog.list_airports().await
    }

    pub async fn create_route(&self, route: &NewRoute) -> CoreResult<RouteRecord> {
        validate_route(route)?;
        let created = self.catalog.create_route(route).await?;
        tracing::info!(route_id = created.route.id, route = %created.label(), "route created");
        Ok(created)
    }

    pub async fn get_route(&self, id: i64) -> CoreResult<Option<RouteRecord>> {
        self.catalog.get_route(id).await
    }

    pub async fn list_routes(&self) -> CoreResult<Vec<RouteRecord>> {
        self.catalog.list_routes().await
    }

    // ------------------------------------------------------------------------
    // Fleet
    // ------------------------------------------------------------------------

    pub async fn create_airplane_type(&self, airplane_type: &NewAirplaneType) -> CoreResult<AirplaneType> {
        validate_airplane_type(airplane_type)?;
        self.catalog.create_airplane_type(airplane_type).await
    }

    pub async fn list_airplane_types(&self) -> CoreResult<Vec<AirplaneType>> {
        self.catalog.list_airplane_types().await
    }

    pub async fn create_airplane(&self, airplane: &NewAirplane) -> CoreResult<AirplaneRecord> {
        validate_airplane(airplane)?;
        let created = self.catalog.create_airplane(airplane).await?;
        tracing::info!(
            airplane_id = created.airplane.id,
            capacity = created.airplane.capacity(),
            "airplane created"
        );
        Ok(created)
    }

    pub async fn get_airplane(&self, id: i64) -> CoreResult<Option<AirplaneRecord>> {
        self.catalog.get_airplane(id).await
    }

    pub async fn list_airplanes(&self) -> CoreResult<Vec<AirplaneRecord>> {
        self.catalog.list_airplanes().await
    }

    pub async fn set_airplane_image(&self, id: i64, image: &str) -> CoreResult<Airplane> {
        self.catalog.set_airplane_image(id, image).await
    }

    pub async fn create_crew(&self, crew: &NewCrew) -> CoreResult<Crew> {
        validate_crew(crew)?;
        self.catalog.create_crew(crew).await
    }

    pub async fn list_crews(&self) -> CoreResult<Vec<Crew>> {
        self.catalog.list_crews().await
    }

    // ------------------------------------------------------------------------
    // Schedule
    // ------------------------------------------------------------------------

    pub async fn create_flight(&self, flight: &NewFlight) -> CoreResult<FlightRecord> {
        validate_flight(flight)?;
        let created = self.flights.create_flight(flight).await?;
        tracing::info!(flight_id = created.flight.id, flight = %created.label(), "flight scheduled");
        Ok(created)
    }

    pub async fn get_flight(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        self.flights.get_flight(id).await
    }

    pub async fn list_flights(&self, filter: &FlightFilter) -> CoreResult<Vec<FlightRecord>> {
        self.flights.list_flights(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skybook_core::CoreError;
    use skybook_store::MemoryStore;

    fn service() -> CatalogService {
        let store = Arc::new(MemoryStore::new());
        CatalogService::new(store.clone(), store)
    }

    async fn route_and_airplane(service: &CatalogService) -> (i64, i64) {
        let airport = service
            .create_airport(&NewAirport { name: "Freedom".into(), closest_big_city: "Lviv".into() })
            .await
            .unwrap();
        let route = service
            .create_route(&NewRoute { source_id: airport.id, destination_id: airport.id, distance: 50 })
            .await
            .unwrap();
        let kind = service.create_airplane_type(&NewAirplaneType { name: "Big".into() }).await.unwrap();
        let airplane = service
            .create_airplane(&NewAirplane { name: "ANN".into(), rows: 10, seats_in_row: 10, airplane_type_id: kind.id })
            .await
            .unwrap();
        (route.route.id, airplane.airplane.id)
    }

    #[tokio::test]
    async fn test_invalid_flight_never_reaches_storage() {
        let service = service();
        let (route_id, airplane_id) = route_and_airplane(&service).await;

        let err = service
            .create_flight(&NewFlight {
                route_id,
                airplane_id,
                departure_time: Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2024, 6, 9, 0, 10, 0).unwrap(),
                crews: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidDuration { seconds: 600, .. }));
        assert!(service.list_flights(&FlightFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_airplane_with_unknown_type_is_not_found() {
        let service = service();
        let err = service
            .create_airplane(&NewAirplane { name: "ANN".into(), rows: 10, seats_in_row: 10, airplane_type_id: 77 })
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NotFound { entity: "airplane type", id: 77 });
    }

    #[tokio::test]
    async fn test_new_flight_starts_with_full_capacity() {
        let service = service();
        let (route_id, airplane_id) = route_and_airplane(&service).await;

        let flight = service
            .create_flight(&NewFlight {
                route_id,
                airplane_id,
                departure_time: Utc.with_ymd_and_hms(2024, 6, 9, 8, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap(),
                crews: vec![],
            })
            .await
            .unwrap();

        assert_eq!(flight.tickets_available(), 100);
    }
}
