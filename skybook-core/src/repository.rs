use std::collections::HashMap;

use async_trait::async_trait;
use skybook_shared::{
    Airplane, AirplaneRecord, AirplaneType, Airport, Crew, FlightRecord, NewAirplane, NewAirplaneType,
    NewAirport, NewCrew, NewFlight, NewRoute, Order, RouteRecord, TicketRecord,
};

use crate::booking::BookingPlan;
use crate::search::{FlightFilter, Page, PageRequest};
use crate::validation::SeatLayout;
use crate::CoreResult;

/// Repository trait for airports, routes and the fleet.
///
/// Inputs are expected to be validated already; implementations enforce
/// referential integrity and report missing references as `NotFound`.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_airport(&self, airport: &NewAirport) -> CoreResult<Airport>;

    async fn list_airports(&self) -> CoreResult<Vec<Airport>>;

    async fn create_route(&self, route: &NewRoute) -> CoreResult<RouteRecord>;

    async fn get_route(&self, id: i64) -> CoreResult<Option<RouteRecord>>;

    async fn list_routes(&self) -> CoreResult<Vec<RouteRecord>>;

    async fn create_airplane_type(&self, airplane_type: &NewAirplaneType) -> CoreResult<AirplaneType>;

    async fn list_airplane_types(&self) -> CoreResult<Vec<AirplaneType>>;

    async fn create_airplane(&self, airplane: &NewAirplane) -> CoreResult<AirplaneRecord>;

    async fn get_airplane(&self, id: i64) -> CoreResult<Option<AirplaneRecord>>;

    async fn list_airplanes(&self) -> CoreResult<Vec<AirplaneRecord>>;

    async fn set_airplane_image(&self, id: i64, image: &str) -> CoreResult<Airplane>;

    async fn create_crew(&self, crew: &NewCrew) -> CoreResult<Crew>;

    async fn list_crews(&self) -> CoreResult<Vec<Crew>>;
}

/// Repository trait for scheduled flights and their seat availability.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn create_flight(&self, flight: &NewFlight) -> CoreResult<FlightRecord>;

    async fn get_flight(&self, id: i64) -> CoreResult<Option<FlightRecord>>;

    /// Flights matching `filter`, ordered by id, each carrying its sold
    /// ticket count from one grouped aggregation.
    async fn list_flights(&self, filter: &FlightFilter) -> CoreResult<Vec<FlightRecord>>;

    /// Seat layouts of the airplanes assigned to `flight_ids`. Unknown ids
    /// are absent from the result.
    async fn seat_layouts(&self, flight_ids: &[i64]) -> CoreResult<HashMap<i64, SeatLayout>>;
}

/// Repository trait for orders and their tickets.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists the order and all of its tickets, or nothing.
    ///
    /// A seat already sold on the same flight, including one sold by a
    /// concurrent commit, fails with `UniquenessConflict`.
    async fn commit_order(&self, plan: &BookingPlan) -> CoreResult<Order>;

    /// Orders of `user_id`, newest first.
    async fn list_orders(&self, user_id: i64, page: PageRequest) -> CoreResult<Page<Order>>;

    /// Tickets ordered by id; all tickets when `user_id` is `None`.
    async fn list_tickets(&self, user_id: Option<i64>) -> CoreResult<Vec<TicketRecord>>;

    async fn get_ticket(&self, id: i64) -> CoreResult<Option<TicketRecord>>;
}
