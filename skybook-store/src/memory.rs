//! In-memory backend.
//!
//! Implements every repository trait with the same observable semantics as
//! the PostgreSQL backend: ascending ids, referential checks and a seat
//! uniqueness index. All writes happen under one lock, so a commit either
//! applies completely or not at all.
//!
//! Not durable; intended for tests and local development.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use skybook_core::availability::{sold_for, tally_sold};
use skybook_core::booking::BookingPlan;
use skybook_core::repository::{CatalogRepository, FlightRepository, OrderRepository};
use skybook_core::search::{FlightFilter, Page, PageRequest};
use skybook_core::validation::SeatLayout;
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{
    flight_label, Airplane, AirplaneRecord, AirplaneType, Airport, Crew, Flight, FlightRecord, NewAirplane,
    NewAirplaneType, NewAirport, NewCrew, NewFlight, NewRoute, Order, Route, RouteRecord, Ticket, TicketRecord,
};

#[derive(Debug, Clone)]
struct OrderRow {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    airports: BTreeMap<i64, Airport>,
    routes: BTreeMap<i64, Route>,
    airplane_types: BTreeMap<i64, AirplaneType>,
    airplanes: BTreeMap<i64, Airplane>,
    crews: BTreeMap<i64, Crew>,
    flights: BTreeMap<i64, Flight>,
    orders: BTreeMap<i64, OrderRow>,
    tickets: BTreeMap<i64, Ticket>,
    /// Unique index over (flight_id, row, seat).
    seats: HashSet<(i64, i32, i32)>,
}

fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |id| id + 1)
}

impl Tables {
    fn route_record(&self, id: i64) -> CoreResult<RouteRecord> {
        let route = self.routes.get(&id).ok_or_else(|| CoreError::not_found("route", id))?;
        Ok(RouteRecord {
            route: route.clone(),
            source: self.airport(route.source_id)?.clone(),
            destination: self.airport(route.destination_id)?.clone(),
        })
    }

    fn airport(&self, id: i64) -> CoreResult<&Airport> {
        self.airports.get(&id).ok_or_else(|| CoreError::not_found("airport", id))
    }

    fn airplane_record(&self, id: i64) -> CoreResult<AirplaneRecord> {
        let airplane = self.airplanes.get(&id).ok_or_else(|| CoreError::not_found("airplane", id))?;
        let airplane_type = self
            .airplane_types
            .get(&airplane.airplane_type_id)
            .ok_or_else(|| CoreError::not_found("airplane type", airplane.airplane_type_id))?;
        Ok(AirplaneRecord { airplane: airplane.clone(), airplane_type: airplane_type.clone() })
    }

    fn flight_record(&self, flight: &Flight, sold: &HashMap<i64, i64>) -> CoreResult<FlightRecord> {
        let airplane = self
            .airplanes
            .get(&flight.airplane_id)
            .ok_or_else(|| CoreError::not_found("airplane", flight.airplane_id))?;
        let crews = flight
            .crew_ids
            .iter()
            .filter_map(|id| self.crews.get(id).cloned())
            .collect();
        Ok(FlightRecord {
            flight: flight.clone(),
            route: self.route_record(flight.route_id)?,
            airplane: airplane.clone(),
            crews,
            tickets_sold: sold_for(sold, flight.id),
        })
    }

    fn order(&self, row: &OrderRow) -> Order {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .values()
            .filter(|t| t.order_id == row.id)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| (t.row, t.seat));
        Order { id: row.id, user_id: row.user_id, created_at: row.created_at, tickets }
    }

    fn ticket_record(&self, ticket: &Ticket) -> CoreResult<TicketRecord> {
        let flight = self
            .flights
            .get(&ticket.flight_id)
            .ok_or_else(|| CoreError::not_found("flight", ticket.flight_id))?;
        let route = self.route_record(flight.route_id)?;
        let order = self
            .orders
            .get(&ticket.order_id)
            .ok_or_else(|| CoreError::not_found("order", ticket.order_id))?;
        Ok(TicketRecord {
            ticket: ticket.clone(),
            flight_label: flight_label(&route.source.name, &route.destination.name, flight.departure_time),
            order: self.order(order),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn create_airport(&self, airport: &NewAirport) -> CoreResult<Airport> {
        let mut tables = self.tables.write().await;
        let created = Airport {
            id: next_id(&tables.airports),
            name: airport.name.clone(),
            closest_big_city: airport.closest_big_city.clone(),
        };
        tables.airports.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_airports(&self) -> CoreResult<Vec<Airport>> {
        Ok(self.tables.read().await.airports.values().cloned().collect())
    }

    async fn create_route(&self, route: &NewRoute) -> CoreResult<RouteRecord> {
        let mut tables = self.tables.write().await;
        tables.airport(route.source_id)?;
        tables.airport(route.destination_id)?;
        let id = next_id(&tables.routes);
        tables.routes.insert(
            id,
            Route {
                id,
                source_id: route.source_id,
                destination_id: route.destination_id,
                distance: route.distance,
            },
        );
        tables.route_record(id)
    }

    async fn get_route(&self, id: i64) -> CoreResult<Option<RouteRecord>> {
        let tables = self.tables.read().await;
        if !tables.routes.contains_key(&id) {
            return Ok(None);
        }
        tables.route_record(id).map(Some)
    }

    async fn list_routes(&self) -> CoreResult<Vec<RouteRecord>> {
        let tables = self.tables.read().await;
        tables.routes.keys().map(|id| tables.route_record(*id)).collect()
    }

    async fn create_airplane_type(&self, airplane_type: &NewAirplaneType) -> CoreResult<AirplaneType> {
        let mut tables = self.tables.write().await;
        let created = AirplaneType { id: next_id(&tables.airplane_types), name: airplane_type.name.clone() };
        tables.airplane_types.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_airplane_types(&self) -> CoreResult<Vec<AirplaneType>> {
        Ok(self.tables.read().await.airplane_types.values().cloned().collect())
    }

    async fn create_airplane(&self, airplane: &NewAirplane) -> CoreResult<AirplaneRecord> {
        let mut tables = self.tables.write().await;
        if !tables.airplane_types.contains_key(&airplane.airplane_type_id) {
            return Err(CoreError::not_found("airplane type", airplane.airplane_type_id));
        }
        let id = next_id(&tables.airplanes);
        tables.airplanes.insert(
            id,
            Airplane {
                id,
                name: airplane.name.clone(),
                rows: airplane.rows,
                seats_in_row: airplane.seats_in_row,
                airplane_type_id: airplane.airplane_type_id,
                image: None,
            },
        );
        tables.airplane_record(id)
    }

    async fn get_airplane(&self, id: i64) -> CoreResult<Option<AirplaneRecord>> {
        let tables = self.tables.read().await;
        if !tables.airplanes.contains_key(&id) {
            return Ok(None);
        }
        tables.airplane_record(id).map(Some)
    }

    async fn list_airplanes(&self) -> CoreResult<Vec<AirplaneRecord>> {
        let tables = self.tables.read().await;
        tables.airplanes.keys().map(|id| tables.airplane_record(*id)).collect()
    }

    async fn set_airplane_image(&self, id: i64, image: &str) -> CoreResult<Airplane> {
        let mut tables = self.tables.write().await;
        let airplane = tables.airplanes.get_mut(&id).ok_or_else(|| CoreError::not_found("airplane", id))?;
        airplane.image = Some(image.to_string());
        Ok(airplane.clone())
    }

    async fn create_crew(&self, crew: &NewCrew) -> CoreResult<Crew> {
        let mut tables = self.tables.write().await;
        let created = Crew {
            id: next_id(&tables.crews),
            first_name: crew.first_name.clone(),
            last_name: crew.last_name.clone(),
        };
        tables.crews.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_crews(&self) -> CoreResult<Vec<Crew>> {
        Ok(self.tables.read().await.crews.values().cloned().collect())
    }
}

// ============================================================================
// Flights
// ============================================================================

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn create_flight(&self, flight: &NewFlight) -> CoreResult<FlightRecord> {
        let mut tables = self.tables.write().await;
        if !tables.routes.contains_key(&flight.route_id) {
            return Err(CoreError::not_found("route", flight.route_id));
        }
        if !tables.airplanes.contains_key(&flight.airplane_id) {
            return Err(CoreError::not_found("airplane", flight.airplane_id));
        }
        if let Some(missing) = flight.crews.iter().find(|id| !tables.crews.contains_key(id)) {
            return Err(CoreError::not_found("crew", *missing));
        }

        let mut crew_ids = flight.crews.clone();
        crew_ids.sort_unstable();
        crew_ids.dedup();

        let created = Flight {
            id: next_id(&tables.flights),
            route_id: flight.route_id,
            airplane_id: flight.airplane_id,
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
            crew_ids,
        };
        tables.flights.insert(created.id, created.clone());
        tables.flight_record(&created, &HashMap::new())
    }

    async fn get_flight(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        let tables = self.tables.read().await;
        let Some(flight) = tables.flights.get(&id) else {
            return Ok(None);
        };
        let sold = tally_sold(tables.tickets.values().filter(|t| t.flight_id == id));
        tables.flight_record(flight, &sold).map(Some)
    }

    async fn list_flights(&self, filter: &FlightFilter) -> CoreResult<Vec<FlightRecord>> {
        let tables = self.tables.read().await;
        let sold = tally_sold(tables.tickets.values());
        let mut records = Vec::new();
        for flight in tables.flights.values() {
            let record = tables.flight_record(flight, &sold)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn seat_layouts(&self, flight_ids: &[i64]) -> CoreResult<HashMap<i64, SeatLayout>> {
        let tables = self.tables.read().await;
        Ok(flight_ids
            .iter()
            .filter_map(|id| {
                let flight = tables.flights.get(id)?;
                let airplane = tables.airplanes.get(&flight.airplane_id)?;
                Some((*id, SeatLayout::from(airplane)))
            })
            .collect())
    }
}

// ============================================================================
// Orders
// ============================================================================

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn commit_order(&self, plan: &BookingPlan) -> CoreResult<Order> {
        let mut tables = self.tables.write().await;

        // Check everything before the first write.
        for (index, request) in plan.tickets().iter().enumerate() {
            if !tables.flights.contains_key(&request.flight_id) {
                return Err(CoreError::not_found("flight", request.flight_id));
            }
            if tables.seats.contains(&(request.flight_id, request.row, request.seat)) {
                return Err(CoreError::seat_taken(index, request));
            }
        }

        let order = OrderRow { id: next_id(&tables.orders), user_id: plan.user_id(), created_at: Utc::now() };
        tables.orders.insert(order.id, order.clone());

        for request in plan.tickets() {
            let id = next_id(&tables.tickets);
            tables.tickets.insert(
                id,
                Ticket {
                    id,
                    row: request.row,
                    seat: request.seat,
                    flight_id: request.flight_id,
                    order_id: order.id,
                },
            );
            tables.seats.insert((request.flight_id, request.row, request.seat));
        }

        Ok(tables.order(&order))
    }

    async fn list_orders(&self, user_id: i64, page: PageRequest) -> CoreResult<Page<Order>> {
        let tables = self.tables.read().await;
        let owned: Vec<&OrderRow> = tables.orders.values().rev().filter(|o| o.user_id == user_id).collect();
        let results = owned
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|row| tables.order(row))
            .collect();
        Ok(Page {
            count: owned.len() as u64,
            page: page.page,
            page_size: page.page_size,
            results,
        })
    }

    async fn list_tickets(&self, user_id: Option<i64>) -> CoreResult<Vec<TicketRecord>> {
        let tables = self.tables.read().await;
        tables
            .tickets
            .values()
            .filter(|t| match user_id {
                Some(user_id) => tables.orders.get(&t.order_id).is_some_and(|o| o.user_id == user_id),
                None => true,
            })
            .map(|t| tables.ticket_record(t))
            .collect()
    }

    async fn get_ticket(&self, id: i64) -> CoreResult<Option<TicketRecord>> {
        let tables = self.tables.read().await;
        match tables.tickets.get(&id) {
            Some(ticket) => tables.ticket_record(ticket).map(Some),
            None => Ok(None),
        }
    }
}
