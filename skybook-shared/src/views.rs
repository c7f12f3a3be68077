//! Response projections.
//!
//! Every entity has one canonical representation in [`crate::models`]; the
//! list and detail endpoints render the plain projections defined here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    Airplane, AirplaneRecord, AirplaneType, Airport, FlightRecord, Order, RouteRecord, TicketRecord,
};

// ============================================================================
// Fleet
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AirplaneListView {
    pub id: i64,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
    pub airplane_type: String,
}

impl From<&AirplaneRecord> for AirplaneListView {
    fn from(record: &AirplaneRecord) -> Self {
        Self {
            id: record.airplane.id,
            name: record.airplane.name.clone(),
            rows: record.airplane.rows,
            seats_in_row: record.airplane.seats_in_row,
            capacity: record.airplane.capacity(),
            airplane_type: record.airplane_type.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AirplaneDetailView {
    pub id: i64,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
    pub airplane_type: AirplaneType,
    pub image: Option<String>,
}

impl From<&AirplaneRecord> for AirplaneDetailView {
    fn from(record: &AirplaneRecord) -> Self {
        Self {
            id: record.airplane.id,
            name: record.airplane.name.clone(),
            rows: record.airplane.rows,
            seats_in_row: record.airplane.seats_in_row,
            capacity: record.airplane.capacity(),
            airplane_type: record.airplane_type.clone(),
            image: record.airplane.image.clone(),
        }
    }
}

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RouteListView {
    pub id: i64,
    pub source: String,
    pub destination: String,
    pub distance: i32,
}

impl From<&RouteRecord> for RouteListView {
    fn from(record: &RouteRecord) -> Self {
        Self {
            id: record.route.id,
            source: record.source.name.clone(),
            destination: record.destination.name.clone(),
            distance: record.route.distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteDetailView {
    pub id: i64,
    pub source: Airport,
    pub destination: Airport,
    pub distance: i32,
}

impl From<&RouteRecord> for RouteDetailView {
    fn from(record: &RouteRecord) -> Self {
        Self {
            id: record.route.id,
            source: record.source.clone(),
            destination: record.destination.clone(),
            distance: record.route.distance,
        }
    }
}

// ============================================================================
// Flights
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FlightListView {
    pub id: i64,
    pub route_info: String,
    pub airplane_name: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub tickets_available: i64,
}

impl From<&FlightRecord> for FlightListView {
    fn from(record: &FlightRecord) -> Self {
        Self {
            id: record.flight.id,
            route_info: record.route.label(),
            airplane_name: record.airplane.name.clone(),
            departure_time: record.flight.departure_time,
            arrival_time: record.flight.arrival_time,
            tickets_available: record.tickets_available(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightDetailView {
    pub id: i64,
    pub route: RouteListView,
    pub airplane: Airplane,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crews: Vec<String>,
    pub tickets_available: i64,
}

impl From<&FlightRecord> for FlightDetailView {
    fn from(record: &FlightRecord) -> Self {
        Self {
            id: record.flight.id,
            route: RouteListView::from(&record.route),
            airplane: record.airplane.clone(),
            departure_time: record.flight.departure_time,
            arrival_time: record.flight.arrival_time,
            crews: record.crews.iter().map(|c| c.full_name()).collect(),
            tickets_available: record.tickets_available(),
        }
    }
}

// ============================================================================
// Orders & Tickets
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TicketListView {
    pub id: i64,
    pub row: i32,
    pub seat: i32,
    pub flight_info: String,
    pub order_id: i64,
}

impl From<&TicketRecord> for TicketListView {
    fn from(record: &TicketRecord) -> Self {
        Self {
            id: record.ticket.id,
            row: record.ticket.row,
            seat: record.ticket.seat,
            flight_info: record.flight_label.clone(),
            order_id: record.order.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketDetailView {
    pub id: i64,
    pub row: i32,
    pub seat: i32,
    pub flight_id: i64,
    pub flight_info: String,
    pub order: Order,
}

impl From<&TicketRecord> for TicketDetailView {
    fn from(record: &TicketRecord) -> Self {
        Self {
            id: record.ticket.id,
            row: record.ticket.row,
            seat: record.ticket.seat,
            flight_id: record.ticket.flight_id,
            flight_info: record.flight_label.clone(),
            order: record.order.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Flight, Route};
    use chrono::TimeZone;

    fn sample_record(sold: i64) -> FlightRecord {
        let kyiv = Airport { id: 1, name: "Boryspil".into(), closest_big_city: "Kyiv".into() };
        let london = Airport { id: 2, name: "Heathrow".into(), closest_big_city: "London".into() };
        FlightRecord {
            flight: Flight {
                id: 5,
                route_id: 3,
                airplane_id: 4,
                departure_time: Utc.with_ymd_and_hms(2024, 6, 9, 8, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2024, 6, 9, 11, 0, 0).unwrap(),
                crew_ids: vec![],
            },
            route: RouteRecord {
                route: Route { id: 3, source_id: 1, destination_id: 2, distance: 2140 },
                source: kyiv,
                destination: london,
            },
            airplane: Airplane {
                id: 4,
                name: "ANN".into(),
                rows: 10,
                seats_in_row: 10,
                airplane_type_id: 1,
                image: None,
            },
            crews: vec![],
            tickets_sold: sold,
        }
    }

    #[test]
    fn test_flight_list_view_projects_availability() {
        let view = FlightListView::from(&sample_record(3));
        assert_eq!(view.route_info, "Boryspil-Heathrow");
        assert_eq!(view.airplane_name, "ANN");
        assert_eq!(view.tickets_available, 97);
    }

    #[test]
    fn test_route_list_view_uses_airport_names() {
        let record = sample_record(0);
        let json = serde_json::to_value(RouteListView::from(&record.route)).unwrap();
        assert_eq!(json["source"], "Boryspil");
        assert_eq!(json["destination"], "Heathrow");
        assert_eq!(json["distance"], 2140);
    }
}
