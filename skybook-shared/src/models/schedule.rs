use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fleet::{Airplane, Crew};
use super::network::RouteRecord;

/// A scheduled movement of one airplane along one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub route_id: i64,
    pub airplane_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFlight {
    #[serde(alias = "route")]
    pub route_id: i64,
    #[serde(alias = "airplane")]
    pub airplane_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    #[serde(default, alias = "crew_ids")]
    pub crews: Vec<i64>,
}

/// A flight joined with everything needed to render it, plus the number of
/// tickets sold at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub flight: Flight,
    pub route: RouteRecord,
    pub airplane: Airplane,
    pub crews: Vec<Crew>,
    pub tickets_sold: i64,
}

impl FlightRecord {
    /// Remaining sellable seats: capacity minus tickets sold.
    pub fn tickets_available(&self) -> i64 {
        self.airplane.capacity() - self.tickets_sold
    }

    pub fn label(&self) -> String {
        flight_label(&self.route.source.name, &self.route.destination.name, self.flight.departure_time)
    }
}

/// Human label of a flight, e.g. `Boryspil-Heathrow departing at 2024-06-09T08:00:00+00:00`.
pub fn flight_label(source: &str, destination: &str, departure: DateTime<Utc>) -> String {
    format!("{}-{} departing at {}", source, destination, departure.to_rfc3339())
}
