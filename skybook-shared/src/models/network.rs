use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAirport {
    pub name: String,
    pub closest_big_city: String,
}

/// A source/destination airport pair with a fixed distance in km.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub source_id: i64,
    pub destination_id: i64,
    pub distance: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoute {
    #[serde(alias = "source")]
    pub source_id: i64,
    #[serde(alias = "destination")]
    pub destination_id: i64,
    pub distance: i32,
}

/// A route joined with both of its airports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub route: Route,
    pub source: Airport,
    pub destination: Airport,
}

impl RouteRecord {
    /// Short human label, e.g. `Boryspil-Heathrow`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.source.name, self.destination.name)
    }
}
