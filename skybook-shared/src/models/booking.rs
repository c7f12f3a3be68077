use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchase grouping one or more tickets. Tickets are created and
/// deleted together with their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<Ticket>,
}

/// A single seat reservation on one flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub row: i32,
    pub seat: i32,
    pub flight_id: i64,
    pub order_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketRequest {
    pub row: i32,
    pub seat: i32,
    #[serde(alias = "flight")]
    pub flight_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub tickets: Vec<TicketRequest>,
}

/// A ticket joined with its flight label and owning order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub ticket: Ticket,
    pub flight_label: String,
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_request_accepts_flight_alias() {
        let json = r#"{"tickets": [{"row": 2, "seat": 4, "flight": 7}, {"row": 1, "seat": 1, "flight_id": 7}]}"#;
        let order: NewOrder = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(order.tickets.len(), 2);
        assert_eq!(order.tickets[0], TicketRequest { row: 2, seat: 4, flight_id: 7 });
        assert_eq!(order.tickets[1].flight_id, 7);
    }

    #[test]
    fn test_missing_tickets_defaults_to_empty() {
        let order: NewOrder = serde_json::from_str("{}").expect("Failed to deserialize");
        assert!(order.tickets.is_empty());
    }
}
