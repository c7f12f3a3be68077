pub mod validation;
pub mod availability;
pub mod booking;
pub mod search;
pub mod repository;

use skybook_shared::TicketRequest;

/// Failures of the booking domain. Every variant except `Storage` is an
/// expected, client-attributable outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{field} must be in range [{min}, {max}], got {value}")]
    RangeViolation {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("flight duration must be between {min} and {max} seconds, got {seconds}")]
    InvalidDuration { seconds: i64, min: i64, max: i64 },
    #[error("seat {seat} in row {row} on flight {flight_id} is already taken")]
    UniquenessConflict { field: String, row: i32, seat: i32, flight_id: i64 },
    #[error("an order must contain at least one ticket")]
    EmptyRequest,
    #[error("{field} may not be blank")]
    BlankField { field: String },
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// The seat claimed by the ticket at `index` of an order is sold.
    pub fn seat_taken(index: usize, request: &TicketRequest) -> Self {
        Self::UniquenessConflict {
            field: format!("tickets[{}]", index),
            row: request.row,
            seat: request.seat,
            flight_id: request.flight_id,
        }
    }

    /// The request attribute the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::RangeViolation { field, .. }
            | CoreError::BlankField { field }
            | CoreError::UniquenessConflict { field, .. } => Some(field),
            CoreError::InvalidDuration { .. } => Some("arrival_time"),
            CoreError::EmptyRequest => Some("tickets"),
            CoreError::InvalidImage(_) => Some("image"),
            _ => None,
        }
    }

    /// Re-attributes a field-level error to the ticket at `index` of an
    /// order payload, e.g. `row` becomes `tickets[2].row`.
    pub fn in_ticket(self, index: usize) -> Self {
        match self {
            CoreError::RangeViolation { field, value, min, max } => CoreError::RangeViolation {
                field: format!("tickets[{}].{}", index, field),
                value,
                min,
                max,
            },
            other => other,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
