//! First phase of order placement: turn a raw ticket list into a plan that
//! is known to satisfy every application-level rule.
//!
//! A plan says nothing about seats sold by other orders. The storage layer
//! re-checks seat uniqueness when the plan is committed.

use std::collections::{HashMap, HashSet};

use skybook_shared::TicketRequest;

use crate::validation::SeatLayout;
use crate::{CoreError, CoreResult};

/// A validated, not yet persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPlan {
    user_id: i64,
    tickets: Vec<TicketRequest>,
}

impl BookingPlan {
    /// Checks tickets in input order and stops at the first failure.
    ///
    /// `layouts` must hold the seat layout of every flight the request
    /// refers to; a missing entry is reported as an unknown flight.
    pub fn validate(
        user_id: i64,
        requests: &[TicketRequest],
        layouts: &HashMap<i64, SeatLayout>,
    ) -> CoreResult<Self> {
        if requests.is_empty() {
            return Err(CoreError::EmptyRequest);
        }

        let mut claimed = HashSet::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let layout = layouts
                .get(&request.flight_id)
                .ok_or_else(|| CoreError::not_found("flight", request.flight_id))?;

            layout
                .check_seat(request.row, request.seat)
                .map_err(|e| e.in_ticket(index))?;

            if !claimed.insert((request.flight_id, request.row, request.seat)) {
                return Err(CoreError::seat_taken(index, request));
            }
        }

        tracing::debug!(user_id, tickets = requests.len(), "booking plan validated");
        Ok(Self { user_id, tickets: requests.to_vec() })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn tickets(&self) -> &[TicketRequest] {
        &self.tickets
    }
}

/// Distinct flight ids referenced by `requests`, in order of first use.
pub fn referenced_flights(requests: &[TicketRequest]) -> Vec<i64> {
    let mut seen = HashSet::new();
    requests
        .iter()
        .map(|r| r.flight_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
