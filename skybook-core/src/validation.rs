//! Admissibility rules for reference data and seats.
//!
//! These functions are the single place each rule lives; both the catalog
//! service and the booking path call them.

use chrono::{DateTime, Duration, Utc};

use crate::{CoreError, CoreResult};

/// Inclusive integer bounds for a named attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn check(&self, field: &str, value: i64) -> CoreResult<()> {
        if self.contains(value) {
            return Ok(());
        }
        Err(CoreError::RangeViolation {
            field: field.to_string(),
            value,
            min: self.min,
            max: self.max,
        })
    }
}

pub const AIRPLANE_ROWS: Bounds = Bounds::new(1, 40);
pub const AIRPLANE_SEATS_IN_ROW: Bounds = Bounds::new(3, 15);
pub const ROUTE_DISTANCE_KM: Bounds = Bounds::new(19, 17_000);
/// 15 minutes to 24 hours, both ends admissible.
pub const FLIGHT_DURATION_SECS: Bounds = Bounds::new(900, 86_400);

/// Seating geometry of the airplane assigned to a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    pub rows: i32,
    pub seats_in_row: i32,
}

impl SeatLayout {
    pub fn new(rows: i32, seats_in_row: i32) -> Self {
        Self { rows, seats_in_row }
    }

    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }

    /// Fails with `RangeViolation` on `row` or `seat` when the pair does not
    /// name a physical seat of this layout.
    pub fn check_seat(&self, row: i32, seat: i32) -> CoreResult<()> {
        Bounds::new(1, i64::from(self.rows)).check("row", i64::from(row))?;
        Bounds::new(1, i64::from(self.seats_in_row)).check("seat", i64::from(seat))
    }
}

impl From<&skybook_shared::Airplane> for SeatLayout {
    fn from(airplane: &skybook_shared::Airplane) -> Self {
        Self::new(airplane.rows, airplane.seats_in_row)
    }
}

/// Rejects implausible schedules. A negative duration falls under the same
/// lower bound rather than a separate error.
pub fn check_flight_window(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> CoreResult<()> {
    // Sub-second precision counts against the bounds.
    let duration = arrival - departure;
    if duration >= Duration::seconds(FLIGHT_DURATION_SECS.min)
        && duration <= Duration::seconds(FLIGHT_DURATION_SECS.max)
    {
        return Ok(());
    }
    Err(CoreError::InvalidDuration {
        seconds: duration.num_seconds(),
        min: FLIGHT_DURATION_SECS.min,
        max: FLIGHT_DURATION_SECS.max,
    })
}

pub fn check_airplane_dimensions(rows: i32, seats_in_row: i32) -> CoreResult<()> {
    AIRPLANE_ROWS.check("rows", i64::from(rows))?;
    AIRPLANE_SEATS_IN_ROW.check("seats_in_row", i64::from(seats_in_row))
}

pub fn check_route_distance(distance: i32) -> CoreResult<()> {
    ROUTE_DISTANCE_KM.check("distance", i64::from(distance))
}

pub fn require_text(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::BlankField { field: field.to_string() });
    }
    Ok(())
}
