use skybook_core::validation::check_flight_window;
use skybook_core::CoreResult;
use skybook_shared::NewFlight;

/// Only the schedule window is checked. Overlapping flights of the same
/// airplane are accepted.
pub fn validate_flight(flight: &NewFlight) -> CoreResult<()> {
    check_flight_window(flight.departure_time, flight.arrival_time)
}
