pub mod network;
pub mod fleet;
pub mod schedule;
pub mod booking;

pub use network::{Airport, NewAirport, NewRoute, Route, RouteRecord};
pub use fleet::{Airplane, AirplaneRecord, AirplaneType, Crew, NewAirplane, NewAirplaneType, NewCrew};
pub use schedule::{flight_label, Flight, FlightRecord, NewFlight};
pub use booking::{NewOrder, Order, Ticket, TicketRecord, TicketRequest};
