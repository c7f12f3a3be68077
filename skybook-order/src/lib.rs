pub mod manager;

pub use manager::BookingManager;
