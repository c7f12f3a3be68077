use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use skybook_shared::FlightRecord;

/// Optional narrowing of the flight list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightFilter {
    /// Departure calendar date (UTC).
    #[serde(default, rename = "departure_time")]
    pub departure_date: Option<NaiveDate>,
    /// Arrival calendar date (UTC).
    #[serde(default, rename = "arrival_time")]
    pub arrival_date: Option<NaiveDate>,
    /// Case-insensitive substring of the airplane name.
    #[serde(default, rename = "airplane")]
    pub airplane_name: Option<String>,
}

impl FlightFilter {
    pub fn matches(&self, record: &FlightRecord) -> bool {
        if let Some(date) = self.departure_date {
            if record.flight.departure_time.date_naive() != date {
                return false;
            }
        }
        if let Some(date) = self.arrival_date {
            if record.flight.arrival_time.date_naive() != date {
                return false;
            }
        }
        match self.airplane_name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => record
                .airplane
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// Page-number pagination, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Clamps caller input: page at least 1, size within `[1, max_size]`.
    pub fn new(page: Option<u32>, page_size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(default_size).clamp(1, max_size.max(1)),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
