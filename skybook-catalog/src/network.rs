use skybook_core::validation::{check_route_distance, require_text};
use skybook_core::CoreResult;
use skybook_shared::{NewAirport, NewRoute};

pub fn validate_airport(airport: &NewAirport) -> CoreResult<()> {
    require_text("name", &airport.name)?;
    require_text("closest_big_city", &airport.closest_big_city)
}

/// Source and destination may name the same airport; only the distance is
/// constrained.
pub fn validate_route(route: &NewRoute) -> CoreResult<()> {
    check_route_distance(route.distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_requires_name_and_city() {
        let ok = NewAirport { name: "Freedom".into(), closest_big_city: "Lviv".into() };
        assert!(validate_airport(&ok).is_ok());

        let blank_city = NewAirport { name: "Freedom".into(), closest_big_city: "".into() };
        assert_eq!(validate_airport(&blank_city).unwrap_err().field(), Some("closest_big_city"));
    }

    #[test]
    fn test_loop_route_is_allowed() {
        let route = NewRoute { source_id: 1, destination_id: 1, distance: 50 };
        assert!(validate_route(&route).is_ok());
    }

    #[test]
    fn test_short_route_is_rejected() {
        let route = NewRoute { source_id: 1, destination_id: 2, distance: 5 };
        assert_eq!(validate_route(&route).unwrap_err().field(), Some("distance"));
    }
}
