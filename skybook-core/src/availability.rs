//! Seats remaining per flight, computed from grouped ticket counts.

use std::collections::HashMap;

use skybook_shared::Ticket;

/// Counts tickets per flight in a single pass.
pub fn tally_sold<'a, I>(tickets: I) -> HashMap<i64, i64>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut sold = HashMap::new();
    for ticket in tickets {
        *sold.entry(ticket.flight_id).or_insert(0) += 1;
    }
    sold
}

/// Sold count for `flight_id`; flights without tickets have sold nothing.
pub fn sold_for(sold: &HashMap<i64, i64>, flight_id: i64) -> i64 {
    sold.get(&flight_id).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: i64, row: i32, seat: i32, flight_id: i64) -> Ticket {
        Ticket { id, row, seat, flight_id, order_id: 1 }
    }

    #[test]
    fn test_tally_groups_by_flight() {
        let tickets = vec![ticket(1, 1, 1, 10), ticket(2, 1, 2, 10), ticket(3, 1, 3, 10), ticket(4, 1, 1, 11)];
        let sold = tally_sold(&tickets);
        assert_eq!(sold_for(&sold, 10), 3);
        assert_eq!(sold_for(&sold, 11), 1);
        assert_eq!(sold_for(&sold, 12), 0);
    }

    #[test]
    fn test_tally_is_stable_across_calls() {
        let tickets = vec![ticket(1, 2, 2, 10)];
        assert_eq!(tally_sold(&tickets), tally_sold(&tickets));
    }
}
