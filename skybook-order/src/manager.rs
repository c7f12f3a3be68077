use std::sync::Arc;

use skybook_core::booking::{referenced_flights, BookingPlan};
use skybook_core::repository::{FlightRepository, OrderRepository};
use skybook_core::search::{Page, PageRequest};
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{NewOrder, Order, TicketRecord};

/// Places orders in two explicit phases.
///
/// `prepare` runs every application-level check against current flight
/// data and has no side effects. `commit` hands the plan to storage, which
/// writes the order and its tickets atomically and is the final judge of
/// seat uniqueness.
#[derive(Clone)]
pub struct BookingManager {
    flights: Arc<dyn FlightRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl BookingManager {
    pub fn new(flights: Arc<dyn FlightRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { flights, orders }
    }

    pub async fn prepare(&self, user_id: i64, request: &NewOrder) -> CoreResult<BookingPlan> {
        if request.tickets.is_empty() {
            return Err(CoreError::EmptyRequest);
        }
        let flight_ids = referenced_flights(&request.tickets);
        let layouts = self.flights.seat_layouts(&flight_ids).await?;
        BookingPlan::validate(user_id, &request.tickets, &layouts)
    }

    pub async fn commit(&self, plan: &BookingPlan) -> CoreResult<Order> {
        match self.orders.commit_order(plan).await {
            Ok(order) => {
                tracing::info!(
                    order_id = order.id,
                    user_id = order.user_id,
                    tickets = order.tickets.len(),
                    "order placed"
                );
                Ok(order)
            }
            Err(err @ CoreError::UniquenessConflict { .. }) => {
                tracing::warn!(user_id = plan.user_id(), error = %err, "order lost seat race");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// `prepare` followed by `commit`.
    pub async fn place_order(&self, user_id: i64, request: &NewOrder) -> CoreResult<Order> {
        let plan = self.prepare(user_id, request).await?;
        self.commit(&plan).await
    }

    pub async fn list_orders(&self, user_id: i64, page: PageRequest) -> CoreResult<Page<Order>> {
        self.orders.list_orders(user_id, page).await
    }

    /// Tickets visible to a caller: their own, or every ticket for staff.
    pub async fn list_tickets(&self, user_id: i64, is_admin: bool) -> CoreResult<Vec<TicketRecord>> {
        let scope = if is_admin { None } else { Some(user_id) };
        self.orders.list_tickets(scope).await
    }

    pub async fn get_ticket(&self, user_id: i64, is_admin: bool, id: i64) -> CoreResult<TicketRecord> {
        match self.orders.get_ticket(id).await? {
            Some(record) if is_admin || record.order.user_id == user_id => Ok(record),
            _ => Err(CoreError::not_found("ticket", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skybook_core::repository::CatalogRepository;
    use skybook_core::search::FlightFilter;
    use skybook_shared::{NewAirplane, NewAirplaneType, NewAirport, NewFlight, NewRoute, TicketRequest};
    use skybook_store::MemoryStore;

    async fn store_with_flight(rows: i32, seats_in_row: i32) -> (Arc<MemoryStore>, i64) {
        let store = Arc::new(MemoryStore::new());
        let airport = store
            .create_airport(&NewAirport { name: "Freedom".into(), closest_big_city: "Lviv".into() })
            .await
            .unwrap();
        let route = store
            .create_route(&NewRoute { source_id: airport.id, destination_id: airport.id, distance: 50 })
            .await
            .unwrap();
        let kind = store.create_airplane_type(&NewAirplaneType { name: "Big".into() }).await.unwrap();
        let airplane = store
            .create_airplane(&NewAirplane { name: "ANN".into(), rows, seats_in_row, airplane_type_id: kind.id })
            .await
            .unwrap();
        let flight = store
            .create_flight(&NewFlight {
                route_id: route.route.id,
                airplane_id: airplane.airplane.id,
                departure_time: Utc.with_ymd_and_hms(2024, 6, 9, 8, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap(),
                crews: vec![],
            })
            .await
            .unwrap();
        (store, flight.flight.id)
    }

    fn manager(store: &Arc<MemoryStore>) -> BookingManager {
        BookingManager::new(store.clone(), store.clone())
    }

    fn order(tickets: &[(i32, i32, i64)]) -> NewOrder {
        NewOrder {
            tickets: tickets
                .iter()
                .map(|&(row, seat, flight_id)| TicketRequest { row, seat, flight_id })
                .collect(),
        }
    }

    async fn available(store: &Arc<MemoryStore>, flight_id: i64) -> i64 {
        store.get_flight(flight_id).await.unwrap().unwrap().tickets_available()
    }

    #[tokio::test]
    async fn test_three_tickets_leave_ninety_seven_seats() {
        let (store, flight) = store_with_flight(10, 10).await;
        let manager = manager(&store);

        let placed = manager
            .place_order(1, &order(&[(1, 1, flight), (1, 2, flight), (2, 5, flight)]))
            .await
            .unwrap();

        assert_eq!(placed.tickets.len(), 3);
        assert!(placed.tickets.iter().all(|t| t.order_id == placed.id));
        assert_eq!(available(&store, flight).await, 97);
        // Re-reading an unchanged flight yields the same count.
        assert_eq!(available(&store, flight).await, 97);

        let listed = store.list_flights(&FlightFilter::default()).await.unwrap();
        assert_eq!(listed[0].tickets_available(), 97);
    }

    #[tokio::test]
    async fn test_mixed_valid_and_invalid_ticket_persists_nothing() {
        let (store, flight) = store_with_flight(10, 10).await;
        let manager = manager(&store);

        let err = manager
            .place_order(1, &order(&[(1, 1, flight), (11, 1, flight)]))
            .await
            .unwrap_err();

        assert_eq!(err.field(), Some("tickets[1].row"));
        assert_eq!(available(&store, flight).await, 100);
        let page = manager.list_orders(1, PageRequest::new(None, None, 10, 100)).await.unwrap();
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn test_seat_sold_earlier_is_a_conflict_and_rolls_back_whole_order() {
        let (store, flight) = store_with_flight(10, 10).await;
        let manager = manager(&store);
        manager.place_order(1, &order(&[(4, 4, flight)])).await.unwrap();

        let err = manager
            .place_order(2, &order(&[(5, 5, flight), (4, 4, flight)]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::UniquenessConflict { field: "tickets[1]".into(), row: 4, seat: 4, flight_id: flight }
        );
        assert_eq!(available(&store, flight).await, 99);
        assert_eq!(manager.list_tickets(2, false).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_racing_bookings_of_one_seat_have_one_winner() {
        let (store, flight) = store_with_flight(10, 10).await;
        let manager = manager(&store);
        let request = order(&[(1, 1, flight)]);

        // Both pass the application-level checks before either commits.
        let first = manager.prepare(1, &request).await.unwrap();
        let second = manager.prepare(2, &request).await.unwrap();

        let a = tokio::spawn({
            let manager = manager.clone();
            async move { manager.commit(&first).await }
        });
        let b = tokio::spawn({
            let manager = manager.clone();
            async move { manager.commit(&second).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(CoreError::UniquenessConflict { row: 1, seat: 1, .. })
        )));
        assert_eq!(available(&store, flight).await, 99);
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let (store, _) = store_with_flight(10, 10).await;
        let err = manager(&store).place_order(1, &order(&[])).await.unwrap_err();
        assert_eq!(err, CoreError::EmptyRequest);
    }

    #[tokio::test]
    async fn test_unknown_flight_is_not_found() {
        let (store, flight) = store_with_flight(10, 10).await;
        let err = manager(&store).place_order(1, &order(&[(1, 1, flight + 100)])).await.unwrap_err();
        assert_eq!(err, CoreError::NotFound { entity: "flight", id: flight + 100 });
    }

    #[tokio::test]
    async fn test_tickets_are_scoped_to_owner() {
        let (store, flight) = store_with_flight(10, 10).await;
        let manager = manager(&store);
        let placed = manager.place_order(1, &order(&[(2, 2, flight)])).await.unwrap();
        let ticket_id = placed.tickets[0].id;

        assert!(manager.get_ticket(1, false, ticket_id).await.is_ok());
        assert_eq!(
            manager.get_ticket(2, false, ticket_id).await.unwrap_err(),
            CoreError::NotFound { entity: "ticket", id: ticket_id }
        );
        assert!(manager.get_ticket(2, true, ticket_id).await.is_ok());
        assert_eq!(manager.list_tickets(2, true).await.unwrap().len(), 1);
    }
}
