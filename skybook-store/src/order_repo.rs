use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use skybook_core::booking::BookingPlan;
use skybook_core::repository::OrderRepository;
use skybook_core::search::{Page, PageRequest};
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{flight_label, Order, Ticket, TicketRecord, TicketRequest};

use crate::database::storage_err;

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i64,
    row: i32,
    seat: i32,
    flight_id: i64,
    order_id: i64,
}

impl From<TicketRow> for Ticket {
    fn from(row: TicketRow) -> Self {
        Ticket { id: row.id, row: row.row, seat: row.seat, flight_id: row.flight_id, order_id: row.order_id }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRecordRow {
    #[sqlx(flatten)]
    ticket: TicketRow,
    source_name: String,
    destination_name: String,
    departure_time: DateTime<Utc>,
}

const TICKET_RECORD_SELECT: &str = r#"
    SELECT t.id, t."row", t.seat, t.flight_id, t.order_id,
           s.name AS source_name, d.name AS destination_name, f.departure_time
    FROM tickets t
    JOIN orders o ON o.id = t.order_id
    JOIN flights f ON f.id = t.flight_id
    JOIN routes r ON r.id = f.route_id
    JOIN airports s ON s.id = r.source_id
    JOIN airports d ON d.id = r.destination_id
"#;

/// Maps constraint violations raised by a ticket insert to domain errors.
fn ticket_insert_err(err: sqlx::Error, index: usize, request: &TicketRequest) -> CoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return CoreError::seat_taken(index, request);
        }
        if db.is_foreign_key_violation() {
            return CoreError::not_found("flight", request.flight_id);
        }
    }
    storage_err(err)
}

impl StoreOrderRepository {
    /// Loads orders with their tickets, keyed by order id.
    async fn orders_with_tickets(&self, rows: Vec<OrderRow>) -> CoreResult<Vec<Order>> {
        let ids: Vec<i64> = rows.iter().map(|o| o.id).collect();
        let tickets = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, "row", seat, flight_id, order_id
            FROM tickets
            WHERE order_id = ANY($1)
            ORDER BY "row", seat
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let mut by_order: HashMap<i64, Vec<Ticket>> = HashMap::new();
        for ticket in tickets {
            by_order.entry(ticket.order_id).or_default().push(ticket.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Order {
                id: row.id,
                user_id: row.user_id,
                created_at: row.created_at,
                tickets: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn ticket_records(&self, rows: Vec<TicketRecordRow>) -> CoreResult<Vec<TicketRecord>> {
        let mut order_ids: Vec<i64> = rows.iter().map(|r| r.ticket.order_id).collect();
        order_ids.sort_unstable();
        order_ids.dedup();

        let order_rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, created_at FROM orders WHERE id = ANY($1)",
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let orders: HashMap<i64, Order> = self
            .orders_with_tickets(order_rows)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        rows.into_iter()
            .map(|row| {
                let order = orders
                    .get(&row.ticket.order_id)
                    .cloned()
                    .ok_or_else(|| CoreError::not_found("order", row.ticket.order_id))?;
                Ok(TicketRecord {
                    flight_label: flight_label(&row.source_name, &row.destination_name, row.departure_time),
                    ticket: row.ticket.into(),
                    order,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn commit_order(&self, plan: &BookingPlan) -> CoreResult<Order> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let order = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (user_id) VALUES ($1) RETURNING id, user_id, created_at",
        )
        .bind(plan.user_id())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        let mut tickets = Vec::with_capacity(plan.tickets().len());
        for (index, request) in plan.tickets().iter().enumerate() {
            // The seat constraint is the arbiter between concurrent bookings;
            // any failure drops `tx`, which rolls the whole order back.
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO tickets ("row", seat, flight_id, order_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(request.row)
            .bind(request.seat)
            .bind(request.flight_id)
            .bind(order.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| ticket_insert_err(e, index, request))?;

            tickets.push(Ticket {
                id,
                row: request.row,
                seat: request.seat,
                flight_id: request.flight_id,
                order_id: order.id,
            });
        }

        tx.commit().await.map_err(storage_err)?;

        tickets.sort_by_key(|t| (t.row, t.seat));
        Ok(Order { id: order.id, user_id: order.user_id, created_at: order.created_at, tickets })
    }

    async fn list_orders(&self, user_id: i64, page: PageRequest) -> CoreResult<Page<Order>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(Page {
            count: count as u64,
            page: page.page,
            page_size: page.page_size,
            results: self.orders_with_tickets(rows).await?,
        })
    }

    async fn list_tickets(&self, user_id: Option<i64>) -> CoreResult<Vec<TicketRecord>> {
        let sql = format!("{} WHERE ($1::BIGINT IS NULL OR o.user_id = $1) ORDER BY t.id", TICKET_RECORD_SELECT);
        let rows = sqlx::query_as::<_, TicketRecordRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        self.ticket_records(rows).await
    }

    async fn get_ticket(&self, id: i64) -> CoreResult<Option<TicketRecord>> {
        let sql = format!("{} WHERE t.id = $1", TICKET_RECORD_SELECT);
        let row = sqlx::query_as::<_, TicketRecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        match row {
            Some(row) => Ok(self.ticket_records(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}
