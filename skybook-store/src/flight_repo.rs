use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use skybook_core::repository::FlightRepository;
use skybook_core::search::FlightFilter;
use skybook_core::validation::SeatLayout;
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{Airplane, Crew, Flight, FlightRecord, NewFlight, RouteRecord};

use crate::catalog_repo::{require_ids, CrewRow, RouteRow};
use crate::database::storage_err;

pub struct PostgresFlightRepository {
    pub pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_id: i64,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    #[sqlx(flatten)]
    route: RouteRow,
    airplane_id: i64,
    airplane_name: String,
    rows: i32,
    seats_in_row: i32,
    airplane_type_id: i64,
    image: Option<String>,
    tickets_sold: i64,
}

#[derive(sqlx::FromRow)]
struct FlightCrewRow {
    flight_id: i64,
    #[sqlx(flatten)]
    crew: CrewRow,
}

// Sold counts come from one grouped pass over tickets, joined per flight.
// `sold_filter` narrows that pass when only some flights are read.
fn flight_select(sold_filter: &str) -> String {
    format!(
        r#"
    SELECT f.id AS flight_id, f.departure_time, f.arrival_time,
           r.id, r.distance,
           s.id AS source_id, s.name AS source_name, s.closest_big_city AS source_city,
           d.id AS destination_id, d.name AS destination_name, d.closest_big_city AS destination_city,
           a.id AS airplane_id, a.name AS airplane_name, a.rows, a.seats_in_row,
           a.airplane_type_id, a.image,
           COALESCE(sold.sold_count, 0) AS tickets_sold
    FROM flights f
    JOIN routes r ON r.id = f.route_id
    JOIN airports s ON s.id = r.source_id
    JOIN airports d ON d.id = r.destination_id
    JOIN airplanes a ON a.id = f.airplane_id
    LEFT JOIN (
        SELECT flight_id, COUNT(*) AS sold_count FROM tickets {} GROUP BY flight_id
    ) sold ON sold.flight_id = f.id
"#,
        sold_filter
    )
}

/// Escapes LIKE metacharacters so the input matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

impl PostgresFlightRepository {
    async fn crews_by_flight(&self, flight_ids: &[i64]) -> CoreResult<HashMap<i64, Vec<Crew>>> {
        let rows = sqlx::query_as::<_, FlightCrewRow>(
            r#"
            SELECT fc.flight_id, c.id, c.first_name, c.last_name
            FROM flight_crews fc
            JOIN crews c ON c.id = fc.crew_id
            WHERE fc.flight_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(flight_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let mut crews: HashMap<i64, Vec<Crew>> = HashMap::new();
        for row in rows {
            crews.entry(row.flight_id).or_default().push(row.crew.into());
        }
        Ok(crews)
    }

    async fn assemble(&self, rows: Vec<FlightRow>) -> CoreResult<Vec<FlightRecord>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.flight_id).collect();
        let mut crews = self.crews_by_flight(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let crews = crews.remove(&row.flight_id).unwrap_or_default();
                let route = RouteRecord::from(row.route);
                let airplane = Airplane {
                    id: row.airplane_id,
                    name: row.airplane_name,
                    rows: row.rows,
                    seats_in_row: row.seats_in_row,
                    airplane_type_id: row.airplane_type_id,
                    image: row.image,
                };
                FlightRecord {
                    flight: Flight {
                        id: row.flight_id,
                        route_id: route.route.id,
                        airplane_id: airplane.id,
                        departure_time: row.departure_time,
                        arrival_time: row.arrival_time,
                        crew_ids: crews.iter().map(|c| c.id).collect(),
                    },
                    route,
                    airplane,
                    crews,
                    tickets_sold: row.tickets_sold,
                }
            })
            .collect())
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn create_flight(&self, flight: &NewFlight) -> CoreResult<FlightRecord> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        require_ids(&mut *tx, "routes", "route", &[flight.route_id]).await?;
        require_ids(&mut *tx, "airplanes", "airplane", &[flight.airplane_id]).await?;
        require_ids(&mut *tx, "crews", "crew", &flight.crews).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO flights (route_id, airplane_id, departure_time, arrival_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(flight.route_id)
        .bind(flight.airplane_id)
        .bind(flight.departure_time)
        .bind(flight.arrival_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            INSERT INTO flight_crews (flight_id, crew_id)
            SELECT $1, crew_id FROM UNNEST($2::BIGINT[]) AS crew_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&flight.crews)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        self.get_flight(id)
            .await?
            .ok_or_else(|| CoreError::Storage(format!("flight {} vanished after insert", id)))
    }

    async fn get_flight(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        let sql = format!("{} WHERE f.id = $1", flight_select("WHERE flight_id = $1"));
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_flights(&self, filter: &FlightFilter) -> CoreResult<Vec<FlightRecord>> {
        let sql = format!(
            r#"{}
            WHERE ($1::DATE IS NULL OR (f.departure_time AT TIME ZONE 'UTC')::DATE = $1)
              AND ($2::DATE IS NULL OR (f.arrival_time AT TIME ZONE 'UTC')::DATE = $2)
              AND ($3::TEXT IS NULL OR a.name ILIKE $3)
            ORDER BY f.id
            "#,
            flight_select("")
        );
        let airplane = filter
            .airplane_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(like_pattern);

        let rows = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(filter.departure_date)
            .bind(filter.arrival_date)
            .bind(airplane)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        self.assemble(rows).await
    }

    async fn seat_layouts(&self, flight_ids: &[i64]) -> CoreResult<HashMap<i64, SeatLayout>> {
        let rows: Vec<(i64, i32, i32)> = sqlx::query_as(
            r#"
            SELECT f.id, a.rows, a.seats_in_row
            FROM flights f
            JOIN airplanes a ON a.id = f.airplane_id
            WHERE f.id = ANY($1)
            "#,
        )
        .bind(flight_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, rows, seats_in_row)| (id, SeatLayout::new(rows, seats_in_row)))
            .collect())
    }
}
