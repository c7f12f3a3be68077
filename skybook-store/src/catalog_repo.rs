use async_trait::async_trait;
use sqlx::PgPool;

use skybook_core::repository::CatalogRepository;
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{
    Airplane, AirplaneRecord, AirplaneType, Airport, Crew, NewAirplane, NewAirplaneType, NewAirport, NewCrew,
    NewRoute, Route, RouteRecord,
};

use crate::database::storage_err;

pub struct StoreCatalogRepository {
    pool: PgPool,
}

impl StoreCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct AirportRow {
    id: i64,
    name: String,
    closest_big_city: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport { id: row.id, name: row.name, closest_big_city: row.closest_big_city }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RouteRow {
    id: i64,
    distance: i32,
    source_id: i64,
    source_name: String,
    source_city: String,
    destination_id: i64,
    destination_name: String,
    destination_city: String,
}

impl From<RouteRow> for RouteRecord {
    fn from(row: RouteRow) -> Self {
        RouteRecord {
            route: Route {
                id: row.id,
                source_id: row.source_id,
                destination_id: row.destination_id,
                distance: row.distance,
            },
            source: Airport { id: row.source_id, name: row.source_name, closest_big_city: row.source_city },
            destination: Airport {
                id: row.destination_id,
                name: row.destination_name,
                closest_big_city: row.destination_city,
            },
        }
    }
}

const ROUTE_SELECT: &str = r#"
    SELECT r.id, r.distance,
           s.id AS source_id, s.name AS source_name, s.closest_big_city AS source_city,
           d.id AS destination_id, d.name AS destination_name, d.closest_big_city AS destination_city
    FROM routes r
    JOIN airports s ON s.id = r.source_id
    JOIN airports d ON d.id = r.destination_id
"#;

#[derive(sqlx::FromRow)]
struct AirplaneRow {
    id: i64,
    name: String,
    rows: i32,
    seats_in_row: i32,
    airplane_type_id: i64,
    image: Option<String>,
}

impl From<AirplaneRow> for Airplane {
    fn from(row: AirplaneRow) -> Self {
        Airplane {
            id: row.id,
            name: row.name,
            rows: row.rows,
            seats_in_row: row.seats_in_row,
            airplane_type_id: row.airplane_type_id,
            image: row.image,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AirplaneRecordRow {
    #[sqlx(flatten)]
    airplane: AirplaneRow,
    airplane_type_name: String,
}

impl From<AirplaneRecordRow> for AirplaneRecord {
    fn from(row: AirplaneRecordRow) -> Self {
        let airplane_type = AirplaneType { id: row.airplane.airplane_type_id, name: row.airplane_type_name };
        AirplaneRecord { airplane: row.airplane.into(), airplane_type }
    }
}

const AIRPLANE_SELECT: &str = r#"
    SELECT a.id, a.name, a.rows, a.seats_in_row, a.airplane_type_id, a.image,
           t.name AS airplane_type_name
    FROM airplanes a
    JOIN airplane_types t ON t.id = a.airplane_type_id
"#;

#[derive(sqlx::FromRow)]
pub(crate) struct CrewRow {
    id: i64,
    first_name: String,
    last_name: String,
}

impl From<CrewRow> for Crew {
    fn from(row: CrewRow) -> Self {
        Crew { id: row.id, first_name: row.first_name, last_name: row.last_name }
    }
}

/// Fails with `NotFound` naming the first of `ids` absent from `table`.
pub(crate) async fn require_ids<'e, E>(executor: E, table: &'static str, entity: &'static str, ids: &[i64]) -> CoreResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(());
    }
    let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", table);
    let found: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(ids)
        .fetch_all(executor)
        .await
        .map_err(storage_err)?;

    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(CoreError::not_found(entity, *missing)),
        None => Ok(()),
    }
}

#[async_trait]
impl CatalogRepository for StoreCatalogRepository {
    async fn create_airport(&self, airport: &NewAirport) -> CoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            "INSERT INTO airports (name, closest_big_city) VALUES ($1, $2) RETURNING id, name, closest_big_city",
        )
        .bind(&airport.name)
        .bind(&airport.closest_big_city)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.into())
    }

    async fn list_airports(&self) -> CoreResult<Vec<Airport>> {
        let rows = sqlx::query_as::<_, AirportRow>("SELECT id, name, closest_big_city FROM airports ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.into_iter().map(Airport::from).collect())
    }

    async fn create_route(&self, route: &NewRoute) -> CoreResult<RouteRecord> {
        require_ids(&self.pool, "airports", "airport", &[route.source_id, route.destination_id]).await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO routes (source_id, destination_id, distance) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(route.source_id)
        .bind(route.destination_id)
        .bind(route.distance)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        self.get_route(id)
            .await?
            .ok_or_else(|| CoreError::Storage(format!("route {} vanished after insert", id)))
    }

    async fn get_route(&self, id: i64) -> CoreResult<Option<RouteRecord>> {
        let sql = format!("{} WHERE r.id = $1", ROUTE_SELECT);
        let row = sqlx::query_as::<_, RouteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.map(RouteRecord::from))
    }

    async fn list_routes(&self) -> CoreResult<Vec<RouteRecord>> {
        let sql = format!("{} ORDER BY r.id", ROUTE_SELECT);
        let rows = sqlx::query_as::<_, RouteRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.into_iter().map(RouteRecord::from).collect())
    }

    async fn create_airplane_type(&self, airplane_type: &NewAirplaneType) -> CoreResult<AirplaneType> {
        let id: i64 = sqlx::query_scalar("INSERT INTO airplane_types (name) VALUES ($1) RETURNING id")
            .bind(&airplane_type.name)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(AirplaneType { id, name: airplane_type.name.clone() })
    }

    async fn list_airplane_types(&self) -> CoreResult<Vec<AirplaneType>> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM airplane_types ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.into_iter().map(|(id, name)| AirplaneType { id, name }).collect())
    }

    async fn create_airplane(&self, airplane: &NewAirplane) -> CoreResult<AirplaneRecord> {
        require_ids(&self.pool, "airplane_types", "airplane type", &[airplane.airplane_type_id]).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO airplanes (name, rows, seats_in_row, airplane_type_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&airplane.name)
        .bind(airplane.rows)
        .bind(airplane.seats_in_row)
        .bind(airplane.airplane_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        self.get_airplane(id)
            .await?
            .ok_or_else(|| CoreError::Storage(format!("airplane {} vanished after insert", id)))
    }

    async fn get_airplane(&self, id: i64) -> CoreResult<Option<AirplaneRecord>> {
        let sql = format!("{} WHERE a.id = $1", AIRPLANE_SELECT);
        let row = sqlx::query_as::<_, AirplaneRecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.map(AirplaneRecord::from))
    }

    async fn list_airplanes(&self) -> CoreResult<Vec<AirplaneRecord>> {
        let sql = format!("{} ORDER BY a.id", AIRPLANE_SELECT);
        let rows = sqlx::query_as::<_, AirplaneRecordRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.into_iter().map(AirplaneRecord::from).collect())
    }

    async fn set_airplane_image(&self, id: i64, image: &str) -> CoreResult<Airplane> {
        let row = sqlx::query_as::<_, AirplaneRow>(
            r#"
            UPDATE airplanes SET image = $1 WHERE id = $2
            RETURNING id, name, rows, seats_in_row, airplane_type_id, image
            "#,
        )
        .bind(image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(Airplane::from).ok_or_else(|| CoreError::not_found("airplane", id))
    }

    async fn create_crew(&self, crew: &NewCrew) -> CoreResult<Crew> {
        let row = sqlx::query_as::<_, CrewRow>(
            "INSERT INTO crews (first_name, last_name) VALUES ($1, $2) RETURNING id, first_name, last_name",
        )
        .bind(&crew.first_name)
        .bind(&crew.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.into())
    }

    async fn list_crews(&self) -> CoreResult<Vec<Crew>> {
        let rows = sqlx::query_as::<_, CrewRow>("SELECT id, first_name, last_name FROM crews ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows.into_iter().map(Crew::from).collect())
    }
}
