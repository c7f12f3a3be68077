use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use skybook_catalog::airplane_image_path;
use skybook_core::CoreError;
use skybook_shared::views::{AirplaneDetailView, AirplaneListView};
use skybook_shared::{AirplaneRecord, AirplaneType, Crew, NewAirplane, NewAirplaneType, NewCrew};

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::{AdminUser, AuthUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airplane_types", get(list_airplane_types).post(create_airplane_type))
        .route("/airplanes", get(list_airplanes).post(create_airplane))
        .route("/airplanes/{id}", get(get_airplane))
        .route("/airplanes/{id}/upload-image", post(upload_image))
        .route("/crews", get(list_crews).post(create_crew))
}

// ============================================================================
// Airplane Types
// ============================================================================

/// GET /api/airport/airplane_types
async fn list_airplane_types(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AirplaneType>>, AppError> {
    Ok(Json(state.catalog.list_airplane_types().await?))
}

/// POST /api/airport/airplane_types
async fn create_airplane_type(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewAirplaneType>,
) -> Result<(StatusCode, Json<AirplaneType>), AppError> {
    let airplane_type = state.catalog.create_airplane_type(&payload).await?;
    Ok((StatusCode::CREATED, Json(airplane_type)))
}

// ============================================================================
// Airplanes
// ============================================================================

/// GET /api/airport/airplanes
async fn list_airplanes(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AirplaneListView>>, AppError> {
    let airplanes = state.catalog.list_airplanes().await?;
    Ok(Json(airplanes.iter().map(AirplaneListView::from).collect()))
}

/// GET /api/airport/airplanes/{id}
async fn get_airplane(
    _user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<AirplaneDetailView>, AppError> {
    let airplane = state
        .catalog
        .get_airplane(id)
        .await?
        .ok_or_else(|| CoreError::not_found("airplane", id))?;
    Ok(Json(AirplaneDetailView::from(&airplane)))
}

/// POST /api/airport/airplanes
async fn create_airplane(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewAirplane>,
) -> Result<(StatusCode, Json<AirplaneDetailView>), AppError> {
    let airplane = state.catalog.create_airplane(&payload).await?;
    Ok((StatusCode::CREATED, Json(AirplaneDetailView::from(&airplane))))
}

/// POST /api/airport/airplanes/{id}/upload-image
///
/// Expects a multipart body with an `image` file field. The file is stored
/// under the media root and its relative path recorded on the airplane.
async fn upload_image(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    mut multipart: Multipart,
) -> Result<Json<AirplaneDetailView>, AppError> {
    let record = state
        .catalog
        .get_airplane(id)
        .await?
        .ok_or_else(|| CoreError::not_found("airplane", id))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let upload_name = field.file_name().unwrap_or_default().to_string();
        let relative = airplane_image_path(&record.airplane.name, &upload_name)?;
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(CoreError::InvalidImage("uploaded file is empty".into()).into());
        }

        let target = state.media_root.join(&relative);
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(anyhow::Error::from)?;
        }
        tokio::fs::write(&target, &bytes).await.map_err(anyhow::Error::from)?;
        tracing::info!(airplane_id = id, path = %relative, size = bytes.len(), "airplane image stored");

        let airplane = state.catalog.set_airplane_image(id, &relative).await?;
        let updated = AirplaneRecord { airplane, airplane_type: record.airplane_type };
        return Ok(Json(AirplaneDetailView::from(&updated)));
    }

    Err(CoreError::InvalidImage("multipart field `image` is required".into()).into())
}

// ============================================================================
// Crews
// ============================================================================

/// GET /api/airport/crews
async fn list_crews(_user: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<Crew>>, AppError> {
    Ok(Json(state.catalog.list_crews().await?))
}

/// POST /api/airport/crews
async fn create_crew(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewCrew>,
) -> Result<(StatusCode, Json<Crew>), AppError> {
    let crew = state.catalog.create_crew(&payload).await?;
    Ok((StatusCode::CREATED, Json(crew)))
}
