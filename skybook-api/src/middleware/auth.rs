use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::auth::Identity;
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Authentication Middleware
// ============================================================================

/// Rejects requests without a valid bearer token and stores the caller's
/// identity in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    let identity = state
        .auth
        .verify(bearer.token())
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

// ============================================================================
// Extractors
// ============================================================================

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

/// An authenticated caller holding the ADMIN role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Identity);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            tracing::debug!(user_id = identity.user_id, "admin route refused");
            return Err(AppError::Forbidden("admin role required".into()));
        }
        Ok(AdminUser(identity))
    }
}
