// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::Caller};

// O middleware em si: valida o Bearer e guarda o chamador na requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let caller = app_state.auth_service.validate_token(token)?;
    tracing::debug!(caller_id = %caller.id, "🔑 Chamador autenticado: {:?}", caller.role);

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

// Extrator para obter o chamador autenticado diretamente nos handlers
pub struct AuthenticatedCaller(pub Caller);

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .map(AuthenticatedCaller)
            .ok_or(AppError::InvalidToken)
    }
}

// Só administradores da plataforma
pub struct AdminCaller(pub Caller);

impl<S> FromRequestParts<S> for AdminCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedCaller(caller) = AuthenticatedCaller::from_request_parts(parts, state).await?;
        if !caller.is_admin() {
            return Err(AppError::PermissionDenied);
        }
        Ok(AdminCaller(caller))
    }
}
