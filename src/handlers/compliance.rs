// src/handlers/compliance.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminCaller, AuthenticatedCaller},
    models::compliance::{AlertSettings, ComplianceReport, UpdateAlertSettingsRequest},
};

// GET /api/settings/alerts
#[utoipa::path(
    get,
    path = "/api/settings/alerts",
    tag = "Compliance",
    responses((status = 200, description = "Configuração de alertas vigente", body = AlertSettings)),
    security(("api_jwt" = []))
)]
pub async fn get_alert_settings(
    State(app_state): State<AppState>,
    _caller: AuthenticatedCaller,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.compliance_service.current_settings().await;
    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings/alerts
#[utoipa::path(
    put,
    path = "/api/settings/alerts",
    tag = "Compliance",
    request_body = UpdateAlertSettingsRequest,
    responses(
        (status = 200, description = "Nova versão da configuração", body = AlertSettings),
        (status = 400, description = "Limites inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_alert_settings(
    State(app_state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(payload): Json<UpdateAlertSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state
        .compliance_service
        .update_settings(&payload, admin.id)
        .await?;
    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/compliance/run
#[utoipa::path(
    post,
    path = "/api/compliance/run",
    tag = "Compliance",
    responses((status = 200, description = "Relatório da varredura", body = ComplianceReport)),
    security(("api_jwt" = []))
)]
pub async fn run_compliance(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.compliance_service.run().await;
    Ok((StatusCode::OK, Json(report)))
}
