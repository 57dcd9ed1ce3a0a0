// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermViewProducts, RequirePermission},
    models::{
        catalog::{CategorySummary, ServiceCategory, ServiceUpdate, ServicesCatalog},
        employee::Permission,
    },
    services::{catalog_service, rbac_service},
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub services: ServicesCatalog,
    pub summary: Vec<CategorySummary>,
    pub read_only: bool,
}

// Quem só enxerga produtos vê o catálogo, mas não altera
async fn is_read_only(
    app_state: &AppState,
    guard: &RequirePermission<PermViewProducts>,
) -> Result<bool, AppError> {
    let profile = app_state
        .supplier_repo
        .find_by_id(guard.supplier_id)
        .await
        .ok_or(AppError::SupplierNotFound)?;
    Ok(rbac_service::require_permission(&guard.caller, &profile, Permission::ManageServices).is_err())
}

fn response(services: ServicesCatalog, read_only: bool) -> Json<CatalogResponse> {
    let summary = catalog_service::summaries(&services);
    Json(CatalogResponse { services, summary, read_only })
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}/services",
    tag = "Services",
    responses((status = 200, description = "Catálogo de serviços", body = CatalogResponse)),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn get_catalog(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermViewProducts>,
) -> Result<impl IntoResponse, AppError> {
    let read_only = is_read_only(&app_state, &guard).await?;
    let services = app_state.catalog_service.get_catalog(guard.supplier_id).await?;
    Ok((StatusCode::OK, response(services, read_only)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/services/{category}/{service_id}/toggle",
    tag = "Services",
    responses(
        (status = 200, description = "Serviço ligado/desligado", body = CatalogResponse),
        (status = 403, description = "Acesso somente leitura")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("category" = ServiceCategory, Path, description = "Categoria"),
        ("service_id" = String, Path, description = "ID do serviço (ex.: standard)")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_service(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermViewProducts>,
    Path((_supplier_id, category, service_id)): Path<(Uuid, ServiceCategory, String)>,
) -> Result<impl IntoResponse, AppError> {
    let read_only = is_read_only(&app_state, &guard).await?;
    let services = app_state
        .catalog_service
        .toggle_service(guard.supplier_id, category, &service_id, read_only)
        .await?;
    Ok((StatusCode::OK, response(services, read_only)))
}

#[utoipa::path(
    patch,
    path = "/api/suppliers/{id}/services/{category}/{service_id}",
    tag = "Services",
    request_body = ServiceUpdate,
    responses(
        (status = 200, description = "Serviço atualizado", body = CatalogResponse),
        (status = 400, description = "Formato não corresponde à categoria"),
        (status = 403, description = "Acesso somente leitura")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("category" = ServiceCategory, Path, description = "Categoria"),
        ("service_id" = String, Path, description = "ID do serviço")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermViewProducts>,
    Path((_supplier_id, category, service_id)): Path<(Uuid, ServiceCategory, String)>,
    Json(update): Json<ServiceUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let read_only = is_read_only(&app_state, &guard).await?;
    let services = app_state
        .catalog_service
        .update_service(guard.supplier_id, category, &service_id, update, read_only)
        .await?;
    Ok((StatusCode::OK, response(services, read_only)))
}
