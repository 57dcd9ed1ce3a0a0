// src/handlers/plans.rs

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    models::plan::{FeatureAvailability, PlanUsage, RestrictionKey, SubscriptionPlan, UsageQuery},
    services::plan_service,
};

#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Plans",
    responses((status = 200, description = "Catálogo de planos", body = [SubscriptionPlan]))
)]
pub async fn list_plans() -> impl IntoResponse {
    (StatusCode::OK, Json(plan_service::plans()))
}

// Plano desconhecido responde `available: false`, não 404
#[utoipa::path(
    get,
    path = "/api/plans/{plan_id}/features/{key}",
    tag = "Plans",
    responses((status = 200, description = "Disponibilidade do recurso", body = FeatureAvailability)),
    params(
        ("plan_id" = String, Path, description = "ID do Plano"),
        ("key" = RestrictionKey, Path, description = "Restrição (ex.: encryptedSuppliers)")
    )
)]
pub async fn feature_availability(
    Path((plan_id, key)): Path<(String, RestrictionKey)>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(plan_service::feature_availability(&plan_id, key)))
}

#[utoipa::path(
    get,
    path = "/api/plans/{plan_id}/usage",
    tag = "Plans",
    responses(
        (status = 200, description = "Projetos e armazenamento restantes", body = PlanUsage),
        (status = 404, description = "Plano desconhecido")
    ),
    params(
        ("plan_id" = String, Path, description = "ID do Plano"),
        UsageQuery
    )
)]
pub async fn plan_usage(
    Path(plan_id): Path<String>,
    Query(query): Query<UsageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let usage = plan_service::usage(&plan_id, query.used_projects, query.used_storage_mb)?;
    Ok((StatusCode::OK, Json(usage)))
}
