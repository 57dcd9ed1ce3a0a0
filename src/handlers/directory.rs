// src/handlers/directory.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedCaller,
    models::supplier::{AccountStatus, DirectoryEntry},
    services::{catalog_service, obfuscation_service},
};

// GET /api/directory
#[utoipa::path(
    get,
    path = "/api/directory",
    tag = "Directory",
    responses(
        (status = 200, description = "Fornecedores ativos, com nome mascarado conforme o plano", body = [DirectoryEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_directory(
    State(app_state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<impl IntoResponse, AppError> {
    // Sem plano no token = plano desconhecido = nomes mascarados
    let plan_id = caller.plan_id.as_deref().unwrap_or_default();

    // CR vencido sai do diretório na hora, não só na próxima varredura
    let entries: Vec<DirectoryEntry> = app_state
        .compliance_service
        .enforce_all()
        .await
        .into_iter()
        .filter(|p| p.status == AccountStatus::Active)
        .map(|p| DirectoryEntry {
            id: p.id,
            company_name: if caller.is_admin() {
                p.company_name.clone()
            } else {
                obfuscation_service::mask_company_name(&p.company_name, plan_id)
            },
            services_offered: catalog_service::services_offered(&p.services),
        })
        .collect();

    Ok((StatusCode::OK, Json(entries)))
}
