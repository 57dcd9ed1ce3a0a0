// src/handlers/employees.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::suppliers::{contact_context, employee_view, employee_views, EMPLOYEE_PHONE},
    middleware::{
        auth::AuthenticatedCaller,
        rbac::{PermManageEmployees, RequirePermission},
    },
    models::employee::{
        AssignRolePayload, EmployeeView, InviteEmployeePayload, NotificationFlagsPayload,
        Permission, RoleCatalog, SupplierEmployee, TogglePermissionPayload,
    },
    services::rbac_service,
};

fn roster_view(app_state: &AppState, supplier_id: Uuid, roster: &[SupplierEmployee]) -> Json<Vec<EmployeeView>> {
    Json(employee_views(app_state, supplier_id, roster))
}

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Employees",
    responses((status = 200, description = "Cargos, pacotes e grupos de permissões", body = RoleCatalog))
)]
pub async fn list_roles() -> impl IntoResponse {
    (StatusCode::OK, Json(rbac_service::role_catalog()))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}/employees",
    tag = "Employees",
    responses((status = 200, description = "Funcionários do fornecedor", body = [EmployeeView])),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state.rbac_service.list_employees(guard.supplier_id).await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/employees",
    tag = "Employees",
    request_body = InviteEmployeePayload,
    responses(
        (status = 201, description = "Convite criado (status pendente)", body = EmployeeView),
        (status = 403, description = "Sem permissão para gerenciar funcionários")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn invite_employee(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Json(mut payload): Json<InviteEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Telefone do funcionário também fica cifrado no documento
    let context = contact_context(guard.supplier_id, EMPLOYEE_PHONE);
    payload.phone = payload
        .phone
        .take()
        .map(|phone| app_state.obfuscation.protect(phone.trim(), &context));

    let employee = app_state
        .rbac_service
        .invite_employee(guard.supplier_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(employee_view(&app_state, guard.supplier_id, &employee))))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}/employees/{employee_id}/role",
    tag = "Employees",
    request_body = AssignRolePayload,
    responses((status = 200, description = "Lista atualizada", body = [EmployeeView])),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_role(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Path((_supplier_id, employee_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AssignRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state
        .rbac_service
        .assign_role(guard.supplier_id, employee_id, payload.role)
        .await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/employees/{employee_id}/permissions/toggle",
    tag = "Employees",
    request_body = TogglePermissionPayload,
    responses((status = 200, description = "Permissão alternada; cargo vira custom", body = [EmployeeView])),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_permission(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Path((_supplier_id, employee_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TogglePermissionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state
        .rbac_service
        .toggle_permission(guard.supplier_id, employee_id, payload.permission)
        .await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/employees/{employee_id}/deactivate",
    tag = "Employees",
    responses(
        (status = 200, description = "Funcionário desativado", body = [EmployeeView]),
        (status = 409, description = "Convite ainda pendente")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_employee(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Path((_supplier_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state.rbac_service.deactivate(guard.supplier_id, employee_id).await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/employees/{employee_id}/reactivate",
    tag = "Employees",
    responses((status = 200, description = "Funcionário reativado", body = [EmployeeView])),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn reactivate_employee(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Path((_supplier_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state.rbac_service.reactivate(guard.supplier_id, employee_id).await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}/employees/{employee_id}",
    tag = "Employees",
    responses((status = 200, description = "Funcionário removido", body = [EmployeeView])),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_employee(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageEmployees>,
    Path((_supplier_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let roster = app_state
        .rbac_service
        .remove_employee(guard.supplier_id, employee_id)
        .await?;
    Ok((StatusCode::OK, roster_view(&app_state, guard.supplier_id, &roster)))
}

// O próprio funcionário: aceita o convite no primeiro acesso
#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/employees/{employee_id}/login",
    tag = "Employees",
    responses(
        (status = 200, description = "Login registrado", body = [EmployeeView]),
        (status = 409, description = "Funcionário inativo")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_login(
    State(app_state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path((supplier_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    if caller.id != employee_id || !caller.belongs_to(supplier_id) {
        return Err(AppError::PermissionDenied);
    }
    let roster = app_state.rbac_service.record_login(supplier_id, employee_id).await?;
    Ok((StatusCode::OK, roster_view(&app_state, supplier_id, &roster)))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}/employees/{employee_id}/notifications",
    tag = "Employees",
    request_body = NotificationFlagsPayload,
    responses((status = 200, description = "Preferências atualizadas", body = [EmployeeView])),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("employee_id" = Uuid, Path, description = "ID do Funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_notification_flags(
    State(app_state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path((supplier_id, employee_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NotificationFlagsPayload>,
) -> Result<impl IntoResponse, AppError> {
    // O próprio funcionário ou quem gerencia funcionários
    if caller.id != employee_id || !caller.belongs_to(supplier_id) {
        let profile = app_state
            .supplier_repo
            .find_by_id(supplier_id)
            .await
            .ok_or(AppError::SupplierNotFound)?;
        rbac_service::require_permission(
            &caller,
            &profile,
            Permission::ManageEmployees,
        )?;
    }

    let roster = app_state
        .rbac_service
        .update_notification_flags(supplier_id, employee_id, &payload)
        .await?;
    Ok((StatusCode::OK, roster_view(&app_state, supplier_id, &roster)))
}
