// src/handlers/suppliers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::{AdminCaller, AuthenticatedCaller},
        rbac::{PermManageSettings, RequirePermission},
    },
    models::{
        auth::Caller,
        compliance::{
            is_valid_cr_number, CommercialRegistration, RenewRegistrationRequest, ReviewHoldRequest,
        },
        employee::{EmployeeView, SupplierEmployee},
        supplier::{
            CreateSupplierPayload, LifecycleAction, LocalizedText, ReasonPayload, SupplierProfile,
            SupplierView, TermsPayload,
        },
    },
    services::lifecycle_service,
};

// Contexto (AAD) de cada campo de contato cifrado
pub(crate) fn contact_context(supplier_id: Uuid, field: &str) -> String {
    format!("supplier:{}:{}", supplier_id, field)
}

pub(crate) const EMPLOYEE_PHONE: &str = "employee_phone";

pub(crate) fn employee_view(app_state: &AppState, supplier_id: Uuid, employee: &SupplierEmployee) -> EmployeeView {
    let mut view = EmployeeView::from(employee);
    view.phone = view.phone.map(|phone| {
        app_state
            .obfuscation
            .reveal(&phone, &contact_context(supplier_id, EMPLOYEE_PHONE))
    });
    view
}

pub(crate) fn employee_views(
    app_state: &AppState,
    supplier_id: Uuid,
    roster: &[SupplierEmployee],
) -> Vec<EmployeeView> {
    roster.iter().map(|e| employee_view(app_state, supplier_id, e)).collect()
}

// Monta a visão da API: status do CR calculado agora + ações possíveis
pub(crate) async fn supplier_view(app_state: &AppState, profile: &SupplierProfile) -> SupplierView {
    let assessment = app_state.compliance_service.assess_supplier(profile).await;
    let actions = lifecycle_service::allowed_actions(profile.status.kind());

    let mut view = SupplierView::new(profile, assessment, actions);
    view.email = app_state.obfuscation.reveal(&profile.email, &contact_context(profile.id, "email"));
    view.phone = app_state.obfuscation.reveal(&profile.phone, &contact_context(profile.id, "phone"));
    view.employees = employee_views(app_state, profile.id, &profile.employees);
    view
}

// O próprio fornecedor ou um admin
fn ensure_can_view(caller: &Caller, supplier_id: Uuid) -> Result<(), AppError> {
    if caller.is_admin() || caller.belongs_to(supplier_id) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

// ---
// Handler: list_suppliers
// ---
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Todos os fornecedores com status calculado", body = [SupplierView])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
) -> Result<impl IntoResponse, AppError> {
    // Reconcilia antes de listar: status nunca fica atrás do CR
    let mut views = Vec::new();
    for profile in app_state.compliance_service.enforce_all().await {
        views.push(supplier_view(&app_state, &profile).await);
    }
    Ok((StatusCode::OK, Json(views)))
}

// ---
// Handler: create_supplier
// ---
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = CreateSupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado com catálogo padrão", body = SupplierView),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Json(payload): Json<CreateSupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if !is_valid_cr_number(&payload.cr_number) {
        return Err(AppError::InvalidSettings(
            "O número do CR deve ter exatamente 10 dígitos.".into(),
        ));
    }

    let mut profile = SupplierProfile::new(
        LocalizedText { ar: payload.company_name_ar, en: payload.company_name_en },
        payload.email.trim().to_lowercase(),
        payload.phone.trim(),
        CommercialRegistration::new(payload.cr_number, payload.cr_expiry_date),
        Utc::now(),
    );
    profile.email = app_state.obfuscation.protect(&profile.email, &contact_context(profile.id, "email"));
    profile.phone = app_state.obfuscation.protect(&profile.phone, &contact_context(profile.id, "phone"));

    let profile = app_state.supplier_repo.insert(profile).await;
    tracing::info!(supplier_id = %profile.id, "🏢 Fornecedor criado: {}", profile.company_name.en);

    Ok((StatusCode::CREATED, Json(supplier_view(&app_state, &profile).await)))
}

// ---
// Handler: get_supplier
// ---
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Fornecedor", body = SupplierView),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_can_view(&caller, id)?;

    let mut profile = app_state
        .supplier_repo
        .find_by_id(id)
        .await
        .ok_or(AppError::SupplierNotFound)?;

    if !profile.is_deleted() {
        // A leitura reavalia o CR e pode suspender
        profile = app_state.compliance_service.enforce(id).await?;

        // Acesso do próprio fornecedor conta como atividade
        if caller.belongs_to(id) {
            profile = app_state.lifecycle_service.touch(id).await?;
        }
    }

    Ok((StatusCode::OK, Json(supplier_view(&app_state, &profile).await)))
}

async fn transition(
    app_state: &AppState,
    id: Uuid,
    action: LifecycleAction,
    reason: Option<&str>,
) -> Result<(StatusCode, Json<SupplierView>), AppError> {
    let profile = app_state.lifecycle_service.apply(id, action, reason).await?;
    Ok((StatusCode::OK, Json(supplier_view(app_state, &profile).await)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/suspend",
    tag = "Suppliers",
    request_body = ReasonPayload,
    responses(
        (status = 200, description = "Fornecedor suspenso", body = SupplierView),
        (status = 400, description = "Motivo ausente"),
        (status = 409, description = "Transição inválida")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn suspend_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReasonPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    transition(&app_state, id, LifecycleAction::Suspend, payload.reason.as_deref()).await
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/ban",
    tag = "Suppliers",
    request_body = ReasonPayload,
    responses(
        (status = 200, description = "Fornecedor banido", body = SupplierView),
        (status = 400, description = "Motivo ausente"),
        (status = 409, description = "Transição inválida")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn ban_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReasonPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    transition(&app_state, id, LifecycleAction::Ban, payload.reason.as_deref()).await
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/unsuspend",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Fornecedor reativado", body = SupplierView),
        (status = 409, description = "Transição inválida")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn unsuspend_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(&app_state, id, LifecycleAction::Unsuspend, None).await
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/unban",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Banimento removido", body = SupplierView),
        (status = 409, description = "Transição inválida")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn unban_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(&app_state, id, LifecycleAction::Unban, None).await
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Fornecedor excluído (estado terminal)", body = SupplierView),
        (status = 409, description = "Já excluído")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Fornecedor"),
        ("reason" = Option<String>, Query, description = "Motivo da exclusão")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
    Query(payload): Query<ReasonPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    transition(&app_state, id, LifecycleAction::Delete, payload.reason.as_deref()).await
}

// ---
// Handler: send_reminder
// ---
#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/reminder",
    tag = "Suppliers",
    responses(
        (status = 202, description = "Lembrete de CR enfileirado"),
        (status = 409, description = "Fornecedor excluído")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn send_reminder(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let notification = app_state.compliance_service.send_reminder(id).await?;
    Ok((StatusCode::ACCEPTED, Json(notification)))
}

// ---
// Handler: set_terms
// ---
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}/terms",
    tag = "Suppliers",
    request_body = TermsPayload,
    responses((status = 200, description = "Termos atualizados", body = SupplierView)),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn set_terms(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageSettings>,
    Json(payload): Json<TermsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state
        .lifecycle_service
        .set_terms(guard.supplier_id, payload.enabled)
        .await?;
    Ok((StatusCode::OK, Json(supplier_view(&app_state, &profile).await)))
}

// ---
// Registro Comercial
// ---
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}/registration",
    tag = "Compliance",
    request_body = RenewRegistrationRequest,
    responses(
        (status = 200, description = "CR renovado (ou em revisão)", body = SupplierView),
        (status = 400, description = "Número inválido")
    ),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn renew_registration(
    State(app_state): State<AppState>,
    guard: RequirePermission<PermManageSettings>,
    Json(payload): Json<RenewRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let profile = app_state
        .compliance_service
        .renew_registration(guard.supplier_id, &payload.number, payload.expiry_date)
        .await?;
    Ok((StatusCode::OK, Json(supplier_view(&app_state, &profile).await)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/registration/review",
    tag = "Compliance",
    request_body = ReviewHoldRequest,
    responses((status = 200, description = "CR marcado como em revisão", body = SupplierView)),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn place_review_hold(
    State(app_state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewHoldRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let profile = app_state
        .compliance_service
        .place_review_hold(id, admin.id, payload.note)
        .await?;
    Ok((StatusCode::OK, Json(supplier_view(&app_state, &profile).await)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers/{id}/registration/approve",
    tag = "Compliance",
    responses((status = 200, description = "Revisão concluída", body = SupplierView)),
    params(("id" = Uuid, Path, description = "ID do Fornecedor")),
    security(("api_jwt" = []))
)]
pub async fn approve_registration(
    State(app_state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.compliance_service.clear_review_hold(id).await?;
    Ok((StatusCode::OK, Json(supplier_view(&app_state, &profile).await)))
}
