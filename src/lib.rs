// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, middleware::auth::auth_guard};

// Monta o router completo (usado pelo binário e pelos testes de integração)
pub fn app(app_state: AppState) -> Router {
    // Rotas de fornecedor (protegidas pelo middleware)
    let supplier_routes = Router::new()
        .route(
            "/",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/{id}",
            get(handlers::suppliers::get_supplier).delete(handlers::suppliers::delete_supplier),
        )
        .route("/{id}/suspend", post(handlers::suppliers::suspend_supplier))
        .route("/{id}/ban", post(handlers::suppliers::ban_supplier))
        .route("/{id}/unsuspend", post(handlers::suppliers::unsuspend_supplier))
        .route("/{id}/unban", post(handlers::suppliers::unban_supplier))
        .route("/{id}/reminder", post(handlers::suppliers::send_reminder))
        .route("/{id}/terms", put(handlers::suppliers::set_terms))
        .route("/{id}/registration", put(handlers::suppliers::renew_registration))
        .route("/{id}/registration/review", post(handlers::suppliers::place_review_hold))
        .route("/{id}/registration/approve", post(handlers::suppliers::approve_registration))
        // Funcionários
        .route(
            "/{id}/employees",
            get(handlers::employees::list_employees).post(handlers::employees::invite_employee),
        )
        .route(
            "/{id}/employees/{employee_id}",
            axum::routing::delete(handlers::employees::remove_employee),
        )
        .route("/{id}/employees/{employee_id}/role", put(handlers::employees::assign_role))
        .route(
            "/{id}/employees/{employee_id}/permissions/toggle",
            post(handlers::employees::toggle_permission),
        )
        .route(
            "/{id}/employees/{employee_id}/deactivate",
            post(handlers::employees::deactivate_employee),
        )
        .route(
            "/{id}/employees/{employee_id}/reactivate",
            post(handlers::employees::reactivate_employee),
        )
        .route("/{id}/employees/{employee_id}/login", post(handlers::employees::record_login))
        .route(
            "/{id}/employees/{employee_id}/notifications",
            put(handlers::employees::update_notification_flags),
        )
        // Catálogo de serviços
        .route("/{id}/services", get(handlers::catalog::get_catalog))
        .route(
            "/{id}/services/{category}/{service_id}",
            patch(handlers::catalog::update_service),
        )
        .route(
            "/{id}/services/{category}/{service_id}/toggle",
            post(handlers::catalog::toggle_service),
        );

    let protected_routes = Router::new()
        .nest("/api/suppliers", supplier_routes)
        .route(
            "/api/settings/alerts",
            get(handlers::compliance::get_alert_settings)
                .put(handlers::compliance::update_alert_settings),
        )
        .route("/api/compliance/run", post(handlers::compliance::run_compliance))
        .route("/api/directory", get(handlers::directory::list_directory))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Dados de referência (públicos)
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/roles", get(handlers::employees::list_roles))
        .route("/api/plans", get(handlers::plans::list_plans))
        .route(
            "/api/plans/{plan_id}/features/{key}",
            get(handlers::plans::feature_availability),
        )
        .route("/api/plans/{plan_id}/usage", get(handlers::plans::plan_usage));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
