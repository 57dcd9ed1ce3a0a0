// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Suppliers ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::create_supplier,
        handlers::suppliers::get_supplier,
        handlers::suppliers::suspend_supplier,
        handlers::suppliers::ban_supplier,
        handlers::suppliers::unsuspend_supplier,
        handlers::suppliers::unban_supplier,
        handlers::suppliers::delete_supplier,
        handlers::suppliers::send_reminder,
        handlers::suppliers::set_terms,

        // --- Compliance ---
        handlers::suppliers::renew_registration,
        handlers::suppliers::place_review_hold,
        handlers::suppliers::approve_registration,
        handlers::compliance::get_alert_settings,
        handlers::compliance::update_alert_settings,
        handlers::compliance::run_compliance,

        // --- Employees ---
        handlers::employees::list_roles,
        handlers::employees::list_employees,
        handlers::employees::invite_employee,
        handlers::employees::assign_role,
        handlers::employees::toggle_permission,
        handlers::employees::deactivate_employee,
        handlers::employees::reactivate_employee,
        handlers::employees::remove_employee,
        handlers::employees::record_login,
        handlers::employees::update_notification_flags,

        // --- Plans ---
        handlers::plans::list_plans,
        handlers::plans::feature_availability,
        handlers::plans::plan_usage,

        // --- Services ---
        handlers::catalog::get_catalog,
        handlers::catalog::toggle_service,
        handlers::catalog::update_service,

        // --- Directory ---
        handlers::directory::list_directory,
    ),
    components(
        schemas(
            // --- Suppliers ---
            models::supplier::LocalizedText,
            models::supplier::SuspensionOrigin,
            models::supplier::AccountStatusKind,
            models::supplier::LifecycleAction,
            models::supplier::TermsSettings,
            models::supplier::RegistrationView,
            models::supplier::SupplierView,
            models::supplier::DirectoryEntry,
            models::supplier::CreateSupplierPayload,
            models::supplier::ReasonPayload,
            models::supplier::TermsPayload,

            // --- Compliance ---
            models::compliance::CrStatus,
            models::compliance::AlertLevel,
            models::compliance::CrAssessment,
            models::compliance::AlertSettings,
            models::compliance::UpdateAlertSettingsRequest,
            models::compliance::RenewRegistrationRequest,
            models::compliance::ReviewHoldRequest,
            models::compliance::ComplianceEntry,
            models::compliance::ComplianceReport,

            // --- Employees ---
            models::employee::Permission,
            models::employee::PermissionGroup,
            models::employee::RoleKind,
            models::employee::EmployeeStatus,
            models::employee::EmployeeView,
            models::employee::RoleDefinition,
            models::employee::PermissionEntry,
            models::employee::RoleCatalog,
            models::employee::InviteEmployeePayload,
            models::employee::AssignRolePayload,
            models::employee::TogglePermissionPayload,
            models::employee::NotificationFlagsPayload,

            // --- Plans ---
            models::plan::PlanRestrictions,
            models::plan::RestrictionKey,
            models::plan::SubscriptionPlan,
            models::plan::StorageInfo,
            models::plan::PlanUsage,
            models::plan::FeatureAvailability,

            // --- Services ---
            models::catalog::ServiceCategory,
            models::catalog::ServiceShape,
            models::catalog::FlatRateService,
            models::catalog::RateCardService,
            models::catalog::ResponseService,
            models::catalog::ServicesCatalog,
            models::catalog::ServiceUpdate,
            models::catalog::CategorySummary,
            handlers::catalog::CatalogResponse,
        )
    ),
    tags(
        (name = "Suppliers", description = "Ciclo de vida da conta do fornecedor"),
        (name = "Compliance", description = "Registro Comercial (CR) e alertas de vencimento"),
        (name = "Employees", description = "Funcionários do fornecedor (Cargos e Permissões)"),
        (name = "Plans", description = "Planos de assinatura e restrições"),
        (name = "Services", description = "Catálogo de serviços do fornecedor"),
        (name = "Directory", description = "Diretório público de fornecedores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
