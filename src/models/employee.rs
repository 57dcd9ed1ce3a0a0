// src/models/employee.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- PERMISSÕES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Produtos
    ViewProducts,
    AddProducts,
    EditProducts,
    DeleteProducts,
    EditPrices,
    // Pedidos
    ViewOrders,
    ManageOrders,
    ConfirmPrices,
    // Financeiro
    ViewReports,
    ExportReports,
    ViewFinance,
    // Configurações
    ManageEmployees,
    ManageServices,
    ManageSettings,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::ViewProducts,
        Permission::AddProducts,
        Permission::EditProducts,
        Permission::DeleteProducts,
        Permission::EditPrices,
        Permission::ViewOrders,
        Permission::ManageOrders,
        Permission::ConfirmPrices,
        Permission::ViewReports,
        Permission::ExportReports,
        Permission::ViewFinance,
        Permission::ManageEmployees,
        Permission::ManageServices,
        Permission::ManageSettings,
    ];

    // Agrupamento usado só para montar a tela; não tem semântica de acesso.
    pub fn group(&self) -> PermissionGroup {
        match self {
            Permission::ViewProducts
            | Permission::AddProducts
            | Permission::EditProducts
            | Permission::DeleteProducts
            | Permission::EditPrices => PermissionGroup::Products,
            Permission::ViewOrders | Permission::ManageOrders | Permission::ConfirmPrices => {
                PermissionGroup::Orders
            }
            Permission::ViewReports | Permission::ExportReports | Permission::ViewFinance => {
                PermissionGroup::Finance
            }
            Permission::ManageEmployees
            | Permission::ManageServices
            | Permission::ManageSettings => PermissionGroup::Settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGroup {
    Products,
    Orders,
    Finance,
    Settings,
}

// --- CARGOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Admin,
    Products,
    Orders,
    Reports,
    ViewOnly,
    Custom,
}

impl RoleKind {
    pub const ALL: [RoleKind; 6] = [
        RoleKind::Admin,
        RoleKind::Products,
        RoleKind::Orders,
        RoleKind::Reports,
        RoleKind::ViewOnly,
        RoleKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Products => "products",
            RoleKind::Orders => "orders",
            RoleKind::Reports => "reports",
            RoleKind::ViewOnly => "view_only",
            RoleKind::Custom => "custom",
        }
    }

    /// Pacote fixo de permissões do cargo. `Custom` não tem pacote.
    pub fn bundle(&self) -> Option<&'static [Permission]> {
        use Permission::*;
        match self {
            RoleKind::Admin => Some(&Permission::ALL),
            RoleKind::Products => Some(&[
                ViewProducts,
                AddProducts,
                EditProducts,
                DeleteProducts,
                EditPrices,
            ]),
            RoleKind::Orders => Some(&[ViewProducts, ViewOrders, ManageOrders, ConfirmPrices]),
            RoleKind::Reports => Some(&[ViewReports, ExportReports, ViewFinance]),
            RoleKind::ViewOnly => Some(&[ViewProducts, ViewOrders, ViewReports]),
            RoleKind::Custom => None,
        }
    }

    pub fn bundle_set(&self) -> BTreeSet<Permission> {
        self.bundle()
            .map(|perms| perms.iter().copied().collect())
            .unwrap_or_default()
    }
}

// ---
// Acesso do funcionário: cargo nomeado OU conjunto customizado.
// ---
// Um cargo nomeado não carrega conjunto próprio, então é impossível ele
// divergir do pacote fixo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeAccess {
    Named(NamedRole),
    Custom(BTreeSet<Permission>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedRole {
    Admin,
    Products,
    Orders,
    Reports,
    ViewOnly,
}

impl NamedRole {
    pub fn kind(&self) -> RoleKind {
        match self {
            NamedRole::Admin => RoleKind::Admin,
            NamedRole::Products => RoleKind::Products,
            NamedRole::Orders => RoleKind::Orders,
            NamedRole::Reports => RoleKind::Reports,
            NamedRole::ViewOnly => RoleKind::ViewOnly,
        }
    }

    pub fn from_kind(kind: RoleKind) -> Option<Self> {
        match kind {
            RoleKind::Admin => Some(NamedRole::Admin),
            RoleKind::Products => Some(NamedRole::Products),
            RoleKind::Orders => Some(NamedRole::Orders),
            RoleKind::Reports => Some(NamedRole::Reports),
            RoleKind::ViewOnly => Some(NamedRole::ViewOnly),
            RoleKind::Custom => None,
        }
    }
}

impl EmployeeAccess {
    /// Reconstrói o acesso a partir do par (cargo, permissões) guardado.
    /// Qualquer desvio do pacote fixo vira `Custom`.
    pub fn from_parts(role: RoleKind, permissions: BTreeSet<Permission>) -> Self {
        match NamedRole::from_kind(role) {
            Some(named) if role.bundle_set() == permissions => EmployeeAccess::Named(named),
            _ => EmployeeAccess::Custom(permissions),
        }
    }

    pub fn role(&self) -> RoleKind {
        match self {
            EmployeeAccess::Named(named) => named.kind(),
            EmployeeAccess::Custom(_) => RoleKind::Custom,
        }
    }

    pub fn permissions(&self) -> BTreeSet<Permission> {
        match self {
            EmployeeAccess::Named(named) => named.kind().bundle_set(),
            EmployeeAccess::Custom(set) => set.clone(),
        }
    }
}

// --- STATUS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Pending,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Pending => "pending",
        }
    }
}

// ---
// Funcionário do fornecedor
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEmployee", into = "StoredEmployee")]
pub struct SupplierEmployee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub access: EmployeeAccess,
    pub status: EmployeeStatus,
    pub receive_order_notifications: bool,
    pub receive_price_confirm_notifications: bool,
    pub receive_weekly_reports: bool,
    pub created_at: DateTime<Utc>,
    pub invited_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

// O formato do documento no banco: cargo + lista de permissões lado a lado.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEmployee {
    id: Uuid,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    role: RoleKind,
    #[serde(default)]
    permissions: BTreeSet<Permission>,
    status: EmployeeStatus,
    #[serde(default)]
    receive_order_notifications: bool,
    #[serde(default)]
    receive_price_confirm_notifications: bool,
    #[serde(default)]
    receive_weekly_reports: bool,
    created_at: DateTime<Utc>,
    invited_at: DateTime<Utc>,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
}

impl From<StoredEmployee> for SupplierEmployee {
    fn from(doc: StoredEmployee) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            email: doc.email,
            phone: doc.phone,
            job_title: doc.job_title,
            access: EmployeeAccess::from_parts(doc.role, doc.permissions),
            status: doc.status,
            receive_order_notifications: doc.receive_order_notifications,
            receive_price_confirm_notifications: doc.receive_price_confirm_notifications,
            receive_weekly_reports: doc.receive_weekly_reports,
            created_at: doc.created_at,
            invited_at: doc.invited_at,
            last_login: doc.last_login,
        }
    }
}

impl From<SupplierEmployee> for StoredEmployee {
    fn from(employee: SupplierEmployee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            phone: employee.phone,
            job_title: employee.job_title,
            role: employee.access.role(),
            permissions: employee.access.permissions(),
            status: employee.status,
            receive_order_notifications: employee.receive_order_notifications,
            receive_price_confirm_notifications: employee.receive_price_confirm_notifications,
            receive_weekly_reports: employee.receive_weekly_reports,
            created_at: employee.created_at,
            invited_at: employee.invited_at,
            last_login: employee.last_login,
        }
    }
}

// --- RESPOSTAS ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: Uuid,
    #[schema(example = "Fahad Al-Harbi")]
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub role: RoleKind,
    pub permissions: BTreeSet<Permission>,
    pub status: EmployeeStatus,
    pub receive_order_notifications: bool,
    pub receive_price_confirm_notifications: bool,
    pub receive_weekly_reports: bool,
    pub created_at: DateTime<Utc>,
    pub invited_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&SupplierEmployee> for EmployeeView {
    fn from(employee: &SupplierEmployee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            job_title: employee.job_title.clone(),
            role: employee.access.role(),
            permissions: employee.access.permissions(),
            status: employee.status,
            receive_order_notifications: employee.receive_order_notifications,
            receive_price_confirm_notifications: employee.receive_price_confirm_notifications,
            receive_weekly_reports: employee.receive_weekly_reports,
            created_at: employee.created_at,
            invited_at: employee.invited_at,
            last_login: employee.last_login,
        }
    }
}

// Catálogo de cargos para a tela de convite
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    pub role: RoleKind,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub permission: Permission,
    pub group: PermissionGroup,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCatalog {
    pub roles: Vec<RoleDefinition>,
    pub permissions: Vec<PermissionEntry>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteEmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Fahad Al-Harbi")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "fahad@building.sa")]
    pub email: String,

    pub phone: Option<String>,
    pub job_title: Option<String>,

    #[schema(example = "products")]
    pub role: RoleKind,

    // Só considerado quando role = custom
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolePayload {
    pub role: RoleKind,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TogglePermissionPayload {
    #[schema(example = "edit_prices")]
    pub permission: Permission,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFlagsPayload {
    pub receive_order_notifications: Option<bool>,
    pub receive_price_confirm_notifications: Option<bool>,
    pub receive_weekly_reports: Option<bool>,
}
