// src/models/supplier.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::ServicesCatalog;
use crate::models::compliance::{CommercialRegistration, CrAssessment};
use crate::models::employee::{EmployeeView, SupplierEmployee};

// Nome da empresa em árabe e inglês
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocalizedText {
    #[schema(example = "شركة البناء")]
    pub ar: String,
    #[schema(example = "Building Co")]
    pub en: String,
}

// Quem originou a suspensão
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuspensionOrigin {
    #[default]
    Manual,
    System,
}

// ---
// Estado da conta do fornecedor.
// ---
// Cada variante carrega apenas os seus próprios campos: não existe
// "suspendedAt" num fornecedor banido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended {
        #[serde(rename = "suspendedAt")]
        suspended_at: DateTime<Utc>,
        #[serde(rename = "suspendReason")]
        reason: String,
        #[serde(default, rename = "suspensionOrigin")]
        origin: SuspensionOrigin,
    },
    Banned {
        #[serde(rename = "bannedAt")]
        banned_at: DateTime<Utc>,
        #[serde(rename = "banReason")]
        reason: String,
    },
    Deleted {
        #[serde(rename = "deletedAt")]
        deleted_at: DateTime<Utc>,
        #[serde(default, rename = "deleteReason")]
        reason: Option<String>,
    },
}

impl AccountStatus {
    pub fn kind(&self) -> AccountStatusKind {
        match self {
            AccountStatus::Active => AccountStatusKind::Active,
            AccountStatus::Suspended { .. } => AccountStatusKind::Suspended,
            AccountStatus::Banned { .. } => AccountStatusKind::Banned,
            AccountStatus::Deleted { .. } => AccountStatusKind::Deleted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatusKind {
    Active,
    Suspended,
    Banned,
    Deleted,
}

impl AccountStatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatusKind::Active => "active",
            AccountStatusKind::Suspended => "suspended",
            AccountStatusKind::Banned => "banned",
            AccountStatusKind::Deleted => "deleted",
        }
    }
}

// Eventos do ciclo de vida da conta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Suspend,
    Ban,
    Unsuspend,
    Unban,
    Delete,
}

impl LifecycleAction {
    pub const ALL: [LifecycleAction; 5] = [
        LifecycleAction::Suspend,
        LifecycleAction::Ban,
        LifecycleAction::Unsuspend,
        LifecycleAction::Unban,
        LifecycleAction::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Suspend => "suspend",
            LifecycleAction::Ban => "ban",
            LifecycleAction::Unsuspend => "unsuspend",
            LifecycleAction::Unban => "unban",
            LifecycleAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsSettings {
    pub is_enabled: bool,
    pub enabled_at: Option<DateTime<Utc>>,
}

// ---
// O documento do fornecedor
// ---
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProfile {
    pub id: Uuid,
    pub company_name: LocalizedText,
    pub email: String,
    pub phone: String,
    pub commercial_registration: CommercialRegistration,
    #[serde(flatten)]
    pub status: AccountStatus,
    #[serde(default)]
    pub employees: Vec<SupplierEmployee>,
    #[serde(default)]
    pub services: ServicesCatalog,
    #[serde(default)]
    pub terms: TermsSettings,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl SupplierProfile {
    pub fn new(
        company_name: LocalizedText,
        email: impl Into<String>,
        phone: impl Into<String>,
        commercial_registration: CommercialRegistration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name,
            email: email.into(),
            phone: phone.into(),
            commercial_registration,
            status: AccountStatus::Active,
            employees: Vec::new(),
            services: ServicesCatalog::default(),
            terms: TermsSettings::default(),
            created_at: now,
            last_active_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.status, AccountStatus::Deleted { .. })
    }

    pub fn employee(&self, employee_id: Uuid) -> Option<&SupplierEmployee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }
}

// ---
// Projeções para a API
// ---

// Visão do CR com o status calculado na hora da leitura
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    #[schema(example = "1010123456")]
    pub number: String,
    pub expiry_date: NaiveDate,
    #[serde(flatten)]
    pub assessment: CrAssessment,
}

// O formato "achatado" do estado da conta (como o frontend espera)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierView {
    pub id: Uuid,
    pub company_name: LocalizedText,
    pub email: String,
    pub phone: String,
    pub commercial_registration: RegistrationView,
    pub status: AccountStatusKind,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspend_reason: Option<String>,
    pub suspension_origin: Option<SuspensionOrigin>,
    pub banned_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub allowed_actions: Vec<LifecycleAction>,
    pub terms: TermsSettings,
    pub employees: Vec<EmployeeView>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl SupplierView {
    pub fn new(
        profile: &SupplierProfile,
        assessment: CrAssessment,
        allowed_actions: Vec<LifecycleAction>,
    ) -> Self {
        let mut view = Self {
            id: profile.id,
            company_name: profile.company_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            commercial_registration: RegistrationView {
                number: profile.commercial_registration.number.clone(),
                expiry_date: profile.commercial_registration.expiry_date,
                assessment,
            },
            status: profile.status.kind(),
            suspended_at: None,
            suspend_reason: None,
            suspension_origin: None,
            banned_at: None,
            ban_reason: None,
            deleted_at: None,
            allowed_actions,
            terms: profile.terms.clone(),
            employees: profile.employees.iter().map(EmployeeView::from).collect(),
            created_at: profile.created_at,
            last_active_at: profile.last_active_at,
        };

        match &profile.status {
            AccountStatus::Active => {}
            AccountStatus::Suspended { suspended_at, reason, origin } => {
                view.suspended_at = Some(*suspended_at);
                view.suspend_reason = Some(reason.clone());
                view.suspension_origin = Some(*origin);
            }
            AccountStatus::Banned { banned_at, reason } => {
                view.banned_at = Some(*banned_at);
                view.ban_reason = Some(reason.clone());
            }
            AccountStatus::Deleted { deleted_at, .. } => {
                view.deleted_at = Some(*deleted_at);
            }
        }

        view
    }
}

// Entrada do diretório público (nome mascarado conforme o plano)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: Uuid,
    pub company_name: LocalizedText,
    pub services_offered: usize,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierPayload {
    #[validate(length(min = 2, message = "O nome em árabe deve ter no mínimo 2 caracteres"))]
    #[schema(example = "شركة البناء")]
    pub company_name_ar: String,

    #[validate(length(min = 2, message = "O nome em inglês deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Building Co")]
    pub company_name_en: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "contato@building.sa")]
    pub email: String,

    #[validate(length(min = 8, message = "Telefone inválido"))]
    #[schema(example = "+966500000000")]
    pub phone: String,

    #[validate(length(equal = 10, message = "O número do CR deve ter 10 dígitos."))]
    #[schema(example = "1010123456")]
    pub cr_number: String,

    #[schema(example = "2027-06-30")]
    pub cr_expiry_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReasonPayload {
    #[validate(length(max = 500, message = "O motivo deve ter no máximo 500 caracteres"))]
    #[schema(example = "Documentos fraudulentos")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsPayload {
    pub enabled: bool,
}
