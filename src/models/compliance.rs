// src/models/compliance.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Status do Registro Comercial (CR)
// ---
// Sempre DERIVADO: nunca é gravado no documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CrStatus {
    Valid,
    Expiring,
    Expired,
    PendingReview,
}

impl CrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrStatus::Valid => "valid",
            CrStatus::Expiring => "expiring",
            CrStatus::Expired => "expired",
            CrStatus::PendingReview => "pending_review",
        }
    }
}

// Degrau da escada de alertas (primeiro, segundo, final).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    None,
    First,
    Second,
    Final,
    Expired,
}

// Resultado da classificação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrAssessment {
    pub status: CrStatus,
    #[schema(example = 12)]
    pub days_until_expiry: i64,
    pub alert_level: AlertLevel,
}

// Bloqueio manual de revisão colocado por um administrador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHold {
    pub placed_at: DateTime<Utc>,
    pub placed_by: Option<Uuid>,
    pub note: Option<String>,
}

// ---
// 2. Registro Comercial
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialRegistration {
    pub number: String,
    pub expiry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_hold: Option<ReviewHold>,
    // Último degrau já notificado; zera a cada renovação
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_alert_level: Option<AlertLevel>,
}

impl CommercialRegistration {
    pub fn new(number: impl Into<String>, expiry_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            expiry_date,
            review_hold: None,
            last_alert_level: None,
        }
    }

    pub fn is_under_review(&self) -> bool {
        self.review_hold.is_some()
    }

    // Só notifica quando sobe um degrau em relação ao último aviso
    pub fn escalates_to(&self, level: AlertLevel) -> bool {
        level != AlertLevel::None && self.last_alert_level.is_none_or(|last| level > last)
    }
}

// Número de CR: exatamente 10 dígitos.
pub fn is_valid_cr_number(number: &str) -> bool {
    number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
}

// ---
// 3. Configuração global de alertas (editável só pelo admin)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    #[schema(example = 60)]
    pub first_alert_days: i64,
    #[schema(example = 30)]
    pub second_alert_days: i64,
    #[schema(example = 7)]
    pub final_alert_days: i64,
    pub auto_suspend_on_expiry: bool,
    pub notify_admin_on_expiry: bool,
    pub require_admin_review: bool,

    // Versionamento: cada alteração incrementa
    #[schema(example = 1)]
    pub version: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            first_alert_days: 60,
            second_alert_days: 30,
            final_alert_days: 7,
            auto_suspend_on_expiry: true,
            notify_admin_on_expiry: true,
            require_admin_review: false,
            version: 1,
            updated_at: None,
            updated_by: None,
        }
    }
}

// Payload de atualização das configurações
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlertSettingsRequest {
    #[validate(range(min = 0, max = 3650, message = "Deve estar entre 0 e 3650 dias."))]
    #[schema(example = 90)]
    pub first_alert_days: i64,

    #[validate(range(min = 0, max = 3650, message = "Deve estar entre 0 e 3650 dias."))]
    #[schema(example = 30)]
    pub second_alert_days: i64,

    #[validate(range(min = 0, max = 3650, message = "Deve estar entre 0 e 3650 dias."))]
    #[schema(example = 7)]
    pub final_alert_days: i64,

    pub auto_suspend_on_expiry: bool,
    pub notify_admin_on_expiry: bool,
    pub require_admin_review: bool,
}

// Payload de renovação do CR (enviado pelo dono do fornecedor)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewRegistrationRequest {
    #[validate(length(equal = 10, message = "O número do CR deve ter 10 dígitos."))]
    #[schema(example = "1010123456")]
    pub number: String,

    #[schema(example = "2027-12-31")]
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHoldRequest {
    #[validate(length(max = 500))]
    #[schema(example = "Documento ilegível, aguardando nova cópia")]
    pub note: Option<String>,
}

// ---
// 4. Relatório da varredura de conformidade
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEntry {
    pub supplier_id: Uuid,
    pub cr_number: String,
    #[serde(flatten)]
    pub assessment: CrAssessment,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub evaluated_at: DateTime<Utc>,
    pub settings_version: u64,
    pub entries: Vec<ComplianceEntry>,
    pub auto_suspended: Vec<Uuid>,
    pub notifications_sent: usize,
}
