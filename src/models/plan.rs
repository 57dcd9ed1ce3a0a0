// src/models/plan.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Cada flag = "esta capacidade está BLOQUEADA neste plano".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRestrictions {
    pub encrypted_suppliers: bool,
    pub limited_usage: bool,
    pub limited_support: bool,
    #[serde(rename = "noAIPricing")]
    pub no_ai_pricing: bool,
    pub no_download: bool,
    pub no_company_logo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RestrictionKey {
    EncryptedSuppliers,
    LimitedUsage,
    LimitedSupport,
    #[serde(rename = "noAIPricing")]
    NoAiPricing,
    NoDownload,
    NoCompanyLogo,
}

impl PlanRestrictions {
    pub fn is_blocked(&self, key: RestrictionKey) -> bool {
        match key {
            RestrictionKey::EncryptedSuppliers => self.encrypted_suppliers,
            RestrictionKey::LimitedUsage => self.limited_usage,
            RestrictionKey::LimitedSupport => self.limited_support,
            RestrictionKey::NoAiPricing => self.no_ai_pricing,
            RestrictionKey::NoDownload => self.no_download,
            RestrictionKey::NoCompanyLogo => self.no_company_logo,
        }
    }
}

// Dado de referência: imutável em tempo de execução
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    #[schema(example = "professional")]
    pub id: String,
    #[schema(example = 499)]
    pub price: Decimal,
    // -1 = ilimitado
    #[schema(example = 20)]
    pub projects_included: i64,
    pub extra_project_price: Decimal,
    #[serde(rename = "storageMB")]
    #[schema(example = 10240)]
    pub storage_mb: u64,
    pub restrictions: PlanRestrictions,
}

pub const UNLIMITED_PROJECTS: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub total: u64,
    pub used: u64,
    pub remaining: u64,
    #[schema(example = 42.5)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanUsage {
    pub plan_id: String,
    // -1 = ilimitado
    pub remaining_projects: i64,
    pub storage: StorageInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAvailability {
    pub plan_id: String,
    pub restriction: RestrictionKey,
    pub available: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsageQuery {
    #[serde(default)]
    pub used_projects: i64,
    #[serde(default)]
    pub used_storage_mb: u64,
}
