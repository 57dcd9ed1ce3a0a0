// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Categorias ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Delivery,
    Installation,
    Operators,
    Maintenance,
    Consulting,
    Training,
    Inspection,
    Emergency,
    ProjectManagement,
}

// Formato dos registros de cada categoria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ServiceShape {
    FlatRate,
    RateCard,
    Response,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 9] = [
        ServiceCategory::Delivery,
        ServiceCategory::Installation,
        ServiceCategory::Operators,
        ServiceCategory::Maintenance,
        ServiceCategory::Consulting,
        ServiceCategory::Training,
        ServiceCategory::Inspection,
        ServiceCategory::Emergency,
        ServiceCategory::ProjectManagement,
    ];

    pub fn shape(&self) -> ServiceShape {
        match self {
            ServiceCategory::Delivery
            | ServiceCategory::Installation
            | ServiceCategory::Training
            | ServiceCategory::Inspection => ServiceShape::FlatRate,
            ServiceCategory::Operators
            | ServiceCategory::Consulting
            | ServiceCategory::ProjectManagement => ServiceShape::RateCard,
            ServiceCategory::Maintenance | ServiceCategory::Emergency => ServiceShape::Response,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Delivery => "delivery",
            ServiceCategory::Installation => "installation",
            ServiceCategory::Operators => "operators",
            ServiceCategory::Maintenance => "maintenance",
            ServiceCategory::Consulting => "consulting",
            ServiceCategory::Training => "training",
            ServiceCategory::Inspection => "inspection",
            ServiceCategory::Emergency => "emergency",
            ServiceCategory::ProjectManagement => "project_management",
        }
    }

    // IDs dos registros criados para todo fornecedor novo
    fn default_ids(&self) -> &'static [&'static str] {
        match self {
            ServiceCategory::Delivery => &["standard", "express", "scheduled"],
            ServiceCategory::Installation => &["basic_installation", "full_installation"],
            ServiceCategory::Operators => &["crane_operator", "forklift_operator", "equipment_driver"],
            ServiceCategory::Maintenance => &["preventive", "corrective"],
            ServiceCategory::Consulting => &["technical_consulting", "engineering_consulting"],
            ServiceCategory::Training => &["equipment_training", "safety_training"],
            ServiceCategory::Inspection => &["quality_inspection", "site_inspection"],
            ServiceCategory::Emergency => &["emergency_repair", "emergency_delivery"],
            ServiceCategory::ProjectManagement => &["full_management", "site_supervision"],
        }
    }
}

// --- Registros ---

/// Operações comuns a todos os formatos de registro.
pub trait ServiceRecord {
    fn id(&self) -> &str;
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

// Entrega, instalação, treinamento, inspeção
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatRateService {
    #[schema(example = "standard")]
    pub id: String,
    pub enabled: bool,
    pub price: Option<Decimal>,
    #[schema(example = "2-3 dias")]
    pub duration: Option<String>,
}

// Operadores, consultoria, gestão de projetos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateCardService {
    #[schema(example = "crane_operator")]
    pub id: String,
    pub enabled: bool,
    pub hourly_rate: Option<Decimal>,
    pub daily_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
}

// Manutenção, emergência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseService {
    #[schema(example = "emergency_repair")]
    pub id: String,
    pub enabled: bool,
    pub price: Option<Decimal>,
    #[schema(example = "4h")]
    pub response_time: Option<String>,
}

macro_rules! impl_service_record {
    ($($ty:ty),*) => {
        $(
            impl ServiceRecord for $ty {
                fn id(&self) -> &str { &self.id }
                fn enabled(&self) -> bool { self.enabled }
                fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
            }
        )*
    };
}

impl_service_record!(FlatRateService, RateCardService, ResponseService);

impl FlatRateService {
    fn disabled(id: &str) -> Self {
        Self { id: id.to_string(), enabled: false, price: None, duration: None }
    }
}

impl RateCardService {
    fn disabled(id: &str) -> Self {
        Self {
            id: id.to_string(),
            enabled: false,
            hourly_rate: None,
            daily_rate: None,
            monthly_rate: None,
        }
    }
}

impl ResponseService {
    fn disabled(id: &str) -> Self {
        Self { id: id.to_string(), enabled: false, price: None, response_time: None }
    }
}

// ---
// Catálogo completo do fornecedor
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicesCatalog {
    pub delivery: Vec<FlatRateService>,
    pub installation: Vec<FlatRateService>,
    pub operators: Vec<RateCardService>,
    pub maintenance: Vec<ResponseService>,
    pub consulting: Vec<RateCardService>,
    pub training: Vec<FlatRateService>,
    pub inspection: Vec<FlatRateService>,
    pub emergency: Vec<ResponseService>,
    pub project_management: Vec<RateCardService>,
}

impl Default for ServicesCatalog {
    fn default() -> Self {
        let flat = |c: ServiceCategory| -> Vec<FlatRateService> {
            c.default_ids().iter().map(|id| FlatRateService::disabled(id)).collect()
        };
        let card = |c: ServiceCategory| -> Vec<RateCardService> {
            c.default_ids().iter().map(|id| RateCardService::disabled(id)).collect()
        };
        let resp = |c: ServiceCategory| -> Vec<ResponseService> {
            c.default_ids().iter().map(|id| ResponseService::disabled(id)).collect()
        };

        Self {
            delivery: flat(ServiceCategory::Delivery),
            installation: flat(ServiceCategory::Installation),
            operators: card(ServiceCategory::Operators),
            maintenance: resp(ServiceCategory::Maintenance),
            consulting: card(ServiceCategory::Consulting),
            training: flat(ServiceCategory::Training),
            inspection: flat(ServiceCategory::Inspection),
            emergency: resp(ServiceCategory::Emergency),
            project_management: card(ServiceCategory::ProjectManagement),
        }
    }
}

// Acesso tipado à lista de uma categoria
pub enum CategoryRecords<'a> {
    FlatRate(&'a [FlatRateService]),
    RateCard(&'a [RateCardService]),
    Response(&'a [ResponseService]),
}

pub enum CategoryRecordsMut<'a> {
    FlatRate(&'a mut Vec<FlatRateService>),
    RateCard(&'a mut Vec<RateCardService>),
    Response(&'a mut Vec<ResponseService>),
}

impl ServicesCatalog {
    pub fn records(&self, category: ServiceCategory) -> CategoryRecords<'_> {
        match category {
            ServiceCategory::Delivery => CategoryRecords::FlatRate(&self.delivery),
            ServiceCategory::Installation => CategoryRecords::FlatRate(&self.installation),
            ServiceCategory::Operators => CategoryRecords::RateCard(&self.operators),
            ServiceCategory::Maintenance => CategoryRecords::Response(&self.maintenance),
            ServiceCategory::Consulting => CategoryRecords::RateCard(&self.consulting),
            ServiceCategory::Training => CategoryRecords::FlatRate(&self.training),
            ServiceCategory::Inspection => CategoryRecords::FlatRate(&self.inspection),
            ServiceCategory::Emergency => CategoryRecords::Response(&self.emergency),
            ServiceCategory::ProjectManagement => CategoryRecords::RateCard(&self.project_management),
        }
    }

    pub fn records_mut(&mut self, category: ServiceCategory) -> CategoryRecordsMut<'_> {
        match category {
            ServiceCategory::Delivery => CategoryRecordsMut::FlatRate(&mut self.delivery),
            ServiceCategory::Installation => CategoryRecordsMut::FlatRate(&mut self.installation),
            ServiceCategory::Operators => CategoryRecordsMut::RateCard(&mut self.operators),
            ServiceCategory::Maintenance => CategoryRecordsMut::Response(&mut self.maintenance),
            ServiceCategory::Consulting => CategoryRecordsMut::RateCard(&mut self.consulting),
            ServiceCategory::Training => CategoryRecordsMut::FlatRate(&mut self.training),
            ServiceCategory::Inspection => CategoryRecordsMut::FlatRate(&mut self.inspection),
            ServiceCategory::Emergency => CategoryRecordsMut::Response(&mut self.emergency),
            ServiceCategory::ProjectManagement => {
                CategoryRecordsMut::RateCard(&mut self.project_management)
            }
        }
    }
}

// ---
// Atualização parcial tipada: cada formato só aceita os seus campos.
// ---
// `None` = campo inalterado.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ServiceUpdate {
    FlatRate {
        price: Option<Decimal>,
        duration: Option<String>,
    },
    RateCard {
        #[serde(rename = "hourlyRate")]
        hourly_rate: Option<Decimal>,
        #[serde(rename = "dailyRate")]
        daily_rate: Option<Decimal>,
        #[serde(rename = "monthlyRate")]
        monthly_rate: Option<Decimal>,
    },
    Response {
        price: Option<Decimal>,
        #[serde(rename = "responseTime")]
        response_time: Option<String>,
    },
}

impl ServiceUpdate {
    pub fn shape(&self) -> ServiceShape {
        match self {
            ServiceUpdate::FlatRate { .. } => ServiceShape::FlatRate,
            ServiceUpdate::RateCard { .. } => ServiceShape::RateCard,
            ServiceUpdate::Response { .. } => ServiceShape::Response,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: ServiceCategory,
    pub shape: ServiceShape,
    pub enabled_count: usize,
    pub total: usize,
}
