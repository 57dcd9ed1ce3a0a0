// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Quem está chamando (definido pelo provedor de identidade)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Admin,
    SupplierOwner,
    SupplierEmployee,
    Customer,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário / funcionário)
    pub role: CallerRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

// O chamador autenticado, já extraído do token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: CallerRole,
    pub supplier_id: Option<Uuid>,
    pub plan_id: Option<String>,
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            supplier_id: claims.supplier_id,
            plan_id: claims.plan_id,
        }
    }
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    // Dono ou funcionário do fornecedor informado
    pub fn belongs_to(&self, supplier_id: Uuid) -> bool {
        matches!(
            self.role,
            CallerRole::SupplierOwner | CallerRole::SupplierEmployee
        ) && self.supplier_id == Some(supplier_id)
    }
}
