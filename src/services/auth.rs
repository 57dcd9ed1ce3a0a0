// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Caller, CallerRole, Claims},
};

// Só valida e emite tokens; o login em si é do provedor de identidade.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<Caller, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(Caller::from(token_data.claims))
    }

    // Usado por ferramentas internas e pelos testes
    pub fn issue_token(
        &self,
        subject: Uuid,
        role: CallerRole,
        supplier_id: Option<Uuid>,
        plan_id: Option<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(12);

        let claims = Claims {
            sub: subject,
            role,
            supplier_id,
            plan_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates_back_to_caller() {
        let auth = AuthService::new("segredo-de-teste".into());
        let supplier = Uuid::new_v4();
        let token = auth
            .issue_token(Uuid::new_v4(), CallerRole::SupplierOwner, Some(supplier), Some("free".into()))
            .unwrap();

        let caller = auth.validate_token(&token).unwrap();
        assert_eq!(caller.role, CallerRole::SupplierOwner);
        assert!(caller.belongs_to(supplier));
        assert_eq!(caller.plan_id.as_deref(), Some("free"));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = AuthService::new("a".into())
            .issue_token(Uuid::new_v4(), CallerRole::Admin, None, None)
            .unwrap();

        let result = AuthService::new("b".into()).validate_token(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
