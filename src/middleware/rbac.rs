// src/middleware/rbac.rs

use std::{collections::HashMap, marker::PhantomData};

use axum::{
    extract::{FromRef, FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedCaller,
    models::{auth::Caller, employee::Permission},
    services::rbac_service,
};

/// 1. O Trait que define qual permissão a rota exige
pub trait PermissionDef: Send + Sync + 'static {
    fn permission() -> Permission;
}

/// 2. O Extractor (Guardião): chamador + fornecedor do path `{id}`
pub struct RequirePermission<T> {
    pub caller: Caller,
    pub supplier_id: Uuid,
    _marker: PhantomData<T>,
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai o chamador
        let AuthenticatedCaller(caller) = AuthenticatedCaller::from_request_parts(parts, state).await?;

        // B. Extrai o fornecedor da rota
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::SupplierNotFound)?;
        let supplier_id = params
            .get("id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(AppError::SupplierNotFound)?;

        // C. Verifica no documento do fornecedor
        let profile = app_state
            .supplier_repo
            .find_by_id(supplier_id)
            .await
            .ok_or(AppError::SupplierNotFound)?;

        if let Err(e) = rbac_service::require_permission(&caller, &profile, T::permission()) {
            tracing::warn!(
                caller_id = %caller.id,
                supplier_id = %supplier_id,
                "🚫 Permissão '{:?}' negada",
                T::permission()
            );
            return Err(e);
        }

        Ok(RequirePermission { caller, supplier_id, _marker: PhantomData })
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermManageEmployees;
impl PermissionDef for PermManageEmployees {
    fn permission() -> Permission { Permission::ManageEmployees }
}

pub struct PermManageSettings;
impl PermissionDef for PermManageSettings {
    fn permission() -> Permission { Permission::ManageSettings }
}

pub struct PermViewProducts;
impl PermissionDef for PermViewProducts {
    fn permission() -> Permission { Permission::ViewProducts }
}
