// src/db/supplier_repo.rs

use std::{collections::HashMap, path::Path, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::supplier::SupplierProfile};

// O repositório de fornecedores: um documento por fornecedor,
// última escrita vence.
//
// Cada `update` roda sob o lock de escrita, então duas transições para o
// mesmo fornecedor nunca são aplicadas ao mesmo tempo.
#[derive(Clone, Default)]
pub struct SupplierRepository {
    docs: Arc<RwLock<HashMap<Uuid, SupplierProfile>>>,
}

impl SupplierRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: SupplierProfile) -> SupplierProfile {
        let mut docs = self.docs.write().await;
        docs.insert(profile.id, profile.clone());
        profile
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<SupplierProfile> {
        self.docs.read().await.get(&id).cloned()
    }

    // Ordenado por data de criação para listagens estáveis
    pub async fn list_all(&self) -> Vec<SupplierProfile> {
        let docs = self.docs.read().await;
        let mut all: Vec<SupplierProfile> = docs.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }

    /// Aplica `f` numa cópia do documento e só grava se der `Ok`.
    pub async fn update<T, F>(&self, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SupplierProfile) -> Result<T, AppError>,
    {
        let mut docs = self.docs.write().await;
        let current = docs.get(&id).ok_or(AppError::SupplierNotFound)?;

        let mut draft = current.clone();
        let output = f(&mut draft)?;
        docs.insert(id, draft);

        Ok(output)
    }

    /// Varredura sobre todos os documentos (usada pela rotina de conformidade).
    pub async fn update_all<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut [SupplierProfile]) -> T,
    {
        let mut docs = self.docs.write().await;
        let mut all: Vec<SupplierProfile> = docs.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let output = f(&mut all);

        for profile in all {
            docs.insert(profile.id, profile);
        }
        output
    }

    // Carrega fornecedores de um arquivo JSON (lista de documentos)
    pub async fn load_seed(&self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let profiles: Vec<SupplierProfile> = serde_json::from_str(&raw)?;
        let count = profiles.len();

        let mut docs = self.docs.write().await;
        for profile in profiles {
            docs.insert(profile.id, profile);
        }

        tracing::info!("🌱 {} fornecedores carregados de {}", count, path.as_ref().display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        compliance::CommercialRegistration,
        supplier::{AccountStatus, LocalizedText},
    };
    use chrono::{NaiveDate, Utc};

    fn sample() -> SupplierProfile {
        SupplierProfile::new(
            LocalizedText { ar: "مورد".into(), en: "Supplier".into() },
            "s@example.com",
            "+966500000000",
            CommercialRegistration::new(
                "1010123456",
                NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            ),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn update_writes_back_only_on_success() {
        let repo = SupplierRepository::new();
        let profile = repo.insert(sample()).await;

        let failed: Result<(), AppError> = repo
            .update(profile.id, |p| {
                p.email = "changed@example.com".into();
                Err(AppError::PermissionDenied)
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(repo.find_by_id(profile.id).await.unwrap().email, "s@example.com");

        repo.update(profile.id, |p| {
            p.email = "changed@example.com".into();
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(
            repo.find_by_id(profile.id).await.unwrap().email,
            "changed@example.com"
        );
    }

    #[tokio::test]
    async fn update_on_missing_document_is_not_found() {
        let repo = SupplierRepository::new();
        let result = repo.update(Uuid::new_v4(), |_| Ok(())).await;
        assert!(matches!(result, Err(AppError::SupplierNotFound)));
    }

    #[tokio::test]
    async fn update_all_persists_every_document() {
        let repo = SupplierRepository::new();
        repo.insert(sample()).await;
        repo.insert(sample()).await;

        let touched = repo
            .update_all(|all| {
                for p in all.iter_mut() {
                    p.status = AccountStatus::Banned {
                        banned_at: Utc::now(),
                        reason: "teste".into(),
                    };
                }
                all.len()
            })
            .await;

        assert_eq!(touched, 2);
        assert!(repo
            .list_all()
            .await
            .iter()
            .all(|p| matches!(p.status, AccountStatus::Banned { .. })));
    }

    #[tokio::test]
    async fn seed_file_round_trips_through_the_document_shape() {
        let repo = SupplierRepository::new();
        let profile = sample();
        let path = std::env::temp_dir().join(format!("seed-{}.json", Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_string(&vec![profile.clone()]).unwrap()).unwrap();

        let count = repo.load_seed(&path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(count, 1);
        let loaded = repo.find_by_id(profile.id).await.unwrap();
        assert_eq!(loaded.commercial_registration, profile.commercial_registration);
        assert_eq!(loaded.status, AccountStatus::Active);
    }
}
