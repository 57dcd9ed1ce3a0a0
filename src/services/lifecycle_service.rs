// src/services/lifecycle_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::supplier::{AccountStatus, AccountStatusKind, LifecycleAction, SupplierProfile, SuspensionOrigin},
    services::notification::{Notification, Notifier},
};

/// Motivo sintetizado pela suspensão automática por CR vencido.
pub const SYSTEM_CR_EXPIRED_REASON: &str = "[system] CR expired";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub require_delete_reason: bool,
}

// =========================================================================
//  1. TABELA DE TRANSIÇÕES
// =========================================================================

pub fn target_state(from: AccountStatusKind, action: LifecycleAction) -> Option<AccountStatusKind> {
    use AccountStatusKind::*;
    match (from, action) {
        (Deleted, _) => None,
        (Active, LifecycleAction::Suspend) => Some(Suspended),
        (Active, LifecycleAction::Ban) => Some(Banned),
        (Suspended, LifecycleAction::Unsuspend) => Some(Active),
        (Banned, LifecycleAction::Unban) => Some(Active),
        (_, LifecycleAction::Delete) => Some(Deleted),
        _ => None,
    }
}

pub fn allowed_actions(from: AccountStatusKind) -> Vec<LifecycleAction> {
    LifecycleAction::ALL
        .into_iter()
        .filter(|action| target_state(from, *action).is_some())
        .collect()
}

fn ensure_transition(profile: &SupplierProfile, action: LifecycleAction) -> Result<(), AppError> {
    let from = profile.status.kind();
    match target_state(from, action) {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_transition(from.as_str(), action.as_str())),
    }
}

fn require_reason(action: LifecycleAction, reason: Option<&str>) -> Result<String, AppError> {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => Ok(r.to_string()),
        _ => Err(AppError::MissingReason(action.as_str().to_string())),
    }
}

// =========================================================================
//  2. TRANSIÇÕES (funções puras sobre o documento)
// =========================================================================

pub fn suspend(
    profile: &mut SupplierProfile,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Suspend)?;
    let reason = require_reason(LifecycleAction::Suspend, reason)?;

    profile.status = AccountStatus::Suspended {
        suspended_at: now,
        reason: reason.clone(),
        origin: SuspensionOrigin::Manual,
    };

    Ok(Notification::SuspensionNotice { supplier_id: profile.id, reason })
}

/// Suspensão disparada pela varredura de conformidade. O motivo é
/// sintetizado, então a regra de motivo obrigatório não se aplica.
pub fn auto_suspend(profile: &mut SupplierProfile, now: DateTime<Utc>) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Suspend)?;

    profile.status = AccountStatus::Suspended {
        suspended_at: now,
        reason: SYSTEM_CR_EXPIRED_REASON.to_string(),
        origin: SuspensionOrigin::System,
    };

    Ok(Notification::SuspensionNotice {
        supplier_id: profile.id,
        reason: SYSTEM_CR_EXPIRED_REASON.to_string(),
    })
}

pub fn ban(
    profile: &mut SupplierProfile,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Ban)?;
    let reason = require_reason(LifecycleAction::Ban, reason)?;

    profile.status = AccountStatus::Banned { banned_at: now, reason: reason.clone() };

    Ok(Notification::BanNotice { supplier_id: profile.id, reason })
}

pub fn unsuspend(profile: &mut SupplierProfile) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Unsuspend)?;
    profile.status = AccountStatus::Active;
    Ok(Notification::ReinstatementNotice { supplier_id: profile.id })
}

pub fn unban(profile: &mut SupplierProfile) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Unban)?;
    profile.status = AccountStatus::Active;
    Ok(Notification::ReinstatementNotice { supplier_id: profile.id })
}

// Estado terminal: o resto do documento fica congelado.
pub fn delete(
    profile: &mut SupplierProfile,
    reason: Option<&str>,
    policy: LifecyclePolicy,
    now: DateTime<Utc>,
) -> Result<Notification, AppError> {
    ensure_transition(profile, LifecycleAction::Delete)?;

    let reason = if policy.require_delete_reason {
        Some(require_reason(LifecycleAction::Delete, reason)?)
    } else {
        reason.map(str::trim).filter(|r| !r.is_empty()).map(String::from)
    };

    profile.status = AccountStatus::Deleted { deleted_at: now, reason };

    Ok(Notification::DeletionNotice { supplier_id: profile.id })
}

// Qualquer escrita fora das transições também é recusada num excluído.
pub fn ensure_mutable(profile: &SupplierProfile) -> Result<(), AppError> {
    if profile.is_deleted() {
        return Err(AppError::invalid_transition("deleted", "update"));
    }
    Ok(())
}

pub fn set_terms(profile: &mut SupplierProfile, enabled: bool, now: DateTime<Utc>) -> Result<(), AppError> {
    ensure_mutable(profile)?;

    profile.terms.is_enabled = enabled;
    profile.terms.enabled_at = if enabled { Some(now) } else { None };
    Ok(())
}

pub fn touch(profile: &mut SupplierProfile, now: DateTime<Utc>) -> Result<(), AppError> {
    ensure_mutable(profile)?;
    profile.last_active_at = Some(now);
    Ok(())
}

// =========================================================================
//  3. SERVIÇO (documento + notificação)
// =========================================================================

#[derive(Clone)]
pub struct LifecycleService {
    repo: SupplierRepository,
    notifier: Arc<dyn Notifier>,
    policy: LifecyclePolicy,
}

impl LifecycleService {
    pub fn new(repo: SupplierRepository, notifier: Arc<dyn Notifier>, policy: LifecyclePolicy) -> Self {
        Self { repo, notifier, policy }
    }

    pub async fn apply(
        &self,
        supplier_id: Uuid,
        action: LifecycleAction,
        reason: Option<&str>,
    ) -> Result<SupplierProfile, AppError> {
        let now = Utc::now();
        let policy = self.policy;

        let (notification, profile) = self
            .repo
            .update(supplier_id, |profile| {
                let notification = match action {
                    LifecycleAction::Suspend => suspend(profile, reason, now)?,
                    LifecycleAction::Ban => ban(profile, reason, now)?,
                    LifecycleAction::Unsuspend => unsuspend(profile)?,
                    LifecycleAction::Unban => unban(profile)?,
                    LifecycleAction::Delete => delete(profile, reason, policy, now)?,
                };
                Ok((notification, profile.clone()))
            })
            .await?;

        tracing::info!(
            supplier_id = %supplier_id,
            "🔁 Transição '{}' aplicada; estado atual: {}",
            action.as_str(),
            profile.status.kind().as_str()
        );
        self.notifier.dispatch(&notification);

        Ok(profile)
    }

    pub async fn set_terms(&self, supplier_id: Uuid, enabled: bool) -> Result<SupplierProfile, AppError> {
        let now = Utc::now();
        self.repo
            .update(supplier_id, |profile| {
                set_terms(profile, enabled, now)?;
                Ok(profile.clone())
            })
            .await
    }

    // Registra atividade do próprio fornecedor
    pub async fn touch(&self, supplier_id: Uuid) -> Result<SupplierProfile, AppError> {
        let now = Utc::now();
        self.repo
            .update(supplier_id, |profile| {
                touch(profile, now)?;
                Ok(profile.clone())
            })
            .await
    }
}
