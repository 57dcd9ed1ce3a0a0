// src/services/plan_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::plan::{
        FeatureAvailability, PlanRestrictions, PlanUsage, RestrictionKey, StorageInfo,
        SubscriptionPlan, UNLIMITED_PROJECTS,
    },
};

// Catálogo de planos (dado de referência, não muda em execução)
pub fn plans() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "free".into(),
            price: Decimal::ZERO,
            projects_included: 1,
            extra_project_price: Decimal::ZERO,
            storage_mb: 100,
            restrictions: PlanRestrictions {
                encrypted_suppliers: true,
                limited_usage: true,
                limited_support: true,
                no_ai_pricing: true,
                no_download: true,
                no_company_logo: true,
            },
        },
        SubscriptionPlan {
            id: "basic".into(),
            price: Decimal::new(199, 0),
            projects_included: 5,
            extra_project_price: Decimal::new(4900, 2),
            storage_mb: 1024,
            restrictions: PlanRestrictions {
                encrypted_suppliers: false,
                limited_usage: true,
                limited_support: true,
                no_ai_pricing: true,
                no_download: false,
                no_company_logo: true,
            },
        },
        SubscriptionPlan {
            id: "professional".into(),
            price: Decimal::new(499, 0),
            projects_included: 20,
            extra_project_price: Decimal::new(2900, 2),
            storage_mb: 10 * 1024,
            restrictions: PlanRestrictions::default(),
        },
        SubscriptionPlan {
            id: "enterprise".into(),
            price: Decimal::new(1499, 0),
            projects_included: UNLIMITED_PROJECTS,
            extra_project_price: Decimal::ZERO,
            storage_mb: 100 * 1024,
            restrictions: PlanRestrictions::default(),
        },
    ]
}

pub fn plan(plan_id: &str) -> Option<SubscriptionPlan> {
    plans().into_iter().find(|p| p.id == plan_id)
}

fn require_plan(plan_id: &str) -> Result<SubscriptionPlan, AppError> {
    plan(plan_id).ok_or_else(|| AppError::UnknownPlan(plan_id.to_string()))
}

/// Plano desconhecido = tudo bloqueado.
pub fn is_feature_available(plan_id: &str, key: RestrictionKey) -> bool {
    plan(plan_id).is_some_and(|p| !p.restrictions.is_blocked(key))
}

pub fn feature_availability(plan_id: &str, key: RestrictionKey) -> FeatureAvailability {
    FeatureAvailability {
        plan_id: plan_id.to_string(),
        restriction: key,
        available: is_feature_available(plan_id, key),
    }
}

// -1 = ilimitado; nunca fica negativo
pub fn remaining_projects(plan_id: &str, used_projects: i64) -> Result<i64, AppError> {
    let plan = require_plan(plan_id)?;
    if plan.projects_included == UNLIMITED_PROJECTS {
        return Ok(UNLIMITED_PROJECTS);
    }
    Ok((plan.projects_included - used_projects.max(0)).max(0))
}

pub fn storage_info(plan_id: &str, used_mb: u64) -> Result<StorageInfo, AppError> {
    let plan = require_plan(plan_id)?;
    Ok(compute_storage(plan.storage_mb, used_mb))
}

fn compute_storage(total: u64, used: u64) -> StorageInfo {
    let percentage = if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0).min(100.0)
    };

    StorageInfo {
        total,
        used,
        remaining: total.saturating_sub(used),
        percentage,
    }
}

pub fn usage(plan_id: &str, used_projects: i64, used_mb: u64) -> Result<PlanUsage, AppError> {
    Ok(PlanUsage {
        plan_id: plan_id.to_string(),
        remaining_projects: remaining_projects(plan_id, used_projects)?,
        storage: storage_info(plan_id, used_mb)?,
    })
}
