// src/services/rbac_service.rs

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::{
        auth::{Caller, CallerRole},
        employee::{
            EmployeeAccess, EmployeeStatus, InviteEmployeePayload, NamedRole,
            NotificationFlagsPayload, Permission, PermissionEntry, RoleCatalog, RoleDefinition,
            RoleKind, SupplierEmployee,
        },
        supplier::SupplierProfile,
    },
    services::{
        lifecycle_service,
        notification::{Notification, Notifier},
    },
};

// --- CARGOS E PERMISSÕES ---

/// Cargo nomeado volta ao pacote fixo; `custom` começa vazio.
pub fn assign_role(employee: &mut SupplierEmployee, role: RoleKind) {
    employee.access = match NamedRole::from_kind(role) {
        Some(named) => EmployeeAccess::Named(named),
        None => EmployeeAccess::Custom(BTreeSet::new()),
    };
}

/// Liga/desliga uma permissão. Qualquer edição manual vira `custom`,
/// mesmo que o conjunto resultante coincida com um pacote.
pub fn toggle_permission(employee: &mut SupplierEmployee, permission: Permission) {
    let mut permissions = employee.access.permissions();
    if !permissions.remove(&permission) {
        permissions.insert(permission);
    }
    employee.access = EmployeeAccess::Custom(permissions);
}

pub fn effective_permissions(employee: &SupplierEmployee) -> BTreeSet<Permission> {
    employee.access.permissions()
}

pub fn role_catalog() -> RoleCatalog {
    RoleCatalog {
        roles: RoleKind::ALL
            .iter()
            .map(|role| RoleDefinition {
                role: *role,
                permissions: role.bundle().map(<[Permission]>::to_vec).unwrap_or_default(),
            })
            .collect(),
        permissions: Permission::ALL
            .iter()
            .map(|p| PermissionEntry { permission: *p, group: p.group() })
            .collect(),
    }
}

// --- CICLO DO FUNCIONÁRIO ---

pub fn new_invitation(payload: &InviteEmployeePayload, now: DateTime<Utc>) -> SupplierEmployee {
    let access = match NamedRole::from_kind(payload.role) {
        Some(named) => EmployeeAccess::Named(named),
        None => EmployeeAccess::Custom(payload.permissions.clone()),
    };

    SupplierEmployee {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        phone: payload.phone.clone(),
        job_title: payload.job_title.clone(),
        access,
        status: EmployeeStatus::Pending,
        receive_order_notifications: true,
        receive_price_confirm_notifications: true,
        receive_weekly_reports: false,
        created_at: now,
        invited_at: now,
        last_login: None,
    }
}

// Primeiro login ativa o convite; logins seguintes só atualizam a data.
pub fn record_login(employee: &mut SupplierEmployee, now: DateTime<Utc>) -> Result<(), AppError> {
    match employee.status {
        EmployeeStatus::Pending | EmployeeStatus::Active => {
            employee.status = EmployeeStatus::Active;
            employee.last_login = Some(now);
            Ok(())
        }
        EmployeeStatus::Inactive => Err(AppError::invalid_transition("inactive", "login")),
    }
}

pub fn deactivate(employee: &mut SupplierEmployee) -> Result<(), AppError> {
    match employee.status {
        EmployeeStatus::Active => {
            employee.status = EmployeeStatus::Inactive;
            Ok(())
        }
        other => Err(AppError::invalid_transition(other.as_str(), "deactivate")),
    }
}

pub fn reactivate(employee: &mut SupplierEmployee) -> Result<(), AppError> {
    match employee.status {
        EmployeeStatus::Inactive => {
            employee.status = EmployeeStatus::Active;
            Ok(())
        }
        other => Err(AppError::invalid_transition(other.as_str(), "reactivate")),
    }
}

pub fn update_notification_flags(employee: &mut SupplierEmployee, flags: &NotificationFlagsPayload) {
    if let Some(v) = flags.receive_order_notifications {
        employee.receive_order_notifications = v;
    }
    if let Some(v) = flags.receive_price_confirm_notifications {
        employee.receive_price_confirm_notifications = v;
    }
    if let Some(v) = flags.receive_weekly_reports {
        employee.receive_weekly_reports = v;
    }
}

// Id desconhecido: nada muda.
fn with_employee<F>(roster: &mut [SupplierEmployee], employee_id: Uuid, f: F) -> Result<(), AppError>
where
    F: FnOnce(&mut SupplierEmployee) -> Result<(), AppError>,
{
    match roster.iter_mut().find(|e| e.id == employee_id) {
        Some(employee) => f(employee),
        None => Ok(()),
    }
}

pub fn remove_employee(roster: &mut Vec<SupplierEmployee>, employee_id: Uuid) {
    roster.retain(|e| e.id != employee_id);
}

// --- AUTORIZAÇÃO ---

/// Admin e dono passam direto; funcionário precisa estar ativo e ter a
/// permissão no conjunto efetivo.
pub fn require_permission(
    caller: &Caller,
    profile: &SupplierProfile,
    permission: Permission,
) -> Result<(), AppError> {
    if caller.is_admin() {
        return Ok(());
    }
    if !caller.belongs_to(profile.id) {
        return Err(AppError::PermissionDenied);
    }

    match caller.role {
        CallerRole::SupplierOwner => Ok(()),
        CallerRole::SupplierEmployee => {
            let allowed = profile.employee(caller.id).is_some_and(|e| {
                e.status == EmployeeStatus::Active && effective_permissions(e).contains(&permission)
            });
            if allowed { Ok(()) } else { Err(AppError::PermissionDenied) }
        }
        _ => Err(AppError::PermissionDenied),
    }
}

// --- SERVIÇO ---

#[derive(Clone)]
pub struct RbacService {
    repo: SupplierRepository,
    notifier: Arc<dyn Notifier>,
}

impl RbacService {
    pub fn new(repo: SupplierRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn list_employees(&self, supplier_id: Uuid) -> Result<Vec<SupplierEmployee>, AppError> {
        self.repo
            .find_by_id(supplier_id)
            .await
            .map(|p| p.employees)
            .ok_or(AppError::SupplierNotFound)
    }

    pub async fn invite_employee(
        &self,
        supplier_id: Uuid,
        payload: &InviteEmployeePayload,
    ) -> Result<SupplierEmployee, AppError> {
        let employee = new_invitation(payload, Utc::now());

        let invited = employee.clone();
        self.repo
            .update(supplier_id, move |profile| {
                lifecycle_service::ensure_mutable(profile)?;
                profile.employees.push(invited);
                Ok(())
            })
            .await?;

        tracing::info!(
            supplier_id = %supplier_id,
            "👤 Funcionário convidado: {} ({})",
            employee.email,
            employee.access.role().as_str()
        );
        self.notifier.dispatch(&Notification::EmployeeInvitation {
            supplier_id,
            employee_id: employee.id,
            email: employee.email.clone(),
        });

        Ok(employee)
    }

    // Aplica `f` no funcionário e devolve a lista (inalterada se o id não existir)
    async fn mutate<F>(&self, supplier_id: Uuid, employee_id: Uuid, f: F) -> Result<Vec<SupplierEmployee>, AppError>
    where
        F: FnOnce(&mut SupplierEmployee) -> Result<(), AppError>,
    {
        self.repo
            .update(supplier_id, |profile| {
                lifecycle_service::ensure_mutable(profile)?;
                with_employee(&mut profile.employees, employee_id, f)?;
                Ok(profile.employees.clone())
            })
            .await
    }

    pub async fn assign_role(
        &self,
        supplier_id: Uuid,
        employee_id: Uuid,
        role: RoleKind,
    ) -> Result<Vec<SupplierEmployee>, AppError> {
        self.mutate(supplier_id, employee_id, |e| {
            assign_role(e, role);
            Ok(())
        })
        .await
    }

    pub async fn toggle_permission(
        &self,
        supplier_id: Uuid,
        employee_id: Uuid,
        permission: Permission,
    ) -> Result<Vec<SupplierEmployee>, AppError> {
        self.mutate(supplier_id, employee_id, |e| {
            toggle_permission(e, permission);
            Ok(())
        })
        .await
    }

    pub async fn record_login(&self, supplier_id: Uuid, employee_id: Uuid) -> Result<Vec<SupplierEmployee>, AppError> {
        let now = Utc::now();
        self.mutate(supplier_id, employee_id, |e| record_login(e, now)).await
    }

    pub async fn deactivate(&self, supplier_id: Uuid, employee_id: Uuid) -> Result<Vec<SupplierEmployee>, AppError> {
        self.mutate(supplier_id, employee_id, deactivate).await
    }

    pub async fn reactivate(&self, supplier_id: Uuid, employee_id: Uuid) -> Result<Vec<SupplierEmployee>, AppError> {
        self.mutate(supplier_id, employee_id, reactivate).await
    }

    pub async fn update_notification_flags(
        &self,
        supplier_id: Uuid,
        employee_id: Uuid,
        flags: &NotificationFlagsPayload,
    ) -> Result<Vec<SupplierEmployee>, AppError> {
        self.mutate(supplier_id, employee_id, |e| {
            update_notification_flags(e, flags);
            Ok(())
        })
        .await
    }

    pub async fn remove_employee(&self, supplier_id: Uuid, employee_id: Uuid) -> Result<Vec<SupplierEmployee>, AppError> {
        self.repo
            .update(supplier_id, |profile| {
                lifecycle_service::ensure_mutable(profile)?;
                remove_employee(&mut profile.employees, employee_id);
                Ok(profile.employees.clone())
            })
            .await
    }
}
