// src/services/compliance_service.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{SettingsRepository, SupplierRepository},
    models::{
        compliance::{
            is_valid_cr_number, AlertLevel, AlertSettings, CommercialRegistration, ComplianceEntry,
            ComplianceReport, CrAssessment, CrStatus, ReviewHold, UpdateAlertSettingsRequest,
        },
        supplier::{AccountStatus, SupplierProfile},
    },
    services::{
        lifecycle_service,
        notification::{Notification, Notifier},
    },
};

// =========================================================================
//  1. CLASSIFICAÇÃO (pura: data + configuração -> status)
// =========================================================================

pub fn classify(expiry_date: NaiveDate, today: NaiveDate, settings: &AlertSettings) -> CrAssessment {
    let days_until_expiry = (expiry_date - today).num_days();

    // Dia zero ainda é "vencendo" (dia de carência)
    let status = if days_until_expiry < 0 {
        CrStatus::Expired
    } else if days_until_expiry <= settings.first_alert_days {
        CrStatus::Expiring
    } else {
        CrStatus::Valid
    };

    CrAssessment {
        status,
        days_until_expiry,
        alert_level: alert_level(days_until_expiry, settings),
    }
}

pub fn alert_level(days_until_expiry: i64, settings: &AlertSettings) -> AlertLevel {
    if days_until_expiry < 0 {
        AlertLevel::Expired
    } else if days_until_expiry <= settings.final_alert_days {
        AlertLevel::Final
    } else if days_until_expiry <= settings.second_alert_days {
        AlertLevel::Second
    } else if days_until_expiry <= settings.first_alert_days {
        AlertLevel::First
    } else {
        AlertLevel::None
    }
}

/// Classificação do CR de um fornecedor, respeitando o bloqueio de revisão.
pub fn assess(
    registration: &CommercialRegistration,
    today: NaiveDate,
    settings: &AlertSettings,
) -> CrAssessment {
    let mut assessment = classify(registration.expiry_date, today, settings);
    if registration.is_under_review() {
        assessment.status = CrStatus::PendingReview;
    }
    assessment
}

// =========================================================================
//  2. CONFIGURAÇÃO DE ALERTAS
// =========================================================================

pub fn validate_thresholds(first: i64, second: i64, last: i64) -> Result<(), AppError> {
    if last < 0 {
        return Err(AppError::InvalidSettings(
            "Os limites de alerta não podem ser negativos.".into(),
        ));
    }
    if !(first > second && second > last) {
        return Err(AppError::InvalidSettings(format!(
            "Os limites devem ser estritamente decrescentes (recebido {}/{}/{}).",
            first, second, last
        )));
    }
    Ok(())
}

/// Gera a nova versão da configuração a partir do pedido do administrador.
pub fn next_settings(
    current: &AlertSettings,
    request: &UpdateAlertSettingsRequest,
    admin_id: Uuid,
    now: DateTime<Utc>,
) -> Result<AlertSettings, AppError> {
    request.validate()?;
    validate_thresholds(
        request.first_alert_days,
        request.second_alert_days,
        request.final_alert_days,
    )?;

    Ok(AlertSettings {
        first_alert_days: request.first_alert_days,
        second_alert_days: request.second_alert_days,
        final_alert_days: request.final_alert_days,
        auto_suspend_on_expiry: request.auto_suspend_on_expiry,
        notify_admin_on_expiry: request.notify_admin_on_expiry,
        require_admin_review: request.require_admin_review,
        version: current.version + 1,
        updated_at: Some(now),
        updated_by: Some(admin_id),
    })
}

// =========================================================================
//  3. RENOVAÇÃO E REVISÃO DO CR
// =========================================================================

pub fn renew_registration(
    profile: &mut SupplierProfile,
    number: &str,
    expiry_date: NaiveDate,
    settings: &AlertSettings,
    now: DateTime<Utc>,
) -> Result<Option<Notification>, AppError> {
    lifecycle_service::ensure_mutable(profile)?;
    if !is_valid_cr_number(number) {
        return Err(AppError::InvalidSettings(
            "O número do CR deve ter exatamente 10 dígitos.".into(),
        ));
    }

    let mut registration = CommercialRegistration::new(number, expiry_date);

    // Com revisão obrigatória, o novo CR fica pendente até o admin aprovar
    if settings.require_admin_review {
        registration.review_hold = Some(ReviewHold {
            placed_at: now,
            placed_by: None,
            note: Some("Renovação enviada pelo fornecedor".into()),
        });
    }
    profile.commercial_registration = registration;

    Ok(settings
        .require_admin_review
        .then(|| Notification::RegistrationSubmittedForReview {
            supplier_id: profile.id,
            cr_number: number.to_string(),
        }))
}

pub fn place_review_hold(
    profile: &mut SupplierProfile,
    admin_id: Uuid,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    lifecycle_service::ensure_mutable(profile)?;
    profile.commercial_registration.review_hold = Some(ReviewHold {
        placed_at: now,
        placed_by: Some(admin_id),
        note,
    });
    Ok(())
}

pub fn clear_review_hold(profile: &mut SupplierProfile) -> Result<(), AppError> {
    lifecycle_service::ensure_mutable(profile)?;
    profile.commercial_registration.review_hold = None;
    Ok(())
}

/// Lembrete manual disparado por um administrador.
pub fn reminder(
    profile: &SupplierProfile,
    today: NaiveDate,
    settings: &AlertSettings,
) -> Result<Notification, AppError> {
    lifecycle_service::ensure_mutable(profile)?;
    let assessment = assess(&profile.commercial_registration, today, settings);

    Ok(Notification::CrReminder {
        supplier_id: profile.id,
        level: assessment.alert_level,
        days_until_expiry: assessment.days_until_expiry,
    })
}

// =========================================================================
//  4. VARREDURA COMPLETA
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct CompliancePass {
    pub entries: Vec<ComplianceEntry>,
    pub auto_suspended: Vec<Uuid>,
    pub notifications: Vec<Notification>,
}

/// Reclassifica todos os fornecedores não excluídos e aplica a suspensão
/// automática quando configurada.
pub fn run_pass(
    suppliers: &mut [SupplierProfile],
    settings: &AlertSettings,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> CompliancePass {
    let mut pass = CompliancePass::default();

    for profile in suppliers.iter_mut().filter(|p| !p.is_deleted()) {
        let assessment = assess(&profile.commercial_registration, today, settings);

        let registration = &mut profile.commercial_registration;
        if assessment.status != CrStatus::PendingReview && registration.escalates_to(assessment.alert_level) {
            registration.last_alert_level = Some(assessment.alert_level);
            pass.notifications.push(Notification::CrReminder {
                supplier_id: profile.id,
                level: assessment.alert_level,
                days_until_expiry: assessment.days_until_expiry,
            });

            if assessment.alert_level == AlertLevel::Expired && settings.notify_admin_on_expiry {
                pass.notifications.push(Notification::AdminCrExpired {
                    supplier_id: profile.id,
                    cr_number: registration.number.clone(),
                });
            }
        }

        match enforce_expiry(profile, settings, today, now) {
            Ok(Some(notice)) => {
                tracing::warn!(
                    supplier_id = %profile.id,
                    "⛔ CR vencido há {} dia(s): fornecedor suspenso automaticamente",
                    -assessment.days_until_expiry
                );
                pass.auto_suspended.push(profile.id);
                pass.notifications.push(notice);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(supplier_id = %profile.id, "Falha na suspensão automática: {}", e);
            }
        }

        pass.entries.push(ComplianceEntry {
            supplier_id: profile.id,
            cr_number: profile.commercial_registration.number.clone(),
            assessment,
        });
    }

    pass
}

/// Suspensão automática de um único fornecedor, sem lembretes.
pub fn enforce_expiry(
    profile: &mut SupplierProfile,
    settings: &AlertSettings,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Option<Notification>, AppError> {
    if !settings.auto_suspend_on_expiry || profile.status != AccountStatus::Active {
        return Ok(None);
    }
    let assessment = assess(&profile.commercial_registration, today, settings);
    if assessment.status != CrStatus::Expired {
        return Ok(None);
    }
    lifecycle_service::auto_suspend(profile, now).map(Some)
}

// =========================================================================
//  5. SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct ComplianceService {
    suppliers: SupplierRepository,
    settings: SettingsRepository,
    notifier: Arc<dyn Notifier>,
}

impl ComplianceService {
    pub fn new(
        suppliers: SupplierRepository,
        settings: SettingsRepository,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { suppliers, settings, notifier }
    }

    pub async fn current_settings(&self) -> AlertSettings {
        self.settings.get_settings().await
    }

    pub async fn update_settings(
        &self,
        request: &UpdateAlertSettingsRequest,
        admin_id: Uuid,
    ) -> Result<AlertSettings, AppError> {
        let current = self.settings.get_settings().await;
        let next = next_settings(&current, request, admin_id, Utc::now())?;

        tracing::info!(
            "⚙️ Configuração de alertas atualizada para a versão {} ({}/{}/{})",
            next.version,
            next.first_alert_days,
            next.second_alert_days,
            next.final_alert_days
        );
        Ok(self.settings.replace_settings(next).await)
    }

    pub async fn assess_supplier(&self, profile: &SupplierProfile) -> CrAssessment {
        let settings = self.settings.get_settings().await;
        assess(&profile.commercial_registration, Utc::now().date_naive(), &settings)
    }

    pub async fn run(&self) -> ComplianceReport {
        let settings = self.settings.get_settings().await;
        let now = Utc::now();
        let today = now.date_naive();

        let pass = self
            .suppliers
            .update_all(|all| run_pass(all, &settings, today, now))
            .await;

        for notification in &pass.notifications {
            self.notifier.dispatch(notification);
        }

        tracing::info!(
            "🔎 Varredura de conformidade: {} avaliados, {} suspensos automaticamente",
            pass.entries.len(),
            pass.auto_suspended.len()
        );

        ComplianceReport {
            evaluated_at: now,
            settings_version: settings.version,
            entries: pass.entries,
            auto_suspended: pass.auto_suspended,
            notifications_sent: pass.notifications.len(),
        }
    }

    // Na leitura: só a suspensão automática, sem lembretes
    pub async fn enforce(&self, supplier_id: Uuid) -> Result<SupplierProfile, AppError> {
        let settings = self.settings.get_settings().await;
        let now = Utc::now();

        let (notice, profile) = self
            .suppliers
            .update(supplier_id, |profile| {
                let notice = enforce_expiry(profile, &settings, now.date_naive(), now)?;
                Ok((notice, profile.clone()))
            })
            .await?;

        if let Some(notice) = notice {
            tracing::warn!(supplier_id = %supplier_id, "⛔ CR vencido detectado na leitura: fornecedor suspenso");
            self.notifier.dispatch(&notice);
        }
        Ok(profile)
    }

    // O mesmo para as listagens: devolve todos os documentos já reconciliados
    pub async fn enforce_all(&self) -> Vec<SupplierProfile> {
        let settings = self.settings.get_settings().await;
        let now = Utc::now();

        let (notices, profiles) = self
            .suppliers
            .update_all(|all| {
                let mut notices = Vec::new();
                for profile in all.iter_mut() {
                    match enforce_expiry(profile, &settings, now.date_naive(), now) {
                        Ok(Some(notice)) => notices.push(notice),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::error!(supplier_id = %profile.id, "Falha na suspensão automática: {}", e);
                        }
                    }
                }
                (notices, all.to_vec())
            })
            .await;

        for notice in &notices {
            tracing::warn!(supplier_id = %notice.supplier_id(), "⛔ CR vencido detectado na listagem: fornecedor suspenso");
            self.notifier.dispatch(notice);
        }
        profiles
    }

    pub async fn renew_registration(
        &self,
        supplier_id: Uuid,
        number: &str,
        expiry_date: NaiveDate,
    ) -> Result<SupplierProfile, AppError> {
        let settings = self.settings.get_settings().await;
        let now = Utc::now();

        let (notification, profile) = self
            .suppliers
            .update(supplier_id, |profile| {
                let notification = renew_registration(profile, number, expiry_date, &settings, now)?;
                Ok((notification, profile.clone()))
            })
            .await?;

        if let Some(notification) = notification {
            self.notifier.dispatch(&notification);
        }
        Ok(profile)
    }

    pub async fn place_review_hold(
        &self,
        supplier_id: Uuid,
        admin_id: Uuid,
        note: Option<String>,
    ) -> Result<SupplierProfile, AppError> {
        let now = Utc::now();
        self.suppliers
            .update(supplier_id, |profile| {
                place_review_hold(profile, admin_id, note, now)?;
                Ok(profile.clone())
            })
            .await
    }

    pub async fn clear_review_hold(&self, supplier_id: Uuid) -> Result<SupplierProfile, AppError> {
        self.suppliers
            .update(supplier_id, |profile| {
                clear_review_hold(profile)?;
                Ok(profile.clone())
            })
            .await
    }

    pub async fn send_reminder(&self, supplier_id: Uuid) -> Result<Notification, AppError> {
        let settings = self.settings.get_settings().await;
        let profile = self
            .suppliers
            .find_by_id(supplier_id)
            .await
            .ok_or(AppError::SupplierNotFound)?;

        let notification = reminder(&profile, Utc::now().date_naive(), &settings)?;
        self.notifier.dispatch(&notification);
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supplier::{AccountStatusKind, LocalizedText, SuspensionOrigin};
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn supplier_expiring(expiry: NaiveDate) -> SupplierProfile {
        SupplierProfile::new(
            LocalizedText { ar: "مورد".into(), en: "Supplier".into() },
            "s@example.com",
            "+966500000000",
            CommercialRegistration::new("1010123456", expiry),
            Utc::now(),
        )
    }

    #[test]
    fn classify_boundaries() {
        let s = AlertSettings::default();
        let today = day(2026, 1, 10);

        let expired = classify(day(2026, 1, 9), today, &s);
        assert_eq!(expired.status, CrStatus::Expired);
        assert_eq!(expired.days_until_expiry, -1);

        // Dia zero é carência, não vencido
        let zero = classify(today, today, &s);
        assert_eq!(zero.status, CrStatus::Expiring);
        assert_eq!(zero.days_until_expiry, 0);

        let at_first = classify(today + Duration::days(60), today, &s);
        assert_eq!(at_first.status, CrStatus::Expiring);

        let past_first = classify(today + Duration::days(61), today, &s);
        assert_eq!(past_first.status, CrStatus::Valid);
    }

    #[test]
    fn days_until_expiry_is_exact_difference_for_any_date() {
        let s = AlertSettings::default();
        let today = day(2026, 3, 1);
        for offset in -400..400 {
            let expiry = today + Duration::days(offset);
            let a = classify(expiry, today, &s);
            assert_eq!(a.days_until_expiry, offset);
            // Pureza: mesma entrada, mesma saída
            assert_eq!(a, classify(expiry, today, &s));
        }
    }

    #[test]
    fn changing_first_threshold_reclassifies_immediately() {
        let today = day(2026, 1, 1);
        let expiry = today + Duration::days(45);

        let mut s = AlertSettings::default();
        assert_eq!(classify(expiry, today, &s).status, CrStatus::Expiring);

        s.first_alert_days = 40;
        s.second_alert_days = 20;
        assert_eq!(classify(expiry, today, &s).status, CrStatus::Valid);
    }

    #[test]
    fn alert_level_ladder() {
        let s = AlertSettings::default();
        assert_eq!(alert_level(90, &s), AlertLevel::None);
        assert_eq!(alert_level(60, &s), AlertLevel::First);
        assert_eq!(alert_level(30, &s), AlertLevel::Second);
        assert_eq!(alert_level(7, &s), AlertLevel::Final);
        assert_eq!(alert_level(0, &s), AlertLevel::Final);
        assert_eq!(alert_level(-3, &s), AlertLevel::Expired);
    }

    #[test]
    fn review_hold_overrides_date_status_until_cleared() {
        let s = AlertSettings::default();
        let today = day(2026, 1, 1);
        let mut p = supplier_expiring(day(2025, 12, 1));

        place_review_hold(&mut p, Uuid::new_v4(), None, Utc::now()).unwrap();
        assert_eq!(assess(&p.commercial_registration, today, &s).status, CrStatus::PendingReview);

        clear_review_hold(&mut p).unwrap();
        assert_eq!(assess(&p.commercial_registration, today, &s).status, CrStatus::Expired);
    }

    #[test]
    fn thresholds_must_strictly_decrease() {
        assert!(validate_thresholds(60, 30, 7).is_ok());
        assert!(validate_thresholds(30, 30, 7).is_err());
        assert!(validate_thresholds(7, 30, 60).is_err());
        assert!(validate_thresholds(10, 5, -1).is_err());
    }

    #[test]
    fn next_settings_bumps_version_and_records_admin() {
        let current = AlertSettings::default();
        let admin = Uuid::new_v4();
        let req = UpdateAlertSettingsRequest {
            first_alert_days: 90,
            second_alert_days: 45,
            final_alert_days: 10,
            auto_suspend_on_expiry: false,
            notify_admin_on_expiry: true,
            require_admin_review: true,
        };

        let next = next_settings(&current, &req, admin, Utc::now()).unwrap();
        assert_eq!(next.version, current.version + 1);
        assert_eq!(next.updated_by, Some(admin));
        assert!(!next.auto_suspend_on_expiry);
    }

    #[test]
    fn expired_active_supplier_is_auto_suspended_by_the_pass() {
        let today = Utc::now().date_naive();
        let mut suppliers = vec![supplier_expiring(today - Duration::days(1))];
        let settings = AlertSettings::default();

        let pass = run_pass(&mut suppliers, &settings, today, Utc::now());

        let p = &suppliers[0];
        match &p.status {
            AccountStatus::Suspended { reason, origin, .. } => {
                assert!(reason.contains("[system]"));
                assert_eq!(*origin, SuspensionOrigin::System);
            }
            other => panic!("esperado suspenso, veio {:?}", other),
        }
        assert_eq!(pass.entries[0].assessment.status, CrStatus::Expired);
        assert_eq!(pass.auto_suspended, vec![p.id]);
        assert!(pass
            .notifications
            .iter()
            .any(|n| matches!(n, Notification::AdminCrExpired { .. })));
    }

    #[test]
    fn pass_without_auto_suspend_only_reports() {
        let today = Utc::now().date_naive();
        let mut suppliers = vec![supplier_expiring(today - Duration::days(5))];
        let settings = AlertSettings {
            auto_suspend_on_expiry: false,
            notify_admin_on_expiry: false,
            ..AlertSettings::default()
        };

        let pass = run_pass(&mut suppliers, &settings, today, Utc::now());

        assert_eq!(suppliers[0].status, AccountStatus::Active);
        assert!(pass.auto_suspended.is_empty());
        assert_eq!(pass.notifications.len(), 1);
    }

    #[test]
    fn pass_skips_deleted_and_does_not_resuspend() {
        let today = Utc::now().date_naive();
        let mut deleted = supplier_expiring(today - Duration::days(2));
        lifecycle_service::delete(&mut deleted, None, Default::default(), Utc::now()).unwrap();
        let mut banned = supplier_expiring(today - Duration::days(2));
        lifecycle_service::ban(&mut banned, Some("fraude"), Utc::now()).unwrap();

        let mut suppliers = vec![deleted, banned];
        let pass = run_pass(&mut suppliers, &AlertSettings::default(), today, Utc::now());

        assert_eq!(pass.entries.len(), 1);
        assert!(pass.auto_suspended.is_empty());
        assert!(matches!(suppliers[1].status, AccountStatus::Banned { .. }));
    }

    #[test]
    fn repeated_passes_notify_each_level_once() {
        let today = Utc::now().date_naive();
        let mut suppliers = vec![supplier_expiring(today + Duration::days(20))];
        let settings = AlertSettings::default();

        let sent: usize = (0..24)
            .map(|_| run_pass(&mut suppliers, &settings, today, Utc::now()).notifications.len())
            .sum();
        assert_eq!(sent, 1);
        assert_eq!(suppliers[0].commercial_registration.last_alert_level, Some(AlertLevel::Second));

        // Subiu de degrau: novo aviso
        let later = today + Duration::days(15);
        let pass = run_pass(&mut suppliers, &settings, later, Utc::now());
        assert!(matches!(
            pass.notifications.as_slice(),
            [Notification::CrReminder { level: AlertLevel::Final, .. }]
        ));
    }

    #[test]
    fn admin_expiry_notice_is_sent_once() {
        let today = Utc::now().date_naive();
        let mut suppliers = vec![supplier_expiring(today - Duration::days(1))];
        let settings = AlertSettings::default();

        run_pass(&mut suppliers, &settings, today, Utc::now());
        let second = run_pass(&mut suppliers, &settings, today + Duration::days(1), Utc::now());

        assert!(second.notifications.is_empty());
        assert!(matches!(suppliers[0].status, AccountStatus::Suspended { .. }));
    }

    #[test]
    fn renewal_resets_notified_level() {
        let today = Utc::now().date_naive();
        let mut suppliers = vec![supplier_expiring(today + Duration::days(5))];
        let settings = AlertSettings::default();
        run_pass(&mut suppliers, &settings, today, Utc::now());

        renew_registration(&mut suppliers[0], "2020123456", today + Duration::days(5), &settings, Utc::now()).unwrap();
        assert_eq!(suppliers[0].commercial_registration.last_alert_level, None);

        let pass = run_pass(&mut suppliers, &settings, today, Utc::now());
        assert_eq!(pass.notifications.len(), 1);
    }

    #[test]
    fn renewal_goes_to_review_when_required() {
        let mut p = supplier_expiring(day(2025, 1, 1));
        let settings = AlertSettings { require_admin_review: true, ..AlertSettings::default() };

        let note = renew_registration(&mut p, "2020123456", day(2030, 1, 1), &settings, Utc::now()).unwrap();

        assert!(note.is_some());
        assert_eq!(
            assess(&p.commercial_registration, day(2026, 1, 1), &settings).status,
            CrStatus::PendingReview
        );
    }

    #[test]
    fn renewal_without_review_is_effective_immediately() {
        let mut p = supplier_expiring(day(2025, 1, 1));
        let settings = AlertSettings::default();

        let note = renew_registration(&mut p, "2020123456", day(2030, 1, 1), &settings, Utc::now()).unwrap();

        assert!(note.is_none());
        assert_eq!(
            assess(&p.commercial_registration, day(2026, 1, 1), &settings).status,
            CrStatus::Valid
        );
        assert!(renew_registration(&mut p, "12AB", day(2030, 1, 1), &settings, Utc::now()).is_err());
    }

    #[tokio::test]
    async fn enforce_suspends_on_read_only_when_expired() {
        use crate::services::notification::tests::RecordingNotifier;

        let suppliers = SupplierRepository::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ComplianceService::new(suppliers.clone(), SettingsRepository::default(), notifier.clone());

        let today = Utc::now().date_naive();
        let late = suppliers.insert(supplier_expiring(today - Duration::days(3))).await;
        let fine = suppliers.insert(supplier_expiring(today + Duration::days(3))).await;

        let late = service.enforce(late.id).await.unwrap();
        let fine = service.enforce(fine.id).await.unwrap();

        assert!(matches!(late.status, AccountStatus::Suspended { origin: SuspensionOrigin::System, .. }));
        assert_eq!(fine.status, AccountStatus::Active);
        // Sem lembretes na leitura, só o aviso de suspensão
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn enforce_all_reconciles_every_listed_supplier() {
        use crate::services::notification::tests::RecordingNotifier;

        let suppliers = SupplierRepository::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ComplianceService::new(suppliers.clone(), SettingsRepository::default(), notifier.clone());

        let today = Utc::now().date_naive();
        let late = suppliers.insert(supplier_expiring(today - Duration::days(1))).await;
        let fine = suppliers.insert(supplier_expiring(today + Duration::days(90))).await;

        let listed = service.enforce_all().await;

        let status_of = |id: Uuid| listed.iter().find(|p| p.id == id).map(|p| p.status.kind());
        assert_eq!(status_of(late.id), Some(AccountStatusKind::Suspended));
        assert_eq!(status_of(fine.id), Some(AccountStatusKind::Active));
        assert!(matches!(
            suppliers.find_by_id(late.id).await.unwrap().status,
            AccountStatus::Suspended { .. }
        ));

        // Segunda listagem não repete o aviso
        service.enforce_all().await;
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn service_run_persists_suspension_and_uses_current_settings() {
        use crate::services::notification::tests::RecordingNotifier;

        let suppliers = SupplierRepository::new();
        let settings = SettingsRepository::default();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ComplianceService::new(suppliers.clone(), settings.clone(), notifier.clone());

        let today = Utc::now().date_naive();
        let p = suppliers.insert(supplier_expiring(today - Duration::days(1))).await;

        let report = service.run().await;

        assert_eq!(report.auto_suspended, vec![p.id]);
        assert_eq!(report.settings_version, 1);
        assert_eq!(report.notifications_sent, notifier.sent.lock().unwrap().len());
        assert!(matches!(
            suppliers.find_by_id(p.id).await.unwrap().status,
            AccountStatus::Suspended { .. }
        ));
    }
}
