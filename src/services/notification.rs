// src/services/notification.rs

use serde::Serialize;
use uuid::Uuid;

use crate::models::compliance::AlertLevel;

// O núcleo só DECIDE que uma notificação deve sair; a entrega é externa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Notification {
    CrReminder {
        supplier_id: Uuid,
        level: AlertLevel,
        days_until_expiry: i64,
    },
    AdminCrExpired {
        supplier_id: Uuid,
        cr_number: String,
    },
    SuspensionNotice {
        supplier_id: Uuid,
        reason: String,
    },
    BanNotice {
        supplier_id: Uuid,
        reason: String,
    },
    ReinstatementNotice {
        supplier_id: Uuid,
    },
    DeletionNotice {
        supplier_id: Uuid,
    },
    RegistrationSubmittedForReview {
        supplier_id: Uuid,
        cr_number: String,
    },
    EmployeeInvitation {
        supplier_id: Uuid,
        employee_id: Uuid,
        email: String,
    },
}

impl Notification {
    pub fn supplier_id(&self) -> Uuid {
        match self {
            Notification::CrReminder { supplier_id, .. }
            | Notification::AdminCrExpired { supplier_id, .. }
            | Notification::SuspensionNotice { supplier_id, .. }
            | Notification::BanNotice { supplier_id, .. }
            | Notification::ReinstatementNotice { supplier_id }
            | Notification::DeletionNotice { supplier_id }
            | Notification::RegistrationSubmittedForReview { supplier_id, .. }
            | Notification::EmployeeInvitation { supplier_id, .. } => *supplier_id,
        }
    }
}

/// Canal de entrega (e-mail, push...) fora do núcleo.
pub trait Notifier: Send + Sync {
    fn dispatch(&self, notification: &Notification);
}

// Implementação padrão: só registra no log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn dispatch(&self, notification: &Notification) {
        let payload = serde_json::to_string(notification).unwrap_or_default();
        tracing::info!(
            supplier_id = %notification.supplier_id(),
            "📨 Notificação: {}",
            payload
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // Notificador que guarda tudo para inspeção nos testes
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub sent: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn dispatch(&self, notification: &Notification) {
            self.sent.lock().unwrap().push(notification.clone());
        }
    }

    #[test]
    fn notification_serializes_with_kind_tag() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(Notification::BanNotice {
            supplier_id: id,
            reason: "fraude".into(),
        })
        .unwrap();

        assert_eq!(json["kind"], "ban_notice");
        assert_eq!(json["reason"], "fraude");
        assert_eq!(json["supplierId"], id.to_string());
    }

    #[test]
    fn reminder_fields_are_camel_case() {
        let json = serde_json::to_value(Notification::CrReminder {
            supplier_id: Uuid::new_v4(),
            level: AlertLevel::Second,
            days_until_expiry: 20,
        })
        .unwrap();

        assert_eq!(json["kind"], "cr_reminder");
        assert_eq!(json["daysUntilExpiry"], 20);
        assert_eq!(json["level"], "second");
        assert!(json.get("days_until_expiry").is_none());
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::default();
        let id = Uuid::new_v4();
        notifier.dispatch(&Notification::ReinstatementNotice { supplier_id: id });
        notifier.dispatch(&Notification::DeletionNotice { supplier_id: id });

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[1], Notification::DeletionNotice { .. }));
    }
}
