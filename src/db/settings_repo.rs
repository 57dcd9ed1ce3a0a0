// src/db/settings_repo.rs

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::compliance::AlertSettings;

// Configuração global de alertas: um único documento versionado.
#[derive(Clone, Default)]
pub struct SettingsRepository {
    current: Arc<RwLock<AlertSettings>>,
}

impl SettingsRepository {
    pub fn new(initial: AlertSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    // Sempre devolve uma cópia: quem classifica recebe a configuração por parâmetro
    pub async fn get_settings(&self) -> AlertSettings {
        self.current.read().await.clone()
    }

    pub async fn replace_settings(&self, settings: AlertSettings) -> AlertSettings {
        let mut current = self.current.write().await;
        *current = settings.clone();
        settings
    }
}
