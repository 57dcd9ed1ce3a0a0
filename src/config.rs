// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use ring::rand::{SecureRandom, SystemRandom};

use crate::{
    db::{SettingsRepository, SupplierRepository},
    models::compliance::AlertSettings,
    services::{
        auth::AuthService,
        catalog_service::CatalogService,
        compliance_service::ComplianceService,
        lifecycle_service::{LifecyclePolicy, LifecycleService},
        notification::{Notifier, TracingNotifier},
        obfuscation_service::{AeadCodec, LegacyXorCodec, ObfuscationService},
        rbac_service::RbacService,
    },
};

// Tudo que vem do ambiente (.env)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub field_codec_key: Option<Vec<u8>>,
    pub legacy_codec_key: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub compliance_interval: Duration,
    pub require_delete_reason: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let field_codec_key = match env::var("FIELD_CODEC_KEY") {
            Ok(raw) => Some(
                STANDARD
                    .decode(raw.trim())
                    .context("FIELD_CODEC_KEY deve estar em base64")?,
            ),
            Err(_) => None,
        };

        let compliance_interval = env::var("COMPLIANCE_INTERVAL_SECS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("COMPLIANCE_INTERVAL_SECS deve ser um número")?
            .unwrap_or(3600);

        let require_delete_reason = env::var("REQUIRE_DELETE_REASON")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            field_codec_key,
            legacy_codec_key: env::var("LEGACY_CODEC_KEY").ok(),
            seed_file: env::var("SEED_FILE").ok().map(PathBuf::from),
            compliance_interval: Duration::from_secs(compliance_interval.max(1)),
            require_delete_reason,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub supplier_repo: SupplierRepository,
    pub settings_repo: SettingsRepository,
    pub lifecycle_service: LifecycleService,
    pub compliance_service: ComplianceService,
    pub rbac_service: RbacService,
    pub catalog_service: CatalogService,
    pub obfuscation: ObfuscationService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_notifier(config: &AppConfig, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        let supplier_repo = SupplierRepository::new();
        let settings_repo = SettingsRepository::new(AlertSettings::default());

        let key = match &config.field_codec_key {
            Some(key) => key.clone(),
            None => {
                tracing::warn!("⚠️ FIELD_CODEC_KEY ausente: usando chave efêmera (contatos não sobrevivem a reinício)");
                let mut key = vec![0u8; 32];
                SystemRandom::new()
                    .fill(&mut key)
                    .map_err(|_| anyhow::anyhow!("Falha ao gerar chave efêmera"))?;
                key
            }
        };
        let codec = AeadCodec::new(&key).map_err(|e| anyhow::anyhow!("{}", e))?;

        let mut obfuscation = ObfuscationService::new(Arc::new(codec));
        if let Some(legacy) = &config.legacy_codec_key {
            obfuscation = obfuscation.with_legacy(LegacyXorCodec::new(legacy.as_bytes()));
        }

        let policy = LifecyclePolicy {
            require_delete_reason: config.require_delete_reason,
        };

        Ok(Self {
            auth_service: AuthService::new(config.jwt_secret.clone()),
            lifecycle_service: LifecycleService::new(supplier_repo.clone(), notifier.clone(), policy),
            compliance_service: ComplianceService::new(
                supplier_repo.clone(),
                settings_repo.clone(),
                notifier.clone(),
            ),
            rbac_service: RbacService::new(supplier_repo.clone(), notifier),
            catalog_service: CatalogService::new(supplier_repo.clone()),
            obfuscation,
            supplier_repo,
            settings_repo,
        })
    }
}
