//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use supplier_compliance::config::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Inicializa o logger (RUST_LOG controla o nível; padrão: info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config)?;

    if let Some(seed) = &config.seed_file {
        app_state.supplier_repo.load_seed(seed).await?;
    }

    // Varredura de conformidade periódica (a leitura também reclassifica)
    let compliance = app_state.compliance_service.clone();
    let every = config.compliance_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let report = compliance.run().await;
            if !report.auto_suspended.is_empty() {
                tracing::warn!(
                    "⛔ {} fornecedor(es) suspenso(s) por CR vencido",
                    report.auto_suspended.len()
                );
            }
        }
    });
    tracing::info!("⏱️ Varredura de conformidade a cada {}s", every.as_secs());

    let app = supplier_compliance::app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Swagger UI em /swagger-ui");
    axum::serve(listener, app).await?;

    Ok(())
}
