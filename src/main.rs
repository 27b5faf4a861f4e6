use anyhow::Context;
use hedgebook::{
    api, init_db, Config, CsvLedgerStore, HedgeDesk, LedgerBackend, LedgerStore, Repository,
};
use std::net::SocketAddr;
use std::sync::Arc;

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn LedgerStore>> {
    let store: Arc<dyn LedgerStore> = match &config.ledger_backend {
        LedgerBackend::Sqlite { database_path } => {
            let pool = init_db(database_path)
                .await
                .with_context(|| format!("Failed to initialize database at {}", database_path))?;
            Arc::new(Repository::new(pool))
        }
        LedgerBackend::Csv { path } => Arc::new(CsvLedgerStore::new(path)),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let store = open_store(&config).await?;
    tracing::info!(backend = ?config.ledger_backend, "Ledger store ready");

    let desk = Arc::new(HedgeDesk::new(store, config.store_timeout()));
    let app = api::create_router(api::AppState::new(desk));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
