use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nyaa_core::{
    create_authenticator, load_config, validate_config, Authenticator, BrowseEngine,
    CommentService, Database, ElasticSearchIndex, SearchIndex, SqliteCatalog,
    SqliteCommentStore, SqliteUserDirectory,
};
use nyaa_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("NYAA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Auth method: {:?}", config.auth.method);
    info!("Database path: {:?}", config.database.path);

    let db = Database::open(&config.database.path)
        .with_context(|| format!("Failed to open database {:?}", config.database.path))?;
    let users = Arc::new(SqliteUserDirectory::new(db.clone()));
    let catalog = Arc::new(SqliteCatalog::new(db.clone()));
    let comment_store = Arc::new(SqliteCommentStore::new(db));
    info!("Database initialized");

    let authenticator: Arc<dyn Authenticator> =
        Arc::from(create_authenticator(&config.auth, users.clone()));
    info!("Using authenticator: {}", authenticator.method_name());

    let search_index: Option<Arc<dyn SearchIndex>> = match &config.search_index {
        Some(index_config) => {
            info!(
                "Initializing search index client at {} (index {})",
                index_config.url, index_config.index
            );
            let index = ElasticSearchIndex::new(index_config)
                .context("Failed to create search index client")?;
            Some(Arc::new(index))
        }
        None => {
            info!("No search index configured");
            None
        }
    };
    if search_index.is_some() && !config.browse.use_search_index {
        warn!("Search index configured but browse.use_search_index is false; it will not be queried");
    }

    let engine = BrowseEngine::new(
        config.browse.clone(),
        users,
        catalog.clone(),
        search_index,
    );
    let comments = CommentService::new(catalog, comment_store, config.comments.clone());

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, authenticator, engine, comments));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
