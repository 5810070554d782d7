//! Server setup and initialization
//!
//! Wires the database adapters, notification processor, webhook dispatcher and
//! listener together, then serves the admin API until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use relay_common::{AppConfig, AppError, ChatFilterPhrases};
use relay_db::{
    create_pool, run_migrations, ListenerConfig, ListenerHandle, NotificationListener,
    PgBanRepository, PgPlayerLocator, PgServerIdentity, DEFAULT_MIGRATIONS_DIR,
};
use relay_service::{
    AutoModerator, ChatFilter, DispatchQueue, MonotonicClock, NotificationProcessor,
    NotificationRateLimiter, PayloadTemplate, ServiceContextBuilder, SessionRegistry,
    SharedRoundState, WebhookDispatcher,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Background tasks of a running relay
pub struct RelayRuntime {
    pub state: AppState,
    listener: ListenerHandle,
    worker: JoinHandle<()>,
    webhook_watch: JoinHandle<()>,
}

impl RelayRuntime {
    /// Stop listening, then let queued jobs finish
    pub async fn shutdown(self) {
        let Self {
            state,
            listener,
            worker,
            webhook_watch,
        } = self;

        // The listener task owns the processor, and with it the last queue sender
        listener.shutdown().await;
        if let Err(e) = worker.await {
            warn!(error = %e, "Dispatch worker failed");
        }

        drop(state);
        webhook_watch.abort();
        info!("Ban relay stopped");
    }
}

/// Connect to the database and start the notification pipeline
pub async fn start_relay(config: AppConfig) -> Result<RelayRuntime, AppError> {
    let phrases = match &config.chat_filter.phrases_path {
        Some(path) => ChatFilterPhrases::load(path).map_err(|e| AppError::Config(e.to_string()))?,
        None => ChatFilterPhrases::default(),
    };
    let filter = ChatFilter::new(phrases);
    info!(
        phrases = filter.phrase_count(),
        enabled = config.chat_filter.enabled,
        "Chat filter loaded"
    );

    info!("Connecting to PostgreSQL...");
    let db_config = relay_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, DEFAULT_MIGRATIONS_DIR)
            .await
            .map_err(|e| AppError::Database(format!("migrations failed: {e}")))?;
        info!("Database migrations applied");
    }

    // Repositories
    let bans = Arc::new(PgBanRepository::new(pool.clone()));
    let players = Arc::new(PgPlayerLocator::new(pool.clone()));
    let identity = Arc::new(PgServerIdentity::new(pool.clone(), config.server.name.clone()));

    // Runtime collaborators
    let sessions = SessionRegistry::new_shared();
    let round = Arc::new(SharedRoundState::default());

    let webhook = Arc::new(
        WebhookDispatcher::new(
            players.clone(),
            round.clone(),
            PayloadTemplate::from(&config.webhook),
        )
        .map_err(|e| AppError::Config(e.to_string()))?,
    );

    let ctx = ServiceContextBuilder::new()
        .ban_repo(bans.clone())
        .server_identity(identity)
        .sessions(sessions.clone())
        .webhook(webhook.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let (webhook_tx, webhook_rx) = watch::channel(config.webhook.url.clone());
    let webhook_watch = tokio::spawn(webhook.watch_config(webhook_rx));

    // Notification pipeline
    let (queue, worker) = DispatchQueue::new();
    let worker = worker.spawn();
    let limiter =
        NotificationRateLimiter::from_config(&config.notifications, Arc::new(MonotonicClock::new()));
    let processor = Arc::new(NotificationProcessor::new(ctx, limiter, queue));

    let listener = NotificationListener::spawn(
        pool.clone(),
        ListenerConfig {
            reconnect_delay: config.notifications.reconnect_delay(),
            ..ListenerConfig::default()
        },
        processor,
    );

    // Chat moderation
    let moderator = Arc::new(AutoModerator::new(filter, &config.chat_filter, bans, players));

    let state = AppState::new(pool, sessions, round, moderator, webhook_tx, config);

    Ok(RelayRuntime {
        state,
        listener,
        worker,
        webhook_watch,
    })
}

/// Serve `app` on `addr` until `shutdown` resolves
pub async fn run_server(
    app: Router,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Admin API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::internal)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the relay with configuration until Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .admin
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid admin address: {e}")))?;

    let runtime = start_relay(config).await?;
    let app = create_app(runtime.state.clone());

    let served = run_server(app, addr, shutdown_signal()).await;
    runtime.shutdown().await;

    served
}
