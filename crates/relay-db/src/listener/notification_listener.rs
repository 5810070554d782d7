//! Postgres notification listener.
//!
//! Holds a dedicated connection that `LISTEN`s on the ban notification channels
//! and hands each payload to a [`NotificationHandler`]. The handler is called
//! inline and must not block; errors reconnect after a delay.

use std::sync::Arc;
use std::time::Duration;

use relay_core::{NotificationHandler, BAN_NOTIFICATION_CHANNEL, UNBAN_NOTIFICATION_CHANNEL};
use sqlx::postgres::{PgListener, PgPool};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Error type for listener operations
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for listener operations
pub type ListenerResult<T> = Result<T, ListenerError>;

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Channels to `LISTEN` on
    pub channels: Vec<String>,
    /// Delay before reconnecting after an error
    pub reconnect_delay: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            channels: vec![
                BAN_NOTIFICATION_CHANNEL.to_string(),
                UNBAN_NOTIFICATION_CHANNEL.to_string(),
            ],
            reconnect_delay: Duration::from_millis(1000),
        }
    }
}

/// Commands for the background listener
#[derive(Debug)]
enum ListenerCommand {
    Shutdown,
}

/// Handle to a running listener
pub struct ListenerHandle {
    control_tx: mpsc::Sender<ListenerCommand>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Stop the listener and wait for its task to finish
    pub async fn shutdown(self) {
        if self.control_tx.send(ListenerCommand::Shutdown).await.is_err() {
            tracing::debug!("Listener already stopped");
        }
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Listener task failed");
        }
    }

    /// Check whether the background task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Postgres `LISTEN` subscriber
pub struct NotificationListener;

impl NotificationListener {
    /// Start the background listener
    pub fn spawn(
        pool: PgPool,
        config: ListenerConfig,
        handler: Arc<dyn NotificationHandler>,
    ) -> ListenerHandle {
        let (control_tx, control_rx) = mpsc::channel(4);
        let task = tokio::spawn(Self::listener_loop(pool, config, handler, control_rx));

        ListenerHandle { control_tx, task }
    }

    /// Background listener loop
    async fn listener_loop(
        pool: PgPool,
        config: ListenerConfig,
        handler: Arc<dyn NotificationHandler>,
        mut control_rx: mpsc::Receiver<ListenerCommand>,
    ) {
        loop {
            match Self::run_listener(&pool, &config, handler.as_ref(), &mut control_rx).await {
                Ok(()) => {
                    tracing::info!("Notification listener shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Notification listener error, reconnecting...");

                    tokio::select! {
                        () = tokio::time::sleep(config.reconnect_delay) => {}
                        _ = control_rx.recv() => {
                            tracing::info!("Notification listener shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Run the listener until error or shutdown
    async fn run_listener(
        pool: &PgPool,
        config: &ListenerConfig,
        handler: &dyn NotificationHandler,
        control_rx: &mut mpsc::Receiver<ListenerCommand>,
    ) -> ListenerResult<()> {
        let mut listener = PgListener::connect_with(pool).await?;
        listener
            .listen_all(config.channels.iter().map(String::as_str))
            .await?;

        tracing::info!(channels = ?config.channels, "Listening for ban notifications");

        loop {
            tokio::select! {
                msg = listener.try_recv() => {
                    match msg? {
                        Some(notification) => {
                            tracing::trace!(
                                channel = %notification.channel(),
                                "Received notification"
                            );
                            handler.on_notification(notification.channel(), notification.payload());
                        }
                        // The next try_recv reconnects and re-issues LISTEN
                        None => {
                            tracing::warn!("Listener connection lost; notifications may have been missed");
                        }
                    }
                }

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(ListenerCommand::Shutdown) | None => return Ok(()),
                    }
                }
            }
        }
    }
}
