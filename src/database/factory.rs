use tokio::sync::Mutex;

use crate::config::Config;
use crate::database::connection::Connection;
use crate::database::repositories::SquadRepository;
use crate::error::AppError;

/// Owns the long-lived parent connection and hands out per-request
/// repositories copied from it.
///
/// The parent is dialed lazily by the first `repository()` call. The mutex
/// covers the initialize-if-absent check, so concurrent first requests wait
/// for a single dial instead of racing to open several parents. A failed dial
/// leaves the factory uninitialized and the next request dials again.
pub struct SquadRepositoryFactory {
    config: Config,
    parent: Mutex<Option<Connection>>,
}

impl SquadRepositoryFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parent: Mutex::new(None),
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.parent.lock().await.is_some()
    }

    pub async fn repository(&self) -> Result<SquadRepository, AppError> {
        let mut parent = self.parent.lock().await;

        let connection = match parent.as_ref() {
            Some(connection) => connection.clone(),
            None => {
                let connection = Connection::dial(&self.config).await.inspect_err(|e| {
                    log::error!("Could not reach {}: {}", self.config.database_url, e);
                })?;
                log::info!(
                    "Connected to {} document store '{}'",
                    connection.backend(),
                    self.config.database_name
                );
                *parent = Some(connection.clone());
                connection
            }
        };

        Ok(SquadRepository::new(connection))
    }

    /// Shuts the parent connection down. Safe to call when it was never dialed.
    pub async fn close(&self) {
        let parent = self.parent.lock().await.take();
        if let Some(connection) = parent {
            log::info!("Closing {} document store", connection.backend());
            connection.shutdown().await;
        }
    }
}
