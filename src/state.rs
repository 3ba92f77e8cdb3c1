use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::services::auth::CredentialVerifier;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub credentials: Box<dyn CredentialVerifier>,
}

impl AppState {
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, ServiceError> {
        self.db
            .lock()
            .map_err(|_| ServiceError::Storage(anyhow::anyhow!("database mutex poisoned")))
    }
}
