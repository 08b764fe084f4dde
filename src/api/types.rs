//! Shared types for the API layer.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use crate::ai::OpenAiClient;
use crate::api::error::ApiError;
use crate::config::Settings;
use crate::models::DoctorRole;

/// Shared context for all API routes and middleware.
///
/// The single store connection sits behind a mutex: concurrent writers to the
/// same document serialize here and the last write wins — no optimistic
/// concurrency tokens. Handlers take the guard only for the duration of their
/// store operation and never hold it across an await point.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
    pub settings: Arc<Settings>,
    pub ai: Arc<OpenAiClient>,
}

impl ApiContext {
    pub fn new(conn: Connection, settings: Settings) -> Self {
        let ai = OpenAiClient::new(
            &settings.openai_base_url,
            &settings.openai_api_key,
            &settings.openai_model,
        );
        Self {
            db: Arc::new(Mutex::new(conn)),
            settings: Arc::new(settings),
            ai: Arc::new(ai),
        }
    }

    /// Lock the store connection.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".into()))
    }
}

/// Authenticated doctor context, injected into request extensions by the
/// auth middleware after token verification and subject lookup.
#[derive(Debug, Clone)]
pub struct AuthDoctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: DoctorRole,
}
