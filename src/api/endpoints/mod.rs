pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod prescriptions;

use serde::Serialize;

/// Uniform delete acknowledgement (200, never 204 — standardized across
/// every resource).
#[derive(Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    pub fn ok() -> Self {
        Self { deleted: true }
    }
}
