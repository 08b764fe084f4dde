use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{PrescriptionOrigin, PrescriptionStatus};

/// A standalone prescription document.
///
/// `ai_text` holds the upstream model's draft verbatim; `final_text` is the
/// doctor's signed-off version. `origin` records whether the draft came from
/// the AI passthrough or was written manually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub symptoms: String,
    pub medical_history: Option<String>,
    pub ai_text: Option<String>,
    pub final_text: Option<String>,
    pub origin: PrescriptionOrigin,
    pub status: PrescriptionStatus,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    pub symptoms: String,
    pub medical_history: Option<String>,
    pub final_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub final_text: Option<String>,
    pub status: Option<PrescriptionStatus>,
    pub feedback: Option<String>,
}

/// Body for `POST /api/prescriptions/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePrescriptionRequest {
    pub patient_id: Uuid,
    pub symptoms: String,
    pub medical_history: Option<String>,
}

impl CreatePrescriptionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.symptoms.trim().is_empty() {
            return Err("Symptoms must not be empty".into());
        }
        Ok(())
    }
}
