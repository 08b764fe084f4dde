use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One prescribed medicine inside an embedded medical-history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPrescription {
    pub medicine: String,
    pub dosage: String,
    pub duration_days: u32,
    pub instructions: Option<String>,
}

/// An embedded medical-history entry. Has no identity of its own — it lives
/// and dies with its patient document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub date: NaiveDate,
    pub diagnosis: String,
    #[serde(default)]
    pub prescriptions: Vec<HistoryPrescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Reference to the treating doctor — may dangle after a doctor delete.
    pub doctor_id: Option<Uuid>,
    pub medical_history: Vec<MedicalHistoryEntry>,
    pub appointment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub medical_history: Option<Vec<MedicalHistoryEntry>>,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if !self.email.contains('@') {
            return Err("Email must be a valid address".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_round_trips_through_json() {
        let entry = MedicalHistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            diagnosis: "Seasonal rhinitis".into(),
            prescriptions: vec![HistoryPrescription {
                medicine: "Loratadine".into(),
                dosage: "10mg".into(),
                duration_days: 14,
                instructions: Some("Once daily in the morning".into()),
            }],
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: MedicalHistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.diagnosis, "Seasonal rhinitis");
        assert_eq!(back.prescriptions[0].duration_days, 14);
    }

    #[test]
    fn history_prescriptions_default_to_empty() {
        let back: MedicalHistoryEntry =
            serde_json::from_str(r#"{"date":"2026-03-14","diagnosis":"Checkup"}"#).unwrap();
        assert!(back.prescriptions.is_empty());
    }

    #[test]
    fn empty_name_rejected() {
        let req = CreatePatientRequest {
            name: "  ".into(),
            email: "a@b.example".into(),
            doctor_id: None,
            medical_history: vec![],
        };
        assert!(req.validate().is_err());
    }
}
