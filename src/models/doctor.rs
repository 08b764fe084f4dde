use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DoctorRole;

/// A registered doctor account. Doubles as the authentication subject.
///
/// `patient_ids` / `appointment_ids` are reference lists maintained on
/// creation of the referenced documents and never cleaned up on delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: DoctorRole,
    pub specialization: Option<String>,
    pub experience_years: i64,
    pub patient_ids: Vec<Uuid>,
    pub appointment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_years: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RegisterDoctorRequest {
    /// Boundary validation before the document reaches the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if !self.email.contains('@') {
            return Err("Email must be a valid address".into());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".into());
        }
        if self.experience_years < 0 {
            return Err("Experience must not be negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterDoctorRequest {
        RegisterDoctorRequest {
            name: "Dr. Osei".into(),
            email: "osei@curamind.example".into(),
            password: "correct-horse".into(),
            specialization: Some("Cardiology".into()),
            experience_years: 12,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn short_password_rejected() {
        let mut req = request();
        req.password = "short".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn bad_email_rejected() {
        let mut req = request();
        req.email = "not-an-email".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn password_hash_never_serialized() {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. Osei".into(),
            email: "osei@curamind.example".into(),
            password_hash: "$pbkdf2-sha256$...".into(),
            role: DoctorRole::Doctor,
            specialization: None,
            experience_years: 0,
            patient_ids: vec![],
            appointment_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&doctor).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("pbkdf2"));
    }
}
