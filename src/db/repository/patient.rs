use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{Patient, UpdatePatientRequest};

const COLUMNS: &str =
    "id, name, email, doctor_id, medical_history, appointment_ids, created_at, updated_at";

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        doctor_id: row
            .get::<_, Option<String>>(3)?
            .and_then(|s| Uuid::parse_str(&s).ok()),
        medical_history: serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default(),
        appointment_ids: serde_json::from_str(&row.get::<_, String>(5)?).unwrap_or_default(),
        created_at: row.get::<_, DateTime<Utc>>(6)?,
        updated_at: row.get::<_, DateTime<Utc>>(7)?,
    })
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, email, doctor_id, medical_history,
                               appointment_ids, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.email,
            patient.doctor_id.map(|id| id.to_string()),
            serde_json::to_string(&patient.medical_history).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&patient.appointment_ids).unwrap_or_else(|_| "[]".into()),
            patient.created_at,
            patient.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Patient, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM patients WHERE id = ?1"),
        params![id.to_string()],
        row_to_patient,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        },
        other => other.into(),
    })
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLUMNS} FROM patients ORDER BY created_at"))?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_patient(
    conn: &Connection,
    id: &Uuid,
    update: &UpdatePatientRequest,
) -> Result<Patient, DatabaseError> {
    let mut patient = get_patient(conn, id)?;
    if let Some(name) = &update.name {
        patient.name = name.clone();
    }
    if let Some(doctor_id) = update.doctor_id {
        patient.doctor_id = Some(doctor_id);
    }
    if let Some(history) = &update.medical_history {
        patient.medical_history = history.clone();
    }
    patient.updated_at = Utc::now();

    conn.execute(
        "UPDATE patients SET name = ?2, doctor_id = ?3, medical_history = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            id.to_string(),
            patient.name,
            patient.doctor_id.map(|d| d.to_string()),
            serde_json::to_string(&patient.medical_history).unwrap_or_else(|_| "[]".into()),
            patient.updated_at,
        ],
    )?;
    Ok(patient)
}

pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn append_patient_appointment(
    conn: &Connection,
    patient_id: &Uuid,
    appointment_id: &Uuid,
) -> Result<(), DatabaseError> {
    let Ok(mut patient) = get_patient(conn, patient_id) else {
        return Ok(());
    };
    patient.appointment_ids.push(*appointment_id);
    conn.execute(
        "UPDATE patients SET appointment_ids = ?2, updated_at = ?3 WHERE id = ?1",
        params![
            patient_id.to_string(),
            serde_json::to_string(&patient.appointment_ids).unwrap_or_else(|_| "[]".into()),
            Utc::now(),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::{HistoryPrescription, MedicalHistoryEntry};
    use chrono::NaiveDate;

    pub(crate) fn sample_patient(email: &str, doctor_id: Option<Uuid>) -> Patient {
        Patient {
            id: Uuid::new_v4(),
            name: "Amara Diallo".into(),
            email: email.into(),
            doctor_id,
            medical_history: vec![],
            appointment_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn embedded_history_survives_round_trip() {
        let conn = open_memory_database().unwrap();
        let mut patient = sample_patient("amara@curamind.example", None);
        patient.medical_history = vec![MedicalHistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            diagnosis: "Hypertension".into(),
            prescriptions: vec![HistoryPrescription {
                medicine: "Amlodipine".into(),
                dosage: "5mg".into(),
                duration_days: 30,
                instructions: None,
            }],
        }];
        insert_patient(&conn, &patient).unwrap();

        let loaded = get_patient(&conn, &patient.id).unwrap();
        assert_eq!(loaded.medical_history.len(), 1);
        assert_eq!(loaded.medical_history[0].diagnosis, "Hypertension");
        assert_eq!(loaded.medical_history[0].prescriptions[0].medicine, "Amlodipine");
    }

    #[test]
    fn duplicate_email_is_constraint_violation() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &sample_patient("dup@curamind.example", None)).unwrap();
        let err =
            insert_patient(&conn, &sample_patient("dup@curamind.example", None)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn doctor_reference_is_not_validated() {
        // The store accepts a doctor_id that points nowhere.
        let conn = open_memory_database().unwrap();
        let dangling = Uuid::new_v4();
        let patient = sample_patient("amara@curamind.example", Some(dangling));
        insert_patient(&conn, &patient).unwrap();

        let loaded = get_patient(&conn, &patient.id).unwrap();
        assert_eq!(loaded.doctor_id, Some(dangling));
    }

    #[test]
    fn update_replaces_history_wholesale() {
        let conn = open_memory_database().unwrap();
        let patient = sample_patient("amara@curamind.example", None);
        insert_patient(&conn, &patient).unwrap();

        let updated = update_patient(
            &conn,
            &patient.id,
            &UpdatePatientRequest {
                name: None,
                doctor_id: None,
                medical_history: Some(vec![MedicalHistoryEntry {
                    date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                    diagnosis: "Follow-up".into(),
                    prescriptions: vec![],
                }]),
            },
        )
        .unwrap();

        assert_eq!(updated.medical_history.len(), 1);
        assert_eq!(updated.medical_history[0].diagnosis, "Follow-up");
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let conn = open_memory_database().unwrap();
        let patient = sample_patient("amara@curamind.example", None);
        insert_patient(&conn, &patient).unwrap();
        delete_patient(&conn, &patient.id).unwrap();

        let err = get_patient(&conn, &patient.id).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
