use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{parse_enum, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Prescription, UpdatePrescriptionRequest};

const COLUMNS: &str = "id, patient_id, doctor_id, symptoms, medical_history, ai_text, \
                       final_text, origin, status, feedback, created_at, updated_at";

fn row_to_prescription(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
        patient_id: parse_uuid(1, &row.get::<_, String>(1)?)?,
        doctor_id: parse_uuid(2, &row.get::<_, String>(2)?)?,
        symptoms: row.get(3)?,
        medical_history: row.get(4)?,
        ai_text: row.get(5)?,
        final_text: row.get(6)?,
        origin: parse_enum(7, &row.get::<_, String>(7)?)?,
        status: parse_enum(8, &row.get::<_, String>(8)?)?,
        feedback: row.get(9)?,
        created_at: row.get::<_, DateTime<Utc>>(10)?,
        updated_at: row.get::<_, DateTime<Utc>>(11)?,
    })
}

pub fn insert_prescription(
    conn: &Connection,
    prescription: &Prescription,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (id, patient_id, doctor_id, symptoms, medical_history,
                                    ai_text, final_text, origin, status, feedback,
                                    created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            prescription.id.to_string(),
            prescription.patient_id.to_string(),
            prescription.doctor_id.to_string(),
            prescription.symptoms,
            prescription.medical_history,
            prescription.ai_text,
            prescription.final_text,
            prescription.origin.as_str(),
            prescription.status.as_str(),
            prescription.feedback,
            prescription.created_at,
            prescription.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_prescription(conn: &Connection, id: &Uuid) -> Result<Prescription, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM prescriptions WHERE id = ?1"),
        params![id.to_string()],
        row_to_prescription,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "prescription".into(),
            id: id.to_string(),
        },
        other => other.into(),
    })
}

pub fn list_prescriptions(conn: &Connection) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLUMNS} FROM prescriptions ORDER BY created_at"))?;
    let rows = stmt.query_map([], row_to_prescription)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_prescription(
    conn: &Connection,
    id: &Uuid,
    update: &UpdatePrescriptionRequest,
) -> Result<Prescription, DatabaseError> {
    let mut prescription = get_prescription(conn, id)?;
    if let Some(final_text) = &update.final_text {
        prescription.final_text = Some(final_text.clone());
    }
    if let Some(status) = update.status {
        prescription.status = status;
    }
    if let Some(feedback) = &update.feedback {
        prescription.feedback = Some(feedback.clone());
    }
    prescription.updated_at = Utc::now();

    conn.execute(
        "UPDATE prescriptions SET final_text = ?2, status = ?3, feedback = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            id.to_string(),
            prescription.final_text,
            prescription.status.as_str(),
            prescription.feedback,
            prescription.updated_at,
        ],
    )?;
    Ok(prescription)
}

pub fn delete_prescription(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "prescription".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::{PrescriptionOrigin, PrescriptionStatus};

    fn sample_prescription() -> Prescription {
        Prescription {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            symptoms: "Persistent dry cough, mild fever".into(),
            medical_history: Some("Asthma since childhood".into()),
            ai_text: Some("Suggested: salbutamol inhaler as needed".into()),
            final_text: None,
            origin: PrescriptionOrigin::Ai,
            status: PrescriptionStatus::Pending,
            feedback: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let conn = open_memory_database().unwrap();
        let prescription = sample_prescription();
        insert_prescription(&conn, &prescription).unwrap();

        let loaded = get_prescription(&conn, &prescription.id).unwrap();
        assert_eq!(loaded.origin, PrescriptionOrigin::Ai);
        assert_eq!(loaded.status, PrescriptionStatus::Pending);
        assert_eq!(loaded.ai_text, prescription.ai_text);
        assert!(loaded.final_text.is_none());
    }

    #[test]
    fn doctor_signoff_completes_prescription() {
        let conn = open_memory_database().unwrap();
        let prescription = sample_prescription();
        insert_prescription(&conn, &prescription).unwrap();

        let updated = update_prescription(
            &conn,
            &prescription.id,
            &UpdatePrescriptionRequest {
                final_text: Some("Salbutamol 100mcg, 2 puffs as needed".into()),
                status: Some(PrescriptionStatus::Completed),
                feedback: None,
            },
        )
        .unwrap();

        assert_eq!(updated.status, PrescriptionStatus::Completed);
        assert!(updated.final_text.is_some());
        // AI draft is retained alongside the sign-off
        assert_eq!(updated.ai_text, prescription.ai_text);
    }

    #[test]
    fn delete_missing_prescription_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = delete_prescription(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
