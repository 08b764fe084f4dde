use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{parse_enum, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Doctor, UpdateDoctorRequest};

const COLUMNS: &str = "id, name, email, password_hash, role, specialization, \
                       experience_years, patient_ids, appointment_ids, created_at, updated_at";

fn row_to_doctor(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: parse_enum(4, &row.get::<_, String>(4)?)?,
        specialization: row.get(5)?,
        experience_years: row.get(6)?,
        patient_ids: serde_json::from_str(&row.get::<_, String>(7)?).unwrap_or_default(),
        appointment_ids: serde_json::from_str(&row.get::<_, String>(8)?).unwrap_or_default(),
        created_at: row.get::<_, DateTime<Utc>>(9)?,
        updated_at: row.get::<_, DateTime<Utc>>(10)?,
    })
}

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, email, password_hash, role, specialization,
                              experience_years, patient_ids, appointment_ids, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.password_hash,
            doctor.role.as_str(),
            doctor.specialization,
            doctor.experience_years,
            serde_json::to_string(&doctor.patient_ids).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&doctor.appointment_ids).unwrap_or_else(|_| "[]".into()),
            doctor.created_at,
            doctor.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Doctor, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM doctors WHERE id = ?1"),
        params![id.to_string()],
        row_to_doctor,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        },
        other => other.into(),
    })
}

pub fn get_doctor_by_email(conn: &Connection, email: &str) -> Result<Doctor, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM doctors WHERE email = ?1"),
        params![email],
        row_to_doctor,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: email.to_string(),
        },
        other => other.into(),
    })
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLUMNS} FROM doctors ORDER BY created_at"))?;
    let rows = stmt.query_map([], row_to_doctor)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Partial update: unset fields keep their stored value.
pub fn update_doctor(
    conn: &Connection,
    id: &Uuid,
    update: &UpdateDoctorRequest,
) -> Result<Doctor, DatabaseError> {
    let mut doctor = get_doctor(conn, id)?;
    if let Some(name) = &update.name {
        doctor.name = name.clone();
    }
    if let Some(specialization) = &update.specialization {
        doctor.specialization = Some(specialization.clone());
    }
    if let Some(experience_years) = update.experience_years {
        doctor.experience_years = experience_years;
    }
    doctor.updated_at = Utc::now();

    conn.execute(
        "UPDATE doctors SET name = ?2, specialization = ?3, experience_years = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            id.to_string(),
            doctor.name,
            doctor.specialization,
            doctor.experience_years,
            doctor.updated_at,
        ],
    )?;
    Ok(doctor)
}

pub fn delete_doctor(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Append a patient reference to the doctor's list (mirrors the office
/// model's document push). Missing doctors are ignored — the reference
/// lists are best-effort, not integrity-enforced.
pub fn append_doctor_patient(
    conn: &Connection,
    doctor_id: &Uuid,
    patient_id: &Uuid,
) -> Result<(), DatabaseError> {
    let Ok(mut doctor) = get_doctor(conn, doctor_id) else {
        return Ok(());
    };
    doctor.patient_ids.push(*patient_id);
    conn.execute(
        "UPDATE doctors SET patient_ids = ?2, updated_at = ?3 WHERE id = ?1",
        params![
            doctor_id.to_string(),
            serde_json::to_string(&doctor.patient_ids).unwrap_or_else(|_| "[]".into()),
            Utc::now(),
        ],
    )?;
    Ok(())
}

pub fn append_doctor_appointment(
    conn: &Connection,
    doctor_id: &Uuid,
    appointment_id: &Uuid,
) -> Result<(), DatabaseError> {
    let Ok(mut doctor) = get_doctor(conn, doctor_id) else {
        return Ok(());
    };
    doctor.appointment_ids.push(*appointment_id);
    conn.execute(
        "UPDATE doctors SET appointment_ids = ?2, updated_at = ?3 WHERE id = ?1",
        params![
            doctor_id.to_string(),
            serde_json::to_string(&doctor.appointment_ids).unwrap_or_else(|_| "[]".into()),
            Utc::now(),
        ],
    )?;
    Ok(())
}
