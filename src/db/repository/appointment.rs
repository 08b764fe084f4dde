use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{parse_enum, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Appointment, UpdateAppointmentRequest};

const COLUMNS: &str =
    "id, doctor_id, patient_id, scheduled_at, status, reason, notes, created_at, updated_at";

fn row_to_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
        doctor_id: parse_uuid(1, &row.get::<_, String>(1)?)?,
        patient_id: parse_uuid(2, &row.get::<_, String>(2)?)?,
        scheduled_at: row.get::<_, DateTime<Utc>>(3)?,
        status: parse_enum(4, &row.get::<_, String>(4)?)?,
        reason: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get::<_, DateTime<Utc>>(7)?,
        updated_at: row.get::<_, DateTime<Utc>>(8)?,
    })
}

pub fn insert_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, doctor_id, patient_id, scheduled_at, status,
                                   reason, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            appointment.id.to_string(),
            appointment.doctor_id.to_string(),
            appointment.patient_id.to_string(),
            appointment.scheduled_at,
            appointment.status.as_str(),
            appointment.reason,
            appointment.notes,
            appointment.created_at,
            appointment.updated_at,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, DatabaseError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1"),
        params![id.to_string()],
        row_to_appointment,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        },
        other => other.into(),
    })
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COLUMNS} FROM appointments ORDER BY scheduled_at"))?;
    let rows = stmt.query_map([], row_to_appointment)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_appointment(
    conn: &Connection,
    id: &Uuid,
    update: &UpdateAppointmentRequest,
) -> Result<Appointment, DatabaseError> {
    let mut appointment = get_appointment(conn, id)?;
    if let Some(scheduled_at) = update.scheduled_at {
        appointment.scheduled_at = scheduled_at;
    }
    if let Some(status) = update.status {
        appointment.status = status;
    }
    if let Some(reason) = &update.reason {
        appointment.reason = reason.clone();
    }
    if let Some(notes) = &update.notes {
        appointment.notes = Some(notes.clone());
    }
    appointment.updated_at = Utc::now();

    conn.execute(
        "UPDATE appointments SET scheduled_at = ?2, status = ?3, reason = ?4, notes = ?5,
                                 updated_at = ?6
         WHERE id = ?1",
        params![
            id.to_string(),
            appointment.scheduled_at,
            appointment.status.as_str(),
            appointment.reason,
            appointment.notes,
            appointment.updated_at,
        ],
    )?;
    Ok(appointment)
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected =
        conn.execute("DELETE FROM appointments WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
