use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::page_bounds;
use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str =
    "p.id, p.email, p.id_card_no, p.first_name, p.last_name, p.password_hash, p.birthday";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        email: row.get(1)?,
        id_card_no: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        password_hash: row.get(5)?,
        birthday: row.get(6)?,
    })
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (email, id_card_no, first_name, last_name, password_hash, birthday)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.email,
            patient.id_card_no,
            patient.first_name,
            patient.last_name,
            patient.password_hash,
            patient.birthday,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn query_patient(
    conn: &Connection,
    filter: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients p WHERE {filter} = ?1"),
            [value],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn get_patient_by_id(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    query_patient(conn, "p.id", &id)
}

pub fn get_patient_by_email(conn: &Connection, email: &str) -> Result<Option<Patient>, DatabaseError> {
    query_patient(conn, "p.email", &email)
}

pub fn get_patient_by_id_card_no(
    conn: &Connection,
    id_card_no: &str,
) -> Result<Option<Patient>, DatabaseError> {
    query_patient(conn, "p.id_card_no", &id_card_no)
}

pub fn list_patients(
    conn: &Connection,
    page: Option<&PageRequest>,
) -> Result<Vec<Patient>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients p ORDER BY p.id LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(params![limit, offset], patient_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Distinct patients holding at least one visit that starts on `day`.
pub fn list_patients_with_visits_on(
    conn: &Connection,
    day: NaiveDate,
    page: Option<&PageRequest>,
) -> Result<Vec<Patient>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients p
         WHERE EXISTS (SELECT 1 FROM visits v
                       WHERE v.patient_id = p.id AND date(v.appointment_start) = ?1)
         ORDER BY p.id LIMIT ?2 OFFSET ?3"
    ))?;

    let rows = stmt.query_map(params![day, limit, offset], patient_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Overwrite email, names and birthday. Id card number and password are untouched.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET email = ?1, first_name = ?2, last_name = ?3, birthday = ?4
         WHERE id = ?5",
        params![
            patient.email,
            patient.first_name,
            patient.last_name,
            patient.birthday,
            patient.id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

pub fn update_patient_password(
    conn: &Connection,
    id: i64,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
