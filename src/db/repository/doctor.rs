use rusqlite::{params, Connection, OptionalExtension, Row};

use super::page_bounds;
use crate::db::DatabaseError;
use crate::models::*;

const DOCTOR_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, specialisation";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        password_hash: row.get(4)?,
        specialisation: row.get(5)?,
    })
}

/// Insert a doctor and return the id assigned by the database (`doctor.id` is ignored).
pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (email, first_name, last_name, password_hash, specialisation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            doctor.email,
            doctor.first_name,
            doctor.last_name,
            doctor.password_hash,
            doctor.specialisation,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_doctor_by_id(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
            params![id],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn get_doctor_by_email(conn: &Connection, email: &str) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE email = ?1"),
            params![email],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(
    conn: &Connection,
    page: Option<&PageRequest>,
) -> Result<Vec<Doctor>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(params![limit, offset], doctor_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Ids of the facilities the doctor is assigned to, ascending.
pub fn get_doctor_facility_ids(conn: &Connection, doctor_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medical_facility_id FROM doctor_medical_facility
         WHERE doctor_id = ?1 ORDER BY medical_facility_id",
    )?;
    let rows = stmt.query_map(params![doctor_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Ids of every visit owned by the doctor, in appointment order.
pub fn get_doctor_visit_ids(conn: &Connection, doctor_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM visits WHERE doctor_id = ?1 ORDER BY appointment_start, id",
    )?;
    let rows = stmt.query_map(params![doctor_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
