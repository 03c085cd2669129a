use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use super::page_bounds;
use crate::db::DatabaseError;
use crate::models::*;

const VISIT_COLUMNS: &str = "id, appointment_start, appointment_end, doctor_id, patient_id";

fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        appointment_start: row.get(1)?,
        appointment_end: row.get(2)?,
        doctor_id: row.get(3)?,
        patient_id: row.get(4)?,
    })
}

fn query_visits<P: Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> Result<Vec<Visit>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VISIT_COLUMNS} FROM visits {filter}"
    ))?;
    let rows = stmt.query_map(params, visit_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Insert a free visit for a doctor and return its id.
pub fn insert_visit(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
    doctor_id: i64,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO visits (appointment_start, appointment_end, doctor_id) VALUES (?1, ?2, ?3)",
        params![start, end, doctor_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_visit_patient(conn: &Connection, visit_id: i64, patient_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE visits SET patient_id = ?1 WHERE id = ?2",
        params![patient_id, visit_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Visit".into(),
            id: visit_id.to_string(),
        });
    }
    Ok(())
}

pub fn get_visit_by_id(conn: &Connection, id: i64) -> Result<Option<Visit>, DatabaseError> {
    let visit = conn
        .query_row(
            &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?1"),
            params![id],
            visit_from_row,
        )
        .optional()?;
    Ok(visit)
}

pub fn list_visits(conn: &Connection, page: Option<&PageRequest>) -> Result<Vec<Visit>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    query_visits(
        conn,
        "ORDER BY appointment_start, id LIMIT ?1 OFFSET ?2",
        params![limit, offset],
    )
}

pub fn list_free_visits(
    conn: &Connection,
    page: Option<&PageRequest>,
) -> Result<Vec<Visit>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    query_visits(
        conn,
        "WHERE patient_id IS NULL ORDER BY appointment_start, id LIMIT ?1 OFFSET ?2",
        params![limit, offset],
    )
}

pub fn list_visits_by_doctor(conn: &Connection, doctor_id: i64) -> Result<Vec<Visit>, DatabaseError> {
    query_visits(
        conn,
        "WHERE doctor_id = ?1 ORDER BY appointment_start, id",
        params![doctor_id],
    )
}

pub fn list_free_visits_by_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<Visit>, DatabaseError> {
    query_visits(
        conn,
        "WHERE doctor_id = ?1 AND patient_id IS NULL ORDER BY appointment_start, id",
        params![doctor_id],
    )
}

pub fn list_visits_by_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Visit>, DatabaseError> {
    query_visits(
        conn,
        "WHERE patient_id = ?1 ORDER BY appointment_start, id",
        params![patient_id],
    )
}

/// Visits of `doctor_id` intersecting `[start, end]`, boundaries inclusive.
pub fn find_overlapping_visits(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
    doctor_id: i64,
) -> Result<Vec<Visit>, DatabaseError> {
    query_visits(
        conn,
        "WHERE doctor_id = ?1 AND appointment_start <= ?2 AND appointment_end >= ?3
         ORDER BY appointment_start, id",
        params![doctor_id, end, start],
    )
}
