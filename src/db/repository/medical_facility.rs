use rusqlite::{params, Connection, OptionalExtension, Row};

use super::page_bounds;
use crate::db::DatabaseError;
use crate::models::*;

const FACILITY_COLUMNS: &str = "id, name, city, zip_code, street, building_number";

fn facility_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalFacility> {
    Ok(MedicalFacility {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        zip_code: row.get(3)?,
        street: row.get(4)?,
        building_number: row.get(5)?,
    })
}

pub fn insert_medical_facility(
    conn: &Connection,
    facility: &MedicalFacility,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_facilities (name, city, zip_code, street, building_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            facility.name,
            facility.city,
            facility.zip_code,
            facility.street,
            facility.building_number,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_medical_facility_by_id(
    conn: &Connection,
    id: i64,
) -> Result<Option<MedicalFacility>, DatabaseError> {
    let facility = conn
        .query_row(
            &format!("SELECT {FACILITY_COLUMNS} FROM medical_facilities WHERE id = ?1"),
            params![id],
            facility_from_row,
        )
        .optional()?;
    Ok(facility)
}

pub fn get_medical_facility_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<MedicalFacility>, DatabaseError> {
    let facility = conn
        .query_row(
            &format!("SELECT {FACILITY_COLUMNS} FROM medical_facilities WHERE name = ?1"),
            params![name],
            facility_from_row,
        )
        .optional()?;
    Ok(facility)
}

pub fn list_medical_facilities(
    conn: &Connection,
    page: Option<&PageRequest>,
) -> Result<Vec<MedicalFacility>, DatabaseError> {
    let (limit, offset) = page_bounds(page);
    let mut stmt = conn.prepare(&format!(
        "SELECT {FACILITY_COLUMNS} FROM medical_facilities ORDER BY id LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(params![limit, offset], facility_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_facility_doctor_ids(conn: &Connection, facility_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT doctor_id FROM doctor_medical_facility
         WHERE medical_facility_id = ?1 ORDER BY doctor_id",
    )?;
    let rows = stmt.query_map(params![facility_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

// ─── Doctor ↔ facility join table ─────────────────────────────────────────────

pub fn is_doctor_assigned_to_facility(
    conn: &Connection,
    doctor_id: i64,
    facility_id: i64,
) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctor_medical_facility
                       WHERE doctor_id = ?1 AND medical_facility_id = ?2)",
        params![doctor_id, facility_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn link_doctor_to_facility(
    conn: &Connection,
    doctor_id: i64,
    facility_id: i64,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_medical_facility (doctor_id, medical_facility_id) VALUES (?1, ?2)",
        params![doctor_id, facility_id],
    )?;
    Ok(())
}

/// Remove a link. Returns `false` when there was nothing to remove.
pub fn unlink_doctor_from_facility(
    conn: &Connection,
    doctor_id: i64,
    facility_id: i64,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM doctor_medical_facility WHERE doctor_id = ?1 AND medical_facility_id = ?2",
        params![doctor_id, facility_id],
    )?;
    Ok(changed > 0)
}
