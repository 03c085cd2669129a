//! Visit workflows: slot creation, patient booking and the read-side queries.
//!
//! Writes run inside `db::begin_write`, so the existence checks, the rules
//! and the final insert/update commit together.

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

use super::store::{SqliteVisitStore, VisitStore};
use super::validator::VisitValidator;
use crate::db;
use crate::doctors::MSG_DOCTOR_ID_NOT_FOUND;
use crate::error::ClinicError;
use crate::models::{NewVisit, PageRequest, Visit, VisitStatus};
use crate::patients::MSG_PATIENT_ID_NOT_FOUND;

pub const MSG_VISIT_ID_NOT_FOUND: &str = "Visit with given ID does not exist.";
pub const MSG_VISIT_BOOKED: &str = "Visit is already booked by another patient.";

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

// ─── Writes ─────────────────────────────────────────────────────────────────

/// Create a free visit for `doctor_id`.
pub fn create_visit(conn: &Connection, candidate: &NewVisit, doctor_id: i64) -> Result<Visit, ClinicError> {
    create_visit_at(conn, candidate, doctor_id, local_now())
}

/// `create_visit` evaluated against an explicit current moment.
pub fn create_visit_at(
    conn: &Connection,
    candidate: &NewVisit,
    doctor_id: i64,
    now: NaiveDateTime,
) -> Result<Visit, ClinicError> {
    let tx = db::begin_write(conn)?;

    if db::get_doctor_by_id(&tx, doctor_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_DOCTOR_ID_NOT_FOUND));
    }

    let store = SqliteVisitStore::new(&tx);
    let slot = VisitValidator::new(&store).validate_visit_creation(candidate, doctor_id, now)?;
    let visit = store.insert(slot.start, slot.end, doctor_id)?;
    tx.commit()?;

    tracing::info!(
        visit_id = visit.id,
        doctor_id,
        start = %visit.appointment_start,
        end = %visit.appointment_end,
        "Visit created"
    );
    Ok(visit)
}

/// Book `visit_id` for `patient_id`.
pub fn assign_visit_to_patient(
    conn: &Connection,
    visit_id: i64,
    patient_id: i64,
) -> Result<Visit, ClinicError> {
    assign_visit_to_patient_at(conn, visit_id, patient_id, local_now())
}

/// `assign_visit_to_patient` evaluated against an explicit current moment.
pub fn assign_visit_to_patient_at(
    conn: &Connection,
    visit_id: i64,
    patient_id: i64,
    now: NaiveDateTime,
) -> Result<Visit, ClinicError> {
    let tx = db::begin_write(conn)?;

    if db::get_patient_by_id(&tx, patient_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_PATIENT_ID_NOT_FOUND));
    }

    let store = SqliteVisitStore::new(&tx);
    let visit = store
        .find_by_id(visit_id)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_VISIT_ID_NOT_FOUND))?;

    VisitValidator::new(&store).validate_visit_assignment(&visit, now)?;

    match visit.patient_id {
        Some(holder) if holder == patient_id => {
            tracing::debug!(visit_id, patient_id, "Visit already booked by this patient");
            return Ok(visit);
        }
        Some(holder) => {
            tracing::warn!(visit_id, patient_id, holder, "Rejected booking of a taken visit");
            return Err(ClinicError::VisitExists(MSG_VISIT_BOOKED.into()));
        }
        None => {}
    }

    let booked = store.assign_patient(visit_id, patient_id)?;
    tx.commit()?;

    tracing::info!(visit_id, patient_id, doctor_id = booked.doctor_id, "Visit booked");
    Ok(booked)
}

// ─── Queries ────────────────────────────────────────────────────────────────

/// All visits, or only free ones for `VisitStatus::Available`.
pub fn get_visits(
    conn: &Connection,
    status: VisitStatus,
    page: Option<&PageRequest>,
) -> Result<Vec<Visit>, ClinicError> {
    let store = SqliteVisitStore::new(conn);
    let visits = match status {
        VisitStatus::All => store.find_all(page)?,
        VisitStatus::Available => store.find_by_patient_id_is_null(page)?,
    };
    Ok(visits)
}

pub fn get_visits_by_doctor(
    conn: &Connection,
    doctor_id: i64,
    status: VisitStatus,
) -> Result<Vec<Visit>, ClinicError> {
    let store = SqliteVisitStore::new(conn);
    let visits = match status {
        VisitStatus::All => store.find_by_doctor_id(doctor_id)?,
        VisitStatus::Available => store.find_by_doctor_id_and_patient_id_is_null(doctor_id)?,
    };
    Ok(visits)
}

pub fn get_free_visits_by_doctor(conn: &Connection, doctor_id: i64) -> Result<Vec<Visit>, ClinicError> {
    get_visits_by_doctor(conn, doctor_id, VisitStatus::Available)
}

pub fn get_visits_by_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Visit>, ClinicError> {
    Ok(SqliteVisitStore::new(conn).find_by_patient_id(patient_id)?)
}
