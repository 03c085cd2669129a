//! Doctor accounts and their medical facility assignments.

use rusqlite::Connection;

use crate::credentials::hash_password;
use crate::db;
use crate::error::{non_blank, ClinicError};
use crate::models::{Doctor, DoctorInfo, NewDoctor, PageRequest};

pub const MSG_EMPTY_ARGUMENT: &str = "No empty argument is allowed.";
pub const MSG_DOCTOR_NOT_FOUND: &str = "Doctor not found.";
pub const MSG_DOCTOR_EMAIL_EXISTS: &str = "Doctor with given email exists.";
pub const MSG_DOCTOR_ID_NOT_FOUND: &str = "Doctor with given ID does not exist.";
pub const MSG_FACILITY_ID_NOT_FOUND: &str = "Medical facility with given ID does not exist.";
pub const MSG_ALREADY_ASSIGNED: &str = "Doctor is already assigned to this facility.";
pub const MSG_NOT_ASSIGNED: &str = "Doctor is not assigned to this facility.";

/// Attach facility and visit ids to a stored doctor.
pub(crate) fn doctor_info(conn: &Connection, doctor: Doctor) -> Result<DoctorInfo, ClinicError> {
    let medical_facility_ids = db::get_doctor_facility_ids(conn, doctor.id)?;
    let visit_ids = db::get_doctor_visit_ids(conn, doctor.id)?;
    Ok(DoctorInfo {
        id: doctor.id,
        email: doctor.email,
        first_name: doctor.first_name,
        last_name: doctor.last_name,
        specialisation: doctor.specialisation,
        medical_facility_ids,
        visit_ids,
    })
}

pub fn get_doctors(conn: &Connection, page: Option<&PageRequest>) -> Result<Vec<DoctorInfo>, ClinicError> {
    db::list_doctors(conn, page)?
        .into_iter()
        .map(|doctor| doctor_info(conn, doctor))
        .collect()
}

pub fn get_doctor(conn: &Connection, email: &str) -> Result<DoctorInfo, ClinicError> {
    let doctor = db::get_doctor_by_email(conn, email)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_DOCTOR_NOT_FOUND))?;
    doctor_info(conn, doctor)
}

pub fn create_doctor(conn: &Connection, input: &NewDoctor) -> Result<DoctorInfo, ClinicError> {
    let (Some(email), Some(first_name), Some(last_name), Some(password), Some(specialisation)) = (
        non_blank(input.email.as_deref()),
        non_blank(input.first_name.as_deref()),
        non_blank(input.last_name.as_deref()),
        // Blank check only; the raw password is what gets hashed.
        non_blank(input.password.as_deref()).and(input.password.as_deref()),
        non_blank(input.specialisation.as_deref()),
    ) else {
        return Err(ClinicError::missing_field(MSG_EMPTY_ARGUMENT));
    };

    // Hash before taking the write lock.
    let password_hash = hash_password(password);

    let tx = db::begin_write(conn)?;
    if db::get_doctor_by_email(&tx, email)?.is_some() {
        return Err(ClinicError::exists(MSG_DOCTOR_EMAIL_EXISTS));
    }

    let mut doctor = Doctor {
        id: 0,
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password_hash,
        specialisation: specialisation.to_string(),
    };
    doctor.id = db::insert_doctor(&tx, &doctor)?;
    tx.commit()?;

    tracing::info!(doctor_id = doctor.id, "Doctor created");
    Ok(DoctorInfo {
        id: doctor.id,
        email: doctor.email,
        first_name: doctor.first_name,
        last_name: doctor.last_name,
        specialisation: doctor.specialisation,
        medical_facility_ids: Vec::new(),
        visit_ids: Vec::new(),
    })
}

/// Link doctor and facility after both exist. Shared with the facility-side
/// assignment, which reports the facility instead.
pub(crate) fn link_checked(conn: &Connection, doctor_id: i64, facility_id: i64) -> Result<(), ClinicError> {
    if db::get_doctor_by_id(conn, doctor_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_DOCTOR_ID_NOT_FOUND));
    }
    if db::get_medical_facility_by_id(conn, facility_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_FACILITY_ID_NOT_FOUND));
    }
    if db::is_doctor_assigned_to_facility(conn, doctor_id, facility_id)? {
        return Err(ClinicError::exists(MSG_ALREADY_ASSIGNED));
    }
    db::link_doctor_to_facility(conn, doctor_id, facility_id)?;
    tracing::info!(doctor_id, facility_id, "Doctor assigned to medical facility");
    Ok(())
}

pub fn assign_doctor_to_medical_facility(
    conn: &Connection,
    doctor_id: i64,
    facility_id: i64,
) -> Result<DoctorInfo, ClinicError> {
    let tx = db::begin_write(conn)?;
    link_checked(&tx, doctor_id, facility_id)?;
    tx.commit()?;
    reload(conn, doctor_id)
}

pub fn unassign_doctor_from_medical_facility(
    conn: &Connection,
    doctor_id: i64,
    facility_id: i64,
) -> Result<DoctorInfo, ClinicError> {
    let tx = db::begin_write(conn)?;
    if db::get_doctor_by_id(&tx, doctor_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_DOCTOR_ID_NOT_FOUND));
    }
    if db::get_medical_facility_by_id(&tx, facility_id)?.is_none() {
        return Err(ClinicError::does_not_exist(MSG_FACILITY_ID_NOT_FOUND));
    }
    if !db::unlink_doctor_from_facility(&tx, doctor_id, facility_id)? {
        return Err(ClinicError::does_not_exist(MSG_NOT_ASSIGNED));
    }
    tx.commit()?;

    tracing::info!(doctor_id, facility_id, "Doctor unassigned from medical facility");
    reload(conn, doctor_id)
}

fn reload(conn: &Connection, doctor_id: i64) -> Result<DoctorInfo, ClinicError> {
    let doctor = db::get_doctor_by_id(conn, doctor_id)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_DOCTOR_ID_NOT_FOUND))?;
    doctor_info(conn, doctor)
}
