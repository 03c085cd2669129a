//! Medical facilities and the facility-side view of doctor assignments.

use rusqlite::Connection;

use crate::db;
use crate::doctors::{link_checked, MSG_EMPTY_ARGUMENT};
use crate::error::{non_blank, ClinicError};
use crate::models::{MedicalFacility, MedicalFacilityInfo, NewMedicalFacility, PageRequest};

pub const MSG_FACILITY_NOT_FOUND: &str = "Medical facility not found.";
pub const MSG_FACILITY_NAME_EXISTS: &str = "Medical facility with given name exists.";

fn facility_info(conn: &Connection, facility: MedicalFacility) -> Result<MedicalFacilityInfo, ClinicError> {
    let doctor_ids = db::get_facility_doctor_ids(conn, facility.id)?;
    Ok(MedicalFacilityInfo {
        id: facility.id,
        name: facility.name,
        city: facility.city,
        zip_code: facility.zip_code,
        street: facility.street,
        building_number: facility.building_number,
        doctor_ids,
    })
}

pub fn get_medical_facilities(
    conn: &Connection,
    page: Option<&PageRequest>,
) -> Result<Vec<MedicalFacilityInfo>, ClinicError> {
    db::list_medical_facilities(conn, page)?
        .into_iter()
        .map(|facility| facility_info(conn, facility))
        .collect()
}

pub fn get_medical_facility(conn: &Connection, id: i64) -> Result<MedicalFacilityInfo, ClinicError> {
    let facility = db::get_medical_facility_by_id(conn, id)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_FACILITY_NOT_FOUND))?;
    facility_info(conn, facility)
}

pub fn create_medical_facility(
    conn: &Connection,
    input: &NewMedicalFacility,
) -> Result<MedicalFacilityInfo, ClinicError> {
    let (Some(name), Some(city), Some(zip_code), Some(street), Some(building_number)) = (
        non_blank(input.name.as_deref()),
        non_blank(input.city.as_deref()),
        non_blank(input.zip_code.as_deref()),
        non_blank(input.street.as_deref()),
        non_blank(input.building_number.as_deref()),
    ) else {
        return Err(ClinicError::missing_field(MSG_EMPTY_ARGUMENT));
    };

    let tx = db::begin_write(conn)?;
    if db::get_medical_facility_by_name(&tx, name)?.is_some() {
        return Err(ClinicError::exists(MSG_FACILITY_NAME_EXISTS));
    }

    let mut facility = MedicalFacility {
        id: 0,
        name: name.to_string(),
        city: city.to_string(),
        zip_code: zip_code.to_string(),
        street: street.to_string(),
        building_number: building_number.to_string(),
    };
    facility.id = db::insert_medical_facility(&tx, &facility)?;
    tx.commit()?;

    tracing::info!(facility_id = facility.id, "Medical facility created");
    Ok(MedicalFacilityInfo {
        id: facility.id,
        name: facility.name,
        city: facility.city,
        zip_code: facility.zip_code,
        street: facility.street,
        building_number: facility.building_number,
        doctor_ids: Vec::new(),
    })
}

/// Same checks and link as the doctor-side assignment; returns the facility.
pub fn assign_medical_facility_to_doctor(
    conn: &Connection,
    facility_id: i64,
    doctor_id: i64,
) -> Result<MedicalFacilityInfo, ClinicError> {
    let tx = db::begin_write(conn)?;
    link_checked(&tx, doctor_id, facility_id)?;
    tx.commit()?;
    get_medical_facility(conn, facility_id)
}
