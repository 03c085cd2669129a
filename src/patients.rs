//! Patient accounts: registration, lookup, profile edits and removal.
//!
//! Patients are addressed by email on the public surface; the numeric id is
//! only used by visit booking and the `id/{id}` lookup.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::credentials::hash_password;
use crate::db;
use crate::doctors::MSG_EMPTY_ARGUMENT;
use crate::error::{non_blank, ClinicError};
use crate::models::{NewPatient, PageRequest, Patient, PatientEdit, PatientInfo};

pub const MSG_EMPTY_EDIT_ARGUMENT: &str = "No empty argument to edit is allowed.";
pub const MSG_PATIENT_NOT_FOUND: &str = "Patient not found.";
pub const MSG_PATIENT_ID_NOT_FOUND: &str = "Patient with given ID does not exist.";
pub const MSG_PATIENT_EMAIL_NOT_FOUND: &str = "Patient with given email does not exist.";
pub const MSG_PATIENT_EMAIL_EXISTS: &str = "Patient with given email exists.";
pub const MSG_PATIENT_ID_CARD_EXISTS: &str = "Patient with given ID card number exists.";
pub const MSG_EMAIL_NOT_AVAILABLE: &str = "New email is not available.";
pub const MSG_PASSWORD_EMPTY: &str = "Password is empty.";

// ─── Queries ────────────────────────────────────────────────────────────────

pub fn get_patients(conn: &Connection, page: Option<&PageRequest>) -> Result<Vec<PatientInfo>, ClinicError> {
    Ok(db::list_patients(conn, page)?.into_iter().map(PatientInfo::from).collect())
}

/// Distinct patients with at least one booked visit starting on `day`.
pub fn get_patients_with_visits_on(
    conn: &Connection,
    day: NaiveDate,
    page: Option<&PageRequest>,
) -> Result<Vec<PatientInfo>, ClinicError> {
    Ok(db::list_patients_with_visits_on(conn, day, page)?
        .into_iter()
        .map(PatientInfo::from)
        .collect())
}

pub fn get_patient(conn: &Connection, email: &str) -> Result<PatientInfo, ClinicError> {
    db::get_patient_by_email(conn, email)?
        .map(PatientInfo::from)
        .ok_or_else(|| ClinicError::does_not_exist(MSG_PATIENT_NOT_FOUND))
}

pub fn get_patient_by_id(conn: &Connection, id: i64) -> Result<PatientInfo, ClinicError> {
    db::get_patient_by_id(conn, id)?
        .map(PatientInfo::from)
        .ok_or_else(|| ClinicError::does_not_exist(MSG_PATIENT_ID_NOT_FOUND))
}

// ─── Writes ─────────────────────────────────────────────────────────────────

pub fn create_patient(conn: &Connection, input: &NewPatient) -> Result<PatientInfo, ClinicError> {
    let (Some(email), Some(id_card_no), Some(first_name), Some(last_name), Some(password), Some(birthday)) = (
        non_blank(input.email.as_deref()),
        non_blank(input.id_card_no.as_deref()),
        non_blank(input.first_name.as_deref()),
        non_blank(input.last_name.as_deref()),
        non_blank(input.password.as_deref()).and(input.password.as_deref()),
        input.birthday,
    ) else {
        return Err(ClinicError::missing_field(MSG_EMPTY_ARGUMENT));
    };

    let password_hash = hash_password(password);

    let tx = db::begin_write(conn)?;
    if db::get_patient_by_email(&tx, email)?.is_some() {
        return Err(ClinicError::exists(MSG_PATIENT_EMAIL_EXISTS));
    }
    if db::get_patient_by_id_card_no(&tx, id_card_no)?.is_some() {
        return Err(ClinicError::exists(MSG_PATIENT_ID_CARD_EXISTS));
    }

    let mut patient = Patient {
        id: 0,
        email: email.to_string(),
        id_card_no: id_card_no.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password_hash,
        birthday,
    };
    patient.id = db::insert_patient(&tx, &patient)?;
    tx.commit()?;

    tracing::info!(patient_id = patient.id, "Patient created");
    Ok(PatientInfo::from(patient))
}

pub fn delete_patient(conn: &Connection, email: &str) -> Result<(), ClinicError> {
    let tx = db::begin_write(conn)?;
    let patient = db::get_patient_by_email(&tx, email)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_PATIENT_EMAIL_NOT_FOUND))?;
    db::delete_patient(&tx, patient.id)?;
    tx.commit()?;

    tracing::info!(patient_id = patient.id, "Patient deleted");
    Ok(())
}

/// Replace email, names and birthday of the patient registered under `email`.
pub fn edit_patient(conn: &Connection, email: &str, edit: &PatientEdit) -> Result<PatientInfo, ClinicError> {
    let tx = db::begin_write(conn)?;
    let mut patient = db::get_patient_by_email(&tx, email)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_PATIENT_EMAIL_NOT_FOUND))?;

    let (Some(new_email), Some(first_name), Some(last_name), Some(birthday)) = (
        non_blank(edit.email.as_deref()),
        non_blank(edit.first_name.as_deref()),
        non_blank(edit.last_name.as_deref()),
        edit.birthday,
    ) else {
        return Err(ClinicError::missing_field(MSG_EMPTY_EDIT_ARGUMENT));
    };

    if new_email != patient.email {
        if let Some(holder) = db::get_patient_by_email(&tx, new_email)? {
            if holder.id != patient.id {
                return Err(ClinicError::exists(MSG_EMAIL_NOT_AVAILABLE));
            }
        }
    }

    patient.email = new_email.to_string();
    patient.first_name = first_name.to_string();
    patient.last_name = last_name.to_string();
    patient.birthday = birthday;
    db::update_patient(&tx, &patient)?;
    tx.commit()?;

    tracing::info!(patient_id = patient.id, "Patient edited");
    Ok(PatientInfo::from(patient))
}

pub fn edit_patient_password(conn: &Connection, email: &str, password: Option<&str>) -> Result<(), ClinicError> {
    // Blank input is rejected, but the stored credential is the raw string.
    let Some(password) = non_blank(password).and(password) else {
        return Err(ClinicError::missing_field(MSG_PASSWORD_EMPTY));
    };

    let password_hash = hash_password(password);

    let tx = db::begin_write(conn)?;
    let patient = db::get_patient_by_email(&tx, email)?
        .ok_or_else(|| ClinicError::does_not_exist(MSG_PATIENT_EMAIL_NOT_FOUND))?;
    db::update_patient_password(&tx, patient.id, &password_hash)?;
    tx.commit()?;

    tracing::info!(patient_id = patient.id, "Patient password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::verify_password;
    use crate::db::open_memory_database;
    use crate::models::{Doctor, NewVisit};
    use crate::visits::{assign_visit_to_patient_at, create_visit_at};
    use chrono::NaiveDateTime;

    fn anna() -> NewPatient {
        NewPatient {
            email: Some("anna@mail.com".into()),
            id_card_no: Some("ABC123456".into()),
            first_name: Some("Anna".into()),
            last_name: Some("Nowak".into()),
            password: Some("hunter2".into()),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
    }

    fn edit_of(email: &str) -> PatientEdit {
        PatientEdit {
            email: Some(email.into()),
            first_name: Some("Anna".into()),
            last_name: Some("Kowalska".into()),
            birthday: NaiveDate::from_ymd_opt(1991, 1, 2),
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn create_and_fetch_patient() {
        let conn = open_memory_database().unwrap();
        let created = create_patient(&conn, &anna()).unwrap();
        assert_eq!(get_patient(&conn, "anna@mail.com").unwrap(), created);
        assert_eq!(get_patient_by_id(&conn, created.id).unwrap(), created);
        assert_eq!(get_patients(&conn, None).unwrap(), vec![created]);
    }

    #[test]
    fn create_rejects_duplicates_and_blanks() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, &anna()).unwrap();

        let err = create_patient(&conn, &NewPatient { id_card_no: Some("OTHER".into()), ..anna() }).unwrap_err();
        assert!(matches!(err, ClinicError::EntityExists(_)));
        assert_eq!(err.to_string(), MSG_PATIENT_EMAIL_EXISTS);

        let err = create_patient(&conn, &NewPatient { email: Some("b@mail.com".into()), ..anna() }).unwrap_err();
        assert_eq!(err.to_string(), MSG_PATIENT_ID_CARD_EXISTS);

        let err = create_patient(&conn, &NewPatient { birthday: None, ..anna() }).unwrap_err();
        assert!(matches!(err, ClinicError::MissingField(_)));
        assert_eq!(err.to_string(), MSG_EMPTY_ARGUMENT);

        let err = create_patient(&conn, &NewPatient { password: Some("  ".into()), ..anna() }).unwrap_err();
        assert_eq!(err.to_string(), MSG_EMPTY_ARGUMENT);
    }

    #[test]
    fn lookups_report_their_own_messages() {
        let conn = open_memory_database().unwrap();
        assert_eq!(get_patient(&conn, "x@mail.com").unwrap_err().to_string(), MSG_PATIENT_NOT_FOUND);
        assert_eq!(get_patient_by_id(&conn, 3).unwrap_err().to_string(), MSG_PATIENT_ID_NOT_FOUND);
        assert_eq!(
            delete_patient(&conn, "x@mail.com").unwrap_err().to_string(),
            MSG_PATIENT_EMAIL_NOT_FOUND
        );
    }

    #[test]
    fn delete_removes_patient() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, &anna()).unwrap();
        delete_patient(&conn, "anna@mail.com").unwrap();
        assert!(get_patients(&conn, None).unwrap().is_empty());
    }

    #[test]
    fn edit_replaces_fields() {
        let conn = open_memory_database().unwrap();
        let created = create_patient(&conn, &anna()).unwrap();

        let edited = edit_patient(&conn, "anna@mail.com", &edit_of("anna.k@mail.com")).unwrap();
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.email, "anna.k@mail.com");
        assert_eq!(edited.last_name, "Kowalska");
        assert_eq!(get_patient(&conn, "anna.k@mail.com").unwrap(), edited);
        assert!(get_patient(&conn, "anna@mail.com").is_err());

        let stored = db::get_patient_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(stored.id_card_no, "ABC123456");
    }

    #[test]
    fn edit_checks_lookup_then_fields_then_email() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, &anna()).unwrap();
        create_patient(
            &conn,
            &NewPatient {
                email: Some("taken@mail.com".into()),
                id_card_no: Some("XYZ".into()),
                ..anna()
            },
        )
        .unwrap();

        let err = edit_patient(&conn, "nobody@mail.com", &PatientEdit::default()).unwrap_err();
        assert_eq!(err.to_string(), MSG_PATIENT_EMAIL_NOT_FOUND);

        let err = edit_patient(&conn, "anna@mail.com", &PatientEdit::default()).unwrap_err();
        assert!(matches!(err, ClinicError::MissingField(_)));
        assert_eq!(err.to_string(), MSG_EMPTY_EDIT_ARGUMENT);

        let err = edit_patient(&conn, "anna@mail.com", &edit_of("taken@mail.com")).unwrap_err();
        assert!(matches!(err, ClinicError::EntityExists(_)));
        assert_eq!(err.to_string(), MSG_EMAIL_NOT_AVAILABLE);
    }

    #[test]
    fn edit_keeping_email_with_different_case_is_allowed() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, &anna()).unwrap();
        let edited = edit_patient(&conn, "anna@mail.com", &edit_of("Anna@Mail.com")).unwrap();
        assert_eq!(edited.email, "Anna@Mail.com");
    }

    #[test]
    fn edit_to_email_held_by_another_case_variant_is_rejected() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, &anna()).unwrap();
        create_patient(
            &conn,
            &NewPatient {
                email: Some("ANNA@mail.com".into()),
                id_card_no: Some("XYZ".into()),
                ..anna()
            },
        )
        .unwrap();

        let err = edit_patient(&conn, "anna@mail.com", &edit_of("ANNA@mail.com")).unwrap_err();
        assert!(matches!(err, ClinicError::EntityExists(_)));
        assert_eq!(err.to_string(), MSG_EMAIL_NOT_AVAILABLE);
        assert_eq!(get_patient(&conn, "anna@mail.com").unwrap().last_name, "Nowak");
    }

    #[test]
    fn password_change() {
        let conn = open_memory_database().unwrap();
        let created = create_patient(&conn, &anna()).unwrap();

        let err = edit_patient_password(&conn, "nobody@mail.com", None).unwrap_err();
        assert_eq!(err.to_string(), MSG_PASSWORD_EMPTY);

        let err = edit_patient_password(&conn, "nobody@mail.com", Some("new")).unwrap_err();
        assert_eq!(err.to_string(), MSG_PATIENT_EMAIL_NOT_FOUND);

        edit_patient_password(&conn, "anna@mail.com", Some("correct horse")).unwrap();
        let stored = db::get_patient_by_id(&conn, created.id).unwrap().unwrap();
        assert!(verify_password("correct horse", &stored.password_hash));
        assert!(!verify_password("hunter2", &stored.password_hash));

        edit_patient_password(&conn, "anna@mail.com", Some(" padded ")).unwrap();
        let stored = db::get_patient_by_id(&conn, created.id).unwrap().unwrap();
        assert!(verify_password(" padded ", &stored.password_hash));
        assert!(!verify_password("padded", &stored.password_hash));
    }

    #[test]
    fn patients_with_visits_on_a_day() {
        let conn = open_memory_database().unwrap();
        let doctor_id = db::insert_doctor(
            &conn,
            &Doctor {
                id: 0,
                email: "d@clinic.com".into(),
                first_name: "Jan".into(),
                last_name: "Kowalski".into(),
                password_hash: "x".into(),
                specialisation: "GP".into(),
            },
        )
        .unwrap();
        let anna = create_patient(&conn, &anna()).unwrap();
        let now = at("2029-01-01T08:00:00");

        for start in ["2029-12-01T09:00:00", "2029-12-01T10:00:00"] {
            let start = at(start);
            let visit = create_visit_at(
                &conn,
                &NewVisit::new(start, start + chrono::Duration::minutes(30)),
                doctor_id,
                now,
            )
            .unwrap();
            assign_visit_to_patient_at(&conn, visit.id, anna.id, now).unwrap();
        }

        let day = NaiveDate::from_ymd_opt(2029, 12, 1).unwrap();
        assert_eq!(get_patients_with_visits_on(&conn, day, None).unwrap(), vec![anna]);

        let other = NaiveDate::from_ymd_opt(2029, 12, 2).unwrap();
        assert!(get_patients_with_visits_on(&conn, other, None).unwrap().is_empty());
    }
}
