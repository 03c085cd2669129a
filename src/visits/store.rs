//! Visit persistence seam.
//!
//! The validator and the workflow only see `VisitStore`; the SQLite
//! implementation delegates to the repository functions.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{PageRequest, Visit};

pub trait VisitStore {
    fn find_by_id(&self, id: i64) -> Result<Option<Visit>, DatabaseError>;

    fn find_all(&self, page: Option<&PageRequest>) -> Result<Vec<Visit>, DatabaseError>;

    fn find_by_doctor_id(&self, doctor_id: i64) -> Result<Vec<Visit>, DatabaseError>;

    /// Free slots of one doctor.
    fn find_by_doctor_id_and_patient_id_is_null(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<Visit>, DatabaseError>;

    /// Free slots of every doctor.
    fn find_by_patient_id_is_null(&self, page: Option<&PageRequest>) -> Result<Vec<Visit>, DatabaseError>;

    fn find_by_patient_id(&self, patient_id: i64) -> Result<Vec<Visit>, DatabaseError>;

    /// Persist a new free visit and return it as stored.
    fn insert(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        doctor_id: i64,
    ) -> Result<Visit, DatabaseError>;

    /// Attach a patient to an existing visit and return it as stored.
    fn assign_patient(&self, visit_id: i64, patient_id: i64) -> Result<Visit, DatabaseError>;

    /// Visits of `doctor_id` with `start' <= end && end' >= start`.
    fn find_all_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        doctor_id: i64,
    ) -> Result<Vec<Visit>, DatabaseError>;
}

/// SQLite-backed visit store over a borrowed connection or transaction.
pub struct SqliteVisitStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteVisitStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn reload(&self, id: i64) -> Result<Visit, DatabaseError> {
        db::get_visit_by_id(self.conn, id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "Visit".into(),
            id: id.to_string(),
        })
    }
}

impl VisitStore for SqliteVisitStore<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<Visit>, DatabaseError> {
        db::get_visit_by_id(self.conn, id)
    }

    fn find_all(&self, page: Option<&PageRequest>) -> Result<Vec<Visit>, DatabaseError> {
        db::list_visits(self.conn, page)
    }

    fn find_by_doctor_id(&self, doctor_id: i64) -> Result<Vec<Visit>, DatabaseError> {
        db::list_visits_by_doctor(self.conn, doctor_id)
    }

    fn find_by_doctor_id_and_patient_id_is_null(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<Visit>, DatabaseError> {
        db::list_free_visits_by_doctor(self.conn, doctor_id)
    }

    fn find_by_patient_id_is_null(&self, page: Option<&PageRequest>) -> Result<Vec<Visit>, DatabaseError> {
        db::list_free_visits(self.conn, page)
    }

    fn find_by_patient_id(&self, patient_id: i64) -> Result<Vec<Visit>, DatabaseError> {
        db::list_visits_by_patient(self.conn, patient_id)
    }

    fn insert(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        doctor_id: i64,
    ) -> Result<Visit, DatabaseError> {
        let id = db::insert_visit(self.conn, start, end, doctor_id)?;
        self.reload(id)
    }

    fn assign_patient(&self, visit_id: i64, patient_id: i64) -> Result<Visit, DatabaseError> {
        db::set_visit_patient(self.conn, visit_id, patient_id)?;
        self.reload(visit_id)
    }

    fn find_all_overlapping(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        doctor_id: i64,
    ) -> Result<Vec<Visit>, DatabaseError> {
        db::find_overlapping_visits(self.conn, start, end, doctor_id)
    }
}
