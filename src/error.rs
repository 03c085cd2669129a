//! Domain error taxonomy shared by the clinic services.
//!
//! Every variant carries the human-readable message that is surfaced to the
//! caller unchanged; the variant itself decides the HTTP status.

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ClinicError {
    /// A required input is absent or blank.
    #[error("{0}")]
    MissingField(String),

    /// A unique key (email, name, id card number, assignment) is already taken.
    #[error("{0}")]
    EntityExists(String),

    /// A lookup by id, email or name found nothing.
    #[error("{0}")]
    EntityDoesNotExist(String),

    /// A visit scheduling rule was violated.
    #[error("{0}")]
    InvalidDateTime(String),

    /// The requested slot collides with an existing visit.
    #[error("{0}")]
    VisitExists(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for ClinicError {
    fn from(err: rusqlite::Error) -> Self {
        ClinicError::Database(DatabaseError::Sqlite(err))
    }
}

impl ClinicError {
    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn exists(msg: impl Into<String>) -> Self {
        Self::EntityExists(msg.into())
    }

    pub fn does_not_exist(msg: impl Into<String>) -> Self {
        Self::EntityDoesNotExist(msg.into())
    }

    pub fn invalid_date_time(msg: impl Into<String>) -> Self {
        Self::InvalidDateTime(msg.into())
    }
}

/// Returns the trimmed value, or `None` when it is absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
