//! Visit scheduling: slot validation, overlap detection, creation and
//! patient booking, plus the read-only visit queries.
//!
//! Write operations run inside one `IMMEDIATE` transaction each, so the
//! overlap check and the insert that follows it commit as a unit.

pub mod service;
pub mod store;
pub mod validator;

pub use service::*;
pub use store::{SqliteVisitStore, VisitStore};
pub use validator::{
    VisitSlot, VisitValidator, MAX_VISIT_DURATION_IN_HOURS, MIN_VISIT_DURATION_IN_MINUTES,
    SLOT_GRANULARITY_MINUTES,
};
