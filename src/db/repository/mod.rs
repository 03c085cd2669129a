//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over a borrowed `Connection`, so callers decide whether
//! they run inside a write transaction or not.

mod doctor;
mod medical_facility;
mod patient;
mod visit;

use crate::models::PageRequest;

pub use doctor::*;
pub use medical_facility::*;
pub use patient::*;
pub use visit::*;

/// `LIMIT`/`OFFSET` values for an optional page. SQLite treats a negative
/// limit as "no limit".
pub(crate) fn page_bounds(page: Option<&PageRequest>) -> (i64, i64) {
    page.map_or((-1, 0), |p| (p.limit(), p.offset()))
}
