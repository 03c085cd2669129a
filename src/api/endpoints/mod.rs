//! API endpoint handlers, one module per resource.
//!
//! Handlers hand each service call to `ApiContext::run_blocking`, which
//! opens a connection per request on the blocking pool.

pub mod doctors;
pub mod facilities;
pub mod health;
pub mod patients;
pub mod visits;
