//! Clinic REST API.
//!
//! Exposes the doctor, patient, medical facility and visit services as
//! JSON endpoints. `clinic_api_router()` returns a `Router` that can be
//! mounted on any axum server; `start_server_on()` runs it standalone.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::clinic_api_router;
pub use server::{start_server_on, ClinicApiServer, ServerSession};
pub use types::ApiContext;
