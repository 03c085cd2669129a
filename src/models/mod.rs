pub mod doctor;
pub mod enums;
pub mod filters;
pub mod medical_facility;
pub mod patient;
pub mod visit;

pub use doctor::*;
pub use enums::*;
pub use filters::*;
pub use medical_facility::*;
pub use patient::*;
pub use visit::*;
