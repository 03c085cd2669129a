use serde::{Deserialize, Serialize};

/// Stored doctor row. The password is only ever held as a salted hash.
#[derive(Debug, Clone)]
pub struct Doctor {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub specialisation: String,
}

/// Doctor as returned to clients, with its relations flattened to ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub specialisation: String,
    pub medical_facility_ids: Vec<i64>,
    pub visit_ids: Vec<i64>,
}

/// Doctor creation input. Every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub specialisation: Option<String>,
}
