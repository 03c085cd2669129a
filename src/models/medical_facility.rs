use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalFacility {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub zip_code: String,
    pub street: String,
    pub building_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFacilityInfo {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub zip_code: String,
    pub street: String,
    pub building_number: String,
    pub doctor_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalFacility {
    pub name: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub building_number: Option<String>,
}
