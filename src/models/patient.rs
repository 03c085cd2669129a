use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Patient {
    pub id: i64,
    pub email: String,
    pub id_card_no: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

impl From<Patient> for PatientInfo {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            email: patient.email,
            first_name: patient.first_name,
            last_name: patient.last_name,
            birthday: patient.birthday,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub email: Option<String>,
    pub id_card_no: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Full replacement of the editable patient fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEdit {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub password: Option<String>,
}
