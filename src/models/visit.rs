use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An appointment slot owned by a doctor. `patient_id == None` marks a free slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: i64,
    pub appointment_start: NaiveDateTime,
    pub appointment_end: NaiveDateTime,
    pub doctor_id: i64,
    pub patient_id: Option<i64>,
}

impl Visit {
    pub fn duration(&self) -> Duration {
        self.appointment_end - self.appointment_start
    }

    pub fn is_free(&self) -> bool {
        self.patient_id.is_none()
    }
}

/// Candidate visit as submitted by a client; both bounds are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub appointment_start: Option<NaiveDateTime>,
    pub appointment_end: Option<NaiveDateTime>,
}

impl NewVisit {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            appointment_start: Some(start),
            appointment_end: Some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn visit_serializes_camel_case_with_null_patient() {
        let visit = Visit {
            id: 1,
            appointment_start: at("2029-12-01T12:00:00"),
            appointment_end: at("2029-12-01T12:30:00"),
            doctor_id: 2,
            patient_id: None,
        };
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["appointmentStart"], "2029-12-01T12:00:00");
        assert_eq!(json["appointmentEnd"], "2029-12-01T12:30:00");
        assert_eq!(json["doctorId"], 2);
        assert!(json["patientId"].is_null());
        assert_eq!(visit.duration(), Duration::minutes(30));
        assert!(visit.is_free());
    }

    #[test]
    fn new_visit_tolerates_missing_bounds() {
        let visit: NewVisit =
            serde_json::from_str(r#"{"appointmentStart":"2029-01-01T12:00:00"}"#).unwrap();
        assert_eq!(visit.appointment_start, Some(at("2029-01-01T12:00:00")));
        assert!(visit.appointment_end.is_none());
    }
}
