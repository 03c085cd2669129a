//! Clinic API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layers (outermost → innermost): CORS → audit logger → handler.

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the clinic API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7), and
/// sibling params at the same depth must share a name, hence `/doctors/:id`
/// for both the email lookup and the id-based actions.
pub fn clinic_api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::doctors::create),
        )
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route("/doctors/:id/assign", post(endpoints::doctors::assign_facility))
        .route(
            "/doctors/:id/assign/:facility_id",
            delete(endpoints::doctors::unassign_facility),
        )
        .route("/doctors/:id/visit", post(endpoints::doctors::create_visit))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route("/patients/id/:id", get(endpoints::patients::detail_by_id))
        .route(
            "/patients/:email",
            get(endpoints::patients::detail)
                .put(endpoints::patients::edit)
                .patch(endpoints::patients::change_password)
                .delete(endpoints::patients::delete),
        )
        .route(
            "/medical_facilities",
            get(endpoints::facilities::list).post(endpoints::facilities::create),
        )
        .route("/medical_facilities/:id", get(endpoints::facilities::detail))
        .route(
            "/medical_facilities/:id/assign",
            post(endpoints::facilities::assign_doctor),
        )
        .route("/visits", get(endpoints::visits::list))
        .route(
            "/visits/doctor/:doctor_id",
            get(endpoints::visits::by_doctor).post(endpoints::visits::create),
        )
        .route(
            "/visits/patient/:patient_id",
            get(endpoints::visits::by_patient).patch(endpoints::visits::book),
        )
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Local, Timelike};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Router over a fresh file database; the dir guard keeps it alive.
    fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let core = Arc::new(CoreState::new(dir.path().join("clinic.db")));
        (clinic_api_router(core), dir)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    fn doctor_body(email: &str) -> Value {
        json!({
            "email": email,
            "firstName": "Jan",
            "lastName": "Kowalski",
            "password": "secret",
            "specialisation": "Cardiology"
        })
    }

    fn patient_body(email: &str, id_card_no: &str) -> Value {
        json!({
            "email": email,
            "idCardNo": id_card_no,
            "firstName": "Anna",
            "lastName": "Nowak",
            "password": "hunter2",
            "birthday": "1990-05-17"
        })
    }

    /// A quarter-hour-aligned slot on a day comfortably in the future.
    fn future_slot(hour: u32, minutes: i64) -> Value {
        let day = Local::now().naive_local().date() + Duration::days(30);
        let start = day.and_hms_opt(hour, 0, 0).unwrap();
        assert_eq!(start.minute(), 0);
        let end = start + Duration::minutes(minutes);
        json!({
            "appointmentStart": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "appointmentEnd": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        })
    }

    #[tokio::test]
    async fn health_check_reports_version() {
        let (app, _dir) = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn held_write_lock_does_not_stall_other_requests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        let app = clinic_api_router(Arc::new(CoreState::new(&path)));

        let holder = crate::db::open_database(&path).unwrap();
        let tx = crate::db::begin_write(&holder).unwrap();
        let started = std::time::Instant::now();

        let writer = {
            let app = app.clone();
            tokio::spawn(async move {
                send(&app, "POST", "/doctors", Some(doctor_body("waiting@gmail.com"))).await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        // The pending insert waits on the lock off the runtime thread.
        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(started.elapsed() < std::time::Duration::from_secs(4));

        drop(tx);
        let (status, created) = writer.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "waiting@gmail.com");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (app, _dir) = test_app();
        let (status, _) = send(&app, "GET", "/nonexistent", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn doctor_lifecycle() {
        let (app, _dir) = test_app();

        let (status, created) = send(&app, "POST", "/doctors", Some(doctor_body("jankow@gmail.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "jankow@gmail.com");
        assert!(created.get("password").is_none());
        assert!(created.get("passwordHash").is_none());

        let (status, body) = send(&app, "POST", "/doctors", Some(doctor_body("jankow@gmail.com"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "ENTITY_EXISTS");
        assert_eq!(body["error"]["message"], "Doctor with given email exists.");

        let (status, fetched) = send(&app, "GET", "/doctors/jankow@gmail.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, list) = send(&app, "GET", "/doctors?page=0&size=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/doctors/nobody@gmail.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Doctor not found.");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let (app, _dir) = test_app();
        let mut body = doctor_body("x@gmail.com");
        body["lastName"] = json!("");
        let (status, err) = send(&app, "POST", "/doctors", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"]["code"], "MISSING_FIELD");
        assert_eq!(err["error"]["message"], "No empty argument is allowed.");
    }

    #[tokio::test]
    async fn facility_assignment_both_ways() {
        let (app, _dir) = test_app();
        let (_, doctor) = send(&app, "POST", "/doctors", Some(doctor_body("jankow@gmail.com"))).await;
        let (status, facility) = send(
            &app,
            "POST",
            "/medical_facilities",
            Some(json!({
                "name": "Central",
                "city": "Wroclaw",
                "zipCode": "50-001",
                "street": "Legnicka",
                "buildingNumber": "12"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let doctor_id = doctor["id"].as_i64().unwrap();
        let facility_id = facility["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            "POST",
            &format!("/doctors/{doctor_id}/assign"),
            Some(json!(facility_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(updated["medicalFacilityIds"], json!([facility_id]));

        let (status, body) = send(
            &app,
            "POST",
            &format!("/medical_facilities/{facility_id}/assign"),
            Some(json!(doctor_id)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Doctor is already assigned to this facility.");

        let (_, fetched) = send(&app, "GET", &format!("/medical_facilities/{facility_id}"), None).await;
        assert_eq!(fetched["doctorIds"], json!([doctor_id]));

        let (status, updated) = send(
            &app,
            "DELETE",
            &format!("/doctors/{doctor_id}/assign/{facility_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["medicalFacilityIds"], json!([]));
    }

    #[tokio::test]
    async fn patient_lifecycle() {
        let (app, _dir) = test_app();
        let (status, created) = send(&app, "POST", "/patients", Some(patient_body("anna@mail.com", "ABC1"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["birthday"], "1990-05-17");
        let id = created["id"].as_i64().unwrap();

        let (status, by_id) = send(&app, "GET", &format!("/patients/id/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_id, created);

        let (status, edited) = send(
            &app,
            "PUT",
            "/patients/anna@mail.com",
            Some(json!({
                "email": "anna.k@mail.com",
                "firstName": "Anna",
                "lastName": "Kowalska",
                "birthday": "1990-05-17"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["email"], "anna.k@mail.com");

        let (status, body) = send(&app, "PATCH", "/patients/anna.k@mail.com", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Password is empty.");

        let (status, _) = send(
            &app,
            "PATCH",
            "/patients/anna.k@mail.com",
            Some(json!({ "password": "new-secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", "/patients/anna.k@mail.com", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "DELETE", "/patients/anna.k@mail.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Patient with given email does not exist.");
    }

    #[tokio::test]
    async fn visit_booking_flow() {
        let (app, _dir) = test_app();
        let (_, doctor) = send(&app, "POST", "/doctors", Some(doctor_body("jankow@gmail.com"))).await;
        let (_, patient) = send(&app, "POST", "/patients", Some(patient_body("anna@mail.com", "ABC1"))).await;
        let doctor_id = doctor["id"].as_i64().unwrap();
        let patient_id = patient["id"].as_i64().unwrap();

        let (status, visit) = send(
            &app,
            "POST",
            &format!("/visits/doctor/{doctor_id}"),
            Some(future_slot(12, 30)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(visit["doctorId"], doctor_id);
        assert!(visit["patientId"].is_null());
        let visit_id = visit["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/doctors/{doctor_id}/visit"),
            Some(future_slot(12, 15)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VISIT_EXISTS");

        let (status, body) = send(
            &app,
            "POST",
            &format!("/visits/doctor/{doctor_id}"),
            Some(future_slot(14, 75)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_DATE_TIME");

        let (_, free) = send(&app, "GET", &format!("/visits/doctor/{doctor_id}?status=AVAILABLE"), None).await;
        assert_eq!(free.as_array().unwrap().len(), 1);

        let (status, booked) = send(
            &app,
            "PATCH",
            &format!("/visits/patient/{patient_id}"),
            Some(json!(visit_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(booked["patientId"], patient_id);

        let (_, free) = send(&app, "GET", "/visits?status=AVAILABLE", None).await;
        assert_eq!(free, json!([]));
        let (_, all) = send(&app, "GET", "/visits", None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
        let (_, mine) = send(&app, "GET", &format!("/visits/patient/{patient_id}"), None).await;
        assert_eq!(mine[0]["id"], visit_id);

        let day = visit["appointmentStart"].as_str().unwrap()[..10].to_string();
        let (_, on_day) = send(&app, "GET", &format!("/patients?visitDate={day}"), None).await;
        assert_eq!(on_day[0]["id"], patient_id);
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_by_extractor() {
        let (app, _dir) = test_app();
        let (status, _) = send(&app, "GET", "/visits?status=BOOKED", None).await;
        assert!(status.is_client_error());
    }
}
