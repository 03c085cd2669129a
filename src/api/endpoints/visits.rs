//! Visit endpoints.
//!
//! - `GET /visits`: all or free visits (`?status=ALL|AVAILABLE&page&size`)
//! - `GET /visits/doctor/:doctor_id`: one doctor's visits (`?status`)
//! - `GET /visits/patient/:patient_id`: one patient's bookings
//! - `POST /visits/doctor/:doctor_id`: open a visit slot
//! - `PATCH /visits/patient/:patient_id`: book a visit (body: visit id)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{page_request, ApiContext};
use crate::models::{NewVisit, Visit, VisitStatus};
use crate::visits;

#[derive(Debug, Default, Deserialize)]
pub struct VisitListQuery {
    #[serde(default)]
    pub status: VisitStatus,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: VisitStatus,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<VisitListQuery>,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let page = page_request(query.page, query.size);
    let status = query.status;
    let list = ctx
        .run_blocking(move |conn| visits::get_visits(conn, status, page.as_ref()))
        .await?;
    Ok(Json(list))
}

pub async fn by_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let status = query.status;
    let list = ctx
        .run_blocking(move |conn| visits::get_visits_by_doctor(conn, doctor_id, status))
        .await?;
    Ok(Json(list))
}

pub async fn by_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let list = ctx
        .run_blocking(move |conn| visits::get_visits_by_patient(conn, patient_id))
        .await?;
    Ok(Json(list))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
    Json(candidate): Json<NewVisit>,
) -> Result<(StatusCode, Json<Visit>), ApiError> {
    let visit = ctx
        .run_blocking(move |conn| visits::create_visit(conn, &candidate, doctor_id))
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

pub async fn book(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
    Json(visit_id): Json<i64>,
) -> Result<Json<Visit>, ApiError> {
    let visit = ctx
        .run_blocking(move |conn| visits::assign_visit_to_patient(conn, visit_id, patient_id))
        .await?;
    Ok(Json(visit))
}
