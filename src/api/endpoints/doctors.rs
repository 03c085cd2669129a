//! Doctor endpoints.
//!
//! - `GET /doctors`: list doctors (`?page&size`)
//! - `GET /doctors/:email`: one doctor
//! - `POST /doctors`: register a doctor
//! - `POST /doctors/:id/assign`: link to a facility (body: facility id)
//! - `DELETE /doctors/:id/assign/:facility_id`: remove that link
//! - `POST /doctors/:id/visit`: open a visit slot

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PageQuery};
use crate::doctors;
use crate::models::{DoctorInfo, NewDoctor, NewVisit, Visit};
use crate::visits;

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<DoctorInfo>>, ApiError> {
    let page = query.to_page_request();
    let doctors = ctx
        .run_blocking(move |conn| doctors::get_doctors(conn, page.as_ref()))
        .await?;
    Ok(Json(doctors))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<DoctorInfo>, ApiError> {
    let doctor = ctx
        .run_blocking(move |conn| doctors::get_doctor(conn, &email))
        .await?;
    Ok(Json(doctor))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewDoctor>,
) -> Result<(StatusCode, Json<DoctorInfo>), ApiError> {
    let doctor = ctx
        .run_blocking(move |conn| doctors::create_doctor(conn, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn assign_facility(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
    Json(facility_id): Json<i64>,
) -> Result<(StatusCode, Json<DoctorInfo>), ApiError> {
    let doctor = ctx
        .run_blocking(move |conn| {
            doctors::assign_doctor_to_medical_facility(conn, doctor_id, facility_id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn unassign_facility(
    State(ctx): State<ApiContext>,
    Path((doctor_id, facility_id)): Path<(i64, i64)>,
) -> Result<Json<DoctorInfo>, ApiError> {
    let doctor = ctx
        .run_blocking(move |conn| {
            doctors::unassign_doctor_from_medical_facility(conn, doctor_id, facility_id)
        })
        .await?;
    Ok(Json(doctor))
}

pub async fn create_visit(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
    Json(candidate): Json<NewVisit>,
) -> Result<(StatusCode, Json<Visit>), ApiError> {
    let visit = ctx
        .run_blocking(move |conn| visits::create_visit(conn, &candidate, doctor_id))
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}
