//! Patient endpoints. Patients are addressed by email.
//!
//! - `GET /patients`: list (`?visitDate=YYYY-MM-DD&page&size`)
//! - `GET /patients/:email`, `GET /patients/id/:id`: one patient
//! - `POST /patients`: register
//! - `PUT /patients/:email`: replace editable fields
//! - `PATCH /patients/:email`: change password
//! - `DELETE /patients/:email`: remove

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{page_request, ApiContext};
use crate::models::{NewPatient, PasswordChange, PatientEdit, PatientInfo};
use crate::patients;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListQuery {
    pub visit_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<PatientInfo>>, ApiError> {
    let page = page_request(query.page, query.size);
    let list = ctx
        .run_blocking(move |conn| match query.visit_date {
            Some(day) => patients::get_patients_with_visits_on(conn, day, page.as_ref()),
            None => patients::get_patients(conn, page.as_ref()),
        })
        .await?;
    Ok(Json(list))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<PatientInfo>, ApiError> {
    let patient = ctx
        .run_blocking(move |conn| patients::get_patient(conn, &email))
        .await?;
    Ok(Json(patient))
}

pub async fn detail_by_id(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientInfo>, ApiError> {
    let patient = ctx
        .run_blocking(move |conn| patients::get_patient_by_id(conn, id))
        .await?;
    Ok(Json(patient))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewPatient>,
) -> Result<(StatusCode, Json<PatientInfo>), ApiError> {
    let patient = ctx
        .run_blocking(move |conn| patients::create_patient(conn, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn edit(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
    Json(edit): Json<PatientEdit>,
) -> Result<Json<PatientInfo>, ApiError> {
    let patient = ctx
        .run_blocking(move |conn| patients::edit_patient(conn, &email, &edit))
        .await?;
    Ok(Json(patient))
}

pub async fn change_password(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
    Json(change): Json<PasswordChange>,
) -> Result<StatusCode, ApiError> {
    ctx.run_blocking(move |conn| {
        patients::edit_patient_password(conn, &email, change.password.as_deref())
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.run_blocking(move |conn| patients::delete_patient(conn, &email))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
