//! Medical facility endpoints.
//!
//! - `GET /medical_facilities`: list facilities (`?page&size`)
//! - `GET /medical_facilities/:id`: one facility
//! - `POST /medical_facilities`: register a facility
//! - `POST /medical_facilities/:id/assign`: link a doctor (body: doctor id)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PageQuery};
use crate::facilities;
use crate::models::{MedicalFacilityInfo, NewMedicalFacility};

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<MedicalFacilityInfo>>, ApiError> {
    let page = query.to_page_request();
    let list = ctx
        .run_blocking(move |conn| facilities::get_medical_facilities(conn, page.as_ref()))
        .await?;
    Ok(Json(list))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalFacilityInfo>, ApiError> {
    let facility = ctx
        .run_blocking(move |conn| facilities::get_medical_facility(conn, id))
        .await?;
    Ok(Json(facility))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(input): Json<NewMedicalFacility>,
) -> Result<(StatusCode, Json<MedicalFacilityInfo>), ApiError> {
    let facility = ctx
        .run_blocking(move |conn| facilities::create_medical_facility(conn, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

pub async fn assign_doctor(
    State(ctx): State<ApiContext>,
    Path(facility_id): Path<i64>,
    Json(doctor_id): Json<i64>,
) -> Result<(StatusCode, Json<MedicalFacilityInfo>), ApiError> {
    let facility = ctx
        .run_blocking(move |conn| {
            facilities::assign_medical_facility_to_doctor(conn, facility_id, doctor_id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(facility)))
}
