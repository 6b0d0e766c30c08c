//! Admin dashboard endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::dashboard::{self, DashboardStats, TherapistView};
use crate::store::{Query, DOCTORS, PATIENTS, USERS};
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct TherapistsResponse {
    pub success: bool,
    pub therapists: Vec<TherapistView>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

/// All clinicians with their assigned patients
/// GET /api/admin/therapists
pub async fn list_therapists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TherapistsResponse>, ApiError> {
    let doctors_query = Query::new(DOCTORS);
    let patients_query = Query::new(PATIENTS);
    let users_query = Query::new(USERS).select(&["user_id", "email"]);

    let (doctors, patients, users) = tokio::try_join!(
        state.store.fetch(&doctors_query),
        state.store.fetch(&patients_query),
        state.store.fetch(&users_query),
    )
    .map_err(|err| {
        ApiError::fetch("Error fetching therapists", err).with_field("therapists", json!([]))
    })?;

    let today = chrono::Local::now().date_naive();
    let therapists = dashboard::therapist_views(&doctors, &patients, &users, today);

    info!(
        therapists = therapists.len(),
        patients = patients.len(),
        "Assembled therapist list"
    );

    Ok(Json(TherapistsResponse {
        success: true,
        therapists,
    }))
}

/// Summary counts
/// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let doctors_query = Query::new(DOCTORS);
    let patients_query = Query::new(PATIENTS);

    let (doctors, patients) = tokio::try_join!(
        state.store.fetch(&doctors_query),
        state.store.fetch(&patients_query),
    )
    .map_err(|err| ApiError::fetch("Error fetching stats", err))?;

    Ok(Json(StatsResponse {
        success: true,
        stats: dashboard::aggregate(&doctors, &patients),
    }))
}
