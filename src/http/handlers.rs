//! Endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use tracing::debug;

use super::dto::{CalculateQuery, ReportQuery, StatusResponse};
use super::error::AppError;
use super::state::AppState;
use crate::ephemeris::Ephemeris;
use crate::error::{ChartError, ChartResult, EphemerisError};
use crate::report::{self, BirthDetails, ChartReport, LagnaSummary, Location, ENGINE_NAME, ENGINE_VERSION};

pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Run a pipeline closure on the blocking pool under the oracle deadline.
async fn run_blocking<T, F>(state: &AppState, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&dyn Ephemeris) -> ChartResult<T> + Send + 'static,
{
    let ephemeris = Arc::clone(&state.ephemeris);
    let deadline = state.config.oracle_timeout();
    let task = tokio::task::spawn_blocking(move || job(ephemeris.as_ref()));

    match tokio::time::timeout(deadline, task).await {
        Err(_) => Err(ChartError::Oracle(EphemerisError::Timeout(deadline)).into()),
        Ok(Err(join)) => Err(AppError::Internal(format!("calculation task failed: {join}"))),
        Ok(Ok(result)) => result.map_err(AppError::from),
    }
}

/// GET /
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "LagnaGuru engine running".to_string(),
        engine: ENGINE_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        ephemeris: state.ephemeris.name().to_string(),
        ephemeris_version: state.ephemeris.version().map(str::to_string),
    })
}

/// GET /calculate
///
/// Sidereal ascendant only; `hour` is taken as UT.
pub async fn calculate(
    State(state): State<AppState>,
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> HandlerResult<LagnaSummary> {
    let Query(q) = query?;
    let location = Location::new(q.lat, q.lon)?;
    debug!(year = q.year, month = q.month, day = q.day, hour = q.hour, "calculate lagna");

    let lagna = run_blocking(&state, move |eph| {
        report::calculate_lagna(eph, q.year, q.month, q.day, q.hour, location)
    })
    .await?;
    Ok(Json(lagna))
}

/// GET /calculate_report
pub async fn calculate_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult<ChartReport> {
    let Query(q) = query?;
    let birth = BirthDetails::parse(&q.dob, &q.tob, q.lat, q.lon)?;
    let settings = state.settings;
    let calculated_on = Utc::now();

    let report = run_blocking(&state, move |eph| {
        report::calculate_report(eph, &birth, &settings, calculated_on)
    })
    .await?;
    Ok(Json(report))
}
