//! JSON handlers for the stored reading series.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hygrolog_app::ports::ReadingRepository;
use hygrolog_domain::error::HygroError;
use hygrolog_domain::query::{HistoryQuery, SortOrder};
use hygrolog_domain::reading::SensorReading;

use crate::error::ApiError;
use crate::state::AppState;

/// Raw query parameters for `GET /history`.
///
/// Both are taken as strings: an unusable `limit` means "no limit" while an
/// unusable `order` is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
    pub order: Option<String>,
}

impl HistoryParams {
    fn into_query(self) -> Result<HistoryQuery, HygroError> {
        let order = self
            .order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();
        let limit = self
            .limit
            .as_deref()
            .and_then(|value| value.trim().parse::<u32>().ok());
        Ok(HistoryQuery::new(limit, order))
    }
}

/// One row of `GET /history`.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub date: String,
    pub time: String,
    pub temp: String,
    pub humid: String,
}

impl From<&SensorReading> for HistoryItem {
    fn from(reading: &SensorReading) -> Self {
        Self {
            date: reading.observed_at.format("%Y-%m-%d").to_string(),
            time: reading.observed_at.format("%H:%M").to_string(),
            temp: format!("{:.2}", reading.temperature),
            humid: reading.humidity.to_string(),
        }
    }
}

/// Body of `GET /latest`.
#[derive(Debug, Serialize)]
pub struct LatestItem {
    pub time: String,
    pub temp: String,
    pub humid: String,
}

impl From<&SensorReading> for LatestItem {
    fn from(reading: &SensorReading) -> Self {
        Self {
            time: reading.observed_at.format("%H:%M").to_string(),
            temp: format!("{:.2}", reading.temperature),
            humid: reading.humidity.to_string(),
        }
    }
}

/// Possible responses from the history endpoint.
pub enum HistoryResponse {
    /// 200 OK with a JSON array of readings.
    Ok(Json<Vec<HistoryItem>>),
}

impl IntoResponse for HistoryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the latest endpoint.
pub enum LatestResponse {
    /// 200 OK with the most recent reading.
    Ok(Json<LatestItem>),
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /history?limit=&order=`
pub async fn history<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<HistoryParams>,
) -> Result<HistoryResponse, ApiError>
where
    R: ReadingRepository + 'static,
{
    let query = params.into_query()?;
    let readings = state.reading_service.history(query).await?;
    Ok(HistoryResponse::Ok(Json(
        readings.iter().map(HistoryItem::from).collect(),
    )))
}

/// `GET /latest`
pub async fn latest<R>(State(state): State<AppState<R>>) -> Result<LatestResponse, ApiError>
where
    R: ReadingRepository + 'static,
{
    let reading = state.reading_service.latest().await?;
    Ok(LatestResponse::Ok(Json(LatestItem::from(&reading))))
}
