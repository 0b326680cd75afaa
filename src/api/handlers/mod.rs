use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::engine::{
    EngineError, ExportImageRequest, HistogramRequest, Interval, Reducer, Statistic,
    TimeSeriesRequest,
};
use crate::indices;
use crate::models::*;

use super::AppState;

const DEFAULT_HISTOGRAM_BINS: u32 = 20;

// ============================================================
// Error Handling
// ============================================================

/// The single catch boundary: any platform failure while building, styling,
/// or tiling a composite becomes a 500 whose `detail` field carries the
/// platform's own message text. Callers need the real reason (quota, bad
/// geometry, empty composite), so nothing is masked here.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.0.to_string();
        tracing::error!("platform computation failed: {}", detail);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}

/// One-day window `[date, date + 1)` pinning a collection to a single
/// acquisition date.
fn day_window(date: NaiveDate) -> (String, String) {
    let next = date.succ_opt().unwrap_or(date);
    (date.to_string(), next.to_string())
}

// ============================================================
// Health
// ============================================================

/// Liveness only; never contacts the platform.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tiles
// ============================================================

pub async fn ci_composite_tiles(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<TileUrlResponse>, ApiError> {
    let variant = CiVariant::parse(&request.ci_type);
    let collection = indices::ci_collection(&request.start, &request.end, request.aoi, variant);
    let handle = state
        .engine
        .map_tiles(&indices::ci_composite(collection))
        .await?;
    Ok(Json(TileUrlResponse {
        tile_url: handle.url_format,
    }))
}

pub async fn ci_by_date_tiles(
    State(state): State<AppState>,
    Json(request): Json<CiByDateRequest>,
) -> Result<Json<DatedTileResponse>, ApiError> {
    let variant = CiVariant::parse(&request.ci_type);
    let window =
        indices::ci_collection(&request.start, &request.end, request.aoi.clone(), variant);
    let resolved = state
        .engine
        .nearest_image_date(&window, &request.date)
        .await?;

    let (day_start, day_end) = day_window(resolved);
    let day = indices::ci_collection(&day_start, &day_end, request.aoi, variant);
    let handle = state.engine.map_tiles(&indices::ci_single(day)).await?;

    Ok(Json(DatedTileResponse {
        tile_url: handle.url_format,
        resolved_date: resolved,
    }))
}

pub async fn ndvi_tiles(
    State(state): State<AppState>,
    Json(request): Json<NdviRequest>,
) -> Result<Json<TileUrlResponse>, ApiError> {
    let sensor = request.sensor();
    let collection = indices::ndvi_collection(&request.start, &request.end, request.aoi, sensor);
    let handle = state
        .engine
        .map_tiles(&indices::ndvi_composite(collection))
        .await?;
    Ok(Json(TileUrlResponse {
        tile_url: handle.url_format,
    }))
}

// ============================================================
// AOI Statistics
// ============================================================

/// Query parameters shared by the time-series endpoints.
#[derive(Debug, Deserialize)]
pub struct TimeSeriesQuery {
    /// Aggregation period; unrecognized values fall back to "month".
    pub interval: Option<String>,
}

impl TimeSeriesQuery {
    fn interval(&self) -> Interval {
        self.interval.as_deref().map_or(Interval::Month, Interval::parse)
    }
}

pub async fn ci_time_series(
    State(state): State<AppState>,
    Query(query): Query<TimeSeriesQuery>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<PeriodFeatureCollection>, ApiError> {
    let variant = CiVariant::parse(&request.ci_type);
    let series = state
        .engine
        .time_series(&TimeSeriesRequest {
            source: indices::ci_collection(
                &request.start,
                &request.end,
                request.aoi.clone(),
                variant,
            ),
            region: request.aoi,
            band: indices::CI_BAND.to_string(),
            interval: query.interval(),
            statistic: Statistic::Median,
        })
        .await?;

    Ok(Json(PeriodFeatureCollection::new(
        series
            .into_iter()
            .map(|stat| PeriodFeature::median_ci(stat.period, stat.value))
            .collect(),
    )))
}

pub async fn ndvi_time_series(
    State(state): State<AppState>,
    Query(query): Query<TimeSeriesQuery>,
    Json(request): Json<NdviRequest>,
) -> Result<Json<PeriodFeatureCollection>, ApiError> {
    let series = state
        .engine
        .time_series(&TimeSeriesRequest {
            source: indices::ndvi_collection(
                &request.start,
                &request.end,
                request.aoi.clone(),
                request.sensor(),
            ),
            region: request.aoi,
            band: indices::NDVI_BAND.to_string(),
            interval: query.interval(),
            statistic: Statistic::Mean,
        })
        .await?;

    Ok(Json(PeriodFeatureCollection::new(
        series
            .into_iter()
            .map(|stat| PeriodFeature::mean_ndvi(stat.period, stat.value))
            .collect(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct HistogramQuery {
    pub bins: Option<u32>,
}

pub async fn ci_histogram_by_date(
    State(state): State<AppState>,
    Query(query): Query<HistogramQuery>,
    Json(request): Json<CiByDateRequest>,
) -> Result<Json<HistogramResponse>, ApiError> {
    let variant = CiVariant::parse(&request.ci_type);
    let window =
        indices::ci_collection(&request.start, &request.end, request.aoi.clone(), variant);
    let resolved = state
        .engine
        .nearest_image_date(&window, &request.date)
        .await?;

    // Histogram over the raw CI values, not the styled RGB image.
    let (day_start, day_end) = day_window(resolved);
    let image = indices::ci_collection(&day_start, &day_end, request.aoi.clone(), variant)
        .reduce(Reducer::First);
    let histogram = state
        .engine
        .histogram(&HistogramRequest {
            image,
            region: request.aoi,
            band: indices::CI_BAND.to_string(),
            bins: query.bins.unwrap_or(DEFAULT_HISTOGRAM_BINS),
        })
        .await?;

    Ok(Json(HistogramResponse {
        histogram,
        resolved_date: resolved,
    }))
}

// ============================================================
// Exports
// ============================================================

pub async fn export_ci_selected(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportStartedResponse>, ApiError> {
    let variant = CiVariant::parse(&request.ci_type);
    let window =
        indices::ci_collection(&request.start, &request.end, request.aoi.clone(), variant);
    let resolved = state
        .engine
        .nearest_image_date(&window, &request.date)
        .await?;

    let (day_start, day_end) = day_window(resolved);
    let day = indices::ci_collection(&day_start, &day_end, request.aoi.clone(), variant);
    let task = state
        .engine
        .export_image(&ExportImageRequest {
            image: indices::ci_single(day),
            region: request.aoi,
            description: request.description,
            file_prefix: request.file_prefix,
            to_drive: request.to_drive,
        })
        .await?;

    Ok(Json(ExportStartedResponse {
        task_id: task.id,
        resolved_date: resolved,
        state: task.state,
    }))
}
