use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The sole field of a successful tile response. The casing matches what
/// map-tile client libraries consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileUrlResponse {
    #[serde(rename = "tileUrl")]
    pub tile_url: String,
}

/// Tile response for by-date requests: the template plus the acquisition
/// date the platform actually resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatedTileResponse {
    #[serde(rename = "tileUrl")]
    pub tile_url: String,
    #[serde(rename = "resolvedDate")]
    pub resolved_date: NaiveDate,
}

/// GeoJSON-style container for time-series results. Geometry is always
/// null; the statistics are AOI-wide, the shape carries only properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<PeriodFeature>,
}

impl PeriodFeatureCollection {
    pub fn new(features: Vec<PeriodFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Option<serde_json::Value>,
    pub properties: PeriodProperties,
}

impl PeriodFeature {
    pub fn median_ci(period: String, value: f64) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: None,
            properties: PeriodProperties {
                period,
                median_ci: Some(value),
                mean_ndvi: None,
            },
        }
    }

    pub fn mean_ndvi(period: String, value: f64) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: None,
            properties: PeriodProperties {
                period,
                median_ci: None,
                mean_ndvi: Some(value),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodProperties {
    /// Period label, e.g. "2023-01" for monthly aggregation.
    pub period: String,
    #[serde(rename = "medianCI", skip_serializing_if = "Option::is_none")]
    pub median_ci: Option<f64>,
    #[serde(rename = "meanNDVI", skip_serializing_if = "Option::is_none")]
    pub mean_ndvi: Option<f64>,
}

/// Response of `POST /stats/ci_histogram_by_date`: bucket index to pixel
/// count, plus the resolved acquisition date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramResponse {
    pub histogram: BTreeMap<u32, u64>,
    #[serde(rename = "resolvedDate")]
    pub resolved_date: NaiveDate,
}

/// Response of `POST /export/ci_selected`: the platform-issued task handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStartedResponse {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "resolvedDate")]
    pub resolved_date: NaiveDate,
    pub state: String,
}
