//! Client side of the remote geospatial platform.
//!
//! The platform is an opaque collaborator: this module submits declarative
//! request descriptors ([`CollectionQuery`], [`ImageRequest`] and friends)
//! and reads back handles (tile URL templates, export task ids) or
//! aggregated values. [`Engine`] is the seam request handlers depend on, so
//! tests substitute a stub collaborator without touching the network.

mod client;
mod request;

pub use client::*;
pub use request::*;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tile-serving handle for a styled image: a URL template with `{z}/{x}/{y}`
/// placeholders a map client expands per tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileHandle {
    pub url_format: String,
}

/// One point of a remotely computed time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStat {
    /// Period label, e.g. "2023-01".
    pub period: String,
    pub value: f64,
}

/// A started server-side export task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTask {
    pub id: String,
    pub state: String,
}

/// Operations consumed from the remote platform.
///
/// Every method is a single blocking round trip with no timeout, retry, or
/// partial result; failures carry the platform's message text through
/// [`EngineError`].
#[async_trait]
pub trait Engine: Send + Sync {
    /// Issue a tile handle for a styled image.
    async fn map_tiles(&self, image: &ImageRequest) -> Result<TileHandle, EngineError>;

    /// Acquisition date in `source` nearest to `date`.
    async fn nearest_image_date(
        &self,
        source: &CollectionQuery,
        date: &str,
    ) -> Result<NaiveDate, EngineError>;

    /// Per-period aggregate of one band over a region.
    async fn time_series(
        &self,
        request: &TimeSeriesRequest,
    ) -> Result<Vec<PeriodStat>, EngineError>;

    /// Histogram of one band over a region, keyed by bucket index.
    async fn histogram(&self, request: &HistogramRequest)
        -> Result<BTreeMap<u32, u64>, EngineError>;

    /// Start a server-side export of a styled image.
    async fn export_image(&self, request: &ExportImageRequest) -> Result<ExportTask, EngineError>;
}
