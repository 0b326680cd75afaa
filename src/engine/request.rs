//! Declarative request descriptors submitted to the platform.
//!
//! The platform's native client libraries expose lazily evaluated,
//! method-chained expression trees. Here each chain is a plain serializable
//! value the platform evaluates remotely; nothing is computed locally. The
//! builder methods mirror the chain order (filter, mask, derive, reduce,
//! style, reproject) so call sites read like the computation they describe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Geometry;

/// A filtered, per-image-annotated view of an image catalog. Stands in for
/// the platform's lazily held image sequence; pixel data never leaves the
/// platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    /// Catalog id, e.g. "COPERNICUS/S2_SR".
    pub collection: String,
    pub filters: Vec<Filter>,
    pub image_ops: Vec<ImageOp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "camelCase")]
pub enum Filter {
    /// Keep images intersecting the geometry.
    Bounds { geometry: Geometry },
    /// Keep images acquired in `[start, end)`.
    DateRange { start: String, end: String },
}

/// A transformation applied to every image of the sequence, server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ImageOp {
    /// Keep only pixels whose `band` value equals zero. Used with QA
    /// bitmask bands, where zero means a clear pixel.
    MaskZero { band: String },
    /// Append a named band computed from an arithmetic expression over the
    /// image's bands. `inputs` maps expression variables to band names.
    /// Original bands are preserved.
    DerivedBand {
        name: String,
        expression: String,
        inputs: BTreeMap<String, String>,
    },
}

/// Per-pixel reduction collapsing the sequence to a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reducer {
    Median,
    Mean,
    /// The first image of the (already narrowed) sequence. Used after the
    /// date window has been pinned to a single acquisition date.
    First,
}

/// Linear stretch through a color ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Spatial reference, e.g. "EPSG:3857".
    pub crs: String,
    /// Nominal resolution in meters.
    pub scale: f64,
}

/// A single-image computation: a reduced collection, optionally styled and
/// reprojected, ready for tile issuance, statistics, or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub source: CollectionQuery,
    pub reducer: Reducer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl CollectionQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            image_ops: Vec::new(),
        }
    }

    pub fn filter_bounds(mut self, geometry: Geometry) -> Self {
        self.filters.push(Filter::Bounds { geometry });
        self
    }

    pub fn filter_date(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.filters.push(Filter::DateRange {
            start: start.into(),
            end: end.into(),
        });
        self
    }

    pub fn mask_zero(mut self, band: impl Into<String>) -> Self {
        self.image_ops.push(ImageOp::MaskZero { band: band.into() });
        self
    }

    pub fn derived_band(
        mut self,
        name: impl Into<String>,
        expression: impl Into<String>,
        inputs: BTreeMap<String, String>,
    ) -> Self {
        self.image_ops.push(ImageOp::DerivedBand {
            name: name.into(),
            expression: expression.into(),
            inputs,
        });
        self
    }

    pub fn reduce(self, reducer: Reducer) -> ImageRequest {
        ImageRequest {
            source: self,
            reducer,
            visualization: None,
            projection: None,
        }
    }
}

impl ImageRequest {
    pub fn visualize(mut self, visualization: VisParams) -> Self {
        self.visualization = Some(visualization);
        self
    }

    pub fn reproject(mut self, crs: impl Into<String>, scale: f64) -> Self {
        self.projection = Some(Projection {
            crs: crs.into(),
            scale,
        });
        self
    }
}

/// Aggregation period for time-series requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interval {
    Month,
    Year,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// Unrecognized intervals fall back to monthly, the service-wide policy
    /// for enum-ish inputs.
    pub fn parse(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::Month)
    }
}

/// Statistic applied per period in a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Statistic {
    Median,
    Mean,
}

/// Per-period aggregation of one band over a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRequest {
    pub source: CollectionQuery,
    pub region: Geometry,
    pub band: String,
    pub interval: Interval,
    pub statistic: Statistic,
}

/// Histogram of one band of a computed image over a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramRequest {
    pub image: ImageRequest,
    pub region: Geometry,
    pub band: String,
    pub bins: u32,
}

/// Server-side export of a computed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportImageRequest {
    pub image: ImageRequest,
    pub region: Geometry,
    pub description: String,
    pub file_prefix: String,
    pub to_drive: bool,
}
