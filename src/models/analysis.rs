use serde::{Deserialize, Serialize};

use super::Geometry;

/// Which band pair feeds the chlorophyll-index expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiVariant {
    /// `(nir / green) - 1`, the default.
    Green,
    /// `(nir / re) - 1` using the red-edge band.
    RedEdge,
}

impl CiVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::RedEdge => "rededge",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "green" => Some(Self::Green),
            "rededge" => Some(Self::RedEdge),
            _ => None,
        }
    }

    /// Parse a wire string, falling back to `Green` for anything
    /// unrecognized. The fallback is intentional: requests with an unknown
    /// variant are served with the default formula, never rejected.
    pub fn parse(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::Green)
    }
}

/// Source catalog for NDVI requests. The wire value is the catalog id
/// itself, which is what the dashboard sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Sentinel2,
    Landsat8,
}

impl Sensor {
    pub fn catalog(&self) -> &'static str {
        match self {
            Self::Sentinel2 => "COPERNICUS/S2_SR",
            Self::Landsat8 => "LANDSAT/LC08/C02/T1_L2",
        }
    }

    pub fn from_catalog(s: &str) -> Option<Self> {
        match s {
            "COPERNICUS/S2_SR" => Some(Self::Sentinel2),
            "LANDSAT/LC08/C02/T1_L2" => Some(Self::Landsat8),
            _ => None,
        }
    }

    /// Unrecognized catalog ids fall back to Sentinel-2, the same policy as
    /// [`CiVariant::parse`].
    pub fn parse(s: &str) -> Self {
        Self::from_catalog(s).unwrap_or(Self::Sentinel2)
    }
}

fn default_ci_type() -> String {
    "green".to_string()
}

/// Body of `POST /tiles/ci_composite` and the time-series endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub aoi: Geometry,
    /// Inclusive window start, `YYYY-MM-DD`. Not validated locally.
    pub start: String,
    /// Exclusive window end, `YYYY-MM-DD`. Not validated locally.
    pub end: String,
    #[serde(default = "default_ci_type")]
    pub ci_type: String,
}

/// Body of the by-date endpoints (`/tiles/ci_by_date`,
/// `/stats/ci_histogram_by_date`): an analysis window plus the date whose
/// nearest acquisition should be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiByDateRequest {
    pub aoi: Geometry,
    pub start: String,
    pub end: String,
    #[serde(default = "default_ci_type")]
    pub ci_type: String,
    /// Target date; the platform resolves the nearest acquisition to it.
    pub date: String,
}

/// Body of `POST /tiles/ndvi` and `POST /stats/ndvi_timeseries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdviRequest {
    pub aoi: Geometry,
    pub start: String,
    pub end: String,
    /// Catalog id; omitted or unrecognized means Sentinel-2.
    #[serde(default)]
    pub sensor: Option<String>,
}

impl NdviRequest {
    pub fn sensor(&self) -> Sensor {
        self.sensor.as_deref().map_or(Sensor::Sentinel2, Sensor::parse)
    }
}

fn default_description() -> String {
    "ci_selected_export".to_string()
}

fn default_file_prefix() -> String {
    "ci_selected".to_string()
}

/// Body of `POST /export/ci_selected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub aoi: Geometry,
    pub start: String,
    pub end: String,
    #[serde(default = "default_ci_type")]
    pub ci_type: String,
    pub date: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Forwarded to the platform untouched; destination selection is its
    /// concern.
    #[serde(default)]
    pub to_drive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_ci_variant_falls_back_to_green() {
        assert_eq!(CiVariant::parse("green"), CiVariant::Green);
        assert_eq!(CiVariant::parse("rededge"), CiVariant::RedEdge);
        assert_eq!(CiVariant::parse("unknownvalue"), CiVariant::Green);
        assert_eq!(CiVariant::parse(""), CiVariant::Green);
    }

    #[test]
    fn unknown_sensor_falls_back_to_sentinel2() {
        assert_eq!(Sensor::parse("LANDSAT/LC08/C02/T1_L2"), Sensor::Landsat8);
        assert_eq!(Sensor::parse("MODIS/006/MOD13Q1"), Sensor::Sentinel2);
    }

    #[test]
    fn ci_type_defaults_to_green_when_missing() {
        let request: AnalysisRequest = serde_json::from_value(json!({
            "aoi": {"type": "Polygon", "coordinates": []},
            "start": "2023-01-01",
            "end": "2023-02-01"
        }))
        .unwrap();
        assert_eq!(request.ci_type, "green");
    }

    #[test]
    fn export_request_fills_defaults() {
        let request: ExportRequest = serde_json::from_value(json!({
            "aoi": {"type": "Polygon", "coordinates": []},
            "start": "2023-01-01",
            "end": "2023-02-01",
            "date": "2023-01-15"
        }))
        .unwrap();
        assert_eq!(request.description, "ci_selected_export");
        assert_eq!(request.file_prefix, "ci_selected");
        assert!(!request.to_drive);
    }
}
