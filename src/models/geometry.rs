use serde::{Deserialize, Serialize};

/// A GeoJSON geometry, carried as-is.
///
/// Coordinates stay raw JSON on purpose: ring validity, winding, and closure
/// are the platform's rules to enforce. A malformed polygon travels all the
/// way to the platform and comes back as its error, not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type tag, e.g. "Polygon" or "MultiPolygon".
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

impl Geometry {
    pub fn new(kind: impl Into<String>, coordinates: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
        }
    }
}
