//! Chlorophyll-index and NDVI request builders.
//!
//! This is the only locally computed part of the service: pure functions
//! translating an analysis request into the descriptors the platform
//! evaluates. Band math, masking, and compositing all run remotely; these
//! builders just pin down which catalog, which mask band, which expression,
//! and which styling the platform should use.

use std::collections::BTreeMap;

use crate::engine::{CollectionQuery, ImageRequest, Reducer, VisParams};
use crate::models::{CiVariant, Geometry, Sensor};

/// Derived band appended to every image by the translator.
pub const CI_BAND: &str = "CI";
pub const NDVI_BAND: &str = "NDVI";

/// Everything is rendered in Web Mercator at the source's 10 m nominal
/// resolution.
pub const WEB_MERCATOR: &str = "EPSG:3857";
pub const NOMINAL_SCALE_M: f64 = 10.0;

/// Fixed chlorophyll-index stretch: [-0.1, 2.5] through a 7-stop
/// cold-to-hot ramp. The dashboard legend hardcodes the same swatches.
pub const CI_MIN: f64 = -0.1;
pub const CI_MAX: f64 = 2.5;
pub const CI_PALETTE: [&str; 7] = [
    "#2c7fb8", "#41b6c4", "#a1dab4", "#ffffcc", "#fdae61", "#f46d43", "#d73027",
];

/// NDVI stretch, red to green.
pub const NDVI_MIN: f64 = -0.2;
pub const NDVI_MAX: f64 = 0.9;
pub const NDVI_PALETTE: [&str; 7] = [
    "#a50026", "#f46d43", "#fee08b", "#d9ef8b", "#a6d96a", "#66bd63", "#1a9850",
];

/// Sentinel-2 QA bitmask band; zero means a clear pixel.
const S2_QA_BAND: &str = "QA60";
const LANDSAT_QA_BAND: &str = "QA_PIXEL";

/// Build the filtered, cloud-masked, CI-annotated Sentinel-2 view for one
/// analysis window.
pub fn ci_collection(start: &str, end: &str, aoi: Geometry, variant: CiVariant) -> CollectionQuery {
    let (expression, inputs) = ci_expression(variant);
    CollectionQuery::new(Sensor::Sentinel2.catalog())
        .filter_bounds(aoi)
        .filter_date(start, end)
        .mask_zero(S2_QA_BAND)
        .derived_band(CI_BAND, expression, inputs)
}

/// Chlorophyll-index band math for a variant.
///
/// `rededge` divides near-infrared by the red-edge band; `green` divides by
/// the green band. Unrecognized wire strings never reach this function;
/// [`CiVariant::parse`] has already collapsed them to `Green`.
fn ci_expression(variant: CiVariant) -> (&'static str, BTreeMap<String, String>) {
    match variant {
        CiVariant::RedEdge => ("(nir / re) - 1", bands(&[("nir", "B8"), ("re", "B5")])),
        CiVariant::Green => ("(nir / green) - 1", bands(&[("nir", "B8"), ("green", "B3")])),
    }
}

/// Median composite of a CI collection, styled and reprojected for tiling.
pub fn ci_composite(collection: CollectionQuery) -> ImageRequest {
    styled(collection.reduce(Reducer::Median), CI_MIN, CI_MAX, &CI_PALETTE)
}

/// Single image from a collection already narrowed to one acquisition date,
/// styled identically to the composite.
pub fn ci_single(collection: CollectionQuery) -> ImageRequest {
    styled(collection.reduce(Reducer::First), CI_MIN, CI_MAX, &CI_PALETTE)
}

/// NDVI view of a catalog. Band and QA names differ per sensor; the formula
/// does not.
pub fn ndvi_collection(start: &str, end: &str, aoi: Geometry, sensor: Sensor) -> CollectionQuery {
    let (nir, red, qa) = match sensor {
        Sensor::Sentinel2 => ("B8", "B4", S2_QA_BAND),
        Sensor::Landsat8 => ("SR_B5", "SR_B4", LANDSAT_QA_BAND),
    };
    CollectionQuery::new(sensor.catalog())
        .filter_bounds(aoi)
        .filter_date(start, end)
        .mask_zero(qa)
        .derived_band(
            NDVI_BAND,
            "(nir - red) / (nir + red)",
            bands(&[("nir", nir), ("red", red)]),
        )
}

/// Median NDVI composite, styled and reprojected for tiling.
pub fn ndvi_composite(collection: CollectionQuery) -> ImageRequest {
    styled(
        collection.reduce(Reducer::Median),
        NDVI_MIN,
        NDVI_MAX,
        &NDVI_PALETTE,
    )
}

fn styled(image: ImageRequest, min: f64, max: f64, palette: &[&str]) -> ImageRequest {
    image
        .visualize(VisParams {
            min,
            max,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        })
        .reproject(WEB_MERCATOR, NOMINAL_SCALE_M)
}

fn bands(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(variable, band)| (variable.to_string(), band.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Filter, ImageOp};
    use serde_json::json;

    fn square() -> Geometry {
        Geometry::new("Polygon", json!([[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]]))
    }

    fn derived_band(query: &CollectionQuery) -> (&str, &str, &BTreeMap<String, String>) {
        match query
            .image_ops
            .iter()
            .find(|op| matches!(op, ImageOp::DerivedBand { .. }))
            .expect("collection has no derived band")
        {
            ImageOp::DerivedBand {
                name,
                expression,
                inputs,
            } => (name, expression, inputs),
            _ => unreachable!(),
        }
    }

    #[test]
    fn rededge_variant_divides_nir_by_red_edge() {
        let query = ci_collection("2023-01-01", "2023-02-01", square(), CiVariant::RedEdge);
        let (name, expression, inputs) = derived_band(&query);
        assert_eq!(name, "CI");
        assert_eq!(expression, "(nir / re) - 1");
        assert_eq!(inputs["nir"], "B8");
        assert_eq!(inputs["re"], "B5");
    }

    #[test]
    fn green_variant_divides_nir_by_green() {
        let query = ci_collection("2023-01-01", "2023-02-01", square(), CiVariant::Green);
        let (_, expression, inputs) = derived_band(&query);
        assert_eq!(expression, "(nir / green) - 1");
        assert_eq!(inputs["nir"], "B8");
        assert_eq!(inputs["green"], "B3");
    }

    #[test]
    fn unrecognized_variant_string_produces_green_formula() {
        let fallback = ci_collection(
            "2023-01-01",
            "2023-02-01",
            square(),
            CiVariant::parse("unknownvalue"),
        );
        let green = ci_collection("2023-01-01", "2023-02-01", square(), CiVariant::Green);
        assert_eq!(fallback, green);
    }

    #[test]
    fn ci_collection_masks_qa60_and_keeps_filter_order() {
        let query = ci_collection("2023-01-01", "2023-02-01", square(), CiVariant::Green);
        assert_eq!(query.collection, "COPERNICUS/S2_SR");
        assert!(matches!(query.filters[0], Filter::Bounds { .. }));
        assert!(
            matches!(&query.filters[1], Filter::DateRange { start, end }
                if start == "2023-01-01" && end == "2023-02-01")
        );
        assert!(
            matches!(&query.image_ops[0], ImageOp::MaskZero { band } if band == "QA60")
        );
    }

    #[test]
    fn ci_composite_applies_fixed_styling() {
        let image = ci_composite(ci_collection(
            "2023-01-01",
            "2023-02-01",
            square(),
            CiVariant::Green,
        ));
        assert_eq!(image.reducer, Reducer::Median);

        let vis = image.visualization.expect("composite must be styled");
        assert_eq!(vis.min, -0.1);
        assert_eq!(vis.max, 2.5);
        assert_eq!(vis.palette.len(), 7);
        assert_eq!(vis.palette[0], "#2c7fb8");
        assert_eq!(vis.palette[6], "#d73027");

        let projection = image.projection.expect("composite must be reprojected");
        assert_eq!(projection.crs, "EPSG:3857");
        assert_eq!(projection.scale, 10.0);
    }

    #[test]
    fn ci_single_uses_first_reducer_with_same_styling() {
        let image = ci_single(ci_collection(
            "2023-01-14",
            "2023-01-15",
            square(),
            CiVariant::Green,
        ));
        assert_eq!(image.reducer, Reducer::First);
        assert!(image.visualization.is_some());
    }

    #[test]
    fn ndvi_bands_follow_the_sensor() {
        let s2 = ndvi_collection("2023-01-01", "2023-02-01", square(), Sensor::Sentinel2);
        let (_, expression, inputs) = derived_band(&s2);
        assert_eq!(expression, "(nir - red) / (nir + red)");
        assert_eq!(inputs["nir"], "B8");
        assert_eq!(inputs["red"], "B4");

        let landsat = ndvi_collection("2023-01-01", "2023-02-01", square(), Sensor::Landsat8);
        assert_eq!(landsat.collection, "LANDSAT/LC08/C02/T1_L2");
        let (_, _, inputs) = derived_band(&landsat);
        assert_eq!(inputs["nir"], "SR_B5");
        assert_eq!(inputs["red"], "SR_B4");
        assert!(
            matches!(&landsat.image_ops[0], ImageOp::MaskZero { band } if band == "QA_PIXEL")
        );
    }
}
