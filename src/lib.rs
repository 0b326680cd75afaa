//! Chloromap: a stateless HTTP facade over a remote satellite-imagery
//! analysis platform.
//!
//! The service translates an area-of-interest polygon, a date range, and a
//! chlorophyll-index variant into a declarative compositing request, submits
//! it to the platform, and hands the caller a tile URL template. No pixel
//! data is ever materialized locally; everything heavy (masking, band math,
//! temporal reduction, reprojection, tile serving) runs on the platform.

pub mod api;
pub mod config;
pub mod engine;
pub mod indices;
pub mod models;
