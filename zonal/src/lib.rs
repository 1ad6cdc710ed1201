//! Land-cover tabulation over administrative wards.
//!
//! The pipeline is linear: load a classified raster and a ward
//! boundary set, burn the wards into a grid aligned with the raster,
//! then tally land-cover classes for the whole grid or per ward.
//! Class codes come from a [`ClassCatalog`]; codes observed in the
//! data but missing from the catalog get deterministic placeholder
//! names rather than failing the run.

mod catalog;
mod error;
mod rasterize;
mod stats;
pub mod wards;

pub use crate::{
    catalog::{ClassCatalog, NODATA},
    error::ZonalError,
    rasterize::rasterize,
    stats::{count_points, count_unique, masked_mean, percentages, ward_stats, WardStats},
    wards::Ward,
};
