//! Georeferenced raster grids.
//!
//! A raster is a 2-D grid of cell values plus the affine transform
//! that places those cells on the map. This crate keeps the grid and
//! the transform together, loads both from GeoTIFF files, and can
//! resample one raster onto another raster's grid.
//!
//! # References
//!
//! 1. [GeoTIFF spec, georeferencing tags](https://docs.ogc.org/is/19-008r4/19-008r4.html#_raster_to_model_coordinate_transformation_requirements)
//! 1. [GDAL geotransform convention](https://gdal.org/tutorials/geotransforms_tut.html)

mod error;
mod grid;
mod raster;
mod transform;

pub use crate::{error::GeogridError, grid::Grid, raster::Raster, transform::GeoTransform};
