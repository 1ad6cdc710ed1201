use crate::{GeoTransform, GeogridError, Grid};
use log::debug;
use num_traits::ToPrimitive;
use std::{fs::File, path::Path};
use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
};

/// GeoTIFF tag holding (x, y, z) cell size.
const MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF tag anchoring a raster index to a model coordinate.
const MODEL_TIEPOINT: u16 = 33922;

/// A georeferenced single-band raster.
///
/// Cell values are widened to `i32` at load time, which covers every
/// band this crate is fed: land-cover class codes, ward identifiers,
/// and DEM elevations.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    grid: Grid<i32>,
    transform: GeoTransform,
}

impl Raster {
    pub fn new(grid: Grid<i32>, transform: GeoTransform) -> Self {
        Self { grid, transform }
    }

    /// Reads the first band and georeferencing of the GeoTIFF at
    /// `path`.
    ///
    /// The file handle lives only for the duration of this call.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeogridError> {
        let path = path.as_ref();
        debug!("loading raster {path:?}");
        let file = File::open(path)?;
        let mut decoder = Decoder::new(file)?;
        let (width, height) = decoder.dimensions()?;
        let samples_per_pixel = decoder.get_tag_u32(Tag::SamplesPerPixel).unwrap_or(1) as usize;
        let transform = read_geo_tags(&mut decoder)
            .ok_or_else(|| GeogridError::NoGeoTags(path.to_owned()))?;
        let cells = first_band(decoder.read_image()?, samples_per_pixel)
            .ok_or_else(|| GeogridError::UnsupportedSampleFormat(path.to_owned()))?;
        let grid = Grid::from_cells((width as usize, height as usize), cells)?;
        Ok(Self { grid, transform })
    }

    pub fn grid(&self) -> &Grid<i32> {
        &self.grid
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Returns the number of (columns, rows) in this raster.
    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Nearest-neighbor resampling of this raster onto another
    /// raster's grid.
    ///
    /// Every target cell takes the value of the source cell its
    /// center falls in, or `fill` where the center falls outside the
    /// source extent. Both rasters must share a CRS; that agreement
    /// is the caller's responsibility.
    pub fn resample_to(
        &self,
        dimensions: (usize, usize),
        transform: &GeoTransform,
        fill: i32,
    ) -> Result<Grid<i32>, GeogridError> {
        let inverse = self.transform.invert()?;
        let (cols, rows) = dimensions;
        let (src_cols, src_rows) = self.grid.dimensions();
        let mut out = Grid::filled(dimensions, fill);
        for row in 0..rows {
            for col in 0..cols {
                let center = transform.cell_center((col, row));
                let (src_col, src_row) = {
                    let (c, r) = inverse.apply(center.x, center.y);
                    #[allow(clippy::cast_possible_truncation)]
                    (c.floor() as isize, r.floor() as isize)
                };
                #[allow(clippy::cast_possible_wrap)]
                if 0 <= src_col
                    && src_col < src_cols as isize
                    && 0 <= src_row
                    && src_row < src_rows as isize
                {
                    #[allow(clippy::cast_sign_loss)]
                    let value = self
                        .grid
                        .get((src_col as usize, src_row as usize))
                        .unwrap_or(fill);
                    out.set((col, row), value);
                }
            }
        }
        Ok(out)
    }
}

fn read_geo_tags(decoder: &mut Decoder<File>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT)).ok()?;
    GeoTransform::from_scale_and_tiepoint(&scale, &tiepoint)
}

/// Extracts band one of a decoded image, widening samples to `i32`.
///
/// Multi-sample pixels are interleaved, so band one is every
/// `samples_per_pixel`-th value. Samples that do not fit an `i32`
/// collapse to 0, the shared nodata sentinel.
fn first_band(image: DecodingResult, samples_per_pixel: usize) -> Option<Vec<i32>> {
    let step = samples_per_pixel.max(1);
    fn take<T: ToPrimitive>(buf: Vec<T>, step: usize) -> Vec<i32> {
        buf.into_iter()
            .step_by(step)
            .map(|v| v.to_i32().unwrap_or(0))
            .collect()
    }
    match image {
        DecodingResult::U8(buf) => Some(take(buf, step)),
        DecodingResult::U16(buf) => Some(take(buf, step)),
        DecodingResult::U32(buf) => Some(take(buf, step)),
        DecodingResult::U64(buf) => Some(take(buf, step)),
        DecodingResult::I8(buf) => Some(take(buf, step)),
        DecodingResult::I16(buf) => Some(take(buf, step)),
        DecodingResult::I32(buf) => Some(take(buf, step)),
        DecodingResult::I64(buf) => Some(take(buf, step)),
        DecodingResult::F32(buf) => Some(take(buf, step)),
        DecodingResult::F64(buf) => Some(take(buf, step)),
    }
}
