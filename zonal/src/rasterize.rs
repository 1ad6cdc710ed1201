use crate::{Ward, ZonalError};
use geogrid::{GeoTransform, Grid};
use geo::{geometry::Point, BoundingRect, Contains};
use log::debug;

/// Burns ward boundaries into a grid of the given dimensions, aligned
/// by `transform` (normally a reference raster's transform).
///
/// A cell takes the id of the ward whose boundary contains the cell's
/// center, or 0 where no ward does. When boundaries overlap a cell,
/// painter's order applies: the last-listed ward wins. Wards and
/// transform must share a CRS; that agreement is the caller's
/// responsibility and is not validated here.
pub fn rasterize(
    wards: &[Ward],
    dimensions: (usize, usize),
    transform: &GeoTransform,
) -> Result<Grid<u8>, ZonalError> {
    let inverse = transform.invert()?;
    let (cols, rows) = dimensions;
    let mut grid = Grid::filled(dimensions, 0_u8);

    for ward in wards {
        let Some(rect) = ward.boundary.bounding_rect() else {
            debug!("ward {} has an empty boundary, skipping", ward.id);
            continue;
        };

        // Candidate cell range from the boundary's bounding box. All
        // four corners go through the inverse transform so a rotated
        // transform still yields a covering range.
        let (min, max) = (rect.min(), rect.max());
        let mut col_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut row_range = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in [
            (min.x, min.y),
            (min.x, max.y),
            (max.x, min.y),
            (max.x, max.y),
        ] {
            let (col, row) = inverse.apply(x, y);
            col_range = (col_range.0.min(col), col_range.1.max(col));
            row_range = (row_range.0.min(row), row_range.1.max(row));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (col_lo, col_hi, row_lo, row_hi) = {
            let clamp = |v: f64, upper: usize| v.clamp(0.0, upper as f64) as usize;
            (
                clamp(col_range.0.floor(), cols.saturating_sub(1)),
                clamp(col_range.1.ceil(), cols.saturating_sub(1)),
                clamp(row_range.0.floor(), rows.saturating_sub(1)),
                clamp(row_range.1.ceil(), rows.saturating_sub(1)),
            )
        };

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let center = Point::from(transform.cell_center((col, row)));
                if ward.boundary.contains(&center) {
                    grid.set((col, row), ward.id);
                }
            }
        }
    }

    Ok(grid)
}
