use crate::GeogridError;
use geo::geometry::Coord;

/// The six-coefficient affine mapping between cell indices and
/// geographic coordinates.
///
/// Follows the GDAL/rasterio coefficient order:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// For north-up rasters `b` and `d` are zero, `a` is the cell width,
/// and `e` is the (negative) cell height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            coefficients: [a, b, c, d, e, f],
        }
    }

    /// Returns the transform described by GeoTIFF ModelPixelScale and
    /// ModelTiepoint tag values.
    pub fn from_scale_and_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        let (sx, sy) = (scale[0], scale[1]);
        // Tiepoint maps raster (i, j) onto model (x, y).
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        Some(Self::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    /// Applies the transform to fractional cell indices.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.coefficients;
        (a * col + b * row + c, d * col + e * row + f)
    }

    /// Returns the geographic coordinate of the center of cell
    /// `(col, row)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, (col, row): (usize, usize)) -> Coord<f64> {
        let (x, y) = self.apply(col as f64 + 0.5, row as f64 + 0.5);
        Coord { x, y }
    }

    /// Returns the inverse transform, mapping geographic `(x, y)`
    /// back to fractional `(col, row)`.
    pub fn invert(&self) -> Result<Self, GeogridError> {
        let [a, b, c, d, e, f] = self.coefficients;
        let det = a * e - b * d;
        if det == 0.0 || !det.is_finite() {
            return Err(GeogridError::Singular);
        }
        let (ia, ib) = (e / det, -b / det);
        let (id, ie) = (-d / det, a / det);
        Ok(Self::new(
            ia,
            ib,
            -(ia * c + ib * f),
            id,
            ie,
            -(id * c + ie * f),
        ))
    }

    /// Returns the index of the cell containing `coord`, which may
    /// lie outside the grid the transform belongs to; bounds are the
    /// caller's concern.
    pub fn cell_of(&self, coord: Coord<f64>) -> Result<(isize, isize), GeogridError> {
        let (col, row) = self.invert()?.apply(coord.x, coord.y);
        #[allow(clippy::cast_possible_truncation)]
        Ok((col.floor() as isize, row.floor() as isize))
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, GeoTransform};
    use approx::assert_relative_eq;

    // 25m cells, north-up, origin at (333000, 398000): roughly the
    // LCM2015 Liverpool extract.
    fn north_up() -> GeoTransform {
        GeoTransform::new(25.0, 0.0, 333_000.0, 0.0, -25.0, 398_000.0)
    }

    #[test]
    fn test_cell_center() {
        let tfm = north_up();
        let center = tfm.cell_center((0, 0));
        assert_relative_eq!(center.x, 333_012.5);
        assert_relative_eq!(center.y, 397_987.5);
    }

    #[test]
    fn test_invert_roundtrip() {
        let tfm = north_up();
        let inv = tfm.invert().unwrap();
        for (col, row) in [(0.0, 0.0), (10.5, 3.25), (659.0, 649.0)] {
            let (x, y) = tfm.apply(col, row);
            let (rcol, rrow) = inv.apply(x, y);
            assert_relative_eq!(rcol, col, epsilon = 1e-9);
            assert_relative_eq!(rrow, row, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cell_of_is_containing_cell() {
        let tfm = north_up();
        // Anywhere strictly inside cell (2, 3) maps back to (2, 3).
        let coord = Coord {
            x: 333_000.0 + 2.0 * 25.0 + 1.0,
            y: 398_000.0 - 3.0 * 25.0 - 1.0,
        };
        assert_eq!(tfm.cell_of(coord).unwrap(), (2, 3));
    }

    #[test]
    fn test_singular_transform_does_not_invert() {
        let tfm = GeoTransform::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(tfm.invert().is_err());
    }

    #[test]
    fn test_from_scale_and_tiepoint() {
        let tfm = GeoTransform::from_scale_and_tiepoint(
            &[25.0, 25.0, 0.0],
            &[0.0, 0.0, 0.0, 333_000.0, 398_000.0, 0.0],
        )
        .unwrap();
        assert_eq!(tfm, north_up());
    }

    #[test]
    fn test_from_short_tags_is_none() {
        assert!(GeoTransform::from_scale_and_tiepoint(&[25.0], &[0.0; 6]).is_none());
    }
}
