use crate::{ClassCatalog, Ward, ZonalError};
use geo::{geometry::Point, Contains};
use geogrid::Grid;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tallies cells per class name over a whole classified grid,
/// excluding `nodata` cells.
///
/// Tallies are exact integer cell counts; there is no partial-cell
/// weighting. Codes the catalog does not know are reported under
/// their deterministic placeholder name.
pub fn count_unique(
    grid: &Grid<i32>,
    catalog: &ClassCatalog,
    nodata: i32,
) -> BTreeMap<String, u64> {
    let mut tallies: BTreeMap<i32, u64> = BTreeMap::new();
    for value in grid.iter() {
        if value == nodata {
            continue;
        }
        *tallies.entry(value).or_insert(0) += 1;
    }
    tallies
        .into_iter()
        .map(|(code, count)| (catalog.name_or_placeholder(code), count))
        .collect()
}

/// Converts class counts to percentages of the classified area.
///
/// Floating point: the percentages are not required to sum to exactly
/// 100.
pub fn percentages(counts: &BTreeMap<String, u64>) -> BTreeMap<String, f64> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    #[allow(clippy::cast_precision_loss)]
    counts
        .iter()
        .map(|(name, count)| (name.clone(), *count as f64 / total as f64 * 100.0))
        .collect()
}

/// Per-ward land-cover breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardStats {
    pub id: u8,
    pub name: String,
    pub counts: BTreeMap<String, u64>,
    pub percentages: BTreeMap<String, f64>,
}

/// The per-polygon mode of the tabulator: class counts and
/// percentages for each ward, using a pre-rasterized ward mask.
///
/// `landcover` and `mask` must be grids over the same cells; anything
/// else means the inputs were never aligned and is an error.
/// Percentages are relative to each ward's own classified area.
pub fn ward_stats(
    landcover: &Grid<i32>,
    mask: &Grid<u8>,
    wards: &[Ward],
    catalog: &ClassCatalog,
) -> Result<Vec<WardStats>, ZonalError> {
    if landcover.dimensions() != mask.dimensions() {
        return Err(ZonalError::ShapeMismatch(
            landcover.dimensions(),
            mask.dimensions(),
        ));
    }

    let mut tallies: BTreeMap<u8, BTreeMap<i32, u64>> = BTreeMap::new();
    for (value, ward_id) in landcover.iter().zip(mask.iter()) {
        if ward_id == 0 || value == crate::NODATA {
            continue;
        }
        *tallies
            .entry(ward_id)
            .or_default()
            .entry(value)
            .or_insert(0) += 1;
    }

    Ok(wards
        .iter()
        .map(|ward| {
            let counts: BTreeMap<String, u64> = tallies
                .remove(&ward.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(code, count)| (catalog.name_or_placeholder(code), count))
                .collect();
            let percentages = percentages(&counts);
            WardStats {
                id: ward.id,
                name: ward.name.clone(),
                counts,
                percentages,
            }
        })
        .collect())
}

/// Mean of `values` cells whose mask cell holds one of `ids`.
///
/// The grids must share dimensions; resample one raster onto the
/// other's grid first. Returns `None` when no cell matches.
pub fn masked_mean(
    values: &Grid<i32>,
    mask: &Grid<u8>,
    ids: &[u8],
) -> Result<Option<f64>, ZonalError> {
    if values.dimensions() != mask.dimensions() {
        return Err(ZonalError::ShapeMismatch(
            values.dimensions(),
            mask.dimensions(),
        ));
    }
    let mut sum = 0_f64;
    let mut n = 0_u64;
    for (value, ward_id) in values.iter().zip(mask.iter()) {
        if ids.contains(&ward_id) {
            sum += f64::from(value);
            n += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    Ok((n > 0).then(|| sum / n as f64))
}

/// Tallies point features per containing ward. Every ward appears in
/// the result, with 0 where no point falls inside it.
pub fn count_points(wards: &[Ward], points: &[Point<f64>]) -> BTreeMap<u8, u64> {
    let mut tallies: BTreeMap<u8, u64> = wards.iter().map(|ward| (ward.id, 0)).collect();
    for point in points {
        for ward in wards {
            if ward.boundary.contains(point) {
                *tallies.entry(ward.id).or_insert(0) += 1;
                break;
            }
        }
    }
    tallies
}

#[cfg(test)]
mod tests {
    use super::{count_points, count_unique, masked_mean, percentages, ward_stats};
    use crate::{ClassCatalog, Ward, NODATA};
    use approx::assert_relative_eq;
    use geo::{geometry::MultiPolygon, point, polygon};
    use geogrid::Grid;

    fn abc_catalog() -> ClassCatalog {
        let mut catalog = ClassCatalog::new();
        catalog.insert(1, "A");
        catalog.insert(2, "B");
        catalog.insert(3, "C");
        catalog
    }

    fn quartered_grid() -> Grid<i32> {
        Grid::from_cells(
            (4, 4),
            vec![1, 1, 2, 2, 1, 1, 2, 2, 0, 0, 3, 3, 0, 0, 3, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_count_unique_quartered_grid() {
        let counts = count_unique(&quartered_grid(), &abc_catalog(), NODATA);
        assert_eq!(counts.get("A"), Some(&4));
        assert_eq!(counts.get("B"), Some(&4));
        assert_eq!(counts.get("C"), Some(&4));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_percentages_quartered_grid() {
        let counts = count_unique(&quartered_grid(), &abc_catalog(), NODATA);
        let percents = percentages(&counts);
        for name in ["A", "B", "C"] {
            assert_relative_eq!(percents[name], 33.33, epsilon = 0.01);
        }
    }

    #[test]
    fn test_count_unique_is_order_independent() {
        let grid = quartered_grid();
        let mut cells: Vec<i32> = grid.iter().collect();
        cells.reverse();
        let reversed = Grid::from_cells((4, 4), cells).unwrap();
        let catalog = abc_catalog();
        assert_eq!(
            count_unique(&grid, &catalog, NODATA),
            count_unique(&reversed, &catalog, NODATA)
        );
    }

    #[test]
    fn test_count_unique_never_counts_nodata() {
        let grid = Grid::from_cells((3, 1), vec![0, 0, 0]).unwrap();
        assert!(count_unique(&grid, &abc_catalog(), NODATA).is_empty());
    }

    #[test]
    fn test_count_unique_unknown_code_uses_placeholder() {
        let grid = Grid::from_cells((2, 1), vec![1, 42]).unwrap();
        let counts = count_unique(&grid, &abc_catalog(), NODATA);
        assert_eq!(counts.get("Unknown_42"), Some(&1));
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let grid = Grid::from_cells((3, 2), vec![1, 1, 2, 3, 3, 3]).unwrap();
        let percents = percentages(&count_unique(&grid, &abc_catalog(), NODATA));
        let sum: f64 = percents.values().sum();
        assert_relative_eq!(sum, 100.0, epsilon = 0.01);
    }

    #[test]
    fn test_percentages_of_empty_counts() {
        assert!(percentages(&std::collections::BTreeMap::new()).is_empty());
    }

    fn named_ward(id: u8, name: &str) -> Ward {
        // Geometry is irrelevant to ward_stats; the mask drives it.
        Ward {
            id,
            name: name.to_string(),
            boundary: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0),
            ]]),
        }
    }

    #[test]
    fn test_ward_stats_splits_by_mask() {
        let landcover = quartered_grid();
        // Ward 1 is the top half, ward 2 the bottom half.
        let mask = Grid::from_cells(
            (4, 4),
            vec![1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2],
        )
        .unwrap();
        let wards = vec![named_ward(1, "north"), named_ward(2, "south")];
        let stats = ward_stats(&landcover, &mask, &wards, &abc_catalog()).unwrap();

        assert_eq!(stats[0].counts.get("A"), Some(&4));
        assert_eq!(stats[0].counts.get("B"), Some(&4));
        assert_eq!(stats[0].counts.get("C"), None);
        assert_relative_eq!(stats[0].percentages["A"], 50.0);

        // Ward 2 holds only class C cells; its nodata cells are not
        // counted.
        assert_eq!(stats[1].counts.get("C"), Some(&4));
        assert_eq!(stats[1].counts.len(), 1);
        assert_relative_eq!(stats[1].percentages["C"], 100.0);
    }

    #[test]
    fn test_ward_stats_shape_mismatch() {
        let landcover = quartered_grid();
        let mask = Grid::filled((3, 3), 1_u8);
        let result = ward_stats(&landcover, &mask, &[named_ward(1, "x")], &abc_catalog());
        assert!(matches!(result, Err(crate::ZonalError::ShapeMismatch(..))));
    }

    #[test]
    fn test_masked_mean() {
        let dem = Grid::from_cells((2, 2), vec![10, 20, 30, 40]).unwrap();
        let mask = Grid::from_cells((2, 2), vec![1_u8, 1, 2, 3]).unwrap();
        let mean = masked_mean(&dem, &mask, &[1]).unwrap();
        assert_relative_eq!(mean.unwrap(), 15.0);
        let mean = masked_mean(&dem, &mask, &[2, 3]).unwrap();
        assert_relative_eq!(mean.unwrap(), 35.0);
        assert_eq!(masked_mean(&dem, &mask, &[9]).unwrap(), None);
    }

    #[test]
    fn test_masked_mean_shape_mismatch() {
        let dem = Grid::filled((2, 2), 0_i32);
        let mask = Grid::filled((4, 4), 0_u8);
        assert!(masked_mean(&dem, &mask, &[1]).is_err());
    }

    #[test]
    fn test_count_points() {
        let west = Ward {
            id: 1,
            name: "west".to_string(),
            boundary: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0),
            ]]),
        };
        let east = Ward {
            id: 2,
            name: "east".to_string(),
            boundary: MultiPolygon(vec![polygon![
                (x: 2.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0),
            ]]),
        };
        let points = vec![
            point!(x: 0.5, y: 0.5),
            point!(x: 1.5, y: 1.5),
            point!(x: 3.0, y: 1.0),
            point!(x: 9.0, y: 9.0),
        ];
        let tallies = count_points(&[west, east], &points);
        assert_eq!(tallies[&1], 2);
        assert_eq!(tallies[&2], 1);
    }
}
