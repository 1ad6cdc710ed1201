use crate::options::Render;
use anyhow::Result;
use geogrid::{GeoTransform, Grid, Raster};
use log::info;
use plotters::prelude::*;
use std::{collections::BTreeSet, ops::Range, path::Path};
use zonal::{masked_mean, rasterize, wards, ClassCatalog, Ward, NODATA};

const FIGURE_SIZE: (u32, u32) = (900, 900);

impl Render {
    pub fn run(&self) -> Result<()> {
        let raster = Raster::load(&self.landcover)?;
        let wards = wards::from_geojson(&self.wards, &self.id_property, &self.name_property)?;
        let mask = rasterize(&wards, raster.dimensions(), raster.transform())?;

        if let Some(out) = &self.wards_out {
            draw_ward_grid(&mask, raster.transform(), out)?;
            info!("wrote ward grid to {out:?}");
        }

        if let Some(out) = &self.cover_out {
            let mut catalog = ClassCatalog::lcm2015();
            catalog.reconcile(raster.grid());
            draw_landcover(raster.grid(), raster.transform(), &wards, &catalog, out)?;
            info!("wrote land-cover map to {out:?}");
        }

        if let Some(dem_path) = &self.dem {
            // The DEM and the land-cover raster are different grids.
            // Resample the DEM onto the land-cover grid so the ward
            // mask selects the cells it claims to.
            let dem = Raster::load(dem_path)?;
            let aligned = dem.resample_to(raster.dimensions(), raster.transform(), NODATA)?;
            let ids: Vec<u8> = if self.ward_ids.is_empty() {
                wards.iter().map(|ward| ward.id).collect()
            } else {
                self.ward_ids.clone()
            };
            match masked_mean(&aligned, &mask, &ids)? {
                Some(mean) => println!("Mean elevation: {mean:.2} m"),
                None => println!("Mean elevation: no cells in the selected wards"),
            }
        }

        Ok(())
    }
}

/// Geographic extent of a grid, as plottable axis ranges.
#[allow(clippy::cast_precision_loss)]
fn extent(transform: &GeoTransform, (cols, rows): (usize, usize)) -> (Range<f64>, Range<f64>) {
    let (x0, y0) = transform.apply(0.0, 0.0);
    let (x1, y1) = transform.apply(cols as f64, rows as f64);
    (x0.min(x1)..x0.max(x1), y0.min(y1)..y0.max(y1))
}

/// Corner coordinates of cell `(col, row)`.
#[allow(clippy::cast_precision_loss)]
fn cell_rect(transform: &GeoTransform, (col, row): (usize, usize)) -> [(f64, f64); 2] {
    let nw = transform.apply(col as f64, row as f64);
    let se = transform.apply(col as f64 + 1.0, row as f64 + 1.0);
    [nw, se]
}

fn draw_ward_grid(mask: &Grid<u8>, transform: &GeoTransform, out: &Path) -> Result<()> {
    let root = BitMapBackend::new(out, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (x_range, y_range) = extent(transform, mask.dimensions());
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Rasterized wards", ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().disable_mesh().draw()?;

    let max_id = mask.iter().max().unwrap_or(0).max(1);
    chart.draw_series(
        mask.enumerate()
            .filter(|(_, id)| *id != 0)
            .map(|(cell, id)| {
                let shade = ramp(f64::from(id) / f64::from(max_id));
                Rectangle::new(cell_rect(transform, cell), shade.filled())
            }),
    )?;

    root.present()?;
    Ok(())
}

fn draw_landcover(
    grid: &Grid<i32>,
    transform: &GeoTransform,
    wards: &[Ward],
    catalog: &ClassCatalog,
    out: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(out, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (x_range, y_range) = extent(transform, grid.dimensions());
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Land cover with ward boundaries", ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().disable_mesh().draw()?;

    // One labeled series per class present, so each class gets a
    // legend entry.
    let present: BTreeSet<i32> = grid.iter().filter(|&v| v != NODATA).collect();
    for code in present {
        let color = class_color(code);
        chart
            .draw_series(
                grid.enumerate()
                    .filter(move |(_, value)| *value == code)
                    .map(|(cell, _)| Rectangle::new(cell_rect(transform, cell), color.filled())),
            )?
            .label(catalog.name_or_placeholder(code))
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled()));
    }

    for ward in wards {
        for polygon in &ward.boundary {
            chart.draw_series(std::iter::once(PathElement::new(
                polygon
                    .exterior()
                    .coords()
                    .map(|coord| (coord.x, coord.y))
                    .collect::<Vec<_>>(),
                BLACK,
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Sequential dark-to-light ramp for ward identifiers.
fn ramp(t: f64) -> RGBColor {
    const ANCHORS: [(u8, u8, u8); 5] = [
        (68, 1, 84),
        (59, 82, 139),
        (33, 145, 140),
        (94, 201, 98),
        (253, 231, 37),
    ];
    let (r, g, b) = lerp_colors(&ANCHORS, t);
    RGBColor(r, g, b)
}

pub(crate) fn lerp_colors(anchors: &[(u8, u8, u8)], t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    #[allow(clippy::cast_precision_loss)]
    let scaled = t * (anchors.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - idx as f64;
    let (r0, g0, b0) = anchors[idx];
    let (r1, g1, b1) = anchors[idx + 1];
    let mix = |lo: u8, hi: u8| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (f64::from(lo) + (f64::from(hi) - f64::from(lo)) * frac).round() as u8;
        v
    };
    (mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Fixed palette for the LCM2015 classes. Unknown codes render
/// magenta so they stand out.
fn class_color(code: i32) -> RGBColor {
    match code {
        1 => RGBColor(0, 100, 0),      // broadleaf woodland
        2 => RGBColor(34, 139, 34),    // coniferous woodland
        3 => RGBColor(218, 165, 32),   // arable
        4 => RGBColor(124, 252, 0),    // improved grassland
        5 => RGBColor(152, 251, 152),  // semi-natural grassland
        6 => RGBColor(160, 82, 45),    // mountain, heath, bog
        7 => RGBColor(0, 0, 139),      // saltwater
        8 => RGBColor(30, 144, 255),   // freshwater
        9 => RGBColor(238, 214, 175),  // coastal
        10 => RGBColor(169, 169, 169), // built-up areas and gardens
        11 => RGBColor(189, 183, 107), // neutral grassland
        12 => RGBColor(222, 184, 135), // calcareous grassland
        13 => RGBColor(154, 205, 50),  // acid grassland
        14 => RGBColor(147, 112, 219), // heather
        15 => RGBColor(186, 85, 211),  // heather grassland
        16 => RGBColor(102, 205, 170), // fen, marsh and swamp
        17 => RGBColor(139, 69, 19),   // bog
        18 => RGBColor(128, 128, 128), // inland rock
        19 => RGBColor(105, 105, 105), // urban
        20 => RGBColor(192, 192, 192), // suburban
        21 => RGBColor(112, 128, 144), // supra-littoral rock
        22 => RGBColor(244, 164, 96),  // supra-littoral sediment
        23 => RGBColor(119, 136, 153), // littoral rock
        _ => RGBColor(255, 0, 255),
    }
}

#[cfg(test)]
mod tests {
    use super::{cell_rect, class_color, extent, ramp, RGBColor};
    use geogrid::GeoTransform;

    fn north_up() -> GeoTransform {
        GeoTransform::new(25.0, 0.0, 0.0, 0.0, -25.0, 1000.0)
    }

    #[test]
    fn test_extent_orients_ranges() {
        let (x_range, y_range) = extent(&north_up(), (4, 4));
        assert_eq!(x_range, 0.0..100.0);
        assert_eq!(y_range, 900.0..1000.0);
    }

    #[test]
    fn test_cell_rect_spans_one_cell() {
        let [nw, se] = cell_rect(&north_up(), (1, 1));
        assert_eq!(nw, (25.0, 975.0));
        assert_eq!(se, (50.0, 950.0));
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp(0.0), RGBColor(68, 1, 84));
        assert_eq!(ramp(1.0), RGBColor(253, 231, 37));
        // Out-of-range input clamps.
        assert_eq!(ramp(7.0), ramp(1.0));
    }

    #[test]
    fn test_unknown_class_is_magenta() {
        assert_eq!(class_color(99), RGBColor(255, 0, 255));
    }
}
