use crate::options::Classify;
use anyhow::Result;
use geogrid::Raster;
use serde::Serialize;
use std::io::Write;
use zonal::{count_unique, percentages, ClassCatalog, NODATA};

impl Classify {
    pub fn run(&self) -> Result<()> {
        let raster = Raster::load(&self.landcover)?;
        let mut catalog = ClassCatalog::lcm2015();
        catalog.reconcile(raster.grid());
        let counts = count_unique(raster.grid(), &catalog, NODATA);
        let percents = percentages(&counts);

        if self.json {
            #[derive(Serialize)]
            struct Entry<'a> {
                class: &'a str,
                cells: u64,
                percent: f64,
            }
            let entries: Vec<Entry> = counts
                .iter()
                .map(|(name, cells)| Entry {
                    class: name,
                    cells: *cells,
                    percent: percents[name],
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            let mut stdout = std::io::stdout().lock();
            for (name, cells) in &counts {
                writeln!(stdout, "{name:<28} {cells:>10} {:>7.2}%", percents[name])?;
            }
        }
        Ok(())
    }
}
