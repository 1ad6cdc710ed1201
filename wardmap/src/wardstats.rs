use crate::options::Zonal;
use anyhow::Result;
use geogrid::Raster;
use std::{collections::BTreeMap, io::Write};
use zonal::{rasterize, ward_stats, wards, ClassCatalog};

impl Zonal {
    pub fn run(&self) -> Result<()> {
        let raster = Raster::load(&self.landcover)?;
        let wards = wards::from_geojson(&self.wards, &self.id_property, &self.name_property)?;
        let mut catalog = ClassCatalog::lcm2015();
        catalog.reconcile(raster.grid());
        let mask = rasterize(&wards, raster.dimensions(), raster.transform())?;
        let mut stats = ward_stats(raster.grid(), &mask, &wards, &catalog)?;

        if self.short_names {
            let aliases = short_aliases(&catalog);
            for ward in &mut stats {
                ward.counts = remap(&ward.counts, &aliases);
                ward.percentages = remap(&ward.percentages, &aliases);
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            let mut stdout = std::io::stdout().lock();
            for ward in &stats {
                writeln!(stdout, "{} (ward {})", ward.name, ward.id)?;
                for (class, cells) in &ward.counts {
                    writeln!(
                        stdout,
                        "  {class:<28} {cells:>10} {:>7.2}%",
                        ward.percentages[class]
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Full-name to column-safe alias mapping, covering the whole
/// catalog. Names without a fixed alias map to themselves.
fn short_aliases(catalog: &ClassCatalog) -> BTreeMap<String, String> {
    catalog
        .iter()
        .map(|(code, name)| {
            let alias = ClassCatalog::short_name_of(code).unwrap_or(name);
            (name.to_string(), alias.to_string())
        })
        .collect()
}

fn remap<V: Clone>(
    values: &BTreeMap<String, V>,
    aliases: &BTreeMap<String, String>,
) -> BTreeMap<String, V> {
    values
        .iter()
        .map(|(name, value)| {
            let key = aliases.get(name).cloned().unwrap_or_else(|| name.clone());
            (key, value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{remap, short_aliases};
    use std::collections::BTreeMap;
    use zonal::ClassCatalog;

    #[test]
    fn test_short_aliases_cover_placeholders() {
        let mut catalog = ClassCatalog::lcm2015();
        catalog.insert(42, ClassCatalog::placeholder(42));
        let aliases = short_aliases(&catalog);
        assert_eq!(aliases["Broadleaf woodland"], "broadleaf");
        // Placeholders have no fixed alias and pass through.
        assert_eq!(aliases["Unknown_42"], "Unknown_42");
    }

    #[test]
    fn test_remap() {
        let counts: BTreeMap<String, u64> = [("Urban".to_string(), 3)].into();
        let aliases: BTreeMap<String, String> = [("Urban".to_string(), "urban".to_string())].into();
        let remapped = remap(&counts, &aliases);
        assert_eq!(remapped.get("urban"), Some(&3));
    }
}
