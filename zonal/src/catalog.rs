use geogrid::Grid;
use log::warn;
use std::collections::BTreeMap;

/// The background sentinel. Cells holding this value are outside the
/// classified area and never counted.
pub const NODATA: i32 = 0;

/// UKCEH LCM2015 class names, codes 1..=23 in order.
const LCM2015_NAMES: [&str; 23] = [
    "Broadleaf woodland",
    "Coniferous woodland",
    "Arable and Horticulture",
    "Improved grassland",
    "Semi-natural grassland",
    "Mountain, heath, bog",
    "Saltwater",
    "Freshwater",
    "Coastal",
    "Built-up areas and gardens",
    "Neutral Grassland",
    "Calcareous Grassland",
    "Acid Grassland",
    "Heather",
    "Heather grassland",
    "Fen, Marsh and Swamp",
    "Bog",
    "Inland Rock",
    "Urban",
    "Suburban",
    "Supra-littoral Rock",
    "Supra-littoral Sediment",
    "Littoral Rock",
];

/// Column-safe aliases for the LCM2015 classes, same order.
const LCM2015_SHORT_NAMES: [&str; 23] = [
    "broadleaf",
    "coniferous",
    "arable",
    "imp_grass",
    "nat_grass",
    "mountain",
    "saltwater",
    "freshwater",
    "coastal",
    "built_up",
    "neutral_grass",
    "calcareous_grass",
    "acid_grass",
    "heather",
    "heather_grass",
    "fen_marsh_swamp",
    "bog",
    "inland_rock",
    "urban",
    "suburban",
    "supra_littoral_rock",
    "supra_littoral_sediment",
    "littoral_rock",
];

/// Mapping from integer land-cover codes to class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCatalog {
    names: BTreeMap<i32, String>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog of the fixed 23 LCM2015 classes.
    pub fn lcm2015() -> Self {
        let names = LCM2015_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx as i32 + 1, (*name).to_string()))
            .collect();
        Self { names }
    }

    pub fn insert(&mut self, code: i32, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    pub fn name_of(&self, code: i32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Returns the column-safe alias for `code`, for the fixed
    /// LCM2015 codes only.
    pub fn short_name_of(code: i32) -> Option<&'static str> {
        if (1..=23).contains(&code) {
            Some(LCM2015_SHORT_NAMES[(code - 1) as usize])
        } else {
            None
        }
    }

    /// Returns the deterministic name given to a code the catalog
    /// does not know.
    pub fn placeholder(code: i32) -> String {
        format!("Unknown_{code}")
    }

    /// Returns the name for `code`, falling back to the placeholder
    /// for codes the catalog does not know.
    pub fn name_or_placeholder(&self, code: i32) -> String {
        self.name_of(code)
            .map_or_else(|| Self::placeholder(code), ToOwned::to_owned)
    }

    /// Inserts a placeholder name for every non-nodata code observed
    /// in `grid` but absent from the catalog.
    ///
    /// Regional extracts of the same dataset routinely carry codes
    /// the producer's documentation does not list, so a gap is a
    /// warning, never an error. Returns the codes that were added.
    pub fn reconcile(&mut self, grid: &Grid<i32>) -> Vec<i32> {
        let mut added = Vec::new();
        for value in grid.iter() {
            if value == NODATA || self.names.contains_key(&value) {
                continue;
            }
            warn!("land-cover code {value} missing from catalog, using placeholder");
            self.names.insert(value, Self::placeholder(value));
            added.push(value);
        }
        added.sort_unstable();
        added.dedup();
        added
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns an iterator over `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> + '_ {
        self.names.iter().map(|(code, name)| (*code, name.as_str()))
    }
}
