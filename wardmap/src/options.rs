use clap::{Args, Parser};
use std::path::PathBuf;

/// Land-cover classification and ward maps from raster + vector city
/// data.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Tabulate land-cover classes over a whole raster.
    Classify(Classify),

    /// Per-ward land-cover breakdown.
    Zonal(Zonal),

    /// Render static maps, and optionally a mean-elevation report.
    Render(Render),

    /// Build a single-file interactive Leaflet map.
    Webmap(Webmap),
}

#[derive(Debug, Clone, Args)]
pub struct Classify {
    /// Land-cover GeoTIFF.
    pub landcover: PathBuf,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Zonal {
    /// Land-cover GeoTIFF.
    pub landcover: PathBuf,

    /// Ward boundaries (GeoJSON feature collection).
    pub wards: PathBuf,

    /// Feature property holding the numeric ward id.
    #[arg(long, default_value = "WARDNUMBER")]
    pub id_property: String,

    /// Feature property holding the ward name.
    #[arg(long, default_value = "wardname")]
    pub name_property: String,

    /// Use column-safe short class names.
    #[arg(long)]
    pub short_names: bool,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Render {
    /// Land-cover GeoTIFF.
    pub landcover: PathBuf,

    /// Ward boundaries (GeoJSON feature collection).
    pub wards: PathBuf,

    /// Feature property holding the numeric ward id.
    #[arg(long, default_value = "WARDNUMBER")]
    pub id_property: String,

    /// Feature property holding the ward name.
    #[arg(long, default_value = "wardname")]
    pub name_property: String,

    /// Write the land-cover map (with ward outlines) to this PNG.
    #[arg(long)]
    pub cover_out: Option<PathBuf>,

    /// Write the rasterized ward grid to this PNG.
    #[arg(long)]
    pub wards_out: Option<PathBuf>,

    /// DEM GeoTIFF; resampled onto the land-cover grid for the
    /// mean-elevation report.
    #[arg(long)]
    pub dem: Option<PathBuf>,

    /// Ward ids for the mean-elevation report, e.g. "12,13". All
    /// wards when omitted.
    #[arg(long, value_delimiter = ',')]
    pub ward_ids: Vec<u8>,
}

#[derive(Debug, Clone, Args)]
pub struct Webmap {
    /// Ward boundaries (GeoJSON feature collection).
    pub wards: PathBuf,

    /// Feature property holding the numeric ward id.
    #[arg(long, default_value = "WARDNUMBER")]
    pub id_property: String,

    /// Feature property holding the ward name.
    #[arg(long, default_value = "wardname")]
    pub name_property: String,

    /// Bus stop point features (GeoJSON); drives the per-ward
    /// choropleth and the marker layer.
    #[arg(long)]
    pub stops: Option<PathBuf>,

    /// Parks polygon layer (GeoJSON).
    #[arg(long)]
    pub parks: Option<PathBuf>,

    /// Land-use polygon layer (GeoJSON), styled per `landuse`
    /// category.
    #[arg(long)]
    pub landuse: Option<PathBuf>,

    /// Water bodies polygon layer (GeoJSON).
    #[arg(long)]
    pub water: Option<PathBuf>,

    /// Output HTML file.
    #[arg(short, long)]
    pub out: PathBuf,
}
