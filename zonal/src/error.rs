use geogrid::GeogridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZonalError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Geogrid(#[from] GeogridError),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("grid is {0:?} but ward mask is {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),

    #[error("duplicate ward id {0}")]
    DuplicateWardId(u8),

    #[error("ward id {0} does not fit a u8")]
    WardIdRange(i64),

    #[error("feature {0} has no {1} property")]
    MissingProperty(usize, String),

    #[error("ward {0} is not a polygon or multi-polygon")]
    UnsupportedGeometry(String),

    #[error("expected a GeoJSON feature collection")]
    NotAFeatureCollection,
}
