use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeogridError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("no georeferencing tags in {0}")]
    NoGeoTags(PathBuf),

    #[error("unsupported sample format in {0}")]
    UnsupportedSampleFormat(PathBuf),

    #[error("{0} cells do not fill a {1}x{2} grid")]
    CellCount(usize, usize, usize),

    #[error("geotransform is singular and cannot be inverted")]
    Singular,
}
