use thiserror::Error;

/// Failures scoped to a single tile file or feature.
///
/// None of these abort a run: the pipeline logs them and moves on to the
/// next file (or feature, for `UnsupportedGeometry`).
#[derive(Error, Debug)]
pub enum TileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("malformed tile: {0}")]
    Malformed(String),

    #[error("tile contains no layers")]
    EmptyTile,

    #[error("cannot derive tile coordinate from file name {0:?}")]
    NameParse(String),

    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(&'static str),
}

pub type StatusOr<T> = Result<T, TileError>;
