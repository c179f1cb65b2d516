use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Direction, GridCoord};

/// Problems with the grid or word list handed to us. Once a `GridConfig` exists, nothing in the
/// filling process can fail except by finding that there is no fill.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("grid template doesn't contain any cells")]
    EmptyTemplate,

    #[error("entry at {loc:?} ({dir}) has zero length")]
    ZeroLengthEntry { loc: GridCoord, dir: Direction },

    #[error("entry at {loc:?} ({dir}, length {len}) appears more than once")]
    DuplicateEntry {
        loc: GridCoord,
        dir: Direction,
        len: usize,
    },

    #[error("cell {0:?} is covered by more than two entries")]
    OvercrowdedCell(GridCoord),

    #[error("entries at {first:?} and {second:?} share more than one cell")]
    RepeatedCrossing { first: GridCoord, second: GridCoord },
}

/// Problems exporting a filled grid as an image.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read font {}: {}", .path.display(), .source)]
    FontIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a usable font: {}", .path.display(), .source)]
    InvalidFont {
        path: PathBuf,
        #[source]
        source: ab_glyph::InvalidFont,
    },

    #[error("failed to write image {}: {}", .path.display(), .source)]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
