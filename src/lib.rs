//! Reads TrueType outlines out of `sfnt` font files.
//!
//! The pipeline runs character → glyph id (`cmap`) → glyph address (`loca`)
//! → simple glyph outline (`glyf`) → path commands, optionally scaled from
//! font units into device space.
//!
//! ```no_run
//! use vero_outline::{Font, Scaler};
//!
//! let font = Font::load("DejaVuSans.ttf")?;
//! let (path, bounds) = font.glyph('A' as u32)?;
//!
//! let scaler = Scaler::new(96.0, 12.0, font.units_per_em())?;
//! let device_path = scaler.scale_path(&path);
//! # let _ = (bounds, device_path);
//! # Ok::<(), vero_outline::VeroOutlineError>(())
//! ```

use std::io;

use buffer::Tag;
use thiserror::Error;

pub mod buffer;
pub mod font;
pub mod path;
pub mod scale;
pub mod tables;

pub use font::{Font, FontOptions};
pub use path::{BoundingBox, PathCommand};
pub use scale::{Scaler, YDirection, scale};

/// Structural problems found while decoding font data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A structure ran past the end of the bytes it was read from.
    #[error("read at offset {offset} runs past the end of a {len} byte buffer")]
    Truncated { offset: usize, len: usize },

    /// A glyph id outside `[0, numGlyphs)`.
    #[error("glyph id {0} is out of range")]
    InvalidGlyphId(u32),

    /// No `cmap` encoding record matches the requested pair.
    #[error("no cmap subtable for platform {platform_id}, encoding {encoding_id}")]
    UnsupportedEncoding { platform_id: u16, encoding_id: u16 },

    /// The glyph has a negative contour count.
    #[error("composite glyphs are not supported")]
    CompositeUnsupported,

    /// The selected `cmap` subtable uses a format that is not decoded.
    ///
    /// Lookups never fail with this, they map everything to `.notdef`.
    #[error("cmap subtable format {0} is not supported")]
    UnsupportedCmapFormat(u16),

    #[error("required table '{0}' is missing")]
    MissingTable(Tag),

    #[error("unitsPerEm of {0} is invalid")]
    InvalidUnitsPerEm(u16),

    /// The `loca` entries for a glyph describe an impossible byte range.
    #[error("glyph {0} has an invalid location range")]
    InvalidGlyphRange(u32),

    #[error("malformed glyph: {0}")]
    MalformedGlyph(&'static str),
}

#[derive(Debug, Error)]
pub enum VeroOutlineError {
    #[error(transparent)]
    FormatError(#[from] FormatError),

    #[error(transparent)]
    IoError(#[from] io::Error),
}
