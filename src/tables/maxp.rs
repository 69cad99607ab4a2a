use crate::{
    FormatError,
    buffer::{Fixed, FontBuf},
};

/// The leading fields of the [maxp table](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp)
///
/// Only the glyph count is needed to size `loca`, the version 1.0 limits
/// that follow it are hinting hints and are not read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maxp {
    /// 0.5 for CFF outlines, 1.0 for TrueType outlines
    pub version: Fixed,
    pub num_glyphs: u16,
}

impl Maxp {
    pub fn read(data: FontBuf<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            version: data.read_fixed(0)?,
            num_glyphs: data.read_u16(4)?,
        })
    }
}
