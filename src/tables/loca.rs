use std::ops::Range;

use crate::{FormatError, buffer::FontBuf};

/// Maps glyph ids to the address of their data within the `glyf` table.
///
/// Addresses are relative to the start of `glyf`. There are `numGlyphs + 1`
/// entries, the last one marks the end of the final glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphLocator {
    /// `indexToLocFormat == 0`, the stored value is half the address.
    ShortAddresses(Vec<u16>),
    /// `indexToLocFormat == 1`, the stored value is the address.
    LongAddresses(Vec<u32>),
}

impl GlyphLocator {
    /// Reads `num_glyphs + 1` entries starting at `loca_offset` in `data`.
    ///
    /// Pass the `loca` table's own bytes, a short table then fails with
    /// [`FormatError::Truncated`] instead of reading whatever follows it.
    pub fn new(
        data: FontBuf<'_>,
        loca_offset: usize,
        num_glyphs: u16,
        long_format: bool,
    ) -> Result<Self, FormatError> {
        let entries = usize::from(num_glyphs) + 1;
        let mut cursor = data.cursor_at(loca_offset);

        if long_format {
            let addresses = (0..entries)
                .map(|_| cursor.read_u32())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self::LongAddresses(addresses))
        } else {
            Ok(Self::ShortAddresses(cursor.read_u16_array(entries)?))
        }
    }

    /// Number of glyphs this locator can address.
    pub fn num_glyphs(&self) -> u32 {
        let entries = match self {
            Self::ShortAddresses(addresses) => addresses.len(),
            Self::LongAddresses(addresses) => addresses.len(),
        };
        entries.saturating_sub(1) as u32
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Self::LongAddresses(_))
    }

    /// Address of `glyph_id`'s data, valid for `0 <= glyph_id <= num_glyphs`.
    pub fn address_of(&self, glyph_id: u32) -> Result<u32, FormatError> {
        let index = glyph_id as usize;
        let address = match self {
            Self::ShortAddresses(addresses) => addresses.get(index).map(|&a| u32::from(a) * 2),
            Self::LongAddresses(addresses) => addresses.get(index).copied(),
        };

        address.ok_or(FormatError::InvalidGlyphId(glyph_id))
    }

    /// Byte range of `glyph_id`'s data within `glyf`.
    ///
    /// An empty range means the glyph has no outline.
    pub fn glyph_range(&self, glyph_id: u32) -> Result<Range<u32>, FormatError> {
        if glyph_id >= self.num_glyphs() {
            return Err(FormatError::InvalidGlyphId(glyph_id));
        }

        let start = self.address_of(glyph_id)?;
        let end = self.address_of(glyph_id + 1)?;
        if end < start {
            return Err(FormatError::InvalidGlyphRange(glyph_id));
        }

        Ok(start..end)
    }
}
