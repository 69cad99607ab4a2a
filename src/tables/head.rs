use crate::{
    BoundingBox, FormatError,
    buffer::{Cursor, Fixed, FontBuf},
};

/// A representation of the [head table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6head.html)
#[derive(Debug, Clone, PartialEq)]
pub struct Head {
    /// The version of the head table
    /// it's almost guarenteed to be set to version 1.0
    pub version: Fixed,

    /// Font revision set by the font author/manufacturer
    pub font_revision: Fixed,

    /// Check sum adjustment, not verified here
    pub checksum_adjustment: u32,

    /// Magic number, obselete, always set to 0x5F0F3CF5
    pub magic_number: u32,

    /// The raw flags which guide font rendering and processing
    pub flags: u16,

    /// Units per em (ranges from 16 to 16384)
    pub units_per_em: u16,

    /// Date the font was created
    pub created: i64,

    /// Date the font was last modified
    pub modified: i64,

    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,

    pub mac_style: u16,

    /// Smallest readable size in pixel
    pub lowest_rec_ppem: u16,

    pub font_direction_hint: i16,

    /// Index to loc format, 0 for short offsets and 1 for long
    pub index_to_loc_format: i16,

    /// Glyph data format (0 is for the current format)
    pub glyph_data_format: i16,
}

impl Head {
    pub const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

    /// Reads the table from a view over exactly its bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`FormatError::Truncated`] when the view is shorter than the
    /// 54 bytes the table occupies.
    pub fn read(data: FontBuf<'_>) -> Result<Self, FormatError> {
        let mut cursor = data.cursor_at(0);

        Ok(Self {
            version: cursor.read_fixed()?,
            font_revision: cursor.read_fixed()?,
            checksum_adjustment: cursor.read_u32()?,
            magic_number: cursor.read_u32()?,
            flags: cursor.read_u16()?,
            units_per_em: cursor.read_u16()?,
            created: read_long_date_time(&mut cursor)?,
            modified: read_long_date_time(&mut cursor)?,
            x_min: cursor.read_i16()?,
            y_min: cursor.read_i16()?,
            x_max: cursor.read_i16()?,
            y_max: cursor.read_i16()?,
            mac_style: cursor.read_u16()?,
            lowest_rec_ppem: cursor.read_u16()?,
            font_direction_hint: cursor.read_i16()?,
            index_to_loc_format: cursor.read_i16()?,
            glyph_data_format: cursor.read_i16()?,
        })
    }

    /// `true` when `loca` stores 32 bit offsets.
    pub fn long_loca(&self) -> bool {
        self.index_to_loc_format != 0
    }

    /// The union of all glyph bounding boxes, in font units.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_funits(self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

fn read_long_date_time(cursor: &mut Cursor<'_>) -> Result<i64, FormatError> {
    let high = cursor.read_u32()? as u64;
    let low = cursor.read_u32()? as u64;

    Ok(((high << 32) | low) as i64)
}
