use crate::{FormatError, buffer::FontBuf};

/// Platform identifiers used by `cmap` encoding records.
pub mod platform {
    pub const UNICODE: u16 = 0;
    pub const MACINTOSH: u16 = 1;
    /// Deprecated.
    pub const ISO: u16 = 2;
    pub const WINDOWS: u16 = 3;
    pub const CUSTOM: u16 = 4;
}

/// Platform specific encoding identifiers, grouped by platform.
pub mod encoding {
    pub const UNICODE_BMP: u16 = 3;
    pub const UNICODE_FULL: u16 = 4;
    pub const MACINTOSH_ROMAN: u16 = 0;
    pub const WINDOWS_SYMBOL: u16 = 0;
    pub const WINDOWS_UNICODE_BMP: u16 = 1;
    pub const WINDOWS_UNICODE_FULL: u16 = 10;
}

/// A `cmap` encoding record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingRecord {
    /// The platform identifier
    pub platform_id: u16,

    /// The platform specific encoding identifier
    pub encoding_id: u16,

    /// Offset of the mapping subtable from the start of `cmap`
    pub subtable_offset: u32,
}

impl EncodingRecord {
    const SIZE: usize = 8;
}

/// Segment mapping to delta values, format 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDeltaMap {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<u16>,
    id_range_offsets: Vec<u16>,
    /// Position of `idRangeOffset[0]` within `subtable`.
    id_range_offsets_pos: usize,
    /// The subtable through to the end of `cmap`, `idRangeOffset` values
    /// point into it.
    subtable: Vec<u8>,
}

impl SegmentDeltaMap {
    const HEADER_SIZE: usize = 14;

    fn read(data: FontBuf<'_>) -> Result<Self, FormatError> {
        let segments = usize::from(data.read_u16(6)? / 2);
        let mut cursor = data.cursor_at(Self::HEADER_SIZE);

        let end_codes = cursor.read_u16_array(segments)?;
        // reservedPad
        cursor.skip(2);
        let start_codes = cursor.read_u16_array(segments)?;
        let id_deltas = cursor.read_u16_array(segments)?;
        let id_range_offsets_pos = cursor.position();
        let id_range_offsets = cursor.read_u16_array(segments)?;

        Ok(Self {
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            id_range_offsets_pos,
            subtable: data.as_bytes().to_vec(),
        })
    }

    pub fn segment_count(&self) -> usize {
        self.end_codes.len()
    }

    /// Index of the segment containing `code`, segments are sorted by end code.
    fn segment_for(&self, code: u16) -> Option<usize> {
        let index = self.end_codes.partition_point(|&end| end < code);
        let start = *self.start_codes.get(index)?;

        (start <= code).then_some(index)
    }

    fn glyph_id(&self, character: u32) -> u32 {
        let Ok(code) = u16::try_from(character) else {
            return 0;
        };
        let Some(segment) = self.segment_for(code) else {
            return 0;
        };

        let delta = self.id_deltas[segment];
        let range_offset = self.id_range_offsets[segment];
        if range_offset == 0 {
            return u32::from(code.wrapping_add(delta));
        }

        // idRangeOffset is relative to its own slot in the idRangeOffset array
        let slot = self.id_range_offsets_pos + segment * 2;
        let position =
            slot + usize::from(range_offset) + usize::from(code - self.start_codes[segment]) * 2;
        match FontBuf::new(&self.subtable).read_u16(position) {
            Ok(0) | Err(_) => 0,
            Ok(glyph) => u32::from(glyph.wrapping_add(delta)),
        }
    }
}

/// Resolves characters to glyph ids for one `cmap` subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphIndexer {
    /// Byte encoding table, format 0.
    ByteMap(Box<[u8; 256]>),
    /// Segment mapping to delta values, format 4.
    SegmentDelta(SegmentDeltaMap),
    /// Any format that is not decoded, everything maps to `.notdef`.
    NotDef { format: u16 },
}

impl GlyphIndexer {
    /// Builds the indexer for the subtable starting at the beginning of `data`,
    /// which should end where the `cmap` table ends.
    pub fn read(data: FontBuf<'_>) -> Result<Self, FormatError> {
        let format = data.read_u16(0)?;

        match format {
            0 => {
                let mut indices = Box::new([0u8; 256]);
                indices.copy_from_slice(data.bytes_at(6, 256)?);
                Ok(Self::ByteMap(indices))
            }
            4 => {
                // the 16 bit length wraps in large subtables, so it is not
                // trusted and the glyph id array runs to the end of the data
                let length = data.read_u16(2)?;
                if usize::from(length) != data.len() {
                    log::trace!(
                        "cmap format 4 length {length} ignored, {} bytes available",
                        data.len()
                    );
                }
                Ok(Self::SegmentDelta(SegmentDeltaMap::read(data)?))
            }
            _ => {
                log::debug!("cmap subtable format {format} is not decoded, using .notdef");
                Ok(Self::NotDef { format })
            }
        }
    }

    pub fn format(&self) -> u16 {
        match self {
            Self::ByteMap(_) => 0,
            Self::SegmentDelta(_) => 4,
            Self::NotDef { format } => *format,
        }
    }

    /// Glyph id for `character`, 0 when it is not mapped.
    pub fn glyph_id(&self, character: u32) -> u32 {
        match self {
            Self::ByteMap(indices) => usize::try_from(character)
                .ok()
                .and_then(|index| indices.get(index))
                .map_or(0, |&glyph| u32::from(glyph)),
            Self::SegmentDelta(map) => map.glyph_id(character),
            Self::NotDef { .. } => 0,
        }
    }
}

/// A representation of the [cmap table](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
/// narrowed to the single subtable selected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMapper {
    /// The version of the cmap table, almost always zero
    version: u16,

    /// Every encoding record, kept for inspection
    records: Vec<EncodingRecord>,

    /// Index into `records` of the subtable in use
    selected: usize,

    indexer: GlyphIndexer,
}

impl CharacterMapper {
    /// Reads the `cmap` table at `cmap_offset` in `data` and selects the first
    /// subtable matching `platform_id` and `encoding_id`.
    ///
    /// `data` should end where the table does, subtables are read up to the
    /// end of `data`.
    ///
    /// # Errors
    ///
    /// [`FormatError::UnsupportedEncoding`] when no record matches, or
    /// [`FormatError::Truncated`] when the table or chosen subtable is cut short.
    /// An unsupported subtable format is not an error.
    pub fn new(
        data: FontBuf<'_>,
        cmap_offset: usize,
        platform_id: u16,
        encoding_id: u16,
    ) -> Result<Self, FormatError> {
        let cmap = data.split_off(cmap_offset)?;
        let version = cmap.read_u16(0)?;
        let num_tables = usize::from(cmap.read_u16(2)?);

        let records = (0..num_tables)
            .map(|i| -> Result<EncodingRecord, FormatError> {
                let mut cursor = cmap.cursor_at(4 + i * EncodingRecord::SIZE);
                Ok(EncodingRecord {
                    platform_id: cursor.read_u16()?,
                    encoding_id: cursor.read_u16()?,
                    subtable_offset: cursor.read_u32()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let selected = records
            .iter()
            .position(|r| r.platform_id == platform_id && r.encoding_id == encoding_id)
            .ok_or(FormatError::UnsupportedEncoding {
                platform_id,
                encoding_id,
            })?;

        let subtable = cmap.split_off(records[selected].subtable_offset as usize)?;
        let indexer = GlyphIndexer::read(subtable)?;
        log::debug!(
            "cmap: using platform {platform_id} encoding {encoding_id}, format {}",
            indexer.format()
        );

        Ok(Self {
            version,
            records,
            selected,
            indexer,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn encoding_records(&self) -> &[EncodingRecord] {
        &self.records
    }

    pub fn selected_record(&self) -> &EncodingRecord {
        &self.records[self.selected]
    }

    pub fn indexer(&self) -> &GlyphIndexer {
        &self.indexer
    }

    /// Format of the selected subtable.
    pub fn format(&self) -> u16 {
        self.indexer.format()
    }

    /// Fails when lookups would fall back to `.notdef` for every character.
    pub fn ensure_supported(&self) -> Result<(), FormatError> {
        match self.indexer {
            GlyphIndexer::NotDef { format } => Err(FormatError::UnsupportedCmapFormat(format)),
            _ => Ok(()),
        }
    }

    /// Glyph id for `character`. Never fails, unmapped characters give 0.
    pub fn glyph_id(&self, character: u32) -> u32 {
        self.indexer.glyph_id(character)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// (start, end, delta, range offset)
    type Segment = (u16, u16, i16, u16);

    fn format4(segments: &[Segment], glyph_ids: &[u16]) -> Vec<u8> {
        let seg_count = segments.len() as u16;
        let length = 16 + segments.len() * 8 + glyph_ids.len() * 2;
        let mut data = Vec::new();
        for value in [4, length as u16, 0, seg_count * 2, 0, 0, 0] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        for (_, end, _, _) in segments {
            data.extend_from_slice(&end.to_be_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        for (start, _, _, _) in segments {
            data.extend_from_slice(&start.to_be_bytes());
        }
        for (_, _, delta, _) in segments {
            data.extend_from_slice(&delta.to_be_bytes());
        }
        for (_, _, _, range_offset) in segments {
            data.extend_from_slice(&range_offset.to_be_bytes());
        }
        for glyph in glyph_ids {
            data.extend_from_slice(&glyph.to_be_bytes());
        }
        data
    }

    fn format0(indices: &[u8; 256]) -> Vec<u8> {
        let mut data = Vec::new();
        for value in [0u16, 262, 0] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        data.extend_from_slice(indices);
        data
    }

    fn cmap(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
        let mut offset = 4 + subtables.len() * EncodingRecord::SIZE;
        for (platform_id, encoding_id, subtable) in subtables {
            data.extend_from_slice(&platform_id.to_be_bytes());
            data.extend_from_slice(&encoding_id.to_be_bytes());
            data.extend_from_slice(&(offset as u32).to_be_bytes());
            offset += subtable.len();
        }
        for (_, _, subtable) in subtables {
            data.extend_from_slice(subtable);
        }
        data
    }

    fn windows_bmp(subtable: Vec<u8>) -> CharacterMapper {
        let data = cmap(&[(
            platform::WINDOWS,
            encoding::WINDOWS_UNICODE_BMP,
            subtable,
        )]);
        CharacterMapper::new(
            FontBuf::new(&data),
            0,
            platform::WINDOWS,
            encoding::WINDOWS_UNICODE_BMP,
        )
        .unwrap()
    }

    #[test]
    fn format4_single_segment_with_zero_delta() {
        let mapper = windows_bmp(format4(&[(65, 90, 0, 0), (0xFFFF, 0xFFFF, 1, 0)], &[]));

        assert_eq!(mapper.format(), 4);
        assert_eq!(mapper.glyph_id('A' as u32), 65);
        assert_eq!(mapper.glyph_id('Z' as u32), 90);
        assert_eq!(mapper.glyph_id('a' as u32), 0);
        assert_eq!(mapper.glyph_id('@' as u32), 0);
        // the terminal segment wraps to zero
        assert_eq!(mapper.glyph_id(0xFFFF), 0);
        assert_eq!(mapper.glyph_id(0x1_0041), 0);
    }

    #[test]
    fn format4_delta_is_modulo_65536() {
        let mapper = windows_bmp(format4(&[(0x20, 0x7E, -29, 0), (0xF000, 0xF002, 0x1000, 0)], &[]));

        assert_eq!(mapper.glyph_id(0x20), 3);
        assert_eq!(mapper.glyph_id(0x7E), 0x7E - 29);
        assert_eq!(mapper.glyph_id(0xF001), 0x0001);
    }

    #[test]
    fn format4_range_offset_is_relative_to_its_own_slot() {
        // segment 0's slot is three slots before the glyph array, segment 1's two
        let mapper = windows_bmp(format4(
            &[(0x41, 0x43, 5, 6), (0x61, 0x62, 0, 4 + 6), (0xFFFF, 0xFFFF, 1, 0)],
            &[10, 0, 12, 20, 21],
        ));

        let GlyphIndexer::SegmentDelta(map) = mapper.indexer() else {
            panic!("expected format 4, got {:?}", mapper.indexer());
        };
        assert_eq!(map.segment_count(), 3);
        assert_eq!(mapper.glyph_id(0x41), 15);
        // a zero in the glyph array stays unmapped regardless of delta
        assert_eq!(mapper.glyph_id(0x42), 0);
        assert_eq!(mapper.glyph_id(0x43), 17);
        assert_eq!(mapper.glyph_id(0x61), 20);
        assert_eq!(mapper.glyph_id(0x62), 21);
        assert_eq!(mapper.glyph_id(0x44), 0);
    }

    #[test]
    fn format4_length_is_not_trusted() {
        let mut subtable = format4(
            &[(0x41, 0x43, 5, 6), (0x61, 0x62, 0, 4 + 6), (0xFFFF, 0xFFFF, 1, 0)],
            &[10, 0, 12, 20, 21],
        );
        // a wrapped length covering little more than the header
        subtable[2..4].copy_from_slice(&16u16.to_be_bytes());
        let mapper = windows_bmp(subtable);

        assert_eq!(mapper.glyph_id(0x43), 17);
        assert_eq!(mapper.glyph_id(0x62), 21);
    }

    #[test]
    fn subtable_offset_past_the_table_is_truncated() {
        let mut data = cmap(&[(platform::WINDOWS, 1, format0(&[0; 256]))]);
        // point the record one byte past the end
        let past_end = data.len() as u32 + 1;
        data[8..12].copy_from_slice(&past_end.to_be_bytes());

        assert!(matches!(
            CharacterMapper::new(FontBuf::new(&data), 0, platform::WINDOWS, 1),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn format4_offsets_past_the_subtable_map_to_notdef() {
        let mapper = windows_bmp(format4(&[(0x41, 0x42, 0, 400), (0xFFFF, 0xFFFF, 1, 0)], &[]));

        assert_eq!(mapper.glyph_id(0x41), 0);
    }

    #[test]
    fn format4_characters_outside_segments_are_notdef() {
        let segments = [
            (0x30, 0x39, 7, 0),
            (0x41, 0x5A, 1, 0),
            (0x100, 0x1FF, 2, 0),
            (0xFFFF, 0xFFFF, 1, 0),
        ];
        let mapper = windows_bmp(format4(&segments, &[]));

        for character in 0..0x1_0000u32 {
            let inside = segments[..3]
                .iter()
                .any(|&(start, end, _, _)| (u32::from(start)..=u32::from(end)).contains(&character));
            assert_eq!(mapper.glyph_id(character) != 0, inside, "character {character:#x}");
        }
    }

    #[test]
    fn format0_maps_single_bytes() {
        let mut indices = [0u8; 256];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = (255 - i) as u8;
        }
        let mapper = windows_bmp(format0(&indices));

        assert_eq!(mapper.format(), 0);
        for character in 0..256u32 {
            assert_eq!(mapper.glyph_id(character), u32::from(indices[character as usize]));
        }
        assert_eq!(mapper.glyph_id(256), 0);
        assert_eq!(mapper.glyph_id(u32::MAX), 0);
    }

    #[test]
    fn unsupported_formats_fall_back_to_notdef() {
        let mut format12 = Vec::new();
        format12.extend_from_slice(&12u16.to_be_bytes());
        format12.extend_from_slice(&[0; 14]);
        let mapper = windows_bmp(format12);

        assert_eq!(mapper.format(), 12);
        assert_eq!(mapper.indexer(), &GlyphIndexer::NotDef { format: 12 });
        assert_eq!(mapper.glyph_id('A' as u32), 0);
        assert_eq!(mapper.glyph_id(0x1F600), 0);
        assert_eq!(mapper.ensure_supported(), Err(FormatError::UnsupportedCmapFormat(12)));
    }

    #[test]
    fn selects_first_matching_record() {
        let mut indices = [0u8; 256];
        indices[b'A' as usize] = 7;
        let data = cmap(&[
            (platform::UNICODE, encoding::UNICODE_BMP, format0(&[1; 256])),
            (platform::WINDOWS, encoding::WINDOWS_UNICODE_BMP, format0(&indices)),
            (platform::WINDOWS, encoding::WINDOWS_UNICODE_BMP, format0(&[2; 256])),
        ]);
        // put the table behind some unrelated bytes
        let mut font = vec![0xEE; 10];
        font.extend_from_slice(&data);

        let mapper = CharacterMapper::new(
            FontBuf::new(&font),
            10,
            platform::WINDOWS,
            encoding::WINDOWS_UNICODE_BMP,
        )
        .unwrap();

        assert_eq!(mapper.version(), 0);
        assert_eq!(mapper.encoding_records().len(), 3);
        assert_eq!(mapper.selected_record(), &mapper.encoding_records()[1]);
        assert_eq!(mapper.glyph_id('A' as u32), 7);
        assert_eq!(mapper.ensure_supported(), Ok(()));
    }

    #[test]
    fn missing_encoding_is_reported() {
        let data = cmap(&[(platform::MACINTOSH, encoding::MACINTOSH_ROMAN, format0(&[0; 256]))]);

        assert_eq!(
            CharacterMapper::new(FontBuf::new(&data), 0, platform::WINDOWS, 1),
            Err(FormatError::UnsupportedEncoding {
                platform_id: platform::WINDOWS,
                encoding_id: 1,
            })
        );
    }

    #[test]
    fn truncated_subtable_fails() {
        let mut subtable = format0(&[0; 256]);
        subtable.truncate(100);
        let data = cmap(&[(platform::WINDOWS, 1, subtable)]);

        assert!(matches!(
            CharacterMapper::new(FontBuf::new(&data), 0, platform::WINDOWS, 1),
            Err(FormatError::Truncated { .. })
        ));
    }
}
