use std::collections::{BTreeMap, btree_map};

use crate::{
    FormatError,
    buffer::{FontBuf, Tag},
};

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod loca;
pub mod maxp;

/// The tables this crate knows how to find.
/// Every TrueType font carries these in its table directory.
/// For more information, see the [Apple Documentation Table 2](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownTable {
    Cmap,
    Glyf,
    Head,
    Hhea,
    Hmtx,
    Loca,
    Maxp,
    Name,
    Post,
}

impl KnownTable {
    pub const ALL: [KnownTable; 9] = [
        Self::Cmap,
        Self::Glyf,
        Self::Head,
        Self::Hhea,
        Self::Hmtx,
        Self::Loca,
        Self::Maxp,
        Self::Name,
        Self::Post,
    ];

    pub const fn tag(self) -> Tag {
        match self {
            Self::Cmap => Tag::new(b"cmap"),
            Self::Glyf => Tag::new(b"glyf"),
            Self::Head => Tag::new(b"head"),
            Self::Hhea => Tag::new(b"hhea"),
            Self::Hmtx => Tag::new(b"hmtx"),
            Self::Loca => Tag::new(b"loca"),
            Self::Maxp => Tag::new(b"maxp"),
            Self::Name => Tag::new(b"name"),
            Self::Post => Tag::new(b"post"),
        }
    }
}

impl TryFrom<Tag> for KnownTable {
    type Error = Tag;

    fn try_from(tag: Tag) -> Result<Self, Tag> {
        Self::ALL
            .into_iter()
            .find(|table| table.tag() == tag)
            .ok_or(tag)
    }
}

impl From<KnownTable> for Tag {
    fn from(table: KnownTable) -> Tag {
        table.tag()
    }
}

/// The offset subtable at the very start of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    pub sfnt_version: u32,
    pub num_tables: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl OffsetTable {
    /// Size of the offset subtable, the first table record follows it.
    pub const SIZE: usize = 12;

    pub fn read(data: FontBuf<'_>) -> Result<Self, FormatError> {
        let mut cursor = data.cursor_at(0);

        Ok(Self {
            sfnt_version: cursor.read_u32()?,
            num_tables: cursor.read_u16()?,
            search_range: cursor.read_u16()?,
            entry_selector: cursor.read_u16()?,
            range_shift: cursor.read_u16()?,
        })
    }
}

/// Where a table lives in the font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    /// Kept for inspection, it is not verified.
    pub checksum: u32,
    /// Offset of the table from the beginning of the file.
    pub offset: u32,
    /// Length of the table in bytes, not including padding.
    pub length: u32,
}

impl TableRecord {
    pub const SIZE: usize = 16;

    fn read(data: FontBuf<'_>, offset: usize) -> Result<Self, FormatError> {
        let mut cursor = data.cursor_at(offset);

        Ok(Self {
            tag: cursor.read_tag()?,
            checksum: cursor.read_u32()?,
            offset: cursor.read_u32()?,
            length: cursor.read_u32()?,
        })
    }

    /// The byte range this table occupies in the file.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start.saturating_add(self.length as usize)
    }
}

/// Maps every table tag in the font to its record.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    offset_table: OffsetTable,
    records: BTreeMap<Tag, TableRecord>,
}

impl TableDirectory {
    /// Parses the offset subtable and table records from the start of `data`.
    ///
    /// When a tag appears more than once the last record wins.
    pub fn parse(data: FontBuf<'_>) -> Result<Self, FormatError> {
        let offset_table = OffsetTable::read(data)?;
        let mut records = BTreeMap::new();

        for i in 0..usize::from(offset_table.num_tables) {
            let record = TableRecord::read(data, OffsetTable::SIZE + i * TableRecord::SIZE)?;
            log::trace!(
                "table '{}' at {} ({} bytes)",
                record.tag,
                record.offset,
                record.length
            );

            if let Some(previous) = records.insert(record.tag, record) {
                log::trace!(
                    "duplicate table '{}', replacing record at {}",
                    previous.tag,
                    previous.offset
                );
            }
        }

        Ok(Self {
            offset_table,
            records,
        })
    }

    pub fn offset_table(&self) -> &OffsetTable {
        &self.offset_table
    }

    pub fn record(&self, tag: Tag) -> Option<&TableRecord> {
        self.records.get(&tag)
    }

    pub fn require(&self, table: KnownTable) -> Result<&TableRecord, FormatError> {
        self.record(table.tag())
            .ok_or(FormatError::MissingTable(table.tag()))
    }

    /// Number of distinct tags, which can be less than `num_tables`.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRecord> {
        self.records.values()
    }
}

impl IntoIterator for TableDirectory {
    type Item = (Tag, TableRecord);

    type IntoIter = btree_map::IntoIter<Tag, TableRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
