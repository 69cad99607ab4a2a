use std::{fs, ops::Range, path::Path};

use crate::{
    BoundingBox, FormatError, PathCommand, Scaler, VeroOutlineError,
    buffer::{FontBuf, Tag},
    tables::{
        KnownTable, TableDirectory,
        cmap::{CharacterMapper, encoding, platform},
        glyf::SimpleGlyphOutline,
        head::Head,
        loca::GlyphLocator,
        maxp::Maxp,
    },
};

/// Choices made while opening a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOptions {
    /// Platform of the `cmap` subtable to use.
    pub platform_id: u16,
    /// Encoding of the `cmap` subtable to use.
    pub encoding_id: u16,
    /// Refuse fonts whose selected `cmap` subtable format is not decoded,
    /// instead of mapping every character to `.notdef`.
    pub strict_cmap: bool,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            platform_id: platform::WINDOWS,
            encoding_id: encoding::WINDOWS_UNICODE_BMP,
            strict_cmap: false,
        }
    }
}

impl FontOptions {
    pub fn with_encoding(mut self, platform_id: u16, encoding_id: u16) -> Self {
        self.platform_id = platform_id;
        self.encoding_id = encoding_id;
        self
    }

    pub fn with_strict_cmap(mut self, strict_cmap: bool) -> Self {
        self.strict_cmap = strict_cmap;
        self
    }
}

/// A parsed TrueType font.
///
/// Everything derived from the file is built once in [`Font::open`] and never
/// changes afterwards, so a `Font` can be shared between threads and queried
/// concurrently.
#[derive(Debug, Clone)]
pub struct Font {
    data: Vec<u8>,
    directory: TableDirectory,
    head: Head,
    maxp: Maxp,
    mapper: CharacterMapper,
    locator: GlyphLocator,
    /// Byte range of the `glyf` table within `data`.
    glyf: Range<usize>,
}

impl Font {
    /// Parses a font with the default [`FontOptions`].
    pub fn open(bytes: impl Into<Vec<u8>>) -> Result<Self, FormatError> {
        Self::open_with(bytes, FontOptions::default())
    }

    pub fn open_with(bytes: impl Into<Vec<u8>>, options: FontOptions) -> Result<Self, FormatError> {
        let data = bytes.into();
        let buf = FontBuf::new(&data);
        let directory = TableDirectory::parse(buf)?;

        let head = Head::read(table(buf, &directory, KnownTable::Head)?)?;
        if !(16..=16384).contains(&head.units_per_em) {
            return Err(FormatError::InvalidUnitsPerEm(head.units_per_em));
        }
        let maxp = Maxp::read(table(buf, &directory, KnownTable::Maxp)?)?;

        // each reader only ever sees its own table's bytes
        let loca = table(buf, &directory, KnownTable::Loca)?;
        let locator = GlyphLocator::new(loca, 0, maxp.num_glyphs, head.long_loca())?;

        let cmap = table(buf, &directory, KnownTable::Cmap)?;
        let mapper = CharacterMapper::new(cmap, 0, options.platform_id, options.encoding_id)?;
        if options.strict_cmap {
            mapper.ensure_supported()?;
        }

        // glyphs are sliced out of glyf lazily, check it lies inside the file now
        table(buf, &directory, KnownTable::Glyf)?;
        let glyf = directory.require(KnownTable::Glyf)?.range();
        log::debug!(
            "opened font: {} tables, {} glyphs, {} units per em, {} loca",
            directory.len(),
            maxp.num_glyphs,
            head.units_per_em,
            if head.long_loca() { "long" } else { "short" }
        );

        Ok(Self {
            data,
            directory,
            head,
            maxp,
            mapper,
            locator,
            glyf,
        })
    }

    /// Reads and parses the font file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VeroOutlineError> {
        Self::load_with(path, FontOptions::default())
    }

    pub fn load_with(path: impl AsRef<Path>, options: FontOptions) -> Result<Self, VeroOutlineError> {
        let data = fs::read(path)?;
        Ok(Self::open_with(data, options)?)
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }

    /// The union of all glyph boxes, in font units.
    pub fn bounding_box(&self) -> BoundingBox {
        self.head.bounding_box()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn mapper(&self) -> &CharacterMapper {
        &self.mapper
    }

    pub fn locator(&self) -> &GlyphLocator {
        &self.locator
    }

    /// Raw bytes of the table tagged `tag`, if present and in bounds.
    pub fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        let record = self.directory.record(tag)?;
        self.data.get(record.range())
    }

    /// Glyph id for `character`, 0 (`.notdef`) when it is not mapped.
    pub fn glyph_id(&self, character: u32) -> u32 {
        self.mapper.glyph_id(character)
    }

    /// The outline of `character` in font units, and its bounding box.
    ///
    /// Glyphs without outline data, like the space, give an empty path and a
    /// zero box.
    pub fn glyph(&self, character: u32) -> Result<(Vec<PathCommand>, BoundingBox), FormatError> {
        self.glyph_by_id(self.glyph_id(character))
    }

    pub fn glyph_by_id(&self, glyph_id: u32) -> Result<(Vec<PathCommand>, BoundingBox), FormatError> {
        let outline = self.outline(glyph_id)?;

        Ok((outline.to_path(), outline.bounding_box()))
    }

    /// The outline of `character` scaled to device units.
    pub fn scaled_glyph(
        &self,
        character: u32,
        scaler: &Scaler,
    ) -> Result<(Vec<PathCommand>, BoundingBox), FormatError> {
        let (path, bounds) = self.glyph(character)?;
        Ok((scaler.scale_path(&path), scaler.scale_bounds(bounds)))
    }

    /// Decodes the simple glyph outline for `glyph_id`.
    pub fn outline(&self, glyph_id: u32) -> Result<SimpleGlyphOutline, FormatError> {
        let range = self.locator.glyph_range(glyph_id)?;
        if range.is_empty() {
            log::trace!("glyph {glyph_id} has no outline data");
            return Ok(SimpleGlyphOutline::default());
        }

        let glyf = FontBuf::new(&self.data).slice(self.glyf.clone())?;
        let glyph = glyf
            .slice(range.start as usize..range.end as usize)
            .map_err(|_| FormatError::InvalidGlyphRange(glyph_id))?;

        SimpleGlyphOutline::decode(glyph, 0)
    }
}

/// A view over exactly the bytes of the `known` table.
fn table<'a>(
    data: FontBuf<'a>,
    directory: &TableDirectory,
    known: KnownTable,
) -> Result<FontBuf<'a>, FormatError> {
    data.slice(directory.require(known)?.range())
}
