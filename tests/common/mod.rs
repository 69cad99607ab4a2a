//! Builds small synthetic fonts for the integration tests.

#![allow(dead_code)]

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assembles an sfnt file from raw tables.
#[derive(Default)]
pub struct FontBuilder {
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.push((*tag, data));
        self
    }

    pub fn without(mut self, tag: &[u8; 4]) -> Self {
        self.tables.retain(|(t, _)| t != tag);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut font = Vec::new();
        font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        font.extend_from_slice(&(self.tables.len() as u16).to_be_bytes());
        font.extend_from_slice(&[0; 6]);

        let mut offset = 12 + self.tables.len() * 16;
        for (tag, data) in &self.tables {
            font.extend_from_slice(tag);
            font.extend_from_slice(&0u32.to_be_bytes());
            font.extend_from_slice(&(offset as u32).to_be_bytes());
            font.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }
        for (_, data) in &self.tables {
            font.extend_from_slice(data);
            font.resize(padded_len(font.len()), 0);
        }
        font
    }
}

/// Rewrites the length of the `tag` table record in a built font, leaving the
/// table bytes where they are.
pub fn set_table_length(font: &mut [u8], tag: &[u8; 4], length: u32) {
    let num_tables = usize::from(u16::from_be_bytes([font[4], font[5]]));
    let record = (0..num_tables)
        .map(|i| 12 + i * 16)
        .find(|&record| &font[record..record + 4] == tag)
        .unwrap_or_else(|| panic!("no {} record", String::from_utf8_lossy(tag)));
    font[record + 12..record + 16].copy_from_slice(&length.to_be_bytes());
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn push_u16s(data: &mut Vec<u8>, values: &[u16]) {
    for value in values {
        data.extend_from_slice(&value.to_be_bytes());
    }
}

fn push_i16s(data: &mut Vec<u8>, values: &[i16]) {
    for value in values {
        data.extend_from_slice(&value.to_be_bytes());
    }
}

pub fn head(units_per_em: u16, long_loca: bool, bounds: [i16; 4]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    push_u16s(&mut data, &[0, units_per_em]);
    data.extend_from_slice(&[0; 16]);
    push_i16s(&mut data, &bounds);
    push_u16s(&mut data, &[0, 8]);
    push_i16s(&mut data, &[2, i16::from(long_loca), 0]);
    data
}

pub fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut data = 0x0000_5000u32.to_be_bytes().to_vec();
    push_u16s(&mut data, &[num_glyphs]);
    data
}

/// A `cmap` with a single subtable.
pub fn cmap(platform_id: u16, encoding_id: u16, subtable: Vec<u8>) -> Vec<u8> {
    let mut data = Vec::new();
    push_u16s(&mut data, &[0, 1, platform_id, encoding_id]);
    data.extend_from_slice(&12u32.to_be_bytes());
    data.extend_from_slice(&subtable);
    data
}

/// Format 4 subtable from (start, end, delta) segments, the 0xFFFF
/// terminator is appended.
pub fn cmap_format4(segments: &[(u16, u16, i16)]) -> Vec<u8> {
    let mut segments = segments.to_vec();
    segments.push((0xFFFF, 0xFFFF, 1));
    let seg_count = segments.len() as u16;

    let mut data = Vec::new();
    push_u16s(&mut data, &[4, 16 + seg_count * 8, 0, seg_count * 2, 0, 0, 0]);
    push_u16s(&mut data, &segments.iter().map(|s| s.1).collect::<Vec<_>>());
    push_u16s(&mut data, &[0]);
    push_u16s(&mut data, &segments.iter().map(|s| s.0).collect::<Vec<_>>());
    push_i16s(&mut data, &segments.iter().map(|s| s.2).collect::<Vec<_>>());
    push_u16s(&mut data, &vec![0; segments.len()]);
    data
}

/// Format 12 subtable header, which is not decoded.
pub fn cmap_format12() -> Vec<u8> {
    let mut data = Vec::new();
    push_u16s(&mut data, &[12, 0]);
    data.extend_from_slice(&16u32.to_be_bytes());
    data.extend_from_slice(&[0; 8]);
    data
}

/// A single contour simple glyph, every coordinate stored as a word delta.
pub fn simple_glyph(points: &[(i16, i16, bool)]) -> Vec<u8> {
    let xs = points.iter().map(|p| p.0);
    let ys = points.iter().map(|p| p.1);
    let bounds = [
        xs.clone().min().unwrap_or(0),
        ys.clone().min().unwrap_or(0),
        xs.max().unwrap_or(0),
        ys.max().unwrap_or(0),
    ];

    let mut data = Vec::new();
    push_i16s(&mut data, &[1]);
    push_i16s(&mut data, &bounds);
    push_u16s(&mut data, &[points.len() as u16 - 1, 0]);
    data.extend(points.iter().map(|p| u8::from(p.2)));
    for axis in [0, 1] {
        let mut previous = 0i16;
        for &(x, y, _) in points {
            let value = if axis == 0 { x } else { y };
            push_i16s(&mut data, &[value - previous]);
            previous = value;
        }
    }
    data
}

pub fn composite_glyph() -> Vec<u8> {
    let mut data = Vec::new();
    push_i16s(&mut data, &[-1, 0, 0, 500, 700]);
    // ARGS_ARE_XY_VALUES, glyph 0, byte offsets
    push_u16s(&mut data, &[0x0002, 0]);
    data.extend_from_slice(&[10, 20]);
    data
}

pub fn loca(addresses: &[u32], long: bool) -> Vec<u8> {
    let mut data = Vec::new();
    for &address in addresses {
        if long {
            data.extend_from_slice(&address.to_be_bytes());
        } else {
            push_u16s(&mut data, &[(address / 2) as u16]);
        }
    }
    data
}

/// Concatenates glyphs into a `glyf` table, returning it with the `loca`
/// addresses. Odd length glyphs are padded so short offsets stay exact.
pub fn glyf(glyphs: &[Vec<u8>]) -> (Vec<u8>, Vec<u32>) {
    let mut table = Vec::new();
    let mut addresses = vec![0];
    for glyph in glyphs {
        table.extend_from_slice(glyph);
        if table.len() % 2 == 1 {
            table.push(0);
        }
        addresses.push(table.len() as u32);
    }
    (table, addresses)
}

pub const NOTDEF: [(i16, i16, bool); 4] = [
    (0, 0, true),
    (500, 0, true),
    (500, 700, true),
    (0, 700, true),
];

/// on, off, off, on
pub const LETTER_A: [(i16, i16, bool); 4] = [
    (0, 0, true),
    (100, 200, false),
    (300, 200, false),
    (400, 0, true),
];

/// Glyph ids: 0 `.notdef`, 1 'A', 2 composite mapped from 'B', 3 space.
/// 'C' maps to glyph 9, which does not exist.
pub fn test_font_builder(long_loca: bool) -> FontBuilder {
    let (glyf_table, addresses) = glyf(&[
        simple_glyph(&NOTDEF),
        simple_glyph(&LETTER_A),
        composite_glyph(),
        Vec::new(),
    ]);
    let segments = [(0x20, 0x20, 3 - 0x20), (0x41, 0x42, -0x40), (0x43, 0x43, 9 - 0x43)];

    FontBuilder::new()
        .table(b"cmap", cmap(3, 1, cmap_format4(&segments)))
        .table(b"glyf", glyf_table)
        .table(b"head", head(1000, long_loca, [0, 0, 500, 700]))
        .table(b"loca", loca(&addresses, long_loca))
        .table(b"maxp", maxp(4))
        .table(b"post", vec![0; 32])
}

pub fn test_font(long_loca: bool) -> Vec<u8> {
    test_font_builder(long_loca).build()
}
