use std::fmt;
use std::ops::Range;

use crate::FormatError;

macro_rules! impl_read {
    ($fn_name:ident, $typ:ty) => {
        #[doc = concat!("Reads a big-endian `", stringify!($typ), "` at `offset`.")]
        pub fn $fn_name(&self, offset: usize) -> Result<$typ, FormatError> {
            let bytes = self.bytes_at(offset, size_of::<$typ>())?;
            let mut raw = [0u8; size_of::<$typ>()];
            raw.copy_from_slice(bytes);

            Ok(<$typ>::from_be_bytes(raw))
        }
    };
}

macro_rules! impl_cursor_read {
    ($fn_name:ident, $typ:ty) => {
        #[doc = concat!("Reads a big-endian `", stringify!($typ), "` and advances past it.")]
        pub fn $fn_name(&mut self) -> Result<$typ, FormatError> {
            let value = self.data.$fn_name(self.pos)?;
            self.pos += <$typ as BeSize>::SIZE;

            Ok(value)
        }
    };
}

/// Byte width of every scalar the cursor knows how to read.
trait BeSize {
    const SIZE: usize;
}

macro_rules! impl_be_size {
    ($($typ:ty => $size:expr),* $(,)?) => {
        $(impl BeSize for $typ { const SIZE: usize = $size; })*
    };
}

impl_be_size!(
    u8 => 1, i8 => 1, u16 => 2, i16 => 2, u32 => 4, i32 => 4,
    Fixed => 4, F2Dot14 => 2, Tag => 4,
);

/// Signed 16.16 fixed point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(pub i32);

impl Fixed {
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }
}

/// Signed 2.14 fixed point number, used for unit vectors and scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct F2Dot14(pub i16);

impl F2Dot14 {
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 16384.0
    }
}

/// A four byte table tag, packed big-endian into a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*bytes))
    }

    /// Builds a tag from its four bytes, as stored in the file.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            // tags are printable ASCII in well formed fonts, escape anything else
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// An immutable view over font bytes.
///
/// Every read takes an explicit offset relative to the start of the view,
/// there is no position stored here. Views are `Copy`, so a table parser can
/// hand out sub-views of its own bytes without sharing any state.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontBuf<'a> {
    bytes: &'a [u8],
}

impl<'a> FontBuf<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns a sub-view over `range`, failing if it does not fit.
    pub fn slice(&self, range: Range<usize>) -> Result<FontBuf<'a>, FormatError> {
        let len = range.end.saturating_sub(range.start);
        self.bytes_at(range.start, len).map(FontBuf::new)
    }

    /// Returns the view starting at `offset` and running to the end.
    pub fn split_off(&self, offset: usize) -> Result<FontBuf<'a>, FormatError> {
        self.bytes
            .get(offset..)
            .map(FontBuf::new)
            .ok_or(FormatError::Truncated {
                offset,
                len: self.bytes.len(),
            })
    }

    /// Returns `len` raw bytes starting at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], FormatError> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(FormatError::Truncated {
                offset,
                len: self.bytes.len(),
            })
    }

    /// Creates a short-lived cursor positioned at `offset`.
    pub fn cursor_at(&self, offset: usize) -> Cursor<'a> {
        Cursor {
            data: *self,
            pos: offset,
        }
    }

    impl_read!(read_u8, u8);
    impl_read!(read_i8, i8);
    impl_read!(read_u16, u16);
    impl_read!(read_i16, i16);
    impl_read!(read_u32, u32);
    impl_read!(read_i32, i32);

    /// Reads a big-endian 24 bit unsigned integer at `offset`.
    pub fn read_u24(&self, offset: usize) -> Result<u32, FormatError> {
        let bytes = self.bytes_at(offset, 3)?;

        Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    pub fn read_fixed(&self, offset: usize) -> Result<Fixed, FormatError> {
        self.read_i32(offset).map(Fixed)
    }

    pub fn read_f2dot14(&self, offset: usize) -> Result<F2Dot14, FormatError> {
        self.read_i16(offset).map(F2Dot14)
    }

    pub fn read_tag(&self, offset: usize) -> Result<Tag, FormatError> {
        self.read_u32(offset).map(Tag::from_u32)
    }
}

/// A position into a [`FontBuf`] owned by a single parsing call.
///
/// Cursors are created on the stack by whoever is parsing and dropped when
/// that parse finishes. They are never stored inside a table or shared.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: FontBuf<'a>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// The current position, relative to the start of the underlying view.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves to an absolute position in the underlying view.
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_outline::buffer::FontBuf;
    ///
    /// let data = [0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut cursor = FontBuf::new(&data).cursor_at(0);
    ///
    /// cursor.seek_to(4);
    /// assert_eq!(cursor.read_u32().unwrap(), 20);
    /// ```
    pub fn seek_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skips `n` bytes from the current position.
    ///
    /// Skipping past the end is not an error by itself, the next read fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_outline::buffer::FontBuf;
    ///
    /// let data = [0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut cursor = FontBuf::new(&data).cursor_at(0);
    ///
    /// assert_eq!(cursor.read_u32().unwrap(), 10);
    /// cursor.skip(4);
    /// assert!(cursor.read_u32().is_err());
    /// ```
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    /// Returns the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let bytes = self.data.bytes_at(self.pos, len)?;
        self.pos += len;

        Ok(bytes)
    }

    /// Reads `count` big-endian `u16` values.
    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>, FormatError> {
        let bytes = self.read_bytes(count.saturating_mul(2))?;

        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect())
    }

    impl_cursor_read!(read_u8, u8);
    impl_cursor_read!(read_i8, i8);
    impl_cursor_read!(read_u16, u16);
    impl_cursor_read!(read_i16, i16);
    impl_cursor_read!(read_u32, u32);
    impl_cursor_read!(read_i32, i32);
    impl_cursor_read!(read_fixed, Fixed);
    impl_cursor_read!(read_f2dot14, F2Dot14);
    impl_cursor_read!(read_tag, Tag);
}
