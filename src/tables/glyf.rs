//! Simple glyph outlines from the `glyf` table.
//!
//! See the [glyf table](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf)
//! for the layout decoded here.

use crate::{
    BoundingBox, FormatError, PathCommand,
    buffer::{Cursor, FontBuf},
    path::PathBuilder,
};

/// Bits of a simple glyph point flag.
pub mod flags {
    pub const ON_CURVE: u8 = 0x01;
    pub const X_SHORT_VECTOR: u8 = 0x02;
    pub const Y_SHORT_VECTOR: u8 = 0x04;
    /// The next byte holds how many more times this flag repeats.
    pub const REPEAT: u8 = 0x08;
    /// With `X_SHORT_VECTOR` the byte is positive, without it X is unchanged.
    pub const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
    /// With `Y_SHORT_VECTOR` the byte is positive, without it Y is unchanged.
    pub const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;
    /// Carried through, contours may overlap.
    pub const OVERLAP_SIMPLE: u8 = 0x40;
}

/// A decoded point in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPoint {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

impl GlyphPoint {
    pub const fn new(x: i16, y: i16, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    fn position(self) -> (f32, f32) {
        (self.x.into(), self.y.into())
    }
}

/// A glyph made of its own contours.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleGlyphOutline {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    /// Index of the last point of each contour.
    pub end_points_of_contours: Vec<u16>,
    /// One flag per point, repeats already expanded.
    pub flags: Vec<u8>,
    pub points: Vec<GlyphPoint>,
}

impl SimpleGlyphOutline {
    /// Decodes the glyph whose header starts at `offset` in `data`.
    ///
    /// Hinting instructions are skipped. The bounding box is taken from the
    /// header as is.
    pub fn decode(data: FontBuf<'_>, offset: usize) -> Result<Self, FormatError> {
        let mut cursor = data.cursor_at(offset);
        let number_of_contours = cursor.read_i16()?;
        let mut outline = Self {
            x_min: cursor.read_i16()?,
            y_min: cursor.read_i16()?,
            x_max: cursor.read_i16()?,
            y_max: cursor.read_i16()?,
            ..Self::default()
        };

        if number_of_contours < 0 {
            return Err(FormatError::CompositeUnsupported);
        }
        if number_of_contours == 0 {
            return Ok(outline);
        }

        let end_points = cursor.read_u16_array(number_of_contours as usize)?;
        let mut next_start = 0u32;
        for &end in &end_points {
            if u32::from(end) < next_start {
                return Err(FormatError::MalformedGlyph(
                    "contour end points are not increasing",
                ));
            }
            next_start = u32::from(end) + 1;
        }
        let num_points = next_start as usize;

        let instruction_length = cursor.read_u16()?;
        cursor.skip(instruction_length.into());

        let flags = read_flags(&mut cursor, num_points)?;
        let xs = read_coordinates(
            &mut cursor,
            &flags,
            flags::X_SHORT_VECTOR,
            flags::X_IS_SAME_OR_POSITIVE,
        )?;
        let ys = read_coordinates(
            &mut cursor,
            &flags,
            flags::Y_SHORT_VECTOR,
            flags::Y_IS_SAME_OR_POSITIVE,
        )?;

        outline.points = flags
            .iter()
            .zip(xs.into_iter().zip(ys))
            .map(|(flag, (x, y))| GlyphPoint::new(x, y, flag & flags::ON_CURVE != 0))
            .collect();
        outline.end_points_of_contours = end_points;
        outline.flags = flags;

        Ok(outline)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_funits(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    /// The points of each contour, in order.
    pub fn contours(&self) -> impl Iterator<Item = &[GlyphPoint]> + '_ {
        let mut start = 0;
        self.end_points_of_contours.iter().map(move |&end| {
            let end = (usize::from(end) + 1).min(self.points.len());
            let contour = &self.points[start.min(end)..end];
            start = end;
            contour
        })
    }

    /// Builds the path for this outline in font units.
    pub fn to_path(&self) -> Vec<PathCommand> {
        let mut path = PathBuilder::default();
        for contour in self.contours() {
            contour_path(contour, &mut path);
        }
        path.finish()
    }
}

fn read_flags(cursor: &mut Cursor<'_>, num_points: usize) -> Result<Vec<u8>, FormatError> {
    let mut flags = Vec::with_capacity(num_points);

    while flags.len() < num_points {
        let flag = cursor.read_u8()?;
        flags.push(flag);

        if flag & flags::REPEAT != 0 {
            let repeat = usize::from(cursor.read_u8()?);
            if flags.len() + repeat > num_points {
                return Err(FormatError::MalformedGlyph(
                    "flag repeat runs past the last point",
                ));
            }
            flags.extend(std::iter::repeat_n(flag, repeat));
        }
    }

    Ok(flags)
}

/// Reads one coordinate stream, X and Y use the same layout with different bits.
fn read_coordinates(
    cursor: &mut Cursor<'_>,
    flags: &[u8],
    short_vector: u8,
    same_or_positive: u8,
) -> Result<Vec<i16>, FormatError> {
    let mut value = 0i16;

    flags
        .iter()
        .map(|&flag| -> Result<i16, FormatError> {
            let delta = if flag & short_vector != 0 {
                let magnitude = i16::from(cursor.read_u8()?);
                if flag & same_or_positive != 0 {
                    magnitude
                } else {
                    -magnitude
                }
            } else if flag & same_or_positive != 0 {
                0
            } else {
                cursor.read_i16()?
            };
            value = value.wrapping_add(delta);
            Ok(value)
        })
        .collect()
}

fn midpoint((ax, ay): (f32, f32), (bx, by): (f32, f32)) -> (f32, f32) {
    ((ax + bx) / 2.0, (ay + by) / 2.0)
}

/// Emits one closed contour.
///
/// Consecutive off-curve points imply an on-curve point halfway between them.
/// When the contour starts off-curve it begins at the last point if that one
/// is on-curve, otherwise at the midpoint of the first and last points.
fn contour_path(points: &[GlyphPoint], path: &mut PathBuilder) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };

    let (start, mut pending, rest) = if first.on_curve {
        (first.position(), None, &points[1..])
    } else if last.on_curve {
        (last.position(), Some(first.position()), &points[1..points.len() - 1])
    } else {
        (
            midpoint(first.position(), last.position()),
            Some(first.position()),
            &points[1..],
        )
    };

    path.move_to(start);
    for point in rest {
        let position = point.position();
        match (point.on_curve, pending) {
            (true, None) => path.line_to(position),
            (true, Some(control)) => {
                path.quad_to(control, position);
                pending = None;
            }
            (false, None) => pending = Some(position),
            (false, Some(control)) => {
                path.quad_to(control, midpoint(control, position));
                pending = Some(position);
            }
        }
    }

    match pending {
        Some(control) => path.quad_to(control, start),
        None => path.line_to(start),
    }
    path.close();
}
