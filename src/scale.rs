//! Conversion from font units to device units.

use crate::{BoundingBox, FormatError, PathCommand};

/// Points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Direction the device Y axis grows in.
///
/// Font units grow upward. Most raster surfaces grow downward and want
/// [`YDirection::Down`], which negates every Y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YDirection {
    #[default]
    Up,
    Down,
}

/// Scales font unit outlines to a device resolution and point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    dpi: f32,
    point_size: f32,
    units_per_em: u16,
    y_direction: YDirection,
}

impl Scaler {
    /// Fails with [`FormatError::InvalidUnitsPerEm`] when `units_per_em` is 0.
    pub fn new(dpi: f32, point_size: f32, units_per_em: u16) -> Result<Self, FormatError> {
        if units_per_em == 0 {
            return Err(FormatError::InvalidUnitsPerEm(units_per_em));
        }

        Ok(Self {
            dpi,
            point_size,
            units_per_em,
            y_direction: YDirection::Up,
        })
    }

    pub fn with_y_direction(mut self, y_direction: YDirection) -> Self {
        self.y_direction = y_direction;
        self
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn y_direction(&self) -> YDirection {
        self.y_direction
    }

    /// Device units per font unit, `dpi / 72 * point_size / units_per_em`.
    pub fn factor(&self) -> f32 {
        self.dpi / POINTS_PER_INCH * self.point_size / f32::from(self.units_per_em)
    }

    pub fn scale_point(&self, x: f32, y: f32) -> (f32, f32) {
        let factor = self.factor();
        match self.y_direction {
            YDirection::Up => (x * factor, y * factor),
            YDirection::Down => (x * factor, -y * factor),
        }
    }

    pub fn scale_path(&self, path: &[PathCommand]) -> Vec<PathCommand> {
        path.iter()
            .map(|command| command.map_points(|x, y| self.scale_point(x, y)))
            .collect()
    }

    /// Scales a box, keeping `min <= max` when Y is flipped.
    pub fn scale_bounds(&self, bounds: BoundingBox) -> BoundingBox {
        let (x_min, y0) = self.scale_point(bounds.x_min, bounds.y_min);
        let (x_max, y1) = self.scale_point(bounds.x_max, bounds.y_max);

        BoundingBox {
            x_min,
            y_min: y0.min(y1),
            x_max,
            y_max: y0.max(y1),
        }
    }
}

/// Scales `path` from font units to device units in one call.
pub fn scale(
    path: &[PathCommand],
    dpi: f32,
    point_size: f32,
    units_per_em: u16,
    y_direction: YDirection,
) -> Result<Vec<PathCommand>, FormatError> {
    let scaler = Scaler::new(dpi, point_size, units_per_em)?.with_y_direction(y_direction);

    Ok(scaler.scale_path(path))
}
