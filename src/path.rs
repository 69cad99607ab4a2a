//! Types describing a glyph outline once it has been decoded.

/// A single drawing command.
///
/// Coordinates are in font units when produced by [`Font::glyph`] and in
/// device units once passed through a [`Scaler`].
///
/// [`Font::glyph`]: crate::Font::glyph
/// [`Scaler`]: crate::Scaler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Begin a new contour at (x, y).
    MoveTo { x: f32, y: f32 },
    /// Straight line from the current point to (x, y).
    LineTo { x: f32, y: f32 },
    /// Quadratic bezier from the current point, with a control point at
    /// (cx, cy), ending at (x, y).
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    /// Close the current contour.
    Close,
}

impl PathCommand {
    /// Applies `f` to every coordinate pair carried by this command.
    pub fn map_points(self, mut f: impl FnMut(f32, f32) -> (f32, f32)) -> Self {
        match self {
            Self::MoveTo { x, y } => {
                let (x, y) = f(x, y);
                Self::MoveTo { x, y }
            }
            Self::LineTo { x, y } => {
                let (x, y) = f(x, y);
                Self::LineTo { x, y }
            }
            Self::QuadTo { cx, cy, x, y } => {
                let (cx, cy) = f(cx, cy);
                let (x, y) = f(x, y);
                Self::QuadTo { cx, cy, x, y }
            }
            Self::Close => Self::Close,
        }
    }
}

/// An axis aligned box, `min` corner inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn from_funits(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self {
            x_min: x_min.into(),
            y_min: y_min.into(),
            x_max: x_max.into(),
            y_max: y_max.into(),
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Collects commands as the contour walk emits them.
#[derive(Debug, Default)]
pub(crate) struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub(crate) fn move_to(&mut self, (x, y): (f32, f32)) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    pub(crate) fn line_to(&mut self, (x, y): (f32, f32)) {
        self.commands.push(PathCommand::LineTo { x, y });
    }

    pub(crate) fn quad_to(&mut self, (cx, cy): (f32, f32), (x, y): (f32, f32)) {
        self.commands.push(PathCommand::QuadTo { cx, cy, x, y });
    }

    pub(crate) fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub(crate) fn finish(self) -> Vec<PathCommand> {
        self.commands
    }
}
