//! Cubie and sticker data structures.
//!
//! This module defines the 27 sub-cubes ("cubies") that make up a 3x3x3 puzzle,
//! the colored stickers glued to their outer sides, and the color palette used
//! to draw them.

use std::str::FromStr;

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::ColorSchemeError;
use crate::math::{rotation_x, rotation_z};

/// Distance from a cubie's center to the plane its stickers sit on
const STICKER_DISTANCE: f32 = 0.96;

/// Spacing between neighboring cubie centers in model space
pub(crate) const CUBIE_SPACING: f32 = 2.0;

/// Position of a cubie in the `cubes[r][g][b]` grid.
///
/// This never changes once the cubie is built; it is the cubie's identity.
pub(crate) type GridIndex = [usize; 3];

/// Sticker colors of a standard cube, plus the neutral and key colors used by
/// partial sticker patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Color {
    Red,
    Green,
    White,
    Orange,
    Blue,
    Yellow,
    /// Neutral color for positions a pattern leaves unspecified
    Gray,
    Black,
}

impl Color {
    /// Decodes a single-letter color code (`r g w o b y x k`).
    pub(crate) fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'w' => Some(Color::White),
            'o' => Some(Color::Orange),
            'b' => Some(Color::Blue),
            'y' => Some(Color::Yellow),
            'x' => Some(Color::Gray),
            'k' => Some(Color::Black),
            _ => None,
        }
    }
}

/// RGBA values for every sticker color.
/// RGBA used to draw each [`Color`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorScheme {
    pub(crate) red: Vector4<f32>,
    pub(crate) green: Vector4<f32>,
    pub(crate) white: Vector4<f32>,
    pub(crate) orange: Vector4<f32>,
    pub(crate) blue: Vector4<f32>,
    pub(crate) yellow: Vector4<f32>,
    pub(crate) gray: Vector4<f32>,
    pub(crate) black: Vector4<f32>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            blue: Vector4::new(0.1, 0.1, 1.0, 1.0),
            green: Vector4::new(0.1, 0.7, 0.1, 1.0),
            orange: Vector4::new(1.0, 0.5, 0.0, 1.0),
            red: Vector4::new(0.8, 0.1, 0.1, 1.0),
            white: Vector4::new(1.0, 1.0, 1.0, 1.0),
            yellow: Vector4::new(1.0, 1.0, 0.1, 1.0),
            gray: Vector4::new(0.5, 0.5, 0.5, 1.0),
            black: Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Parses one `RRGGBB` or `RRGGBBAA` hex color, with an optional `#`.
fn parse_hex_color(text: &str) -> Result<Vector4<f32>, ColorSchemeError> {
    let invalid = || ColorSchemeError::InvalidColor(text.to_string());
    let hex = text.strip_prefix('#').unwrap_or(text);
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut rgba = [255u8; 4];
    for (channel, i) in rgba.iter_mut().zip((0..hex.len()).step_by(2)) {
        *channel = u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())?;
    }
    Ok(Vector4::from(rgba.map(|c| f32::from(c) / 255.0)))
}

impl FromStr for ColorScheme {
    type Err = ColorSchemeError;

    /// Eight hex colors in `r g w o b y x k` order, separated by commas or
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colors = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(parse_hex_color)
            .collect::<Result<Vec<_>, _>>()?;
        let [red, green, white, orange, blue, yellow, gray, black] = colors[..] else {
            return Err(ColorSchemeError::WrongCount(colors.len()));
        };
        Ok(Self {
            red,
            green,
            white,
            orange,
            blue,
            yellow,
            gray,
            black,
        })
    }
}

impl ColorScheme {
    pub(crate) fn rgba(&self, color: Color) -> Vector4<f32> {
        match color {
            Color::Red => self.red,
            Color::Green => self.green,
            Color::White => self.white,
            Color::Orange => self.orange,
            Color::Blue => self.blue,
            Color::Yellow => self.yellow,
            Color::Gray => self.gray,
            Color::Black => self.black,
        }
    }
}

/// Colored face glued to one side of a cubie.
#[derive(Clone, Debug)]
pub(crate) struct Sticker {
    /// Current color, replaced when a sticker pattern is applied
    pub(crate) color: Color,
    /// Placement relative to the parent cubie's frame
    placement: Matrix4<f32>,
}

impl Sticker {
    fn new(color: Color, offset: Vector3<f32>, rotation: Matrix4<f32>) -> Self {
        Self {
            color,
            placement: Matrix4::new_translation(&offset) * rotation,
        }
    }

    pub(crate) fn placement(&self) -> &Matrix4<f32> {
        &self.placement
    }
}

/// One of the 27 unit sub-cubes of the puzzle.
///
/// Cubies never move between grid cells: turning a layer changes their
/// `coordinates` and accumulated `orientation` instead.
#[derive(Clone, Debug)]
pub(crate) struct Cubie {
    index: GridIndex,
    /// Current grid coordinates, each component in `{-1, 0, 1}`
    pub(crate) coordinates: Vector3<f32>,
    /// Rotation accumulated over every turn this cubie took part in
    pub(crate) orientation: Matrix4<f32>,
    /// Stickers in x, y, z order of the sides they were built on
    pub(crate) stickers: Vec<Sticker>,
}

impl Cubie {
    /// Creates the cubie for grid cell `index` in its solved position.
    ///
    /// Stickers are attached to every side whose coordinate is `±1`.
    pub(crate) fn new(index: GridIndex) -> Self {
        let coordinates = Vector3::new(
            index[0] as f32 - 1.0,
            index[1] as f32 - 1.0,
            index[2] as f32 - 1.0,
        );

        let mut stickers = Vec::with_capacity(3);
        let d = STICKER_DISTANCE;
        if index[0] == 0 {
            stickers.push(Sticker::new(Color::Red, Vector3::new(-d, 0.0, 0.0), rotation_z(90.0)));
        } else if index[0] == 2 {
            stickers.push(Sticker::new(Color::Orange, Vector3::new(d, 0.0, 0.0), rotation_z(-90.0)));
        }
        if index[1] == 0 {
            stickers.push(Sticker::new(Color::Yellow, Vector3::new(0.0, -d, 0.0), rotation_x(-180.0)));
        } else if index[1] == 2 {
            stickers.push(Sticker::new(Color::White, Vector3::new(0.0, d, 0.0), Matrix4::identity()));
        }
        if index[2] == 2 {
            stickers.push(Sticker::new(Color::Blue, Vector3::new(0.0, 0.0, d), rotation_x(90.0)));
        } else if index[2] == 0 {
            stickers.push(Sticker::new(Color::Green, Vector3::new(0.0, 0.0, -d), rotation_x(-90.0)));
        }

        Self {
            index,
            coordinates,
            orientation: Matrix4::identity(),
            stickers,
        }
    }

    pub(crate) fn index(&self) -> GridIndex {
        self.index
    }

    /// The invisible core is the only cubie without stickers.
    pub(crate) fn is_core(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Unique color identifying this cubie in the picking pass.
    pub(crate) fn pick_color(&self) -> Vector4<f32> {
        Vector4::new(
            self.index[0] as f32 / 3.0,
            self.index[1] as f32 / 3.0,
            self.index[2] as f32 / 3.0,
            1.0,
        )
    }

    /// Model transform: accumulated rotation applied after the translation to
    /// the cubie's home cell.
    pub(crate) fn model_matrix(&self) -> Matrix4<f32> {
        let home = Vector3::new(
            self.index[0] as f32 - 1.0,
            self.index[1] as f32 - 1.0,
            self.index[2] as f32 - 1.0,
        ) * CUBIE_SPACING;
        self.orientation * Matrix4::new_translation(&home)
    }
}

/// Builds the full 3x3x3 grid, indexed as `cubes[r][g][b]`.
pub(crate) fn build_grid() -> [[[Cubie; 3]; 3]; 3] {
    std::array::from_fn(|r| std::array::from_fn(|g| std::array::from_fn(|b| Cubie::new([r, g, b]))))
}
