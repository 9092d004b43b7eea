//! Colours and colormaps.
//!
//! Colormaps are piecewise-linear gradients over a small table of stops,
//! sampled with a normalized value in `[0, 1]`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{Result, ViewerError};

/// An 8-bit RGBA colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Neutral line colour for plots without colour data
    pub const GRAY: Rgba = Rgba::rgb(128, 128, 128);

    /// Opaque colour from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same colour with its alpha multiplied by `alpha` in `[0, 1]`
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parse `#rrggbb`, `#rrggbbaa` or a basic colour name.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ViewerError::InvalidColor(text.to_string()));
        }
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "gray" | "grey" => Self::GRAY,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 165, 0),
            _ => return Err(ViewerError::InvalidColor(text.to_string())),
        };
        Ok(named)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form (alpha omitted when opaque)
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Named colormaps available for scalar colouring
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Turbo,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Jet,
    Hot,
    Cool,
    Gray,
}

const TURBO: &[[u8; 3]] = &[
    [48, 18, 59],
    [70, 107, 227],
    [40, 187, 236],
    [49, 242, 153],
    [162, 252, 60],
    [237, 208, 58],
    [251, 128, 34],
    [210, 49, 5],
    [122, 4, 3],
];

const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

const PLASMA: &[[u8; 3]] = &[
    [13, 8, 135],
    [84, 2, 163],
    [139, 10, 165],
    [185, 50, 137],
    [219, 92, 104],
    [244, 136, 73],
    [254, 188, 43],
    [240, 249, 33],
];

const INFERNO: &[[u8; 3]] = &[
    [0, 0, 4],
    [40, 11, 84],
    [101, 21, 110],
    [159, 42, 99],
    [212, 72, 66],
    [245, 125, 21],
    [250, 193, 39],
    [252, 255, 164],
];

const MAGMA: &[[u8; 3]] = &[
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const JET: &[[u8; 3]] = &[
    [0, 0, 128],
    [0, 0, 255],
    [0, 128, 255],
    [0, 255, 255],
    [128, 255, 128],
    [255, 255, 0],
    [255, 128, 0],
    [255, 0, 0],
    [128, 0, 0],
];

const HOT: &[[u8; 3]] = &[[10, 0, 0], [255, 0, 0], [255, 255, 0], [255, 255, 255]];

const COOL: &[[u8; 3]] = &[[0, 255, 255], [255, 0, 255]];

const GRAY: &[[u8; 3]] = &[[0, 0, 0], [255, 255, 255]];

impl Colormap {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            Self::Turbo => TURBO,
            Self::Viridis => VIRIDIS,
            Self::Plasma => PLASMA,
            Self::Inferno => INFERNO,
            Self::Magma => MAGMA,
            Self::Jet => JET,
            Self::Hot => HOT,
            Self::Cool => COOL,
            Self::Gray => GRAY,
        }
    }

    /// Map a normalized value to a colour. Values are clamped to `[0, 1]`;
    /// NaN maps to the low end.
    pub fn sample(self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.stops();
        let last = stops.len() - 1;
        let scaled = t * last as f32;
        let lo = (scaled.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        let frac = scaled - lo as f32;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).round() as u8;
        Rgba::rgb(
            lerp(stops[lo][0], stops[hi][0]),
            lerp(stops[lo][1], stops[hi][1]),
            lerp(stops[lo][2], stops[hi][2]),
        )
    }
}
