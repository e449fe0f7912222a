//! sRGB hex colours and their conversion to Hue `xy` coordinates.

use std::fmt;
use std::str::FromStr;

/// An 8-bit-per-channel sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Returned when a string is not a `#rrggbb` colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a #rrggbb colour: {0}")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        Ok(Self {
            r: channel(0..2).map_err(|_| err())?,
            g: channel(2..4).map_err(|_| err())?,
            b: channel(4..6).map_err(|_| err())?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// D65 white point, used for black where chromaticity is undefined.
const WHITE_POINT: [f64; 2] = [0.3127, 0.3290];

impl Rgb {
    /// Convert to CIE 1931 `xy`, rounded to four decimals.
    ///
    /// Applies sRGB gamma expansion and the wide-gamut D65 matrix the
    /// bridge expects.
    #[must_use]
    pub fn to_xy(self) -> [f64; 2] {
        let expand = |c: u8| {
            let v = f64::from(c) / 255.0;
            if v > 0.040_45 {
                ((v + 0.055) / 1.055).powf(2.4)
            } else {
                v / 12.92
            }
        };
        let (r, g, b) = (expand(self.r), expand(self.g), expand(self.b));

        let x = r * 0.664_511 + g * 0.154_324 + b * 0.162_028;
        let y = r * 0.283_881 + g * 0.668_433 + b * 0.047_685;
        let z = r * 0.000_088 + g * 0.072_310 + b * 0.986_039;

        let sum = x + y + z;
        if sum <= f64::EPSILON {
            return WHITE_POINT;
        }
        let round = |v: f64| (v * 10_000.0).round() / 10_000.0;
        [round(x / sum), round(y / sum)]
    }
}
