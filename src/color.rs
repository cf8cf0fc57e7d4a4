use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::Nucleotide;

/// 24-bit color, written as `#rrggbb` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other`; `amount` is clamped to [0, 1]
    pub fn mix(&self, other: Rgb, amount: f32) -> Rgb {
        let t = amount.max(0.0).min(1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::somewhere("color as #rrggbb", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb { r, g, b }),
            _ => Err(ParseError::somewhere("color as #rrggbb", s)),
        }
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// Display palette for nucleotides
///
/// Passed explicitly to the helix generator so geometry never depends on ambient theme state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMap {
    pub a: Rgb,
    pub c: Rgb,
    pub g: Rgb,
    pub t: Rgb,
    /// Used for helix points that have no base behind them (empty sequence)
    pub backbone: Rgb,
    /// How far the live edit target is lightened towards white
    pub edit_emphasis: f32,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            a: Rgb::new(0x4c, 0xaf, 0x50),
            c: Rgb::new(0x21, 0x96, 0xf3),
            g: Rgb::new(0xff, 0x98, 0x00),
            t: Rgb::new(0xf4, 0x43, 0x36),
            backbone: Rgb::new(0x9e, 0x9e, 0x9e),
            edit_emphasis: 0.35,
        }
    }
}

impl ColorMap {
    pub fn color(&self, base: Nucleotide, is_edit_target: bool) -> Rgb {
        let color = match base {
            Nucleotide::A => self.a,
            Nucleotide::C => self.c,
            Nucleotide::G => self.g,
            Nucleotide::T => self.t,
        };
        if is_edit_target {
            color.mix(WHITE, self.edit_emphasis)
        } else {
            color
        }
    }
}
