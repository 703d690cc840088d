//! Score → colour mapping used by the slider fill, thumb and readout.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Plain 8-bit RGB triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form, handy for CSS custom properties.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

pub const GRAY: Rgb = Rgb::new(128, 128, 128);
pub const BLUE: Rgb = Rgb::new(0, 102, 255);
pub const PURPLE: Rgb = Rgb::new(128, 0, 255);
pub const PINK_RED: Rgb = Rgb::new(255, 102, 102);
pub const RED: Rgb = Rgb::new(255, 0, 0);

/// Anchors at p = 0, 0.25, 0.5, 0.75, 1.
const ANCHORS: [Rgb; 5] = [GRAY, BLUE, PURPLE, PINK_RED, RED];

/// Closed numeric interval a score is normalised against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.is_nan() || span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// How a slider colours itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Gray → blue → purple → pink-red → red.
    Gradient,
    Flat(Rgb),
}

impl ColorScheme {
    pub fn color_for(self, value: f64, range: ScoreRange) -> Rgb {
        match self {
            ColorScheme::Gradient => color_for(value, range),
            ColorScheme::Flat(color) => color,
        }
    }
}

/// Maps `value` to a colour by interpolating over four equal-width segments.
///
/// Exactly `min` (and anything normalising to zero) yields [`GRAY`]. Segment
/// ends are inclusive on the upper side, so `p = 0.75` lands on [`PINK_RED`].
pub fn color_for(value: f64, range: ScoreRange) -> Rgb {
    let p = range.fraction(value);
    if p == 0.0 {
        return GRAY;
    }

    let segment = ((p / 0.25).ceil() as usize).clamp(1, 4) - 1;
    let local = (p - segment as f64 * 0.25) / 0.25;
    lerp(ANCHORS[segment], ANCHORS[segment + 1], local)
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb {
        r: lerp_channel(from.r, to.r, t),
        g: lerp_channel(from.g, to.g, t),
        b: lerp_channel(from.b, to.b, t),
    }
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = from as f64 + (to as f64 - from as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CVSS: ScoreRange = ScoreRange::new(0.0, 10.0);

    #[test]
    fn min_is_gray() {
        assert_eq!(color_for(0.0, CVSS), GRAY);
        assert_eq!(color_for(1.0, ScoreRange::new(1.0, 48.0)), GRAY);
    }

    #[test]
    fn anchors_land_on_segment_boundaries() {
        assert_eq!(color_for(2.5, CVSS), BLUE);
        assert_eq!(color_for(5.0, CVSS), PURPLE);
        assert_eq!(color_for(7.5, CVSS), PINK_RED);
        assert_eq!(color_for(10.0, CVSS), RED);
    }

    #[test]
    fn interpolates_inside_segment() {
        // halfway between gray and blue
        assert_eq!(color_for(1.25, CVSS), Rgb::new(64, 115, 192));
        // halfway between pink-red and red
        assert_eq!(color_for(8.75, CVSS), Rgb::new(255, 51, 51));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(color_for(-3.0, CVSS), GRAY);
        assert_eq!(color_for(42.0, CVSS), RED);
    }

    #[test]
    fn degenerate_range_is_gray() {
        assert_eq!(color_for(5.0, ScoreRange::new(3.0, 3.0)), GRAY);
    }

    #[test]
    fn renders_css_forms() {
        assert_eq!(PINK_RED.to_string(), "rgb(255, 102, 102)");
        assert_eq!(PINK_RED.to_hex(), "#ff6666");
    }

    #[test]
    fn flat_scheme_ignores_value() {
        let scheme = ColorScheme::Flat(BLUE);
        assert_eq!(scheme.color_for(9.0, CVSS), BLUE);
    }
}
