//! Bounded numeric slider: snapping, wheel stepping and the visual state
//! shared by the native range input and the custom thumb/fill.

use serde::{Deserialize, Serialize};

use crate::color::{ColorScheme, Rgb, ScoreRange};

/// Wheel deltas above this move by `10 × step`.
pub const WHEEL_LARGE_DELTA: f64 = 100.0;
/// Wheel deltas above this move by `5 × step`.
pub const WHEEL_MEDIUM_DELTA: f64 = 50.0;

/// Static configuration for one bounded-numeric field kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Digits after the decimal point in the readout and the field text.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_color_scheme")]
    pub color_scheme: ColorScheme,
    pub label: String,
    pub title: String,
}

fn default_decimals() -> usize {
    1
}

fn default_color_scheme() -> ColorScheme {
    ColorScheme::Gradient
}

impl SliderSpec {
    /// CVSS base score, 0–10 in tenths.
    pub fn cvss() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
            step: 0.1,
            decimals: 1,
            unit: None,
            color_scheme: ColorScheme::Gradient,
            label: "CVSS Score (0–10, step 0.1):".to_string(),
            title: "Edit CVSS".to_string(),
        }
    }

    /// Remediation time estimate in hours, 1–48 in half hours.
    pub fn time_estimate() -> Self {
        Self {
            min: 1.0,
            max: 48.0,
            step: 0.5,
            decimals: 1,
            unit: Some("h".to_string()),
            color_scheme: ColorScheme::Gradient,
            label: "Time estimate (1–48 h, step 0.5):".to_string(),
            title: "Edit Time Estimate".to_string(),
        }
    }

    pub fn range(&self) -> ScoreRange {
        ScoreRange::new(self.min, self.max)
    }

    /// Largest value on the step grid that does not exceed `max`.
    pub fn grid_max(&self) -> f64 {
        if self.step <= 0.0 {
            return self.max;
        }
        let steps = ((self.max - self.min) / self.step + 1e-9).floor();
        self.tidy(self.min + self.step * steps)
    }

    /// `min + step * round((v - min) / step)`, clamped to `[min, grid_max]`
    /// so the result always stays on the grid.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        if self.step <= 0.0 {
            return self.tidy(value.min(self.max).max(self.min));
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.tidy(self.min + self.step * steps);
        snapped.min(self.grid_max()).max(self.min)
    }

    /// Magnitude of one wheel notch for the given scroll delta.
    pub fn wheel_step(&self, delta_y: f64) -> f64 {
        let intensity = delta_y.abs();
        if intensity > WHEEL_LARGE_DELTA {
            self.step * 10.0
        } else if intensity > WHEEL_MEDIUM_DELTA {
            self.step * 5.0
        } else {
            self.step
        }
    }

    /// Value text written into the field, e.g. `7.5`.
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    /// Live readout next to the slider, with the unit when there is one.
    pub fn format_readout(&self, value: f64) -> String {
        match &self.unit {
            Some(unit) => format!("{} {unit}", self.format_value(value)),
            None => self.format_value(value),
        }
    }

    pub fn parse_value(&self, text: &str) -> Result<f64, UnparseableNumeric> {
        parse_leading_number(text).ok_or_else(|| UnparseableNumeric(text.to_string()))
    }

    /// Rounds away float noise left by `step` arithmetic.
    fn tidy(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals.min(12) as i32 + 2);
        (value * scale).round() / scale
    }
}

/// Displayed text of a numeric field did not start with a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field value {0:?} is not numeric")]
pub struct UnparseableNumeric(pub String);

/// Accepts the numeric prefix of `text` (`"7.5"`, `"12 h"`, `"-0.5"`).
fn parse_leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => end = idx + 1,
            '-' | '+' if idx == 0 => end = idx + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            _ => break,
        }
    }
    trimmed[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Everything the two slider surfaces need to render the same value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SliderVisual {
    pub value: f64,
    /// Thumb position and fill width, `0..=100`.
    pub percent: f64,
    pub color: Rgb,
    pub readout: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub label: String,
}

/// Live slider bound to one open numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    spec: SliderSpec,
    value: f64,
}

impl SliderState {
    /// Starts from the field's displayed text, falling back to `spec.min`.
    pub fn open(spec: SliderSpec, displayed: &str) -> Self {
        let value = match spec.parse_value(displayed) {
            Ok(parsed) => spec.snap(parsed),
            Err(err) => {
                log::debug!("{err}; starting slider at {}", spec.min);
                spec.min
            }
        };
        Self { spec, value }
    }

    pub fn spec(&self) -> &SliderSpec {
        &self.spec
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Applies drag/input from the range surface. Returns the snapped value.
    pub fn input(&mut self, raw: f64) -> f64 {
        self.value = self.spec.snap(raw);
        self.value
    }

    /// Applies a wheel event. Negative deltas (scroll up) increase the value.
    /// Returns `true` when the value moved.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let step = self.spec.wheel_step(delta_y);
        let direction = if delta_y < 0.0 { 1.0 } else { -1.0 };
        let previous = self.value;
        self.value = self.spec.snap(previous + direction * step);
        self.value != previous
    }

    pub fn field_text(&self) -> String {
        self.spec.format_value(self.value)
    }

    pub fn visual(&self) -> SliderVisual {
        let range = self.spec.range();
        SliderVisual {
            value: self.value,
            percent: range.fraction(self.value) * 100.0,
            color: self.spec.color_scheme.color_for(self.value, range),
            readout: self.spec.format_readout(self.value),
            min: self.spec.min,
            max: self.spec.max,
            step: self.spec.step,
            label: self.spec.label.clone(),
        }
    }
}
