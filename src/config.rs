//! Tunable policy and styling, with defaults from [`crate::consts`].
//!
//! The browser host may override any subset of fields with a JSON object;
//! missing keys keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    ANNOTATE_PROMPT, CONFIRM_DELAY_MS, DELTA_THRESHOLD_X_PX, DELTA_THRESHOLD_Y_PX, DURATION_THRESHOLD_MS,
    EDIT_DELAY_MS, EDIT_PROMPT, FONT_FAMILY, FONT_SIZE, HIGHLIGHT_COLOR, HIGHLIGHT_FILL, STROKE_WIDTH, TAG_COLOR,
    TEXT_GAP,
};
use crate::error::{Error, Result};

/// Limits a gesture must exceed to count as a drag rather than a click.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RejectionThresholds {
    pub duration_ms: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for RejectionThresholds {
    fn default() -> Self {
        Self {
            duration_ms: DURATION_THRESHOLD_MS,
            dx: DELTA_THRESHOLD_X_PX,
            dy: DELTA_THRESHOLD_Y_PX,
        }
    }
}

/// Colours, widths, and font used for tags and the selection highlight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagStyle {
    pub tag_color: String,
    pub highlight_color: String,
    pub highlight_fill: String,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
    pub text_gap: f64,
}

impl Default for TagStyle {
    fn default() -> Self {
        Self {
            tag_color: TAG_COLOR.to_owned(),
            highlight_color: HIGHLIGHT_COLOR.to_owned(),
            highlight_fill: HIGHLIGHT_FILL.to_owned(),
            stroke_width: STROKE_WIDTH,
            font_size: FONT_SIZE,
            font_family: FONT_FAMILY.to_owned(),
            text_gap: TEXT_GAP,
        }
    }
}

impl TagStyle {
    /// CSS font shorthand for annotations, e.g. `"bold 24px sans-serif"`.
    #[must_use]
    pub fn font(&self) -> String {
        format!("bold {}px {}", self.font_size, self.font_family)
    }
}

/// Everything the tagger lets a host tune.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub thresholds: RejectionThresholds,
    /// Pause before the annotation prompt so the user can inspect the selection.
    pub confirm_delay_ms: u32,
    /// Pause before the edit prompt after clicking a tag.
    pub edit_delay_ms: u32,
    pub annotate_prompt: String,
    pub edit_prompt: String,
    pub style: TagStyle,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            thresholds: RejectionThresholds::default(),
            confirm_delay_ms: CONFIRM_DELAY_MS,
            edit_delay_ms: EDIT_DELAY_MS,
            annotate_prompt: ANNOTATE_PROMPT.to_owned(),
            edit_prompt: EDIT_PROMPT.to_owned(),
            style: TagStyle::default(),
        }
    }
}

impl TaggerConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON and
    /// [`Error::Config`] when a threshold or size is negative or not finite.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric fields are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("thresholds.duration_ms", self.thresholds.duration_ms),
            ("thresholds.dx", self.thresholds.dx),
            ("thresholds.dy", self.thresholds.dy),
            ("style.stroke_width", self.style.stroke_width),
            ("style.font_size", self.style.font_size),
            ("style.text_gap", self.style.text_gap),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}
