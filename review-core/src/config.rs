//! Form settings: timing, the close chord, URL display and extra fields.

use serde::{Deserialize, Serialize};

use crate::field::{FieldEntry, FieldRegistry};
use crate::status::StatusPalette;
use crate::url::DISPLAY_LIMIT;
use crate::ReviewError;

/// Key plus modifier state, as reported by a `keydown` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyChord {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    /// Key names compare case-insensitively; shift is ignored so that
    /// Ctrl+Shift+C still counts as Ctrl+C.
    pub fn matches(&self, pressed: &KeyChord) -> bool {
        self.key.eq_ignore_ascii_case(&pressed.key)
            && self.ctrl == pressed.ctrl
            && self.alt == pressed.alt
            && self.meta == pressed.meta
    }

    pub fn is_enter(&self) -> bool {
        self.key == "Enter"
    }
}

/// Tunables for the review form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Delay before focusing the dialog input once it is visible.
    pub focus_delay_ms: u32,
    /// Chord that dismisses an open dialog.
    pub close_key: KeyChord,
    /// Character cap for URL placeholders.
    pub truncate_len: usize,
    /// Text shown in a URL field after its value is cleared.
    pub url_placeholder: String,
    pub default_heading: String,
    pub status_palette: StatusPalette,
    /// Extra or overriding classification entries.
    pub fields: Vec<FieldEntry>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: 100,
            close_key: KeyChord::ctrl("c"),
            truncate_len: DISPLAY_LIMIT,
            url_placeholder: "Click to add".to_string(),
            default_heading: "Edit Field".to_string(),
            status_palette: StatusPalette::default(),
            fields: Vec::new(),
        }
    }
}

impl ReviewConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ReviewError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ReviewError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.truncate_len == 0 {
            return Err(ReviewError::Config("truncate_len must be positive".into()));
        }
        for entry in &self.fields {
            if let crate::field::FieldKind::BoundedNumeric(spec) = &entry.kind {
                let ordered = spec.min < spec.max;
                let stepped = spec.step > 0.0;
                if !ordered || !stepped {
                    return Err(ReviewError::Config(format!(
                        "field {} needs min < max and a positive step",
                        entry.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Standard table with the configured entries layered on top.
    pub fn registry(&self) -> FieldRegistry {
        let mut registry = FieldRegistry::standard();
        for entry in &self.fields {
            registry.insert(entry.clone());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::surface::AffordanceRole;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ReviewConfig::from_json_str(r#"{"focus_delay_ms": 0}"#).unwrap();
        assert_eq!(config.focus_delay_ms, 0);
        assert_eq!(config.close_key, KeyChord::ctrl("c"));
        assert_eq!(config.truncate_len, 16);
    }

    #[test]
    fn rejects_inverted_slider_range() {
        let json = r#"{"fields":[{"id":"x","kind":"bounded_numeric","min":5,"max":1,"step":1,"label":"x","title":"x"}]}"#;
        assert!(matches!(
            ReviewConfig::from_json_str(json),
            Err(ReviewError::Config(_))
        ));
    }

    #[test]
    fn configured_fields_extend_registry() {
        let mut config = ReviewConfig::default();
        config.fields.push(FieldEntry::new("cvss-value", FieldKind::Text));
        config.fields.push(FieldEntry::new("ticket-value", FieldKind::Url));
        let registry = config.registry();
        assert_eq!(
            registry.classify("cvss-value", AffordanceRole::Inline).kind,
            FieldKind::Text
        );
        assert_eq!(
            registry.classify("ticket-value", AffordanceRole::Inline).kind,
            FieldKind::Url
        );
    }

    #[test]
    fn close_chord_ignores_shift_and_case() {
        let close = KeyChord::ctrl("c");
        let mut pressed = KeyChord::ctrl("C");
        pressed.shift = true;
        assert!(close.matches(&pressed));
        assert!(!close.matches(&KeyChord::plain("c")));
    }
}
