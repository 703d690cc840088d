//! Framework-neutral WASM <-> JavaScript bridge for the review form.

use review_core::{
    color_for, normalize_url, FieldEntry, KeyChord, ReviewConfig, ReviewError, ScoreRange,
    StatusPalette,
};
use review_page::{load_page_value, Action, ReviewSession};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct JsReviewConfig {
    #[serde(default)]
    focus_delay_ms: Option<u32>,
    #[serde(default)]
    close_key: Option<KeyChord>,
    #[serde(default)]
    truncate_len: Option<usize>,
    #[serde(default)]
    url_placeholder: Option<String>,
    #[serde(default)]
    default_heading: Option<String>,
    #[serde(default)]
    status_palette: Option<StatusPalette>,
    #[serde(default)]
    fields: Option<Vec<FieldEntry>>,
}

impl From<JsReviewConfig> for ReviewConfig {
    fn from(cfg: JsReviewConfig) -> Self {
        let mut base = ReviewConfig::default();
        if let Some(delay) = cfg.focus_delay_ms {
            base.focus_delay_ms = delay;
        }
        if let Some(chord) = cfg.close_key {
            base.close_key = chord;
        }
        if let Some(len) = cfg.truncate_len {
            base.truncate_len = len;
        }
        if let Some(text) = cfg.url_placeholder {
            base.url_placeholder = text;
        }
        if let Some(heading) = cfg.default_heading {
            base.default_heading = heading;
        }
        if let Some(palette) = cfg.status_palette {
            base.status_palette = palette;
        }
        if let Some(fields) = cfg.fields {
            base.fields = fields;
        }
        base
    }
}

fn read_config(config: Option<JsValue>) -> Result<ReviewConfig, JsValue> {
    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsReviewConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?;
            ReviewConfig::from(cfg)
        }
        _ => ReviewConfig::default(),
    };
    cfg.validate().map_err(to_js_error)?;
    Ok(cfg)
}

fn to_js_error(err: ReviewError) -> JsValue {
    JsValue::from_str(&format_review_error(err))
}

fn format_review_error(err: ReviewError) -> String {
    format!("Review form error: {err}")
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Cannot serialize result: {err}")))
}

/// CSS `rgb(...)` colour for a score inside `[min, max]`.
#[wasm_bindgen(js_name = colorFor)]
pub fn color_for_score(value: f64, min: f64, max: f64) -> String {
    color_for(value, ScoreRange::new(min, max)).to_string()
}

#[wasm_bindgen(js_name = normalizeUrl)]
pub fn normalize_url_js(input: &str) -> String {
    normalize_url(input)
}

#[wasm_bindgen(js_name = truncateForDisplay)]
pub fn truncate_for_display_js(url: &str) -> String {
    review_core::truncate_for_display(url)
}

/// Headless review form: a page description plus its controllers.
#[wasm_bindgen(js_name = ReviewSession)]
pub struct JsReviewSession {
    inner: ReviewSession,
}

#[wasm_bindgen(js_class = ReviewSession)]
impl JsReviewSession {
    #[wasm_bindgen(constructor)]
    pub fn new(page: JsValue, config: Option<JsValue>) -> Result<JsReviewSession, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let page_value = from_value::<serde_json::Value>(page)
            .map_err(|err| JsValue::from_str(&format!("Cannot read page JSON: {err}")))?;
        let page = load_page_value(&page_value).map_err(to_js_error)?;
        let config = read_config(config)?;

        Ok(Self {
            inner: ReviewSession::new(page, &config),
        })
    }

    /// Applies one action object (`{ action: "open", affordance: "..." }`)
    /// and returns its report.
    pub fn apply(&mut self, action: JsValue) -> Result<JsValue, JsValue> {
        let action: Action = from_value(action)
            .map_err(|err| JsValue::from_str(&format!("Cannot read action: {err}")))?;
        let report = self.inner.apply(&action).map_err(to_js_error)?;
        to_js(&report)
    }

    pub fn open(&mut self, affordance: &str) -> Result<JsValue, JsValue> {
        self.run(Action::Open {
            affordance: affordance.to_string(),
        })
    }

    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.run(Action::Input {
            text: text.to_string(),
        })
    }

    pub fn commit(&mut self) -> Result<JsValue, JsValue> {
        self.run(Action::Commit)
    }

    pub fn cancel(&mut self) -> Result<JsValue, JsValue> {
        self.run(Action::Cancel)
    }

    /// `reason` is `"backdrop"`, `"cancel_button"` or `"close_key"`.
    pub fn dismiss(&mut self, reason: JsValue) -> Result<JsValue, JsValue> {
        let reason = from_value(reason)
            .map_err(|err| JsValue::from_str(&format!("Cannot read dismissal: {err}")))?;
        self.run(Action::Dismiss { reason })
    }

    #[wasm_bindgen(js_name = sliderInput)]
    pub fn slider_input(&mut self, value: f64) -> Result<JsValue, JsValue> {
        self.run(Action::Slide { value })
    }

    pub fn wheel(&mut self, delta_y: f64) -> Result<JsValue, JsValue> {
        self.run(Action::Wheel { delta_y })
    }

    pub fn key(&mut self, chord: JsValue) -> Result<JsValue, JsValue> {
        let chord: KeyChord = from_value(chord)
            .map_err(|err| JsValue::from_str(&format!("Cannot read key: {err}")))?;
        self.run(Action::Key(chord))
    }

    #[wasm_bindgen(js_name = clickPlaceholder)]
    pub fn click_placeholder(&mut self, field_id: &str) -> Result<JsValue, JsValue> {
        self.run(Action::ClickPlaceholder {
            field_id: field_id.to_string(),
        })
    }

    #[wasm_bindgen(js_name = clickStatus)]
    pub fn click_status(&mut self, status: &str) -> Result<JsValue, JsValue> {
        self.run(Action::ClickStatus {
            status: status.to_string(),
        })
    }

    /// Current dialog render state.
    pub fn dialog(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.dialog())
    }

    /// Current page state.
    pub fn page(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }
}

impl JsReviewSession {
    fn run(&mut self, action: Action) -> Result<JsValue, JsValue> {
        let report = self.inner.apply(&action).map_err(to_js_error)?;
        to_js(&report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_merges_over_defaults() {
        let cfg: JsReviewConfig =
            serde_json::from_str(r#"{"truncate_len": 24, "close_key": {"key": "Escape"}}"#)
                .unwrap();
        let merged = ReviewConfig::from(cfg);
        assert_eq!(merged.truncate_len, 24);
        assert_eq!(merged.close_key, KeyChord::plain("Escape"));
        assert_eq!(merged.focus_delay_ms, 100);
        assert_eq!(merged.url_placeholder, "Click to add");
    }

    #[test]
    fn heading_and_extra_fields_are_kept() {
        let cfg: JsReviewConfig = serde_json::from_str(
            r#"{
                "default_heading": "Edit value",
                "fields": [{"id": "priority-value", "kind": "bounded_numeric",
                            "min": 1, "max": 5, "step": 1, "decimals": 0,
                            "label": "Priority", "title": "Edit Priority"}]
            }"#,
        )
        .unwrap();
        let merged = ReviewConfig::from(cfg);
        assert_eq!(merged.default_heading, "Edit value");
        assert_eq!(merged.fields.len(), 1);
        assert!(merged
            .registry()
            .get("priority-value")
            .is_some_and(|entry| entry.kind.is_numeric()));
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<JsReviewConfig>(r#"{"feilds": []}"#).is_err());
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(
            ReviewConfig::from(JsReviewConfig::default()),
            ReviewConfig::default()
        );
    }

    #[test]
    fn pure_helpers_match_core() {
        assert_eq!(color_for_score(7.5, 0.0, 10.0), "rgb(255, 102, 102)");
        assert_eq!(normalize_url_js("example.com"), "https://example.com");
        assert_eq!(
            truncate_for_display_js("https://jira.example.com/TICKET-123"),
            "jira.example.com..."
        );
    }

    #[test]
    fn errors_are_prefixed() {
        assert_eq!(
            format_review_error(ReviewError::UnknownStatus("lost".into())),
            "Review form error: unknown status: lost"
        );
    }
}
