#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-review-ui]";

/// Default CSS for the edit dialog and slider, with overridable tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --review-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --review-overlay-bg: rgba(15, 23, 42, 0.45);
  --review-card-bg: #ffffff;
  --review-card-border: rgba(148, 163, 184, 0.28);
  --review-radius: 12px;
  --review-text: #1f2933;
  --review-muted: #52606d;
  --review-accent: #2563eb;
  --review-track: #e5e7eb;
  --range-color: rgb(128, 128, 128);
}

.review-dialog {
  position: fixed;
  inset: 0;
  display: none;
  align-items: center;
  justify-content: center;
  background: var(--review-overlay-bg);
  z-index: 1000;
  font-family: var(--review-font-family);
}

.review-dialog .popup-form {
  background: var(--review-card-bg);
  color: var(--review-text);
  border: 1px solid var(--review-card-border);
  border-radius: var(--review-radius);
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.18);
  padding: 24px;
  min-width: 320px;
  display: flex;
  flex-direction: column;
  gap: 14px;
}

.review-dialog h3 {
  margin: 0;
  font-size: 1.05rem;
}

.review-dialog #review-dialog-input {
  padding: 8px 10px;
  border: 1px solid var(--review-card-border);
  border-radius: 8px;
  font: inherit;
}

.review-dialog .popup-buttons {
  display: flex;
  justify-content: flex-end;
  gap: 8px;
}

.review-dialog .popup-buttons button {
  border: none;
  border-radius: 8px;
  padding: 6px 14px;
  font: inherit;
  cursor: pointer;
}

.review-dialog .update-btn {
  background: var(--review-accent);
  color: #ffffff;
}

.review-dialog .cancel-btn {
  background: var(--review-track);
  color: var(--review-text);
}

.review-slider {
  display: none;
  flex-direction: column;
  gap: 10px;
}

.review-slider label {
  color: var(--review-muted);
  font-size: 0.9rem;
}

.review-slider .custom-slider {
  position: relative;
  height: 22px;
}

.review-slider .slider-track {
  position: absolute;
  top: 8px;
  left: 0;
  right: 0;
  height: 6px;
  border-radius: 999px;
  background: var(--review-track);
  overflow: hidden;
}

.review-slider .slider-fill {
  height: 100%;
  width: 0%;
  background: var(--range-color);
}

.review-slider .slider-thumb {
  position: absolute;
  top: 2px;
  left: 0%;
  width: 18px;
  height: 18px;
  margin-left: -9px;
  border-radius: 50%;
  background: var(--range-color);
  box-shadow: 0 1px 4px rgba(15, 23, 42, 0.3);
  pointer-events: none;
}

.review-slider input[type="range"] {
  position: absolute;
  inset: 0;
  width: 100%;
  margin: 0;
  opacity: 0;
  cursor: pointer;
}

.review-slider .slider-output {
  font-size: 1.4rem;
  font-weight: 700;
  font-variant-numeric: tabular-nums;
  text-align: center;
}

.placeholder[data-full-url] {
  color: var(--review-accent);
  text-decoration: underline;
  cursor: pointer;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-review-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
