#![cfg(target_arch = "wasm32")]

use review_core::{DialogView, FocusRequest, SliderVisual};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

pub const DIALOG_ID: &str = "review-dialog";
pub const INPUT_ID: &str = "review-dialog-input";

const MARKUP: &str = r#"
<div class="popup-form">
  <h3 class="popup-heading"></h3>
  <input type="text" id="review-dialog-input" autocomplete="off">
  <div class="review-slider">
    <label for="review-dialog-range"></label>
    <div class="custom-slider">
      <div class="slider-track"><div class="slider-fill"></div></div>
      <div class="slider-thumb"></div>
      <input type="range" id="review-dialog-range">
    </div>
    <div class="slider-output"></div>
  </div>
  <div class="popup-buttons">
    <button type="button" class="cancel-btn">Cancel</button>
    <button type="button" class="update-btn">Update</button>
  </div>
</div>
"#;

/// Handles to the single dialog element tree appended to `<body>`.
pub struct DialogElements {
    pub overlay: HtmlElement,
    pub heading: Element,
    pub input: HtmlInputElement,
    pub slider_box: HtmlElement,
    pub slider_label: Element,
    pub range: HtmlInputElement,
    pub fill: HtmlElement,
    pub thumb: HtmlElement,
    pub output: HtmlElement,
    pub cancel: HtmlElement,
    pub update: HtmlElement,
}

fn find<T: JsCast>(root: &Element, selector: &str) -> Result<T, JsValue> {
    root.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("dialog is missing {selector}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("{selector} has an unexpected element type")))
}

fn show(element: &HtmlElement, visible: bool, display: &str) -> Result<(), JsValue> {
    element
        .style()
        .set_property("display", if visible { display } else { "none" })
}

impl DialogElements {
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no <body>"))?;

        let overlay = document.create_element("div")?;
        overlay.set_id(DIALOG_ID);
        overlay.set_class_name("popup-overlay review-dialog");
        overlay.set_inner_html(MARKUP);
        body.append_child(&overlay)?;

        Ok(Self {
            heading: find(&overlay, "h3")?,
            input: find(&overlay, &format!("#{INPUT_ID}"))?,
            slider_box: find(&overlay, ".review-slider")?,
            slider_label: find(&overlay, ".review-slider label")?,
            range: find(&overlay, "input[type=\"range\"]")?,
            fill: find(&overlay, ".slider-fill")?,
            thumb: find(&overlay, ".slider-thumb")?,
            output: find(&overlay, ".slider-output")?,
            cancel: find(&overlay, ".cancel-btn")?,
            update: find(&overlay, ".update-btn")?,
            overlay: overlay.dyn_into::<HtmlElement>()?,
        })
    }

    pub fn render(&self, view: &DialogView) -> Result<(), JsValue> {
        show(&self.overlay, view.visible, "flex")?;
        if !view.visible {
            return Ok(());
        }

        self.heading.set_text_content(Some(&view.heading));
        show(&self.input, view.input_visible, "block")?;
        if view.input_visible && self.input.value() != view.input_value {
            self.input.set_value(&view.input_value);
        }
        show(&self.cancel, view.cancel_visible, "inline-block")?;
        show(&self.update, view.update_visible, "inline-block")?;

        match &view.slider {
            Some(slider) => {
                show(&self.slider_box, true, "flex")?;
                self.render_slider(slider)?;
            }
            None => show(&self.slider_box, false, "flex")?,
        }
        Ok(())
    }

    pub fn render_slider(&self, slider: &SliderVisual) -> Result<(), JsValue> {
        let color = slider.color.to_string();
        let percent = format!("{:.2}%", slider.percent);

        self.slider_label.set_text_content(Some(&slider.label));
        self.range.set_min(&slider.min.to_string());
        self.range.set_max(&slider.max.to_string());
        self.range.set_step(&slider.step.to_string());
        self.range.set_value_as_number(slider.value);

        let fill = self.fill.style();
        fill.set_property("width", &percent)?;
        fill.set_property("background", &color)?;
        let thumb = self.thumb.style();
        thumb.set_property("left", &percent)?;
        thumb.set_property("background", &color)?;

        self.output.set_text_content(Some(&slider.readout));
        self.output.style().set_property("color", &color)?;
        self.overlay.style().set_property("--range-color", &color)
    }

    pub fn focus(&self, request: FocusRequest) -> Result<(), JsValue> {
        match request {
            FocusRequest::TextInput => {
                self.input.focus()?;
                self.input.select();
                Ok(())
            }
            FocusRequest::Slider => self.range.focus(),
        }
    }
}
