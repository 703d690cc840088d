//! Browser binding for the incident review form.
//!
//! Attaches to an already rendered page: edit icons open the shared dialog,
//! sliders repaint the field as they move and status buttons toggle the
//! submission status.

#[cfg(target_arch = "wasm32")]
mod console_log;
#[cfg(target_arch = "wasm32")]
mod dialog;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dialog::DialogElements;
    use crate::dom::DomSurface;
    use crate::{console_log, styles};
    use review_core::{
        DialogView, KeyChord, KeyOrigin, KeyOutcome, ModalController, ReviewConfig, ReviewError,
        Status, StatusBoard, StatusChange, StatusPalette,
    };
    use serde_json::Value;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        AddEventListenerOptions, Document, Element, Event, HtmlInputElement, KeyboardEvent,
        MouseEvent, WheelEvent, Window,
    };

    const EDIT_ICON_SELECTOR: &str = ".edit-icon, .header-edit-icon, .edit-time-stamp";
    const STATUS_DISPLAY_SELECTOR: &str = "#submission-status-display, #current-status-display";
    const HIDDEN_STATUS_ID: &str = "current-status";

    struct App {
        modal: ModalController,
        statuses: StatusBoard,
        surface: DomSurface,
        dialog: Option<DialogElements>,
        focus_delay_ms: u32,
    }

    type Shared = Rc<RefCell<App>>;

    fn report(result: Result<(), JsValue>) {
        if let Err(err) = result {
            log::error!("review form: {err:?}");
        }
    }

    fn review_error(err: ReviewError) -> JsValue {
        JsValue::from_str(&format!("Review form error: {err}"))
    }

    /// Background colours defined by the host theme as `--status-*`
    /// variables, over the built-in palette.
    fn host_palette(window: &Window, document: &Document) -> StatusPalette {
        let mut palette = StatusPalette::default();
        let Some(root) = document.document_element() else {
            return palette;
        };
        let Ok(Some(computed)) = window.get_computed_style(&root) else {
            return palette;
        };
        for status in Status::ALL {
            if let Ok(value) = computed.get_property_value(&status.css_var()) {
                let value = value.trim();
                if !value.is_empty() {
                    palette = palette.with_color(status, value);
                }
            }
        }
        palette
    }

    fn read_config(
        config: Option<JsValue>,
        window: &Window,
        document: &Document,
    ) -> Result<ReviewConfig, JsValue> {
        let mut value = match config {
            Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
                from_value::<Value>(js_cfg)
                    .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?
            }
            _ => Value::Object(Default::default()),
        };

        if let Value::Object(map) = &mut value {
            if !map.contains_key("status_palette") {
                let palette = serde_json::to_value(host_palette(window, document))
                    .map_err(|err| JsValue::from_str(&format!("Cannot read palette: {err}")))?;
                map.insert("status_palette".to_string(), palette);
            }
        }

        let config: ReviewConfig = serde_json::from_value(value)
            .map_err(|err| JsValue::from_str(&format!("Cannot read config: {err}")))?;
        config.validate().map_err(review_error)?;
        Ok(config)
    }

    impl App {
        fn render(&self, view: &DialogView) -> Result<(), JsValue> {
            match &self.dialog {
                Some(dialog) => dialog.render(view),
                None => Ok(()),
            }
        }

        fn render_current(&self) -> Result<(), JsValue> {
            self.render(&self.modal.view())
        }
    }

    fn window() -> Result<Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))
    }

    fn alert(message: &str) {
        if let Ok(window) = window() {
            if let Err(err) = window.alert_with_message(message) {
                log::warn!("alert failed: {err:?}");
            }
        }
    }

    fn open_editor(app: &Shared, icon: &Element) -> Result<(), JsValue> {
        let mut guard = app.borrow_mut();
        let state = &mut *guard;

        let target = state.surface.target_for(icon);
        if state.modal.open(&state.surface, target).is_none() {
            return Ok(());
        }

        if state.dialog.is_none() {
            let elements = DialogElements::create(state.surface.document())?;
            attach_dialog_listeners(app, &elements)?;
            state.dialog = Some(elements);
        }
        state.render_current()?;

        if let Some(request) = state.modal.take_focus_request() {
            let app = Rc::clone(app);
            let focus = Closure::once_into_js(move || {
                if let Some(dialog) = app.borrow().dialog.as_ref() {
                    report(dialog.focus(request));
                }
            });
            window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
                focus.unchecked_ref::<js_sys::Function>(),
                state.focus_delay_ms as i32,
            )?;
        }
        Ok(())
    }

    fn follow_placeholder(app: &Shared, placeholder: &Element) -> Result<bool, JsValue> {
        let Some(owner) = placeholder.closest("[id]")? else {
            return Ok(false);
        };
        let intent = {
            let state = app.borrow();
            state.modal.click_placeholder(&state.surface, &owner.id())
        };
        let Some(intent) = intent else {
            return Ok(false);
        };
        alert(&format!("Placeholder: navigation to {}", intent.url));
        Ok(true)
    }

    fn paint_status(document: &Document, change: &StatusChange) -> Result<(), JsValue> {
        let buttons = document.query_selector_all(".status-button")?;
        for index in 0..buttons.length() {
            let Some(button) = buttons.item(index).and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let active = button.get_attribute("data-status").as_deref() == Some(change.status.key());
            button.class_list().toggle_with_force("active", active)?;
        }

        if let Some(display) = document.query_selector(STATUS_DISPLAY_SELECTOR)? {
            display.set_text_content(Some(&change.display_text));
            if let Some(display) = display.dyn_ref::<web_sys::HtmlElement>() {
                let style = display.style();
                style.set_property("background-color", &change.background)?;
                style.set_property("color", &change.foreground)?;
            }
        }

        if let Some(hidden) = change.hidden_value.as_deref() {
            if let Some(input) = document
                .get_element_by_id(HIDDEN_STATUS_ID)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value(hidden);
            }
        }
        Ok(())
    }

    fn click_status(app: &Shared, button: &Element) -> Result<(), JsValue> {
        let Some(key) = button.get_attribute("data-status") else {
            return Ok(());
        };
        let status = match key.parse::<Status>() {
            Ok(status) => status,
            Err(err) => {
                log::warn!("{err}");
                return Ok(());
            }
        };
        let caption = button.text_content().unwrap_or_default();
        let mut state = app.borrow_mut();
        let change = state.statuses.click_captioned(status, &caption);
        paint_status(state.surface.document(), &change)
    }

    fn handle_click(app: &Shared, event: &MouseEvent) -> Result<(), JsValue> {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return Ok(());
        };

        if let Some(placeholder) = target.closest(".placeholder[data-full-url]")? {
            if follow_placeholder(app, &placeholder)? {
                event.prevent_default();
                return Ok(());
            }
        }
        if let Some(icon) = target.closest(EDIT_ICON_SELECTOR)? {
            event.prevent_default();
            return open_editor(app, &icon);
        }
        if let Some(button) = target.closest(".status-button")? {
            return click_status(app, &button);
        }
        Ok(())
    }

    fn chord(event: &KeyboardEvent) -> KeyChord {
        KeyChord {
            key: event.key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        }
    }

    fn key_origin(dialog: Option<&DialogElements>, event: &KeyboardEvent) -> KeyOrigin {
        let from_input = dialog.zip(event.target()).is_some_and(|(dialog, target)| {
            target
                .dyn_ref::<web_sys::Node>()
                .is_some_and(|node| dialog.input.is_same_node(Some(node)))
        });
        if from_input {
            KeyOrigin::TextInput
        } else {
            KeyOrigin::Elsewhere
        }
    }

    fn handle_key(app: &Shared, event: &KeyboardEvent) -> Result<(), JsValue> {
        let mut guard = app.borrow_mut();
        let state = &mut *guard;
        let origin = key_origin(state.dialog.as_ref(), event);
        match state
            .modal
            .handle_key_from(&mut state.surface, &chord(event), origin)
        {
            Ok(KeyOutcome::Ignored) => Ok(()),
            Ok(outcome) => {
                if outcome.suppresses_default() {
                    event.prevent_default();
                }
                state.render_current()
            }
            Err(err) => {
                event.prevent_default();
                state.render_current()?;
                drop(guard);
                alert(&err.to_string());
                Ok(())
            }
        }
    }

    fn commit(app: &Shared) -> Result<(), JsValue> {
        let mut guard = app.borrow_mut();
        let state = &mut *guard;
        let result = state.modal.commit(&mut state.surface);
        state.render_current()?;
        drop(guard);
        if let Err(err) = result {
            alert(&err.to_string());
        }
        Ok(())
    }

    fn listen<F>(target: &web_sys::EventTarget, kind: &str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn attach_dialog_listeners(app: &Shared, dialog: &DialogElements) -> Result<(), JsValue> {
        {
            let app = Rc::clone(app);
            let overlay = dialog.overlay.clone();
            listen(&dialog.overlay, "click", move |event: Event| {
                let on_backdrop = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                    .is_some_and(|node| overlay.is_same_node(Some(&node)));
                if on_backdrop {
                    let mut state = app.borrow_mut();
                    state.modal.dismiss(review_core::Dismissal::Backdrop);
                    report(state.render_current());
                }
            })?;
        }
        {
            let app = Rc::clone(app);
            listen(&dialog.cancel, "click", move |_| {
                let mut state = app.borrow_mut();
                state.modal.dismiss(review_core::Dismissal::CancelButton);
                report(state.render_current());
            })?;
        }
        {
            let app = Rc::clone(app);
            listen(&dialog.update, "click", move |_| report(commit(&app)))?;
        }
        {
            let app = Rc::clone(app);
            let input = dialog.input.clone();
            listen(&dialog.input, "input", move |_| {
                app.borrow_mut().modal.set_input(&input.value());
            })?;
        }
        {
            let app = Rc::clone(app);
            let range = dialog.range.clone();
            listen(&dialog.range, "input", move |_| {
                let mut guard = app.borrow_mut();
                let state = &mut *guard;
                let raw = range.value_as_number();
                if let Some(visual) = state.modal.slider_input(&mut state.surface, raw) {
                    if let Some(dialog) = state.dialog.as_ref() {
                        report(dialog.render_slider(&visual));
                    }
                }
            })?;
        }

        let app = Rc::clone(app);
        let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
            let mut guard = app.borrow_mut();
            let state = &mut *guard;
            let outcome = state.modal.wheel(&mut state.surface, event.delta_y());
            if !outcome.consumed {
                return;
            }
            event.prevent_default();
            if let (Some(visual), Some(dialog)) = (outcome.slider, state.dialog.as_ref()) {
                report(dialog.render_slider(&visual));
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        dialog
            .overlay
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                on_wheel.as_ref().unchecked_ref(),
                &options,
            )?;
        on_wheel.forget();
        Ok(())
    }

    /// Wires the review form on the current page. `config` is an optional
    /// object with the same keys as the Rust `ReviewConfig`.
    #[wasm_bindgen(js_name = mountReviewForm)]
    pub fn mount_review_form(config: Option<JsValue>) -> Result<(), JsValue> {
        console_log::init(log::LevelFilter::Info);

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        styles::ensure_styles(&document)?;

        let config = read_config(config, &window, &document)?;
        let mut statuses = StatusBoard::new(config.status_palette.clone());
        if document.get_element_by_id(HIDDEN_STATUS_ID).is_some() {
            statuses = statuses.with_hidden_field();
        }
        if let Some(button) =
            document.query_selector(&format!(".status-button[data-status=\"{}\"]", statuses.active()))?
        {
            button.class_list().add_1("active")?;
        }

        let app: Shared = Rc::new(RefCell::new(App {
            modal: ModalController::new(&config),
            statuses,
            surface: DomSurface::new(document.clone()),
            dialog: None,
            focus_delay_ms: config.focus_delay_ms,
        }));

        {
            let app = Rc::clone(&app);
            listen(&document, "click", move |event: Event| {
                report(handle_click(&app, event.unchecked_ref::<MouseEvent>()));
            })?;
        }
        {
            let app = Rc::clone(&app);
            listen(&document, "keydown", move |event: Event| {
                report(handle_key(&app, event.unchecked_ref::<KeyboardEvent>()));
            })?;
        }

        log::info!("review form mounted");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_review_form;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_review_form(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "review-ui only supports the wasm32 target",
    ))
}
