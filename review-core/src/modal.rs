//! The single shared edit dialog and its session.
//!
//! One [`ModalController`] is constructed at startup and handed to every
//! event source. Each interaction surface has its own entry point
//! ([`open`](ModalController::open), [`commit`](ModalController::commit),
//! [`cancel`](ModalController::cancel), [`slider_input`](ModalController::slider_input),
//! [`wheel`](ModalController::wheel), [`handle_key`](ModalController::handle_key))
//! so hosts can drive it with synthetic input.

use serde::{Deserialize, Serialize};

use crate::config::{KeyChord, ReviewConfig};
use crate::field::{full_url, resolve_field, Field, FieldKind, FieldRegistry};
use crate::slider::{SliderState, SliderVisual};
use crate::surface::{EditTarget, FormSurface};
use crate::url::{normalize_url, truncate_with_limit, UrlStore};
use crate::ReviewError;

const EMPTY_VALUE_MESSAGE: &str = "Please enter a value";
const EMPTY_TITLE_MESSAGE: &str = "Please enter a submission title";

/// Which control the host should focus once the dialog is shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusRequest {
    /// Focus the free-text input and select its contents.
    TextInput,
    Slider,
}

/// Ways of closing the dialog without an explicit commit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dismissal {
    /// Click on the overlay outside the inner form.
    Backdrop,
    CancelButton,
    CloseKey,
}

/// Render state of the dialog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogView {
    pub visible: bool,
    pub heading: String,
    pub input_visible: bool,
    pub input_value: String,
    pub cancel_visible: bool,
    pub update_visible: bool,
    pub slider: Option<SliderVisual>,
    /// Last validation message, if the previous commit was rejected.
    pub error: Option<String>,
}

impl DialogView {
    fn hidden() -> Self {
        Self {
            visible: false,
            heading: String::new(),
            input_visible: false,
            input_value: String::new(),
            cancel_visible: false,
            update_visible: false,
            slider: None,
            error: None,
        }
    }
}

/// Binding between the open dialog and the field it edits.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub target: EditTarget,
    pub field: Field,
    /// Value shown when the dialog opened.
    pub original: String,
}

/// Result of a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Committed {
    Text { field_id: String, text: String },
    Url {
        field_id: String,
        display: String,
        /// `None` when the field was cleared.
        full_url: Option<String>,
    },
    /// Numeric fields are already written on every slider move.
    Live { field_id: String },
}

/// Element that had focus when a key was pressed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrigin {
    /// The dialog's free-text input.
    #[default]
    TextInput,
    /// Anything else: buttons, the slider, the page behind the overlay.
    Elsewhere,
}

/// Outcome of a key press routed to the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Dismissed,
    Committed(Committed),
}

impl KeyOutcome {
    /// Only an Enter commit replaces the key's native action; the close
    /// chord still lets the browser copy the selection.
    pub fn suppresses_default(&self) -> bool {
        matches!(self, KeyOutcome::Committed(_))
    }
}

/// Outcome of a wheel event over the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelOutcome {
    /// Host must call `preventDefault` on the event.
    pub consumed: bool,
    pub slider: Option<SliderVisual>,
}

/// Request to open a stored URL instead of editing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationIntent {
    pub field_id: String,
    pub url: String,
}

#[derive(Debug)]
struct Dialog {
    visible: bool,
    heading: String,
    input: String,
    slider: Option<SliderState>,
    error: Option<String>,
    focus: Option<FocusRequest>,
}

impl Dialog {
    fn new() -> Self {
        Self {
            visible: false,
            heading: String::new(),
            input: String::new(),
            slider: None,
            error: None,
            focus: None,
        }
    }

    fn view(&self) -> DialogView {
        let numeric = self.slider.is_some();
        DialogView {
            visible: self.visible,
            heading: self.heading.clone(),
            input_visible: self.visible && !numeric,
            input_value: self.input.clone(),
            cancel_visible: self.visible && !numeric,
            update_visible: self.visible && !numeric,
            slider: self.slider.as_ref().map(SliderState::visual),
            error: self.error.clone(),
        }
    }

    fn hide(&mut self) {
        self.visible = false;
        self.slider = None;
        self.error = None;
        self.focus = None;
    }
}

/// Owns the dialog, the current [`EditSession`] and the full-URL store.
#[derive(Debug)]
pub struct ModalController {
    registry: FieldRegistry,
    close_key: KeyChord,
    truncate_len: usize,
    url_placeholder: String,
    default_heading: String,
    /// Created on first open, kept until teardown.
    dialog: Option<Dialog>,
    session: Option<EditSession>,
    urls: UrlStore,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new(&ReviewConfig::default())
    }
}

impl ModalController {
    pub fn new(config: &ReviewConfig) -> Self {
        Self {
            registry: config.registry(),
            close_key: config.close_key.clone(),
            truncate_len: config.truncate_len,
            url_placeholder: config.url_placeholder.clone(),
            default_heading: config.default_heading.clone(),
            dialog: None,
            session: None,
            urls: UrlStore::default(),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn urls(&self) -> &UrlStore {
        &self.urls
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.dialog.as_ref().is_some_and(|dialog| dialog.visible)
    }

    /// Whether the dialog element has been created yet.
    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn view(&self) -> DialogView {
        self.dialog
            .as_ref()
            .map(Dialog::view)
            .unwrap_or_else(DialogView::hidden)
    }

    /// Pending deferred focus, consumed by the host's timer.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.dialog.as_mut().and_then(|dialog| dialog.focus.take())
    }

    /// Opens the dialog for `target`. Returns `None` without touching any
    /// state when the target has no field to edit. An already open session
    /// is replaced.
    pub fn open(&mut self, surface: &dyn FormSurface, target: EditTarget) -> Option<&Field> {
        let Some(field) = resolve_field(&self.registry, surface, &target, &self.urls) else {
            log::debug!("edit affordance {} has no field group", target.affordance);
            return None;
        };

        if let Some(previous) = self.session.as_ref() {
            log::debug!("replacing edit session for {}", previous.field.id);
        }

        let heading = target
            .title
            .clone()
            .unwrap_or_else(|| self.default_heading.clone());
        let dialog = self.dialog.get_or_insert_with(Dialog::new);
        dialog.visible = true;
        dialog.heading = heading;
        dialog.error = None;

        match &field.kind {
            FieldKind::BoundedNumeric(spec) => {
                dialog.input.clear();
                dialog.slider = Some(SliderState::open(spec.clone(), &field.value));
                dialog.focus = Some(FocusRequest::Slider);
            }
            FieldKind::Text | FieldKind::Url => {
                dialog.input.clone_from(&field.value);
                dialog.slider = None;
                dialog.focus = Some(FocusRequest::TextInput);
            }
        }

        log::debug!("opened editor for {} ({:?})", field.id, field.scope);
        self.session = Some(EditSession {
            original: field.value.clone(),
            target,
            field,
        });
        self.session.as_ref().map(|session| &session.field)
    }

    /// Pending text typed into the dialog input.
    pub fn set_input(&mut self, text: &str) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.input = text.to_string();
        }
    }

    /// Writes the pending value back into the field and closes the dialog.
    ///
    /// Empty text on a plain text field is rejected with
    /// [`ReviewError::Validation`]; the dialog stays open and the field is
    /// left untouched. Numeric fields commit live, so this is a no-op for them.
    pub fn commit(&mut self, surface: &mut dyn FormSurface) -> Result<Committed, ReviewError> {
        let session = self.session.as_ref().ok_or(ReviewError::NoActiveSession)?;
        let dialog = self.dialog.as_mut().ok_or(ReviewError::NoActiveSession)?;
        let field_id = session.field.id.clone();
        let input = dialog.input.trim().to_string();

        let committed = match &session.field.kind {
            FieldKind::BoundedNumeric(_) => return Ok(Committed::Live { field_id }),
            FieldKind::Text => {
                if input.is_empty() {
                    let message = if session.field.primary_title {
                        EMPTY_TITLE_MESSAGE
                    } else {
                        EMPTY_VALUE_MESSAGE
                    };
                    dialog.error = Some(message.to_string());
                    return Err(ReviewError::Validation(message.to_string()));
                }
                surface.write_text(&field_id, &input);
                if session.field.primary_title {
                    surface.set_document_title(&input);
                }
                Committed::Text {
                    field_id,
                    text: input,
                }
            }
            FieldKind::Url => {
                if input.is_empty() {
                    self.urls.remove(&field_id);
                    surface.write_text(&field_id, &self.url_placeholder);
                    surface.write_full_url(&field_id, None);
                    Committed::Url {
                        field_id,
                        display: self.url_placeholder.clone(),
                        full_url: None,
                    }
                } else {
                    let full = normalize_url(&input);
                    let display = truncate_with_limit(&full, self.truncate_len);
                    self.urls.insert(&field_id, full.clone());
                    surface.write_text(&field_id, &display);
                    surface.write_full_url(&field_id, Some(&full));
                    Committed::Url {
                        field_id,
                        display,
                        full_url: Some(full),
                    }
                }
            }
        };

        log::debug!("committed {committed:?}");
        self.close();
        Ok(committed)
    }

    /// Discards the session and hides the dialog. Numeric changes already
    /// written by the slider stay in place.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_ref() {
            log::debug!("cancelled edit of {}", session.field.id);
        }
        self.close();
    }

    pub fn dismiss(&mut self, reason: Dismissal) {
        if !self.is_open() {
            return;
        }
        log::debug!("dialog dismissed via {reason:?}");
        self.cancel();
    }

    /// Routes a key press typed into the text input. See
    /// [`handle_key_from`](Self::handle_key_from).
    pub fn handle_key(
        &mut self,
        surface: &mut dyn FormSurface,
        pressed: &KeyChord,
    ) -> Result<KeyOutcome, ReviewError> {
        self.handle_key_from(surface, pressed, KeyOrigin::TextInput)
    }

    /// Routes a key press: the close chord dismisses from anywhere, Enter
    /// commits a text dialog only when it comes from the text input. Keys
    /// are ignored while the dialog is hidden.
    pub fn handle_key_from(
        &mut self,
        surface: &mut dyn FormSurface,
        pressed: &KeyChord,
        origin: KeyOrigin,
    ) -> Result<KeyOutcome, ReviewError> {
        if !self.is_open() {
            return Ok(KeyOutcome::Ignored);
        }
        if self.close_key.matches(pressed) {
            self.dismiss(Dismissal::CloseKey);
            return Ok(KeyOutcome::Dismissed);
        }
        let numeric = self
            .session
            .as_ref()
            .is_some_and(|session| session.field.kind.is_numeric());
        if pressed.is_enter() && !numeric && origin == KeyOrigin::TextInput {
            return self.commit(surface).map(KeyOutcome::Committed);
        }
        Ok(KeyOutcome::Ignored)
    }

    /// Drag/input on the range surface. Writes the snapped value straight
    /// into the field.
    pub fn slider_input(
        &mut self,
        surface: &mut dyn FormSurface,
        raw: f64,
    ) -> Option<SliderVisual> {
        let field_id = self.session.as_ref()?.field.id.clone();
        let slider = self.dialog.as_mut()?.slider.as_mut()?;
        slider.input(raw);
        surface.write_text(&field_id, &slider.field_text());
        Some(slider.visual())
    }

    /// Wheel over the dialog. Only consumed while a slider is showing.
    pub fn wheel(&mut self, surface: &mut dyn FormSurface, delta_y: f64) -> WheelOutcome {
        let visible = self.is_open();
        let field_id = self.session.as_ref().map(|session| session.field.id.clone());
        let slider = self
            .dialog
            .as_mut()
            .filter(|_| visible)
            .and_then(|dialog| dialog.slider.as_mut());

        let (Some(slider), Some(field_id)) = (slider, field_id) else {
            return WheelOutcome {
                consumed: false,
                slider: None,
            };
        };

        if slider.wheel(delta_y) {
            surface.write_text(&field_id, &slider.field_text());
        }
        WheelOutcome {
            consumed: true,
            slider: Some(slider.visual()),
        }
    }

    /// Click on a placeholder. Fields holding a full URL, stored here or
    /// already carried by the page, navigate instead of opening the editor.
    pub fn click_placeholder(
        &self,
        surface: &dyn FormSurface,
        field_id: &str,
    ) -> Option<NavigationIntent> {
        full_url(surface, &self.urls, field_id).map(|url| NavigationIntent {
            field_id: field_id.to_string(),
            url,
        })
    }

    fn close(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.hide();
        }
        self.session = None;
    }
}
