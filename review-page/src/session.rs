use review_core::{
    Committed, DialogView, Dismissal, KeyChord, KeyOutcome, ModalController, NavigationIntent,
    ReviewConfig, ReviewError, StatusBoard, StatusChange,
};
use serde::{Deserialize, Serialize};

use crate::{FormPage, PageSnapshot};

/// One scripted user interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Click on an edit icon.
    Open { affordance: String },
    /// Type into the dialog's text input (replaces its contents).
    Input { text: String },
    Commit,
    Cancel,
    Dismiss { reason: Dismissal },
    /// Drag the range input to `value`.
    Slide { value: f64 },
    Wheel { delta_y: f64 },
    Key(KeyChord),
    ClickPlaceholder { field_id: String },
    ClickStatus { status: String },
}

/// What happened in response to an [`Action`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionReport {
    Opened { field_id: String },
    /// The click had nothing to edit.
    NothingToEdit,
    Committed(Committed),
    /// Validation message shown to the user; the dialog stays open.
    Rejected { message: String },
    Closed,
    SliderMoved { value: f64, readout: String },
    /// Event reached the dialog but changed nothing.
    Ignored,
    Navigate(NavigationIntent),
    StatusChanged(StatusChange),
}

/// A page wired to its controllers, driven by [`Action`]s.
#[derive(Debug)]
pub struct ReviewSession {
    page: FormPage,
    modal: ModalController,
    statuses: StatusBoard,
}

impl ReviewSession {
    pub fn new(page: FormPage, config: &ReviewConfig) -> Self {
        let mut statuses = StatusBoard::new(config.status_palette.clone());
        if page.has_status_field() {
            statuses = statuses.with_hidden_field();
        }
        let initial = page.status().active;
        if initial != statuses.active() {
            statuses.click(initial);
        }
        Self {
            page,
            modal: ModalController::new(config),
            statuses,
        }
    }

    pub fn page(&self) -> &FormPage {
        &self.page
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn statuses(&self) -> &StatusBoard {
        &self.statuses
    }

    pub fn dialog(&self) -> DialogView {
        self.modal.view()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.page.snapshot()
    }

    /// Applies one interaction. Only unknown status names are errors;
    /// validation failures come back as [`ActionReport::Rejected`].
    pub fn apply(&mut self, action: &Action) -> Result<ActionReport, ReviewError> {
        let report = match action {
            Action::Open { affordance } => {
                let Some(target) = self.page.target(affordance) else {
                    return Ok(ActionReport::NothingToEdit);
                };
                match self.modal.open(&self.page, target) {
                    Some(field) => ActionReport::Opened {
                        field_id: field.id.clone(),
                    },
                    None => ActionReport::NothingToEdit,
                }
            }
            Action::Input { text } => {
                self.modal.set_input(text);
                ActionReport::Ignored
            }
            Action::Commit => self.commit(),
            Action::Cancel => {
                self.modal.cancel();
                ActionReport::Closed
            }
            Action::Dismiss { reason } => {
                if !self.modal.is_open() {
                    return Ok(ActionReport::Ignored);
                }
                self.modal.dismiss(*reason);
                ActionReport::Closed
            }
            Action::Slide { value } => self
                .modal
                .slider_input(&mut self.page, *value)
                .map(|visual| ActionReport::SliderMoved {
                    value: visual.value,
                    readout: visual.readout,
                })
                .unwrap_or(ActionReport::Ignored),
            Action::Wheel { delta_y } => {
                let outcome = self.modal.wheel(&mut self.page, *delta_y);
                match outcome.slider {
                    Some(visual) if outcome.consumed => ActionReport::SliderMoved {
                        value: visual.value,
                        readout: visual.readout,
                    },
                    _ => ActionReport::Ignored,
                }
            }
            Action::Key(chord) => match self.modal.handle_key(&mut self.page, chord) {
                Ok(KeyOutcome::Ignored) => ActionReport::Ignored,
                Ok(KeyOutcome::Dismissed) => ActionReport::Closed,
                Ok(KeyOutcome::Committed(committed)) => ActionReport::Committed(committed),
                Err(ReviewError::Validation(message)) => ActionReport::Rejected { message },
                Err(err) => return Err(err),
            },
            Action::ClickPlaceholder { field_id } => self
                .modal
                .click_placeholder(&self.page, field_id)
                .map(ActionReport::Navigate)
                .unwrap_or(ActionReport::Ignored),
            Action::ClickStatus { status } => {
                let change = self.statuses.click_key(status)?;
                self.page.apply_status(&change);
                ActionReport::StatusChanged(change)
            }
        };
        Ok(report)
    }

    /// Applies a whole script, stopping at the first hard error.
    pub fn replay(&mut self, actions: &[Action]) -> Result<Vec<ActionReport>, ReviewError> {
        actions.iter().map(|action| self.apply(action)).collect()
    }

    fn commit(&mut self) -> ActionReport {
        match self.modal.commit(&mut self.page) {
            Ok(committed) => ActionReport::Committed(committed),
            Err(ReviewError::Validation(message)) => ActionReport::Rejected { message },
            Err(err) => {
                log::debug!("commit ignored: {err}");
                ActionReport::Ignored
            }
        }
    }
}
