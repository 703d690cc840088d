//! Core logic for the incident review form: inline field editing through a
//! shared dialog, the CVSS / time-estimate slider and the status toggle.
//!
//! Nothing here touches a real document. Hosts implement [`FormSurface`] and
//! feed user input into [`ModalController`] and [`StatusBoard`].

pub mod color;
pub mod config;
pub mod field;
pub mod modal;
pub mod slider;
pub mod status;
pub mod surface;
pub mod url;

#[cfg(test)]
mod testing;

pub use color::{color_for, ColorScheme, Rgb, ScoreRange};
pub use config::{KeyChord, ReviewConfig};
pub use field::{full_url, resolve_field, Field, FieldEntry, FieldKind, FieldRegistry};
pub use modal::{
    Committed, DialogView, Dismissal, EditSession, FocusRequest, KeyOrigin, KeyOutcome,
    ModalController, NavigationIntent, WheelOutcome,
};
pub use slider::{SliderSpec, SliderState, SliderVisual, UnparseableNumeric};
pub use status::{Status, StatusBoard, StatusChange, StatusPalette};
pub use surface::{AffordanceRole, EditTarget, FormSurface, ValueSlot};
pub use url::{normalize_url, strip_protocol, truncate_for_display, UrlStore};

/// Errors raised while editing the review form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReviewError {
    /// Required text was empty; the dialog stays open for another try.
    #[error("{0}")]
    Validation(String),
    #[error("no edit session is open")]
    NoActiveSession,
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid page description: {0}")]
    Page(String),
}
