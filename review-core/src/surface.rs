//! The seam between the controller and whatever document hosts the form.

use serde::{Deserialize, Serialize};

/// Scope marker carried by an edit affordance (`.header-edit-icon`,
/// `.edit-icon` inside the inline fields, `.edit-time-stamp`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceRole {
    Header,
    Inline,
    Timestamp,
    #[default]
    Form,
}

/// The clicked edit affordance, as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditTarget {
    /// Host-specific handle of the affordance element.
    pub affordance: String,
    /// Human-readable `title`, used as the dialog heading.
    pub title: Option<String>,
    #[serde(default)]
    pub role: AffordanceRole,
}

impl EditTarget {
    pub fn new(affordance: impl Into<String>) -> Self {
        Self {
            affordance: affordance.into(),
            title: None,
            role: AffordanceRole::Form,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_role(mut self, role: AffordanceRole) -> Self {
        self.role = role;
        self
    }
}

/// Value element found inside the affordance's field group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueSlot {
    /// Stable id of the value-display element.
    pub field_id: String,
    /// Current placeholder text, trimmed.
    pub text: String,
}

/// Read/write access to the host document.
///
/// Implementations must preserve the edit icon that sits next to the
/// placeholder text when writing.
pub trait FormSurface {
    /// Finds the value element of the group enclosing `target`.
    fn locate(&self, target: &EditTarget) -> Option<ValueSlot>;

    fn write_text(&mut self, field_id: &str, text: &str);

    /// Full URL the host already carries for the field (`data-full-url`).
    fn read_full_url(&self, field_id: &str) -> Option<String>;

    /// Sets or clears the `data-full-url` marker on the field's placeholder.
    fn write_full_url(&mut self, field_id: &str, url: Option<&str>);

    fn set_document_title(&mut self, title: &str);
}
