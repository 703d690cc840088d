//! Submission status buttons: exactly one active at a time.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ReviewError;

/// Closed set of submission statuses, in button order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Triage,
    Monitor,
    DeEscalated,
    DeEscalatedCritical,
    RemediateNow,
    Remediated,
    Closed,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Triage,
        Status::Monitor,
        Status::DeEscalated,
        Status::DeEscalatedCritical,
        Status::RemediateNow,
        Status::Remediated,
        Status::Closed,
    ];

    /// `data-status` attribute value.
    pub fn key(self) -> &'static str {
        match self {
            Status::Triage => "triage",
            Status::Monitor => "monitor",
            Status::DeEscalated => "de-escalated",
            Status::DeEscalatedCritical => "de-escalated-critical",
            Status::RemediateNow => "remediate-now",
            Status::Remediated => "remediated",
            Status::Closed => "closed",
        }
    }

    /// Button caption, mirrored into the status display.
    pub fn label(self) -> &'static str {
        match self {
            Status::Triage => "Triage",
            Status::Monitor => "Monitor",
            Status::DeEscalated => "De-escalated",
            Status::DeEscalatedCritical => "De-escalated (Critical)",
            Status::RemediateNow => "Remediate Now",
            Status::Remediated => "Remediated",
            Status::Closed => "Closed",
        }
    }

    /// CSS custom property the host theme defines for this status.
    pub fn css_var(self) -> String {
        format!("--status-{}", self.key())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Status {
    type Err = ReviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.key() == value.trim())
            .ok_or_else(|| ReviewError::UnknownStatus(value.to_string()))
    }
}

/// Background colour per status. Missing entries fall back to the CSS
/// variable so the host theme still applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StatusPalette {
    colors: HashMap<Status, String>,
}

impl Default for StatusPalette {
    fn default() -> Self {
        let colors = [
            (Status::Triage, "#6b7280"),
            (Status::Monitor, "#2563eb"),
            (Status::DeEscalated, "#0d9488"),
            (Status::DeEscalatedCritical, "#7c3aed"),
            (Status::RemediateNow, "#dc2626"),
            (Status::Remediated, "#16a34a"),
            (Status::Closed, "#374151"),
        ]
        .into_iter()
        .map(|(status, color)| (status, color.to_string()))
        .collect();
        Self { colors }
    }
}

impl StatusPalette {
    pub fn with_color(mut self, status: Status, color: impl Into<String>) -> Self {
        self.colors.insert(status, color.into());
        self
    }

    pub fn color(&self, status: Status) -> String {
        self.colors
            .get(&status)
            .cloned()
            .unwrap_or_else(|| format!("var({})", status.css_var()))
    }
}

/// What the host has to repaint after a click.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub status: Status,
    pub display_text: String,
    pub background: String,
    pub foreground: String,
    /// New value of the hidden form field, when one is attached.
    pub hidden_value: Option<String>,
}

/// Status toggle state. Every status is reachable from every other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    active: Status,
    palette: StatusPalette,
    hidden_field: Option<String>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(StatusPalette::default())
    }
}

impl StatusBoard {
    pub fn new(palette: StatusPalette) -> Self {
        Self {
            active: Status::Triage,
            palette,
            hidden_field: None,
        }
    }

    /// Mirrors display text into a hidden form field (`#current-status`).
    pub fn with_hidden_field(mut self) -> Self {
        self.hidden_field = Some(self.active.label().to_string());
        self
    }

    pub fn active(&self) -> Status {
        self.active
    }

    pub fn is_active(&self, status: Status) -> bool {
        self.active == status
    }

    pub fn hidden_value(&self) -> Option<&str> {
        self.hidden_field.as_deref()
    }

    pub fn click(&mut self, status: Status) -> StatusChange {
        self.click_captioned(status, status.label())
    }

    /// Like [`StatusBoard::click`], but shows the clicked button's own
    /// caption. A blank caption falls back to [`Status::label`].
    pub fn click_captioned(&mut self, status: Status, caption: &str) -> StatusChange {
        self.active = status;
        let caption = caption.trim();
        let display_text = if caption.is_empty() {
            status.label().to_string()
        } else {
            caption.to_string()
        };
        if let Some(hidden) = self.hidden_field.as_mut() {
            hidden.clone_from(&display_text);
        }
        log::info!("status updated to {display_text}");

        StatusChange {
            status,
            display_text,
            background: self.palette.color(status),
            foreground: "#ffffff".to_string(),
            hidden_value: self.hidden_field.clone(),
        }
    }

    /// Same as [`StatusBoard::click`] for a raw `data-status` value.
    pub fn click_key(&mut self, key: &str) -> Result<StatusChange, ReviewError> {
        let status = key.parse::<Status>()?;
        Ok(self.click(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_triage() {
        let board = StatusBoard::default();
        assert_eq!(board.active(), Status::Triage);
        assert_eq!(
            Status::ALL.iter().filter(|s| board.is_active(**s)).count(),
            1
        );
    }

    #[test]
    fn last_click_wins() {
        let mut board = StatusBoard::default().with_hidden_field();
        board.click(Status::RemediateNow);
        let change = board.click(Status::Closed);

        assert!(board.is_active(Status::Closed));
        assert!(!board.is_active(Status::RemediateNow));
        assert_eq!(change.display_text, "Closed");
        assert_eq!(change.background, StatusPalette::default().color(Status::Closed));
        assert_eq!(change.hidden_value.as_deref(), Some("Closed"));
    }

    #[test]
    fn every_status_reachable_from_every_other() {
        let mut board = StatusBoard::default();
        for from in Status::ALL {
            for to in Status::ALL {
                board.click(from);
                board.click(to);
                assert_eq!(board.active(), to);
            }
        }
    }

    #[test]
    fn parses_data_status_keys() {
        assert_eq!(
            "de-escalated-critical".parse::<Status>().unwrap(),
            Status::DeEscalatedCritical
        );
        assert!(matches!(
            "escalated".parse::<Status>(),
            Err(ReviewError::UnknownStatus(_))
        ));
    }

    #[test]
    fn palette_falls_back_to_css_var() {
        let palette: StatusPalette = serde_json::from_str(r##"{"closed":"#000000"}"##).unwrap();
        assert_eq!(palette.color(Status::Closed), "#000000");
        assert_eq!(palette.color(Status::Monitor), "var(--status-monitor)");
    }

    #[test]
    fn button_caption_wins_over_label() {
        let mut board = StatusBoard::default().with_hidden_field();
        let change = board.click_captioned(Status::RemediateNow, "  Fix immediately ");
        assert_eq!(change.display_text, "Fix immediately");
        assert_eq!(change.hidden_value.as_deref(), Some("Fix immediately"));

        let change = board.click_captioned(Status::Closed, "   ");
        assert_eq!(change.display_text, "Closed");
        assert!(board.is_active(Status::Closed));
    }

    #[test]
    fn no_hidden_field_means_no_mirror() {
        let mut board = StatusBoard::default();
        assert_eq!(board.click(Status::Monitor).hidden_value, None);
    }
}
