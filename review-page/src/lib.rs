//! JSON page description to an in-memory review form.
//!
//! [`FormPage`] mirrors the DOM contract of the static review page (field
//! groups, value elements, placeholders, edit icons, status badge) so the
//! controller can run headless in tests, the CLI and the JS bridge.

mod session;

use std::collections::HashMap;

use review_core::{
    AffordanceRole, EditTarget, FormSurface, ReviewError, Status, StatusChange, ValueSlot,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use session::{Action, ActionReport, ReviewSession};

const EDIT_ICON: &str = "✎";

/// Load a page description from a JSON string.
pub fn load_page_str(page_json: &str) -> Result<FormPage, ReviewError> {
    let value: Value =
        serde_json::from_str(page_json).map_err(|err| ReviewError::Page(err.to_string()))?;
    load_page_value(&value)
}

/// Load a page description from a `serde_json::Value`.
pub fn load_page_value(page: &Value) -> Result<FormPage, ReviewError> {
    let fields = page
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| ReviewError::Page("missing fields array".into()))?;

    let mut builder = PageBuilder::default();
    builder.document_title = page
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    for field in fields {
        builder.handle_field(field)?;
    }

    if let Some(orphans) = page.get("orphans").and_then(Value::as_array) {
        for orphan in orphans {
            builder.handle_affordance(orphan, None)?;
        }
    }

    if let Some(status) = page.get("status") {
        builder.handle_status(status)?;
    }

    Ok(builder.finish())
}

#[derive(Default)]
struct PageBuilder {
    document_title: String,
    groups: Vec<FieldGroup>,
    affordances: HashMap<String, Affordance>,
    status: Option<StatusDisplay>,
}

impl PageBuilder {
    fn handle_field(&mut self, field: &Value) -> Result<(), ReviewError> {
        let field_id = field
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ReviewError::Page("field without id".into()))?;

        if self.groups.iter().any(|group| group.field_id == field_id) {
            return Err(ReviewError::Page(format!("duplicate field id {field_id}")));
        }

        let placeholder = match field.get("value") {
            Some(Value::Null) => None,
            Some(value) => Some(Placeholder {
                text: value_as_text(value),
                full_url: field
                    .get("full_url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            None => Some(Placeholder::default()),
        };

        let index = self.groups.len();
        self.groups.push(FieldGroup {
            field_id: field_id.to_string(),
            label: field
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or(field_id)
                .to_string(),
            placeholder,
        });

        if let Some(affordance) = field.get("affordance") {
            self.handle_affordance(affordance, Some(index))?;
        }
        Ok(())
    }

    fn handle_affordance(&mut self, raw: &Value, group: Option<usize>) -> Result<(), ReviewError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ReviewError::Page("affordance without id".into()))?;

        let role = match raw.get("role") {
            Some(role) => serde_json::from_value::<AffordanceRole>(role.clone())
                .map_err(|err| ReviewError::Page(format!("affordance {id}: {err}")))?,
            None => AffordanceRole::default(),
        };

        self.affordances.insert(
            id.to_string(),
            Affordance {
                id: id.to_string(),
                title: raw.get("title").and_then(Value::as_str).map(str::to_string),
                role,
                group,
            },
        );
        Ok(())
    }

    fn handle_status(&mut self, raw: &Value) -> Result<(), ReviewError> {
        let active = match raw.get("active").and_then(Value::as_str) {
            Some(key) => key.parse::<Status>()?,
            None => Status::Triage,
        };
        let has_hidden_field = raw
            .get("hidden_field")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        self.status = Some(StatusDisplay {
            active,
            text: active.label().to_string(),
            background: None,
            foreground: None,
            hidden_value: has_hidden_field.then(|| active.label().to_string()),
        });
        Ok(())
    }

    fn finish(self) -> FormPage {
        FormPage {
            document_title: self.document_title,
            groups: self.groups,
            affordances: self.affordances,
            status: self.status.unwrap_or_default(),
        }
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// The `.placeholder` node inside a value element.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placeholder {
    pub text: String,
    /// `data-full-url` attribute.
    pub full_url: Option<String>,
}

/// One `.field-group`: a value element and its placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldGroup {
    pub field_id: String,
    pub label: String,
    /// `None` models a value element without a placeholder node.
    pub placeholder: Option<Placeholder>,
}

impl FieldGroup {
    /// Visible text of the value element: placeholder followed by the icon.
    pub fn rendered(&self) -> String {
        let text = self
            .placeholder
            .as_ref()
            .map(|placeholder| placeholder.text.as_str())
            .unwrap_or_default();
        format!("{text} {EDIT_ICON}")
    }
}

/// Clickable edit icon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Affordance {
    pub id: String,
    pub title: Option<String>,
    pub role: AffordanceRole,
    /// Index of the enclosing field group, if any.
    pub group: Option<usize>,
}

/// Status badge plus the optional hidden `#current-status` input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusDisplay {
    pub active: Status,
    pub text: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub hidden_value: Option<String>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            active: Status::Triage,
            text: Status::Triage.label().to_string(),
            background: None,
            foreground: None,
            hidden_value: None,
        }
    }
}

/// Headless review page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPage {
    pub document_title: String,
    groups: Vec<FieldGroup>,
    affordances: HashMap<String, Affordance>,
    status: StatusDisplay,
}

impl FormPage {
    /// Builds the [`EditTarget`] a click on `affordance_id` would produce.
    pub fn target(&self, affordance_id: &str) -> Option<EditTarget> {
        let affordance = self.affordances.get(affordance_id)?;
        let mut target = EditTarget::new(&affordance.id).with_role(affordance.role);
        target.title = affordance.title.clone();
        Some(target)
    }

    pub fn group(&self, field_id: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|group| group.field_id == field_id)
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    /// Placeholder text of a field, if it has a placeholder node.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.group(field_id)?
            .placeholder
            .as_ref()
            .map(|placeholder| placeholder.text.as_str())
    }

    pub fn full_url(&self, field_id: &str) -> Option<&str> {
        self.group(field_id)?.placeholder.as_ref()?.full_url.as_deref()
    }

    pub fn status(&self) -> &StatusDisplay {
        &self.status
    }

    /// Whether the page carries a hidden status input to mirror into.
    pub fn has_status_field(&self) -> bool {
        self.status.hidden_value.is_some()
    }

    /// Repaints the status badge after a status click.
    pub fn apply_status(&mut self, change: &StatusChange) {
        self.status.active = change.status;
        self.status.text.clone_from(&change.display_text);
        self.status.background = Some(change.background.clone());
        self.status.foreground = Some(change.foreground.clone());
        if self.status.hidden_value.is_some() {
            self.status.hidden_value = change.hidden_value.clone();
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            document_title: self.document_title.clone(),
            fields: self
                .groups
                .iter()
                .map(|group| FieldSnapshot {
                    id: group.field_id.clone(),
                    text: group
                        .placeholder
                        .as_ref()
                        .map(|placeholder| placeholder.text.clone()),
                    full_url: group
                        .placeholder
                        .as_ref()
                        .and_then(|placeholder| placeholder.full_url.clone()),
                    rendered: group.rendered(),
                })
                .collect(),
            status: self.status.clone(),
        }
    }

    fn placeholder_mut(&mut self, field_id: &str) -> Option<&mut Placeholder> {
        self.groups
            .iter_mut()
            .find(|group| group.field_id == field_id)?
            .placeholder
            .as_mut()
    }
}

impl FormSurface for FormPage {
    fn locate(&self, target: &EditTarget) -> Option<ValueSlot> {
        let affordance = self.affordances.get(&target.affordance)?;
        let group = self.groups.get(affordance.group?)?;
        let placeholder = group.placeholder.as_ref()?;
        Some(ValueSlot {
            field_id: group.field_id.clone(),
            text: placeholder.text.trim().to_string(),
        })
    }

    fn write_text(&mut self, field_id: &str, text: &str) {
        match self.placeholder_mut(field_id) {
            Some(placeholder) => placeholder.text = text.to_string(),
            None => log::warn!("no placeholder for {field_id}"),
        }
    }

    fn read_full_url(&self, field_id: &str) -> Option<String> {
        self.full_url(field_id).map(str::to_string)
    }

    fn write_full_url(&mut self, field_id: &str, url: Option<&str>) {
        if let Some(placeholder) = self.placeholder_mut(field_id) {
            placeholder.full_url = url.map(str::to_string);
        }
    }

    fn set_document_title(&mut self, title: &str) {
        self.document_title = title.to_string();
    }
}

/// Serializable view of the page, used for golden comparisons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSnapshot {
    pub document_title: String,
    pub fields: Vec<FieldSnapshot>,
    pub status: StatusDisplay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub id: String,
    pub text: Option<String>,
    pub full_url: Option<String>,
    pub rendered: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "title": "Suspicious login burst",
        "fields": [
            {"id": "submission-title", "value": "Suspicious login burst",
             "affordance": {"id": "title-icon", "title": "Edit Submission Title", "role": "header"}},
            {"id": "cvss-value", "label": "CVSS", "value": 4.2,
             "affordance": {"id": "cvss-icon", "title": "Edit CVSS", "role": "inline"}},
            {"id": "broken-value", "value": null,
             "affordance": {"id": "broken-icon"}}
        ],
        "orphans": [{"id": "stray-icon", "title": "Edit"}],
        "status": {"active": "monitor", "hidden_field": true}
    }"#;

    #[test]
    fn loads_groups_and_affordances() {
        let page = load_page_str(PAGE).unwrap();
        assert_eq!(page.document_title, "Suspicious login burst");
        assert_eq!(page.groups().len(), 3);
        assert_eq!(page.text("cvss-value"), Some("4.2"));
        assert_eq!(page.group("cvss-value").unwrap().label, "CVSS");

        let target = page.target("cvss-icon").unwrap();
        assert_eq!(target.role, AffordanceRole::Inline);
        assert_eq!(target.title.as_deref(), Some("Edit CVSS"));
        assert_eq!(page.status().active, Status::Monitor);
        assert_eq!(page.status().hidden_value.as_deref(), Some("Monitor"));
    }

    #[test]
    fn locate_fails_without_group_or_placeholder() {
        let page = load_page_str(PAGE).unwrap();
        assert!(page.locate(&page.target("stray-icon").unwrap()).is_none());
        assert!(page.locate(&page.target("broken-icon").unwrap()).is_none());
        assert!(page.locate(&EditTarget::new("missing")).is_none());
    }

    #[test]
    fn writes_keep_edit_icon() {
        let mut page = load_page_str(PAGE).unwrap();
        page.write_text("cvss-value", "7.5");
        assert_eq!(page.group("cvss-value").unwrap().rendered(), "7.5 ✎");
    }

    #[test]
    fn rejects_malformed_pages() {
        assert!(matches!(load_page_str("[]"), Err(ReviewError::Page(_))));
        assert!(matches!(
            load_page_str(r#"{"fields":[{"id":"a"},{"id":"a"}]}"#),
            Err(ReviewError::Page(_))
        ));
        assert!(matches!(
            load_page_str(r#"{"fields":[],"status":{"active":"lost"}}"#),
            Err(ReviewError::UnknownStatus(_))
        ));
        assert!(matches!(
            load_page_str(r#"{"fields":[{"id":"a","affordance":{"id":"i","role":"footer"}}]}"#),
            Err(ReviewError::Page(_))
        ));
    }
}
