//! Field classification and value lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::slider::SliderSpec;
use crate::surface::{AffordanceRole, EditTarget, FormSurface};
use crate::url::UrlStore;

pub const TITLE_FIELD_ID: &str = "submission-title";
pub const CVSS_FIELD_ID: &str = "cvss-value";
pub const TIME_ESTIMATE_FIELD_ID: &str = "time-estimate-value";
pub const URL_FIELD_IDS: [&str; 3] = ["slack-value", "jira-value", "sir-value"];

/// What kind of editor a field gets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Url,
    BoundedNumeric(SliderSpec),
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::BoundedNumeric(_))
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldEntry {
    pub id: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Commits to this field also update the document title.
    #[serde(default)]
    pub primary_title: bool,
}

impl FieldEntry {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            primary_title: false,
        }
    }

    pub fn primary_title(mut self) -> Self {
        self.primary_title = true;
        self
    }
}

/// Static table: value-element id → kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistry {
    entries: HashMap<String, FieldEntry>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldRegistry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Fields of the stock review page.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.insert(FieldEntry::new(TITLE_FIELD_ID, FieldKind::Text).primary_title());
        registry.insert(FieldEntry::new(
            CVSS_FIELD_ID,
            FieldKind::BoundedNumeric(SliderSpec::cvss()),
        ));
        registry.insert(FieldEntry::new(
            TIME_ESTIMATE_FIELD_ID,
            FieldKind::BoundedNumeric(SliderSpec::time_estimate()),
        ));
        for id in URL_FIELD_IDS {
            registry.insert(FieldEntry::new(id, FieldKind::Url));
        }
        registry
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, entry: FieldEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldEntry> {
        self.entries.get(field_id)
    }

    /// Looks up by id first, then by role. Unknown fields edit as plain text.
    pub fn classify(&self, field_id: &str, role: AffordanceRole) -> FieldEntry {
        if let Some(entry) = self.entries.get(field_id) {
            return entry.clone();
        }
        match role {
            AffordanceRole::Header => FieldEntry::new(field_id, FieldKind::Text).primary_title(),
            _ => FieldEntry::new(field_id, FieldKind::Text),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved, editable datum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: String,
    pub kind: FieldKind,
    pub scope: AffordanceRole,
    /// Value the editor starts from.
    pub value: String,
    pub primary_title: bool,
}

/// Resolves the field behind an edit affordance.
///
/// `None` means there is nothing to edit (no enclosing group or no value
/// element); callers treat that as a silent no-op.
pub fn resolve_field(
    registry: &FieldRegistry,
    surface: &dyn FormSurface,
    target: &EditTarget,
    urls: &UrlStore,
) -> Option<Field> {
    let slot = surface.locate(target)?;
    let entry = registry.classify(&slot.field_id, target.role);

    let value = match entry.kind {
        FieldKind::Url => full_url(surface, urls, &slot.field_id).unwrap_or(slot.text),
        _ => slot.text,
    };

    Some(Field {
        id: slot.field_id,
        kind: entry.kind,
        scope: target.role,
        value,
        primary_title: entry.primary_title,
    })
}

/// Stored full URL of a field, falling back to the one the host page carries.
pub fn full_url(surface: &dyn FormSurface, urls: &UrlStore, field_id: &str) -> Option<String> {
    urls.get(field_id)
        .map(str::to_string)
        .or_else(|| surface.read_full_url(field_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySurface;

    #[test]
    fn standard_table_classifies_known_ids() {
        let registry = FieldRegistry::standard();
        assert_eq!(
            registry.classify(CVSS_FIELD_ID, AffordanceRole::Inline).kind,
            FieldKind::BoundedNumeric(SliderSpec::cvss())
        );
        assert_eq!(
            registry.classify("jira-value", AffordanceRole::Inline).kind,
            FieldKind::Url
        );
        assert!(registry.classify(TITLE_FIELD_ID, AffordanceRole::Header).primary_title);
    }

    #[test]
    fn unknown_ids_fall_back_on_role() {
        let registry = FieldRegistry::standard();
        let plain = registry.classify("reporter-value", AffordanceRole::Form);
        assert_eq!(plain.kind, FieldKind::Text);
        assert!(!plain.primary_title);

        let header = registry.classify("page-heading", AffordanceRole::Header);
        assert!(header.primary_title);
    }

    #[test]
    fn url_fields_prefer_stored_full_value() {
        let surface = MemorySurface::default().with_field("jira", "jira-value", "jira.example.com...");
        let mut urls = UrlStore::default();
        let target = EditTarget::new("jira").with_role(AffordanceRole::Inline);

        let field = resolve_field(&FieldRegistry::standard(), &surface, &target, &urls)
            .expect("field resolves");
        assert_eq!(field.value, "jira.example.com...");

        urls.insert("jira-value", "https://jira.example.com/TICKET-123".to_string());
        let field = resolve_field(&FieldRegistry::standard(), &surface, &target, &urls)
            .expect("field resolves");
        assert_eq!(field.value, "https://jira.example.com/TICKET-123");
    }

    #[test]
    fn url_fields_fall_back_to_host_full_url() {
        let surface = MemorySurface::default()
            .with_field("jira", "jira-value", "jira.example.com...")
            .with_full_url("jira-value", "https://jira.example.com/TICKET-123");
        let target = EditTarget::new("jira").with_role(AffordanceRole::Inline);
        let mut urls = UrlStore::default();

        let field = resolve_field(&FieldRegistry::standard(), &surface, &target, &urls)
            .expect("field resolves");
        assert_eq!(field.value, "https://jira.example.com/TICKET-123");

        urls.insert("jira-value", "https://jira.example.com/TICKET-456".to_string());
        let field = resolve_field(&FieldRegistry::standard(), &surface, &target, &urls)
            .expect("field resolves");
        assert_eq!(field.value, "https://jira.example.com/TICKET-456");
    }

    #[test]
    fn text_fields_ignore_full_url_marker() {
        let surface = MemorySurface::default()
            .with_field("reporter", "reporter-value", "Acme Corp")
            .with_full_url("reporter-value", "https://acme.example.com");
        let field = resolve_field(
            &FieldRegistry::standard(),
            &surface,
            &EditTarget::new("reporter"),
            &UrlStore::default(),
        )
        .expect("field resolves");
        assert_eq!(field.value, "Acme Corp");
    }

    #[test]
    fn missing_group_resolves_to_none() {
        let surface = MemorySurface::default();
        let target = EditTarget::new("orphan-icon");
        assert!(resolve_field(
            &FieldRegistry::standard(),
            &surface,
            &target,
            &UrlStore::default()
        )
        .is_none());
    }

    #[test]
    fn entries_deserialize_with_flattened_kind() {
        let json = r#"{"id":"priority-value","kind":"bounded_numeric","min":1,"max":5,"step":1,"decimals":0,"label":"Priority","title":"Edit Priority"}"#;
        let entry: FieldEntry = serde_json::from_str(json).expect("valid entry");
        assert!(entry.kind.is_numeric());
        assert!(!entry.primary_title);
    }
}
