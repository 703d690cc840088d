use std::collections::HashMap;

use crate::surface::{EditTarget, FormSurface, ValueSlot};

/// Bare-bones surface for unit tests: affordance id → field id → text.
#[derive(Debug, Default)]
pub(crate) struct MemorySurface {
    groups: HashMap<String, String>,
    texts: HashMap<String, String>,
    full_urls: HashMap<String, String>,
    pub(crate) document_title: Option<String>,
}

impl MemorySurface {
    pub(crate) fn with_field(mut self, affordance: &str, field_id: &str, text: &str) -> Self {
        self.groups.insert(affordance.to_string(), field_id.to_string());
        self.texts.insert(field_id.to_string(), text.to_string());
        self
    }

    pub(crate) fn with_full_url(mut self, field_id: &str, url: &str) -> Self {
        self.full_urls.insert(field_id.to_string(), url.to_string());
        self
    }

    pub(crate) fn text(&self, field_id: &str) -> Option<&str> {
        self.texts.get(field_id).map(String::as_str)
    }

    pub(crate) fn full_url(&self, field_id: &str) -> Option<&str> {
        self.full_urls.get(field_id).map(String::as_str)
    }
}

impl FormSurface for MemorySurface {
    fn locate(&self, target: &EditTarget) -> Option<ValueSlot> {
        let field_id = self.groups.get(&target.affordance)?;
        Some(ValueSlot {
            field_id: field_id.clone(),
            text: self.texts.get(field_id)?.trim().to_string(),
        })
    }

    fn write_text(&mut self, field_id: &str, text: &str) {
        self.texts.insert(field_id.to_string(), text.to_string());
    }

    fn read_full_url(&self, field_id: &str) -> Option<String> {
        self.full_urls.get(field_id).cloned()
    }

    fn write_full_url(&mut self, field_id: &str, url: Option<&str>) {
        match url {
            Some(url) => {
                self.full_urls.insert(field_id.to_string(), url.to_string());
            }
            None => {
                self.full_urls.remove(field_id);
            }
        }
    }

    fn set_document_title(&mut self, title: &str) {
        self.document_title = Some(title.to_string());
    }
}
