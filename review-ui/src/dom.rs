#![cfg(target_arch = "wasm32")]

use review_core::field::TITLE_FIELD_ID;
use review_core::{AffordanceRole, EditTarget, FormSurface, ValueSlot};
use web_sys::{Document, Element};

/// Marks an edit icon so a later lookup can find the same element again.
const AFFORDANCE_ATTR: &str = "data-review-affordance";
const FULL_URL_ATTR: &str = "data-full-url";

/// [`FormSurface`] over the live browser document.
pub struct DomSurface {
    document: Document,
    next_affordance: u32,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            next_affordance: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Turns a clicked edit icon into an [`EditTarget`].
    pub fn target_for(&mut self, icon: &Element) -> EditTarget {
        let affordance = match icon.get_attribute(AFFORDANCE_ATTR) {
            Some(id) => id,
            None => {
                self.next_affordance += 1;
                let id = format!("affordance-{}", self.next_affordance);
                if let Err(err) = icon.set_attribute(AFFORDANCE_ATTR, &id) {
                    log::warn!("cannot tag edit icon: {err:?}");
                }
                id
            }
        };

        EditTarget {
            affordance,
            title: icon.get_attribute("title"),
            role: role_of(icon),
        }
    }

    fn affordance(&self, target: &EditTarget) -> Option<Element> {
        let selector = format!("[{AFFORDANCE_ATTR}=\"{}\"]", target.affordance);
        self.document.query_selector(&selector).ok().flatten()
    }

    /// Header icons edit the `h1` placeholder; everything else edits the
    /// `.field-value` of the enclosing group.
    fn value_element(icon: &Element, role: AffordanceRole) -> Option<Element> {
        if role == AffordanceRole::Header {
            let heading = icon.closest("h1").ok()??;
            return heading.query_selector(".placeholder").ok()?;
        }
        let group = icon.closest(".field-group, .timestamp-group").ok()??;
        group.query_selector(".field-value").ok()?
    }

    fn placeholder(&self, field_id: &str) -> Option<Element> {
        let Some(element) = self.document.get_element_by_id(field_id) else {
            if field_id == TITLE_FIELD_ID {
                return self.document.query_selector("h1 .placeholder").ok()?;
            }
            return None;
        };
        placeholder_in(&element)
    }
}

fn placeholder_in(element: &Element) -> Option<Element> {
    if element.class_list().contains("placeholder") {
        return Some(element.clone());
    }
    element.query_selector(".placeholder").ok()?
}

fn role_of(icon: &Element) -> AffordanceRole {
    let classes = icon.class_list();
    if classes.contains("header-edit-icon") {
        AffordanceRole::Header
    } else if classes.contains("edit-time-stamp") {
        AffordanceRole::Timestamp
    } else if matches!(icon.closest(".inline-fields-container"), Ok(Some(_))) {
        AffordanceRole::Inline
    } else {
        AffordanceRole::Form
    }
}

impl FormSurface for DomSurface {
    fn locate(&self, target: &EditTarget) -> Option<ValueSlot> {
        let icon = self.affordance(target)?;
        let value = Self::value_element(&icon, target.role)?;
        let placeholder = placeholder_in(&value)?;

        let field_id = match value.id() {
            id if !id.is_empty() => id,
            _ if target.role == AffordanceRole::Header => TITLE_FIELD_ID.to_string(),
            _ => return None,
        };

        Some(ValueSlot {
            field_id,
            text: placeholder
                .text_content()
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
    }

    fn write_text(&mut self, field_id: &str, text: &str) {
        match self.placeholder(field_id) {
            Some(placeholder) => placeholder.set_text_content(Some(text)),
            None => log::warn!("no placeholder for {field_id}"),
        }
    }

    fn read_full_url(&self, field_id: &str) -> Option<String> {
        self.placeholder(field_id)?
            .get_attribute(FULL_URL_ATTR)
            .filter(|url| !url.trim().is_empty())
    }

    fn write_full_url(&mut self, field_id: &str, url: Option<&str>) {
        let Some(placeholder) = self.placeholder(field_id) else {
            return;
        };
        let result = match url {
            Some(url) => placeholder.set_attribute(FULL_URL_ATTR, url),
            None => placeholder.remove_attribute(FULL_URL_ATTR),
        };
        if let Err(err) = result {
            log::warn!("cannot update {FULL_URL_ATTR} on {field_id}: {err:?}");
        }
    }

    fn set_document_title(&mut self, title: &str) {
        self.document.set_title(title);
    }
}
