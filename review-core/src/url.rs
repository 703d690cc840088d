//! Helpers for URL-valued fields (Slack thread, Jira ticket, SIR link).

use std::collections::HashMap;

/// Default display cap for URL placeholders, in characters.
pub const DISPLAY_LIMIT: usize = 16;

const ELLIPSIS: &str = "...";

/// Drops a leading `http://` or `https://`.
pub fn strip_protocol(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Prefixes `https://` unless an http(s) scheme is already present.
pub fn normalize_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Protocol-stripped form capped at [`DISPLAY_LIMIT`] characters.
pub fn truncate_for_display(url: &str) -> String {
    truncate_with_limit(url, DISPLAY_LIMIT)
}

/// Same as [`truncate_for_display`] with an explicit character cap.
pub fn truncate_with_limit(url: &str, limit: usize) -> String {
    let stripped = strip_protocol(url);
    if stripped.chars().count() <= limit {
        return stripped.to_string();
    }
    let mut shortened: String = stripped.chars().take(limit).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

/// Full URLs keyed by field id. Lives for the page lifetime, no eviction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStore {
    urls: HashMap<String, String>,
}

impl UrlStore {
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.urls.get(field_id).map(String::as_str)
    }

    pub fn insert(&mut self, field_id: &str, url: String) {
        self.urls.insert(field_id.to_string(), url);
    }

    pub fn remove(&mut self, field_id: &str) -> Option<String> {
        self.urls.remove(field_id)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_https_only_when_missing() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
        assert_eq!(normalize_url("https://x.com"), "https://x.com");
    }

    #[test]
    fn strip_handles_both_schemes() {
        assert_eq!(strip_protocol("https://a.b"), "a.b");
        assert_eq!(strip_protocol("http://a.b"), "a.b");
        assert_eq!(strip_protocol("ftp://a.b"), "ftp://a.b");
    }

    #[test]
    fn truncates_long_urls() {
        let full = normalize_url("jira.example.com/TICKET-123");
        assert_eq!(full, "https://jira.example.com/TICKET-123");
        assert_eq!(truncate_for_display(&full), "jira.example.com...");
        assert_eq!(truncate_for_display("http://seventeen-chars.io"), "seventeen-chars....");
    }

    #[test]
    fn short_urls_are_left_alone() {
        assert_eq!(truncate_for_display("https://slack.com/x"), "slack.com/x");
        assert_eq!(truncate_for_display("https://sixteen-chars.io"), "sixteen-chars.io");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(
            truncate_with_limit("https://ví-dụ.example/đường-dẫn", 6),
            "ví-dụ...."
        );
    }
}
