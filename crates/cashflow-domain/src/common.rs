//! Shared traits and helpers for ledger records.

use uuid::Uuid;

/// Exposes the opaque identifier a record is stored under.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Records that carry a category and free-form tags.
pub trait Categorized {
    fn category(&self) -> &str;
    fn tags(&self) -> &[String];
    fn set_category(&mut self, category: String);
}

/// Converts a record into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh opaque record identifier.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Splits a comma separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(parse_tags(" home, ,rent "), vec!["home", "rent"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn record_ids_are_unique() {
        assert_ne!(new_record_id(), new_record_id());
    }
}
