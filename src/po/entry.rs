//! The in-memory representation of one PO translation unit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single translation unit from a PO file.
///
/// `original` is the untranslated source string and the catalog map key; it
/// is built incrementally from the `msgid` line and any literal continuation
/// lines, and must be present before the entry is inserted into a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoEntry {
    /// The untranslated source string (`msgid`).
    pub original: Option<String>,

    /// The plural-form source string (`msgid_plural`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub original_plural: Option<String>,

    /// The translated string (`msgstr`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub translation: Option<String>,

    /// Plural translations keyed by plural-form index (`msgstr[N]`).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default)]
    pub translation_plurals: HashMap<usize, String>,

    /// Source references (`#:` lines), in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub references: Vec<String>,

    /// Message contexts (`msgctxt` lines), in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub contexts: Vec<String>,

    /// Flags (`#,` lines), in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub flags: Vec<String>,

    /// Translator comment (`#` line), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    /// Previous untranslated string (`#|` line), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub untranslated: Option<String>,
}

impl PoEntry {
    /// Whether this entry carries any plural translations.
    pub fn has_plural_forms(&self) -> bool {
        !self.translation_plurals.is_empty()
    }

    /// The singular translation, treating an empty `msgstr` as untranslated.
    pub fn effective_translation(&self) -> Option<&str> {
        self.translation.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entry_is_empty() {
        let entry = PoEntry::default();
        assert!(entry.original.is_none());
        assert!(!entry.has_plural_forms());
        assert!(entry.effective_translation().is_none());
    }

    #[test]
    fn test_effective_translation_ignores_empty() {
        let entry = PoEntry {
            original: Some("Hello".to_string()),
            translation: Some(String::new()),
            ..PoEntry::default()
        };
        assert!(entry.effective_translation().is_none());

        let entry = PoEntry {
            translation: Some("Bonjour".to_string()),
            ..entry
        };
        assert_eq!(entry.effective_translation(), Some("Bonjour"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = PoEntry {
            original: Some("Hello".to_string()),
            translation: Some("Bonjour".to_string()),
            ..PoEntry::default()
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"original\":\"Hello\""));
        assert!(!json.contains("references"));
        assert!(!json.contains("translation_plurals"));

        let back: PoEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
