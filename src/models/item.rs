use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Canonical item name: trimmed and lower-cased
///
/// Items are compared case-insensitively everywhere, so every name crossing
/// the storage or request boundary is normalized into this form first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Normalizes a raw name; returns `None` when nothing is left after trimming
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with the first letter of every word capitalized
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capitalizes the first character of each whitespace-separated word
///
/// Whitespace is preserved as-is; the rest of each word is left untouched.
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;

    for c in name.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let name = ItemName::normalize("  The Dark KNIGHT ").unwrap();
        assert_eq!(name.as_str(), "the dark knight");
    }

    #[test]
    fn test_normalize_rejects_blank() {
        assert_eq!(ItemName::normalize(""), None);
        assert_eq!(ItemName::normalize("   \t"), None);
    }

    #[test]
    fn test_display_name_capitalizes_words() {
        assert_eq!(display_name("the dark knight"), "The Dark Knight");
        assert_eq!(display_name("d"), "D");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_display_name_keeps_spacing_and_tail() {
        assert_eq!(display_name("ac/dc  live"), "Ac/dc  Live");
        assert_eq!(display_name("wall-e"), "Wall-e");
    }

    #[test]
    fn test_display_name_unicode() {
        assert_eq!(display_name("élan vital"), "Élan Vital");
    }
}
