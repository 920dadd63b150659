//! Helpers for the semi-structured block styling string.
//!
//! Styling is persisted as a single string of `; `-separated entries. An
//! entry is either a `key: value` pair (`color: #000000`) or a bare marker
//! (`bold`, `autofocus`). Markers may also appear space-joined inside one
//! entry, which older saved pages contain, so marker lookups tokenize both
//! ways.

/// Look up the value of a `key: value` entry.
pub fn get_value<'a>(styling: &'a str, key: &str) -> Option<&'a str> {
    styling.split(';').find_map(|entry| {
        let (k, v) = entry.split_once(':')?;
        if k.trim() == key {
            Some(v.trim())
        } else {
            None
        }
    })
}

/// Set `key` to `value`, replacing an existing entry for the same key.
pub fn set_value(styling: &str, key: &str, value: &str) -> String {
    let mut entries: Vec<String> = styling
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .filter(|e| e.split_once(':').map_or(true, |(k, _)| k.trim() != key))
        .map(str::to_string)
        .collect();
    entries.push(format!("{key}: {value}"));
    entries.join("; ")
}

/// Remove the entry for `key` if present.
pub fn remove_key(styling: &str, key: &str) -> String {
    styling
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .filter(|e| e.split_once(':').map_or(true, |(k, _)| k.trim() != key))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Whether a bare marker is present.
pub fn has_marker(styling: &str, marker: &str) -> bool {
    styling
        .split(';')
        .filter(|entry| !entry.contains(':'))
        .flat_map(str::split_whitespace)
        .any(|token| token == marker)
}

/// Add a bare marker; no-op when already present.
pub fn add_marker(styling: &str, marker: &str) -> String {
    if has_marker(styling, marker) {
        return styling.to_string();
    }
    let trimmed = styling.trim().trim_end_matches(';').trim_end();
    if trimmed.is_empty() {
        marker.to_string()
    } else {
        format!("{trimmed}; {marker}")
    }
}

/// Remove a bare marker wherever it appears.
pub fn remove_marker(styling: &str, marker: &str) -> String {
    styling
        .split(';')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            if entry.contains(':') {
                return Some(entry.to_string());
            }
            let kept: Vec<&str> = entry.split_whitespace().filter(|t| *t != marker).collect();
            if kept.is_empty() {
                None
            } else {
                Some(kept.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Toggle a bare marker on or off.
pub fn toggle_marker(styling: &str, marker: &str) -> String {
    if has_marker(styling, marker) {
        remove_marker(styling, marker)
    } else {
        add_marker(styling, marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_value() {
        let styling = "normal; autofocus; color: #000000;";
        assert_eq!(get_value(styling, "color"), Some("#000000"));
        assert_eq!(get_value(styling, "background-color"), None);
    }

    #[test]
    fn test_set_value_replaces_existing() {
        let styling = "bold; color: #000000";
        let updated = set_value(styling, "color", "#ff0000");
        assert_eq!(get_value(&updated, "color"), Some("#ff0000"));
        assert!(has_marker(&updated, "bold"));
        // only one color entry remains
        assert_eq!(updated.matches("color").count(), 1);
    }

    #[test]
    fn test_set_value_appends_new_key() {
        let updated = set_value("bold", "background-color", "#ffff00");
        assert_eq!(get_value(&updated, "background-color"), Some("#ffff00"));
    }

    #[test]
    fn test_remove_key() {
        let styling = "color: #000000; bold; background-color: #ffff00";
        let updated = remove_key(styling, "background-color");
        assert_eq!(get_value(&updated, "background-color"), None);
        assert_eq!(get_value(&updated, "color"), Some("#000000"));
    }

    #[test]
    fn test_marker_tokenized_within_entry() {
        // markers space-joined in a single entry still match
        assert!(has_marker("normal bold", "bold"));
        assert!(!has_marker("normal bold", "italic"));
        // a key's value does not leak into marker matching
        assert!(!has_marker("color: bold", "bold"));
    }

    #[test]
    fn test_toggle_marker_round_trip() {
        let styling = "normal; color: #000000;";
        let on = toggle_marker(styling, "bold");
        assert!(has_marker(&on, "bold"));
        let off = toggle_marker(&on, "bold");
        assert!(!has_marker(&off, "bold"));
        assert_eq!(get_value(&off, "color"), Some("#000000"));
    }

    #[test]
    fn test_add_marker_to_empty() {
        assert_eq!(add_marker("", "checked"), "checked");
        assert_eq!(remove_marker("checked", "checked"), "");
    }
}
