const WILDCARD: &str = "*";

/// Checks if a preference name matches a subscription pattern
///
/// Names and patterns are dot-separated. A `*` segment matches exactly one
/// name segment, except in last position where it matches everything that
/// remains.
///
/// # Examples
/// * `"editor.fontSize"` matches `"editor.fontSize"`
/// * `"editor.fontSize"` matches `"editor.*"`
/// * `"editor.minimap.enabled"` matches `"editor.*"`
/// * `"editor"` does not match `"editor.*"`
/// * anything matches `"*"`
pub(super) fn key_matches(key: &str, pattern: &str) -> bool {
    if pattern == WILDCARD {
        return true;
    }

    let key_parts: Vec<&str> = key.split('.').collect();
    let pattern_parts: Vec<&str> = pattern.split('.').collect();

    for (i, pattern_part) in pattern_parts.iter().enumerate() {
        let Some(key_part) = key_parts.get(i) else {
            return false;
        };

        let is_last = i == pattern_parts.len() - 1;
        if *pattern_part == WILDCARD {
            if is_last {
                return true;
            }
            continue;
        }

        if key_part != pattern_part {
            return false;
        }
    }

    key_parts.len() == pattern_parts.len()
}

/// Joins a root identifier with a relative path into a single identifier
///
/// Redundant separators and `./` prefixes are dropped so the result compares
/// equal to identifiers produced by the change source for the same file.
///
/// # Examples
/// * `("/workspace", ".prefsync/settings.json")` → `"/workspace/.prefsync/settings.json"`
/// * `("file:///workspace/", "./prefs.json")` → `"file:///workspace/prefs.json"`
pub(super) fn join_uri(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = relative
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if relative.is_empty() {
        return root.to_string();
    }

    format!("{root}/{relative}")
}
