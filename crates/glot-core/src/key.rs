//! Dotted-key helpers.
//!
//! Keys are dot-delimited hierarchical identifiers (`ui.menu.start`).
//! Segments are opaque; the canonical form of a key is its segments joined
//! with `.`, and key equality is exact equality of that canonical form.

/// Iterate the segments of a dotted key, in order.
///
/// The empty key yields a single empty segment, mirroring `str::split`.
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split('.')
}

/// Last segment of a key (the whole key when it contains no dot).
#[must_use]
pub fn last_segment(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

/// Human-friendly rendering of a key's last segment.
///
/// Strips everything up through the final `.`, splits the remainder into
/// words on `_`, `-`, spaces, and lower-to-upper camelCase boundaries, and
/// capitalizes the first letter of each word:
///
/// ```
/// use glot_core::key::display_name;
///
/// assert_eq!(display_name("ui.menu.start"), "Start");
/// assert_eq!(display_name("ui.menu.startButton"), "Start Button");
/// assert_eq!(display_name("quit_game"), "Quit Game");
/// ```
#[must_use]
pub fn display_name(key: &str) -> String {
    let segment = last_segment(key);
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in segment.chars() {
        if matches!(ch, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::with_capacity(segment.len() + words.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_in_order() {
        let parts: Vec<&str> = segments("ui.menu.start").collect();
        assert_eq!(parts, vec!["ui", "menu", "start"]);
    }

    #[test]
    fn segments_of_single_segment_key() {
        let parts: Vec<&str> = segments("quit").collect();
        assert_eq!(parts, vec!["quit"]);
    }

    #[test]
    fn last_segment_strips_prefix() {
        assert_eq!(last_segment("ui.menu.start"), "start");
        assert_eq!(last_segment("start"), "start");
    }

    #[test]
    fn display_name_simple() {
        assert_eq!(display_name("ui.menu.start"), "Start");
    }

    #[test]
    fn display_name_camel_case() {
        assert_eq!(display_name("ui.menu.startButton"), "Start Button");
    }

    #[test]
    fn display_name_snake_and_kebab() {
        assert_eq!(display_name("quit_game"), "Quit Game");
        assert_eq!(display_name("ui.load-save"), "Load Save");
    }

    #[test]
    fn display_name_keeps_acronyms_together() {
        assert_eq!(display_name("stats.HP"), "HP");
    }

    #[test]
    fn display_name_empty() {
        assert_eq!(display_name(""), "");
    }
}
