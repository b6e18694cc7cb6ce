//! Grapheme-aware editing helpers for input-node values.

use unicode_segmentation::UnicodeSegmentation;

/// Strips line breaks from pasted text; input values are single-line.
pub fn sanitize_paste(text: &str) -> String {
    text.replace(['\r', '\n'], "")
}

/// Appends `text` to `value`.
pub fn push_text(value: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    value.push_str(text);
}

/// Removes the last grapheme cluster from `value`. Returns whether anything
/// was removed.
pub fn delete_last_grapheme(value: &mut String) -> bool {
    let Some(last) = value.graphemes(true).next_back() else {
        return false;
    };
    let new_len = value.len() - last.len();
    value.truncate(new_len);
    true
}

#[cfg(test)]
mod tests {
    use super::{delete_last_grapheme, push_text, sanitize_paste};

    #[test]
    fn paste_is_flattened_to_one_line() {
        assert_eq!(sanitize_paste("hello\r\nworld\n"), "helloworld");
    }

    #[test]
    fn delete_respects_grapheme_boundaries() {
        let mut value = String::from("cafe\u{301}");
        assert!(delete_last_grapheme(&mut value));
        assert_eq!(value, "caf");

        let mut value = String::from("a👩‍🔬");
        assert!(delete_last_grapheme(&mut value));
        assert_eq!(value, "a");

        let mut value = String::new();
        assert!(!delete_last_grapheme(&mut value));
    }

    #[test]
    fn push_appends() {
        let mut value = String::from("ab");
        push_text(&mut value, "c");
        push_text(&mut value, "");
        assert_eq!(value, "abc");
    }
}
