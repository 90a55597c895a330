use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers forbidden from appearing anywhere in submitted code, scanned
/// in this order. Matching is whole-word and case-insensitive, so benign
/// code that merely mentions one of these words (even in a comment or a
/// string) is rejected too. That over-blocking is intentional.
pub const FORBIDDEN_IDENTIFIERS: &[&str] = &[
    // Browser/DOM globals and global-scope aliases
    "window",
    "document",
    "globalThis",
    "global",
    "self",
    "top",
    "parent",
    "frames",
    "navigator",
    "location",
    "alert",
    // Dynamic evaluation primitives
    "eval",
    "execScript",
    "importScripts",
    // Object-identity internals
    "constructor",
    "prototype",
    "__proto__",
    // Host-process globals
    "process",
    "require",
    "module",
    "exports",
    "Buffer",
    "Deno",
    // Background-thread and networking-bypass constructors
    "Worker",
    "SharedWorker",
    "ServiceWorker",
    "XMLHttpRequest",
    "WebSocket",
    "EventSource",
    "FileReader",
];

static FORBIDDEN_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FORBIDDEN_IDENTIFIERS
        .iter()
        .map(|word| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
            (*word, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Returns the first forbidden identifier found in `code`, if any.
pub fn find_forbidden(code: &str) -> Option<&'static str> {
    FORBIDDEN_RES
        .iter()
        .find(|(_, re)| re.is_match(code))
        .map(|(word, _)| *word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_match() {
        assert_eq!(find_forbidden("window.open()"), Some("window"));
        assert_eq!(find_forbidden("var x = myWindowish;"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(find_forbidden("WINDOW.alert('x')"), Some("window"));
        assert_eq!(find_forbidden("Eval('1')"), Some("eval"));
    }

    #[test]
    fn test_substring_not_matched() {
        // "eval" inside "evaluate" is not a whole word
        assert_eq!(find_forbidden("function evaluate(x) { return x; }"), None);
    }

    #[test]
    fn test_scan_order_is_fixed() {
        // "window" precedes "document" in the list
        assert_eq!(find_forbidden("document; window;"), Some("window"));
    }

    #[test]
    fn test_matches_inside_strings_and_comments() {
        assert_eq!(find_forbidden("// touch the window here"), Some("window"));
        assert_eq!(find_forbidden("var s = 'process';"), Some("process"));
    }
}
