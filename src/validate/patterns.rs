use once_cell::sync::Lazy;
use regex::Regex;

/// Whether a matched pattern is an unbounded loop or a sandbox-escape shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    InfiniteLoop,
    Suspicious,
}

pub struct StructuralPattern {
    pub kind: PatternKind,
    pub description: &'static str,
    regex: Regex,
}

impl StructuralPattern {
    fn new(kind: PatternKind, description: &'static str, pattern: &str) -> Self {
        Self {
            kind,
            description,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        self.regex.is_match(code)
    }
}

/// Structurally suspicious shapes, scanned in this order; the first match
/// wins. Kept deliberately coarse: false positives on benign code (an array
/// literal, a harmless string concatenation) are accepted in exchange for
/// catching identifier reconstruction and dynamic-evaluation tricks.
pub static STRUCTURAL_PATTERNS: Lazy<Vec<StructuralPattern>> = Lazy::new(|| {
    vec![
        StructuralPattern::new(
            PatternKind::InfiniteLoop,
            "while loop with a constant-true condition",
            r"(?i)while\s*\(\s*(?:true|1)\s*\)",
        ),
        StructuralPattern::new(
            PatternKind::InfiniteLoop,
            "for loop with an empty or constant-true condition",
            r"(?i)for\s*\(\s*;\s*(?:true\s*)?;",
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "string literal concatenation (possible identifier reconstruction)",
            r#"["'][^"'\n]*["']\s*\+\s*["']"#,
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "bracket access with a string literal property name",
            r#"\[\s*["'][A-Za-z_$][A-Za-z0-9_$]*["']\s*\]"#,
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "direct eval() call",
            r"\beval\s*\(",
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "Function constructor access",
            r"(?:\bnew\s+)?\bFunction\s*\(",
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "constructor accessor call",
            r"\.\s*constructor\s*\(",
        ),
        StructuralPattern::new(
            PatternKind::Suspicious,
            "prototype chain access",
            r#"(?:\.\s*(?:prototype|__proto__)\b|\[\s*["'](?:prototype|__proto__|constructor)["']\s*\])"#,
        ),
    ]
});

/// Returns the first structural pattern matching `code`, if any.
pub fn find_structural(code: &str) -> Option<&'static StructuralPattern> {
    STRUCTURAL_PATTERNS.iter().find(|p| p.matches(code))
}
