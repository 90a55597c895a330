//! Static safety screening of untrusted source text.
//!
//! This is a cheap syntactic gate in front of the capability-isolated
//! executor, not the safety boundary itself. It exists to fast-reject casual
//! escape attempts (host-global references, dynamic evaluation, prototype
//! tricks, unbounded loops) before the costlier engine setup runs.

pub mod denylist;
pub mod patterns;

use crate::models::SafetyVerdict;
use patterns::PatternKind;

/// Validate raw source text before any execution. Two ordered passes; the
/// first rejection found is returned and scanning stops.
pub fn validate(code: &str) -> SafetyVerdict {
    // Pass 1: forbidden identifiers
    if let Some(word) = denylist::find_forbidden(code) {
        let reason = format!("Forbidden keyword: '{word}' - not allowed for security reasons");
        tracing::debug!(keyword = word, "code rejected by identifier scan");
        return SafetyVerdict::Rejected(reason);
    }

    // Pass 2: structural patterns
    if let Some(pattern) = patterns::find_structural(code) {
        let reason = match pattern.kind {
            PatternKind::InfiniteLoop => {
                format!("Dangerous infinite loop pattern: {}", pattern.description)
            }
            PatternKind::Suspicious => {
                format!("Suspicious pattern detected: {}", pattern.description)
            }
        };
        tracing::debug!(pattern = pattern.description, "code rejected by structural scan");
        return SafetyVerdict::Rejected(reason);
    }

    SafetyVerdict::Allowed
}
