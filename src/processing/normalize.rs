//! Lossy-by-design text transforms applied around model calls.
//!
//! Two concerns live here: collapsing the `$$...$$` math fences Gemini tends
//! to emit into the inline `$...$` form the UI renders, and truncating
//! oversized documents to keep downstream cost bounded. Both are silent,
//! documented transforms rather than failures.

use regex::Regex;
use std::sync::OnceLock;

/// Marker appended when stored text is cut at [`truncate_with_marker`] time.
pub const STORAGE_TRUNCATION_MARKER: &str = "\n\n[Text truncated due to length]";
/// Marker appended when the summarizer input is cut.
pub const SUMMARY_TRUNCATION_MARKER: &str = "\n\n[Document truncated for summary generation]";

fn math_fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\$([^$]+)\$\$").expect("valid math fence pattern"))
}

/// Rewrite `$$equation$$` fences as inline `$equation$` math.
///
/// The rewrite runs to a fixpoint: collapsing one fence can expose another
/// when fences sit back to back (`$$a$$$b$$` leaves a fresh `$$` pair after
/// the first pass), so passes repeat until nothing changes. Every pass
/// removes two `$` characters per match, which bounds the loop. The result
/// is idempotent and text without the artifact passes through unchanged.
pub fn normalize_math_fences(text: &str) -> String {
    let pattern = math_fence_pattern();
    let mut current = text.to_string();
    loop {
        match pattern.replace_all(&current, "$$${1}$$") {
            std::borrow::Cow::Borrowed(_) => return current,
            std::borrow::Cow::Owned(next) => current = next,
        }
    }
}

/// Truncate `text` to at most `max_bytes` (snapped down to a char boundary)
/// and append `marker`. Text within the limit is returned unchanged.
pub fn truncate_with_marker(text: &str, max_bytes: usize, marker: &str) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = text[..cut].to_string();
    truncated.push_str(marker);
    truncated
}
