//! Fixed-window chunking with overlap.
//!
//! Documents are split into overlapping windows so later retrieval work can
//! reason about local context. Sizes are measured in bytes but every cut is
//! snapped to a `char` boundary, so multi-byte input never panics and chunks
//! always concatenate back into valid UTF-8.

use super::types::ChunkingError;

/// Default window size used by the upload pipeline.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;
/// Default overlap between adjacent windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 500;

/// Split `text` into overlapping windows of at most `chunk_size` bytes.
///
/// The requested `overlap` is clamped to `chunk_size / 2` so the cursor is
/// guaranteed to move forward on every iteration. Each window starts
/// `chunk_size - overlap` bytes after its predecessor; when that would not
/// advance the cursor (boundary snapping can eat into the step on multi-byte
/// text), the cursor jumps to the end of the previous window instead. Either
/// way the cursor strictly increases, so the loop terminates after covering
/// the whole input.
///
/// Guarantees for non-empty input: the result is non-empty, no chunk is
/// empty, and trimming each chunk's overlapping prefix and concatenating the
/// remainders reproduces the input exactly.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let overlap = overlap.min(chunk_size / 2);
    let len = text.len();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(len));
        if end <= start {
            // chunk_size is smaller than the character at the cursor; take
            // the whole character rather than emit an empty chunk.
            end = next_char_boundary(text, start);
        }
        chunks.push(text[start..end].to_string());

        let next = floor_char_boundary(text, end.saturating_sub(overlap));
        start = if next > start { next } else { end };
    }

    Ok(chunks)
}

/// Largest char boundary less than or equal to `index`.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary strictly greater than `index`.
fn next_char_boundary(text: &str, index: usize) -> usize {
    let mut next = index + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the original text by walking the same cursor schedule the
    /// chunker uses and appending only each chunk's non-overlapping suffix.
    fn reconstruct(text: &str, chunks: &[String], chunk_size: usize, overlap: usize) -> String {
        let overlap = overlap.min(chunk_size / 2);
        let mut rebuilt = String::new();
        let mut prev_end = 0;
        let mut start = 0;
        for chunk in chunks {
            let skip = prev_end - start;
            rebuilt.push_str(&chunk[skip..]);
            let end = start + chunk.len();
            let next = floor_char_boundary(text, end.saturating_sub(overlap));
            prev_end = end;
            start = if next > start { next } else { end };
        }
        rebuilt
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(chunk_text("", 5000, 500).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            chunk_text("abc", 0, 0),
            Err(ChunkingError::InvalidChunkSize)
        ));
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let chunks = chunk_text("hello world", 5000, 500).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn windows_overlap_and_reconstruct_exactly() {
        let text = "abcdefghijklmnopqrstuvw"; // 23 bytes
        let chunks = chunk_text(text, 10, 3).unwrap();
        assert_eq!(chunks[0], "abcdefghij");
        assert_eq!(chunks[1], "hijklmnopq");
        assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
        assert_eq!(reconstruct(text, &chunks, 10, 3), text);
    }

    #[test]
    fn degenerate_overlap_is_clamped_and_terminates() {
        let text = "x".repeat(100);
        // Requested overlap >= chunk size; effective overlap becomes 5.
        let chunks = chunk_text(&text, 10, 50).unwrap();
        let bound = text.len().div_ceil(10 - 5) + 1;
        assert!(chunks.len() <= bound);
        assert_eq!(reconstruct(&text, &chunks, 10, 50), text);
    }

    #[test]
    fn longer_text_reconstructs_exactly() {
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        let chunks = chunk_text(&text, 50, 10).unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(reconstruct(&text, &chunks, 50, 10), text);
    }

    #[test]
    fn multibyte_input_never_splits_characters() {
        let text = "héllo wörld αβγδε ".repeat(20);
        let chunks = chunk_text(&text, 16, 4).unwrap();
        assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
        assert_eq!(reconstruct(&text, &chunks, 16, 4), text);
    }

    #[test]
    fn snapped_cuts_on_multibyte_text_keep_the_tail() {
        // Mixed 1-4 byte characters so most window cuts land mid-character
        // and boundary snapping shrinks the per-iteration step.
        let text = "a€b𝄞cδ".repeat(8); // 96 bytes, 48 chars
        let chunks = chunk_text(&text, 12, 3).unwrap();
        assert_eq!(reconstruct(&text, &chunks, 12, 3), text);

        let last = chunks.last().expect("non-empty result");
        assert!(text.ends_with(last.as_str()));
    }

    #[test]
    fn chunk_smaller_than_character_still_advances() {
        let text = "日本語のテキスト";
        let chunks = chunk_text(text, 1, 0).unwrap();
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
    }
}
