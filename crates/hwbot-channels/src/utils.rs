//! Shared utilities for channel implementations.

/// Split a long message into chunks of at most `max_chars` characters.
///
/// Length is counted in chars, not bytes, so multi-byte text (Cyrillic,
/// CJK, emoji) gets the full platform limit. Prefers splitting right after
/// a newline when one is available.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let rest = &text[start..];
        let Some((limit, _)) = rest.char_indices().nth(max_chars) else {
            chunks.push(rest);
            break;
        };
        let break_at = rest[..limit].rfind('\n').map_or(limit, |i| i + 1);
        chunks.push(&rest[..break_at]);
        start += break_at;
    }

    if chunks.is_empty() {
        chunks.push(text);
    }
    chunks
}
