//! Best-effort slicing of markup by literal marker strings.
//!
//! None of these helpers fail: a missing marker yields `None`, the whole input,
//! or no pieces, and callers decide how much of a result they can still use.

/// The text following the first occurrence of `marker`.
pub fn after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.split_once(marker).map(|(_, rest)| rest)
}

/// The text preceding the first occurrence of `marker`, or all of `text`.
pub fn before<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split_once(marker).map_or(text, |(head, _)| head)
}

/// The text between the first `begin` and the next `end` after it.
///
/// Runs to the end of `text` when `end` is missing; `None` when `begin` is missing.
pub fn slice_between<'a>(text: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    after(text, begin).map(|rest| before(rest, end))
}

/// Every piece of `text` that follows an occurrence of `marker`, each running up to
/// the next occurrence. Text before the first marker is not yielded.
pub fn pieces_after<'a>(text: &'a str, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.split(marker).skip(1)
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Byte counterpart of [`slice_between`], for input that need not be UTF-8.
pub fn bytes_between<'a>(bytes: &'a [u8], begin: &[u8], end: &[u8]) -> Option<&'a [u8]> {
    let rest = &bytes[find_bytes(bytes, begin)? + begin.len()..];
    Some(find_bytes(rest, end).map_or(rest, |idx| &rest[..idx]))
}
