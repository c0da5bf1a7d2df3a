// Boundary matching helpers shared by the reasoning and tool-call splitters.
//
// All positions are byte offsets into UTF-8 text. Every helper respects char
// boundaries so multi-byte delimiters (e.g. `◁think▷`) can be split across
// fragments without producing invalid slices.

/// Return the longest non-empty suffix of `buffer` that is a proper prefix of `tag`.
///
/// `None` means there is nothing to wait for: either no suffix of the buffer could
/// grow into `tag`, or the buffer already contains `tag` in full (the caller should
/// locate it instead of waiting).
pub fn partial_tag_suffix<'a>(buffer: &'a str, tag: &str) -> Option<&'a str> {
    if buffer.is_empty() || tag.is_empty() || buffer.contains(tag) {
        return None;
    }

    let max_len = (tag.len() - 1).min(buffer.len());
    for len in (1..=max_len).rev() {
        if !tag.is_char_boundary(len) {
            continue;
        }
        let start = buffer.len() - len;
        if !buffer.is_char_boundary(start) {
            continue;
        }
        if buffer[start..] == tag[..len] {
            return Some(&buffer[start..]);
        }
    }
    None
}

/// Longest partial suffix of `buffer` across every tag in `tags`.
pub fn partial_suffix_of_any<'a, 't, I>(buffer: &'a str, tags: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'t str>,
{
    tags.into_iter()
        .filter_map(|tag| partial_tag_suffix(buffer, tag))
        .max_by_key(|suffix| suffix.len())
}

/// Consume `literal` from the front of `buffer` on an exact match.
///
/// Returns whether the literal was consumed and the remainder (the untouched
/// buffer when it was not).
pub fn strip_literal_prefix<'a>(buffer: &'a str, literal: &str) -> (bool, &'a str) {
    match buffer.strip_prefix(literal) {
        Some(rest) if !literal.is_empty() => (true, rest),
        _ => (false, buffer),
    }
}

/// Find the earliest position in `haystack` where any of `needles` starts.
///
/// Returns `(byte_position, needle_index)`. When two needles start at the same
/// position the one listed first wins.
pub fn find_earliest<'t, I>(haystack: &str, needles: I) -> Option<(usize, usize)>
where
    I: IntoIterator<Item = &'t str>,
{
    let mut best: Option<(usize, usize)> = None;
    for (index, needle) in needles.into_iter().enumerate() {
        if needle.is_empty() {
            continue;
        }
        if let Some(pos) = haystack.find(needle) {
            match best {
                Some((best_pos, _)) if best_pos <= pos => {}
                _ => best = Some((pos, index)),
            }
        }
    }
    best
}

/// Largest char boundary of `s` that is `<= index`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut boundary = index;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}
