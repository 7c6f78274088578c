/// Next whitespace-delimited token as `(start, end)` byte bounds, starting at `cursor`.
pub(super) fn next_token_bounds(text: &str, cursor: usize) -> Option<(usize, usize)> {
    let rest = text.get(cursor..)?;
    let skipped = rest.len() - rest.trim_start().len();
    let start = cursor + skipped;
    if start >= text.len() {
        return None;
    }

    let end = text[start..]
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, _)| start + idx)
        .unwrap_or(text.len());

    Some((start, end))
}

/// Trims a sub-slice while keeping its absolute offset. Empty results are dropped.
pub(super) fn trim_with_offset(text: &str, offset: usize) -> Option<(usize, &str)> {
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some((offset + leading, trimmed))
    }
}

/// Leading words of a text, used for compact log previews.
pub(super) fn first_words_excerpt(text: &str, max_words: usize) -> &str {
    if text.is_empty() || max_words == 0 {
        return "";
    }

    let mut words = 0usize;
    let mut in_word = false;

    for (idx, ch) in text.char_indices() {
        if !ch.is_whitespace() {
            in_word = true;
            continue;
        }
        if in_word {
            in_word = false;
            words += 1;
            if words >= max_words {
                return &text[..idx];
            }
        }
    }

    text.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_bounds_walk_unicode_whitespace() {
        let text = "  uno\u{a0}dos\ttres ";
        let first = next_token_bounds(text, 0).unwrap();
        assert_eq!(&text[first.0..first.1], "uno");
        let second = next_token_bounds(text, first.1).unwrap();
        assert_eq!(&text[second.0..second.1], "dos");
        let third = next_token_bounds(text, second.1).unwrap();
        assert_eq!(&text[third.0..third.1], "tres");
        assert_eq!(next_token_bounds(text, third.1), None);
    }

    #[test]
    fn trim_keeps_absolute_offset() {
        assert_eq!(trim_with_offset("  hola ", 10), Some((12, "hola")));
        assert_eq!(trim_with_offset(" \n ", 4), None);
    }

    #[test]
    fn excerpt_stops_after_word_limit() {
        assert_eq!(first_words_excerpt("one two three four", 2), "one two");
        assert_eq!(first_words_excerpt("one two ", 5), "one two");
    }
}
