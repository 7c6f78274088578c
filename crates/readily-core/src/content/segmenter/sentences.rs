use alloc::vec::Vec;

use super::{
    super::{is_closing_mark, is_opening_mark, is_sentence_terminal, text_utils::trim_with_offset},
    classify::{AbbreviationSet, is_initial},
};

/// Sentences of one paragraph as `(absolute byte offset, trimmed text)`.
///
/// Single left-to-right scan. A run of terminal marks (plus any closing quotes
/// glued to it) ends a sentence when it closes the text, when it is `…`
/// followed by whitespace, or when whitespace and an optionally quoted capital
/// letter follow. Decimals never split; abbreviations and initials split only
/// before a line break and a capital.
pub(super) fn split_sentences<'a>(
    paragraph: &'a str,
    offset: usize,
    abbreviations: &AbbreviationSet,
) -> Vec<(usize, &'a str)> {
    let chars: Vec<(usize, char)> = paragraph.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut idx = 0usize;

    while idx < chars.len() {
        if !is_sentence_terminal(chars[idx].1) {
            idx += 1;
            continue;
        }

        let mut run_end = idx + 1;
        while run_end < chars.len()
            && (is_sentence_terminal(chars[run_end].1) || is_closing_mark(chars[run_end].1))
        {
            run_end += 1;
        }

        if is_boundary(paragraph, &chars, idx, run_end, abbreviations) {
            let end = chars
                .get(run_end)
                .map_or(paragraph.len(), |(next_pos, _)| *next_pos);
            out.extend(trim_with_offset(&paragraph[start..end], offset + start));
            start = end;
        }

        idx = run_end;
    }

    out.extend(trim_with_offset(&paragraph[start..], offset + start));
    out
}

fn is_boundary(
    paragraph: &str,
    chars: &[(usize, char)],
    run_start: usize,
    run_end: usize,
    abbreviations: &AbbreviationSet,
) -> bool {
    if run_end >= chars.len() {
        return true;
    }

    let (pos, ch) = chars[run_start];
    if ch == '.' && run_end == run_start + 1 && is_decimal_point(chars, run_start) {
        return false;
    }

    if !chars[run_end].1.is_whitespace() {
        return false;
    }

    let run = &chars[run_start..run_end];
    if run.iter().any(|(_, mark)| *mark == '…') {
        return true;
    }

    let mut next = run_end;
    let mut crosses_line = false;
    while next < chars.len() && chars[next].1.is_whitespace() {
        crosses_line |= chars[next].1 == '\n';
        next += 1;
    }
    if next >= chars.len() {
        return true;
    }
    while next < chars.len() && is_opening_mark(chars[next].1) {
        next += 1;
    }
    let capital_follows = chars.get(next).is_some_and(|(_, c)| c.is_uppercase());

    if ch == '.' && run_end == run_start + 1 {
        let token = preceding_token(paragraph, chars, run_start, pos);
        if abbreviations.contains(token) || is_initial(token) {
            return crosses_line && capital_follows;
        }
    }

    capital_follows
}

fn is_decimal_point(chars: &[(usize, char)], idx: usize) -> bool {
    let before = idx
        .checked_sub(1)
        .and_then(|prev| chars.get(prev))
        .is_some_and(|(_, c)| c.is_ascii_digit());
    let after = chars.get(idx + 1).is_some_and(|(_, c)| c.is_ascii_digit());
    before && after
}

/// Whitespace-delimited token ending with the period at `idx`, without leading
/// opening marks.
fn preceding_token<'a>(
    paragraph: &'a str,
    chars: &[(usize, char)],
    idx: usize,
    period_pos: usize,
) -> &'a str {
    let mut token_start = idx;
    while token_start > 0 && !chars[token_start - 1].1.is_whitespace() {
        token_start -= 1;
    }

    let token = &paragraph[chars[token_start].0..period_pos + '.'.len_utf8()];
    token.trim_start_matches(is_opening_mark)
}
