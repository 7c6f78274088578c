use alloc::vec::Vec;

use super::super::{is_closing_mark, is_sentence_terminal, text_utils::trim_with_offset};

/// Paragraphs as `(byte offset, trimmed text)`.
///
/// Blank lines separate paragraphs. When that finds at most one paragraph the
/// text is re-split on single line breaks that follow terminal punctuation and
/// precede a capital letter.
pub(super) fn split_paragraphs(text: &str) -> Vec<(usize, &str)> {
    let blocks = split_on_blank_lines(text);
    if blocks.len() > 1 {
        return blocks;
    }

    split_on_line_breaks(text)
}

fn split_on_blank_lines(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut block: Option<(usize, usize)> = None;
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let line_end = offset + line.len();
        if line.trim().is_empty() {
            if let Some((start, end)) = block.take() {
                out.extend(trim_with_offset(&text[start..end], start));
            }
        } else {
            let start = block.map_or(offset, |(start, _)| start);
            block = Some((start, line_end));
        }
        offset = line_end;
    }

    if let Some((start, end)) = block {
        out.extend(trim_with_offset(&text[start..end], start));
    }

    out
}

fn split_on_line_breaks(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0usize;

    for (idx, _) in text.match_indices('\n') {
        let next_is_capital = text[idx + 1..]
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        if !next_is_capital || !ends_with_terminal(&text[start..idx]) {
            continue;
        }

        out.extend(trim_with_offset(&text[start..idx], start));
        start = idx + 1;
    }

    out.extend(trim_with_offset(&text[start..], start));
    out
}

fn ends_with_terminal(segment: &str) -> bool {
    segment
        .trim_end()
        .trim_end_matches(|ch: char| is_closing_mark(ch))
        .chars()
        .next_back()
        .is_some_and(is_sentence_terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_separate_paragraphs() {
        let text = "First line.\nstill first.\n \t\nSecond.\n\n\n  Third.  ";
        let paragraphs = split_paragraphs(text);
        let texts: Vec<&str> = paragraphs.iter().map(|(_, p)| *p).collect();
        assert_eq!(texts, ["First line.\nstill first.", "Second.", "Third."]);

        for (offset, paragraph) in paragraphs {
            assert_eq!(&text[offset..offset + paragraph.len()], paragraph);
        }
    }

    #[test]
    fn single_breaks_split_only_after_terminal_before_capital() {
        let text = "One ends here.\nTwo starts\nhere and goes on!  \nThree.\nlower case stays.";
        let texts: Vec<&str> = split_paragraphs(text).into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            texts,
            [
                "One ends here.",
                "Two starts\nhere and goes on!",
                "Three.\nlower case stays."
            ]
        );
    }

    #[test]
    fn whitespace_only_yields_nothing() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs(" \n\n \t ").is_empty());
    }
}
