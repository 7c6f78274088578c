use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use super::{
    super::{
        EnrichedWord, Punctuation, is_clause_mark, is_closing_mark, is_opening_mark,
        is_sentence_terminal, text_utils::next_token_bounds,
    },
    classify::{AbbreviationSet, classify_special_case, is_initial},
};

/// Whitespace token, or a run of grouped initials, before enrichment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct RawToken<'a> {
    pub(super) offset: usize,
    pub(super) original: &'a str,
    pub(super) display: String,
    pub(super) grouped_initials: bool,
}

/// Tokenizes one sentence. Consecutive initials (`J. R. R.`) collapse into a
/// single token shown with single spaces.
pub(super) fn tokenize(sentence: &str, offset: usize) -> Vec<RawToken<'_>> {
    let mut bounds = Vec::new();
    let mut cursor = 0usize;
    while let Some((start, end)) = next_token_bounds(sentence, cursor) {
        bounds.push((start, end));
        cursor = end;
    }

    let mut tokens = Vec::with_capacity(bounds.len());
    let mut idx = 0usize;
    while idx < bounds.len() {
        let (start, end) = bounds[idx];
        let mut run_end = idx + 1;
        if is_initial(&sentence[start..end]) {
            while run_end < bounds.len() {
                let (next_start, next_end) = bounds[run_end];
                if !is_initial(&sentence[next_start..next_end]) {
                    break;
                }
                run_end += 1;
            }
        }

        if run_end - idx > 1 {
            let last_end = bounds[run_end - 1].1;
            let mut display = String::new();
            for (pos, (part_start, part_end)) in bounds[idx..run_end].iter().enumerate() {
                if pos > 0 {
                    display.push(' ');
                }
                display.push_str(&sentence[*part_start..*part_end]);
            }
            tokens.push(RawToken {
                offset: offset + start,
                original: &sentence[start..last_end],
                display,
                grouped_initials: true,
            });
        } else {
            tokens.push(RawToken {
                offset: offset + start,
                original: &sentence[start..end],
                display: sentence[start..end].to_string(),
                grouped_initials: false,
            });
        }
        idx = run_end;
    }

    tokens
}

/// Separates punctuation from a token and classifies it. Context flags and the
/// pause type are filled in later by the segmenter.
pub(super) fn enrich(
    token: RawToken<'_>,
    is_last_in_sentence: bool,
    abbreviations: &AbbreviationSet,
) -> EnrichedWord {
    let display = token.display.as_str();
    let rest = display.trim_start_matches(is_opening_mark);
    let before = display[..display.len() - rest.len()].to_string();

    let body = rest.trim_end_matches(|ch: char| {
        is_sentence_terminal(ch) || is_closing_mark(ch) || is_clause_mark(ch)
    });
    let trailing = &rest[body.len()..];

    let terminal: String = trailing.chars().filter(|ch| is_sentence_terminal(*ch)).collect();
    let other: String = trailing
        .chars()
        .filter(|ch| !is_sentence_terminal(*ch))
        .collect();

    let mut core = String::with_capacity(body.len() + terminal.len());
    core.push_str(body);
    core.push_str(&terminal);

    let (text, after, end_of_sentence) = if is_last_in_sentence {
        (body.to_string(), other, terminal)
    } else if keeps_period(&core, &terminal, token.grouped_initials, abbreviations) {
        (core.clone(), other, String::new())
    } else {
        (body.to_string(), trailing.to_string(), String::new())
    };

    let special_case =
        classify_special_case(&text, &core, token.grouped_initials, abbreviations);

    EnrichedWord {
        text,
        punctuation: Punctuation {
            before,
            after,
            end_of_sentence,
        },
        special_case,
        original_text: token.original.to_string(),
        char_index: token.offset,
        display_as: token.display,
        ..EnrichedWord::default()
    }
}

/// Inside a sentence, the period of an abbreviation or initial is part of the word.
fn keeps_period(
    core: &str,
    terminal: &str,
    grouped_initials: bool,
    abbreviations: &AbbreviationSet,
) -> bool {
    !terminal.is_empty()
        && terminal.chars().all(|ch| ch == '.')
        && (grouped_initials || abbreviations.contains(core) || is_initial(core))
}
