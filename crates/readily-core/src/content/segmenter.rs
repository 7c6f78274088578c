//! Chapter text segmentation into paragraphs, sentences and enriched words.

use alloc::vec::Vec;

use log::debug;

use super::{Language, ProcessedChapter, text_utils::first_words_excerpt};

mod classify;
mod context;
mod paragraphs;
mod sentences;
mod words;

#[cfg(test)]
mod tests;

use classify::{AbbreviationSet, determine_pause_type};
use context::ScanContext;

/// Words at least this many characters long are classified as long words.
pub const LONG_WORD_CHARS: usize = 15;
const LOG_PREVIEW_WORDS: usize = 6;

/// Segments `text` with the default language.
pub fn process(text: &str) -> ProcessedChapter {
    Segmenter::default().process(text)
}

/// Stateless segmenter configured for one locale.
#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    language: Language,
    abbreviations: AbbreviationSet,
}

impl Segmenter {
    pub fn new(language: Language) -> Self {
        let abbreviations = AbbreviationSet::for_language(&language);
        Self {
            language,
            abbreviations,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Splits chapter text into a [`ProcessedChapter`]. Whitespace-only input
    /// yields an empty chapter.
    pub fn process(&self, text: &str) -> ProcessedChapter {
        let mut words = Vec::new();
        let mut sentence_bounds = Vec::new();
        let mut paragraph_bounds = Vec::new();
        let mut scan = ScanContext::default();

        for (paragraph_index, (offset, paragraph)) in
            paragraphs::split_paragraphs(text).into_iter().enumerate()
        {
            let first_sentence = sentence_bounds.len();
            let sentences = sentences::split_sentences(paragraph, offset, &self.abbreviations);

            for (sentence_index, (sentence_offset, sentence)) in sentences.into_iter().enumerate() {
                let start = words.len();
                let tokens = words::tokenize(sentence, sentence_offset);
                let token_count = tokens.len();

                for (word_index, token) in tokens.into_iter().enumerate() {
                    let is_last = word_index + 1 == token_count;
                    let mut word = words::enrich(token, is_last, &self.abbreviations);
                    word.paragraph_index = paragraph_index;
                    word.sentence_index = sentence_index;
                    word.word_index = word_index;
                    scan.apply(&mut word);
                    words.push(word);
                }

                if words.len() > start {
                    sentence_bounds.push(start..words.len());
                }
            }

            if sentence_bounds.len() > first_sentence {
                paragraph_bounds.push(first_sentence..sentence_bounds.len());
            }
        }

        // The chapter's closing word is left to the playback engine.
        for range in paragraph_bounds.iter().rev().skip(1) {
            let last_word = sentence_bounds[range.end - 1].end - 1;
            words[last_word].context.is_paragraph_end = true;
        }

        for word in &mut words {
            word.pause_type = determine_pause_type(word);
        }

        debug!(
            "segmenter: lang={} paragraphs={} sentences={} words={} open_dialog={} open_brackets={} preview={:?}",
            self.language.as_str(),
            paragraph_bounds.len(),
            sentence_bounds.len(),
            words.len(),
            scan.in_dialog(),
            scan.in_brackets(),
            first_words_excerpt(text.trim_start(), LOG_PREVIEW_WORDS)
        );

        ProcessedChapter::from_parts(
            words,
            sentence_bounds,
            paragraph_bounds,
            self.language.clone(),
        )
    }
}
