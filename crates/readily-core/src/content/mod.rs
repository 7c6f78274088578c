//! Chapter content model shared by the segmenter, the chapter cache and playback.

use alloc::{string::String, vec::Vec};
use core::{iter, ops::Range};

pub mod chapter_cache;
pub mod segmenter;
mod text_utils;

pub use chapter_cache::{CacheStats, ChapterCache, DEFAULT_CHAPTER_CACHE_CAPACITY};
pub use segmenter::{Segmenter, process};

pub const LANGUAGE_TAG_BYTES: usize = 8;
const DEFAULT_LANGUAGE: &str = "en";

/// Lowercase locale tag supplied by the importer (`"en"`, `"ru"`, `"pt-br"`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Language(heapless::String<LANGUAGE_TAG_BYTES>);

impl Language {
    /// Builds a tag, truncating anything past [`LANGUAGE_TAG_BYTES`].
    pub fn new(tag: &str) -> Self {
        let mut out = heapless::String::new();
        for ch in tag.trim().chars() {
            let ch = if ch == '_' { '-' } else { ch.to_ascii_lowercase() };
            if out.push(ch).is_err() {
                break;
            }
        }

        if out.is_empty() {
            return Self::default();
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Primary subtag, e.g. `"pt"` for `"pt-br"`.
    pub fn primary(&self) -> &str {
        self.as_str().split('-').next().unwrap_or(DEFAULT_LANGUAGE)
    }
}

impl Default for Language {
    fn default() -> Self {
        let mut out = heapless::String::new();
        let _ = out.push_str(DEFAULT_LANGUAGE);
        Self(out)
    }
}

/// Punctuation separated from a word.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Punctuation {
    /// Leading opening quotes and brackets.
    pub before: String,
    /// Trailing in-sentence marks and closing quotes/brackets.
    pub after: String,
    /// Sentence-terminal marks (`.`, `!`, `?`, `…`).
    pub end_of_sentence: String,
}

impl Punctuation {
    /// Last in-sentence mark (`,` `;` `:` `—` `–`) carried in `after`.
    pub fn clause_mark(&self) -> Option<char> {
        self.after.chars().rev().find(|ch| is_clause_mark(*ch))
    }
}

/// Span membership flags computed by the dialog/bracket scan.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WordContext {
    pub in_dialog: bool,
    pub in_brackets: bool,
    pub dialog_start: bool,
    pub dialog_end: bool,
    pub bracket_start: bool,
    pub bracket_end: bool,
    pub is_paragraph_end: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PauseType {
    #[default]
    None,
    /// Timing multiplier only, autoplay continues.
    Small,
    /// Autoplay halts on this word until an explicit advance.
    Full,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpecialCase {
    Abbreviation,
    Initial,
    Decimal,
    LongWord,
    Ellipsis,
}

/// Atomic display unit produced by the segmenter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnrichedWord {
    pub text: String,
    pub punctuation: Punctuation,
    pub context: WordContext,
    pub pause_type: PauseType,
    pub special_case: Option<SpecialCase>,
    pub display_as: String,
    pub original_text: String,
    /// Byte offset of `original_text` in the chapter text.
    pub char_index: usize,
    pub paragraph_index: usize,
    /// Sentence index within the paragraph.
    pub sentence_index: usize,
    /// Word index within the sentence.
    pub word_index: usize,
}

impl EnrichedWord {
    pub fn ends_sentence(&self) -> bool {
        !self.punctuation.end_of_sentence.is_empty()
    }

    pub fn requires_full_stop(&self) -> bool {
        self.pause_type == PauseType::Full
    }

    /// Byte range of the word in the chapter text, for highlighting.
    pub fn text_range(&self) -> Range<usize> {
        self.char_index..self.char_index + self.original_text.len()
    }
}

/// Flat element view of a chapter: words interleaved with structural markers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChapterElement<'a> {
    Word(&'a EnrichedWord),
    SentenceEnd,
    ParagraphEnd,
}

/// Segmented chapter. Words are stored once; sentences and paragraphs are
/// contiguous ranges over them, so the structural views always flatten back
/// to the word sequence.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessedChapter {
    words: Vec<EnrichedWord>,
    sentence_bounds: Vec<Range<usize>>,
    paragraph_bounds: Vec<Range<usize>>,
    language: Language,
}

impl ProcessedChapter {
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        words: Vec<EnrichedWord>,
        sentence_bounds: Vec<Range<usize>>,
        paragraph_bounds: Vec<Range<usize>>,
        language: Language,
    ) -> Self {
        debug_assert_eq!(
            sentence_bounds.last().map_or(0, |range| range.end),
            words.len()
        );
        debug_assert_eq!(
            paragraph_bounds.last().map_or(0, |range| range.end),
            sentence_bounds.len()
        );
        Self {
            words,
            sentence_bounds,
            paragraph_bounds,
            language,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_bounds.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_bounds.len()
    }

    pub fn words(&self) -> &[EnrichedWord] {
        &self.words
    }

    pub fn word(&self, index: usize) -> Option<&EnrichedWord> {
        self.words.get(index)
    }

    /// Word range covered by a sentence (global sentence index).
    pub fn sentence_range(&self, index: usize) -> Option<Range<usize>> {
        self.sentence_bounds.get(index).cloned()
    }

    pub fn sentence(&self, index: usize) -> Option<&[EnrichedWord]> {
        self.sentence_range(index).map(|range| &self.words[range])
    }

    pub fn sentences(&self) -> impl Iterator<Item = &[EnrichedWord]> + '_ {
        self.sentence_bounds
            .iter()
            .map(|range| &self.words[range.clone()])
    }

    /// Flat index of each sentence's first word.
    pub fn sentence_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.sentence_bounds.iter().map(|range| range.start)
    }

    /// Global sentence index containing the word at `word_index`.
    pub fn sentence_of_word(&self, word_index: usize) -> Option<usize> {
        if word_index >= self.words.len() {
            return None;
        }
        let after = self
            .sentence_bounds
            .partition_point(|range| range.start <= word_index);
        after.checked_sub(1)
    }

    pub fn paragraph(&self, index: usize) -> Option<Paragraph<'_>> {
        self.paragraph_bounds
            .get(index)
            .map(|sentences| Paragraph {
                chapter: self,
                sentences: sentences.clone(),
            })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph<'_>> + '_ {
        (0..self.paragraph_bounds.len()).filter_map(|index| self.paragraph(index))
    }

    /// Flat index of the first word of a paragraph.
    pub fn paragraph_first_word(&self, index: usize) -> Option<usize> {
        let sentences = self.paragraph_bounds.get(index)?;
        self.sentence_bounds
            .get(sentences.start)
            .map(|range| range.start)
    }

    pub fn paragraph_starts(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.paragraph_bounds.len()).filter_map(|index| self.paragraph_first_word(index))
    }

    pub fn word_text_range(&self, index: usize) -> Option<Range<usize>> {
        self.word(index).map(EnrichedWord::text_range)
    }

    pub fn elements(&self) -> impl Iterator<Item = ChapterElement<'_>> + '_ {
        self.paragraphs().flat_map(|paragraph| {
            paragraph
                .sentences()
                .flat_map(|sentence| {
                    sentence
                        .iter()
                        .map(ChapterElement::Word)
                        .chain(iter::once(ChapterElement::SentenceEnd))
                })
                .chain(iter::once(ChapterElement::ParagraphEnd))
        })
    }
}

/// Borrowed view of one paragraph.
#[derive(Clone, Debug)]
pub struct Paragraph<'a> {
    chapter: &'a ProcessedChapter,
    sentences: Range<usize>,
}

impl<'a> Paragraph<'a> {
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn sentences(&self) -> impl Iterator<Item = &'a [EnrichedWord]> + use<'a> {
        let chapter = self.chapter;
        chapter.sentence_bounds[self.sentences.clone()]
            .iter()
            .map(move |range| &chapter.words[range.clone()])
    }

    pub fn words(&self) -> &'a [EnrichedWord] {
        let bounds = &self.chapter.sentence_bounds[self.sentences.clone()];
        match (bounds.first(), bounds.last()) {
            (Some(first), Some(last)) => &self.chapter.words[first.start..last.end],
            _ => &[],
        }
    }
}

pub(crate) fn is_sentence_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '…')
}

pub(crate) fn is_clause_mark(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':' | '—' | '–')
}

pub(crate) fn is_opening_mark(ch: char) -> bool {
    matches!(ch, '"' | '“' | '„' | '«' | '‘' | '\'' | '(' | '[' | '{')
}

/// `“` is also the closer of a low `„` quote.
pub(crate) fn is_closing_mark(ch: char) -> bool {
    matches!(ch, '"' | '”' | '“' | '»' | '’' | '\'' | ')' | ']' | '}')
}

/// Supplier of raw chapter text, keyed by chapter identity.
pub trait ChapterSource {
    type ChapterId: Clone + Eq + core::fmt::Debug;

    /// Raw text for a chapter, or `None` when the importer never supplied it.
    fn chapter_text(&self, id: &Self::ChapterId) -> Option<&str>;

    /// Locale tag used for abbreviation sets.
    fn language(&self) -> Language {
        Language::default()
    }
}
