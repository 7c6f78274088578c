use super::*;
use crate::content::{ChapterElement, EnrichedWord, PauseType, SpecialCase};

const SAMPLE: &str = "Mr. Hale checked his watch. \"It's 3.14 minutes past midnight,\" he said.\n\n\
\"We should go. Now,\" Ada whispered (quietly; almost inaudibly) to J. R. R. Tolkien.\n\n\
The end";

fn texts(words: &[EnrichedWord]) -> Vec<&str> {
    words.iter().map(|word| word.text.as_str()).collect()
}

fn assert_invariants(chapter: &ProcessedChapter) {
    let from_sentences: Vec<&EnrichedWord> = chapter.sentences().flatten().collect();
    let words: Vec<&EnrichedWord> = chapter.words().iter().collect();
    assert_eq!(from_sentences, words);

    let from_paragraphs: Vec<&[EnrichedWord]> = chapter
        .paragraphs()
        .flat_map(|paragraph| paragraph.sentences().collect::<Vec<_>>())
        .collect();
    let sentences: Vec<&[EnrichedWord]> = chapter.sentences().collect();
    assert_eq!(from_paragraphs, sentences);

    for pair in chapter.words().windows(2) {
        assert!(pair[0].char_index < pair[1].char_index);
    }

    for word in chapter.words() {
        if word.ends_sentence() || word.context.is_paragraph_end {
            assert_eq!(word.pause_type, PauseType::Full, "word {:?}", word.text);
        }
    }
}

#[test]
fn mr_hale_example_yields_two_sentences() {
    let chapter = process(
        "Mr. Hale checked his watch. \"It's 3.14 minutes past midnight,\" he said.",
    );
    assert_eq!(chapter.sentence_count(), 2);
    assert_eq!(
        texts(chapter.sentence(0).unwrap()),
        ["Mr.", "Hale", "checked", "his", "watch"]
    );

    let second = chapter.sentence(1).unwrap();
    assert_eq!(
        texts(second),
        ["It's", "3.14", "minutes", "past", "midnight", "he", "said"]
    );
    assert_eq!(second[1].special_case, Some(SpecialCase::Decimal));
    assert_eq!(chapter.words()[0].pause_type, PauseType::None);
    assert_invariants(&chapter);
}

#[test]
fn decimal_price_does_not_split() {
    let chapter = process("The price is 3.14 dollars. That is cheap.");
    assert_eq!(chapter.sentence_count(), 2);
    assert_eq!(
        texts(chapter.sentence(0).unwrap()),
        ["The", "price", "is", "3.14", "dollars"]
    );
    assert_eq!(texts(chapter.sentence(1).unwrap()), ["That", "is", "cheap"]);
}

#[test]
fn processing_is_idempotent() {
    assert_eq!(process(SAMPLE), process(SAMPLE));
}

#[test]
fn sample_chapter_structure_and_invariants() {
    let chapter = process(SAMPLE);
    assert_invariants(&chapter);
    assert_eq!(chapter.paragraph_count(), 3);
    assert_eq!(chapter.sentence_count(), 5);

    let second = chapter.paragraph(1).unwrap();
    assert_eq!(second.sentence_count(), 2);
    assert_eq!(second.words()[0].paragraph_index, 1);
    assert_eq!(second.words().last().unwrap().sentence_index, 1);
}

#[test]
fn char_index_slices_original_text() {
    let chapter = process(SAMPLE);
    for word in chapter.words() {
        assert_eq!(&SAMPLE[word.text_range()], word.original_text);
    }
}

#[test]
fn dialog_spans_sentences_and_brackets_are_flagged() {
    let chapter = process(SAMPLE);
    let words = chapter.words();
    let find = |text: &str| words.iter().find(|word| word.text == text).unwrap();

    let we = find("We");
    assert!(we.context.dialog_start && we.context.in_dialog);
    let go = find("go");
    assert!(go.context.in_dialog && !go.context.dialog_end);
    assert_eq!(go.pause_type, PauseType::Full);
    let now = find("Now");
    assert!(now.context.in_dialog && now.context.dialog_end);
    assert_eq!(now.pause_type, PauseType::Small);
    assert!(!find("Ada").context.in_dialog);

    let quietly = find("quietly");
    assert!(quietly.context.bracket_start && quietly.context.in_brackets);
    assert_eq!(quietly.punctuation.clause_mark(), Some(';'));
    let inaudibly = find("inaudibly");
    assert!(inaudibly.context.bracket_end && inaudibly.context.in_brackets);
    assert!(!find("to").context.in_brackets);
}

#[test]
fn low_opening_quote_closes_and_strips() {
    let text = "Он сказал: „Привет“. Потом ушёл домой.\n\nДругой абзац.";
    let chapter = Segmenter::new(Language::new("ru")).process(text);
    assert_invariants(&chapter);
    assert_eq!(chapter.sentence_count(), 3);

    let hello = &chapter.words()[2];
    assert_eq!(hello.text, "Привет");
    assert_eq!(hello.punctuation.before, "„");
    assert_eq!(hello.punctuation.after, "“");
    assert_eq!(hello.punctuation.end_of_sentence, ".");
    assert!(hello.context.dialog_start && hello.context.dialog_end);

    for word in &chapter.words()[3..] {
        assert!(!word.context.in_dialog, "word {:?}", word.text);
    }
}

#[test]
fn curly_single_quotes_mark_dialog() {
    let chapter = process("He said ‘Stop here’ and left.");
    let words = chapter.words();
    assert_eq!(texts(words), ["He", "said", "Stop", "here", "and", "left"]);

    assert!(!words[1].context.in_dialog);
    assert!(words[2].context.dialog_start && words[2].context.in_dialog);
    assert!(words[3].context.in_dialog && words[3].context.dialog_end);
    assert_eq!(words[3].punctuation.after, "’");
    assert!(!words[4].context.in_dialog);
}

#[test]
fn trailing_apostrophe_is_not_dialog() {
    let chapter = process("The students’ books stayed here.");
    assert!(chapter.words().iter().all(|word| !word.context.in_dialog));
}

#[test]
fn initials_group_into_one_word() {
    let chapter = process(SAMPLE);
    let initials = chapter
        .words()
        .iter()
        .find(|word| word.display_as == "J. R. R.")
        .unwrap();
    assert_eq!(initials.special_case, Some(SpecialCase::Initial));
    assert_eq!(initials.pause_type, PauseType::None);
}

#[test]
fn paragraph_end_is_full_except_chapter_tail() {
    let chapter = process(SAMPLE);
    let ends: Vec<&str> = chapter
        .words()
        .iter()
        .filter(|word| word.context.is_paragraph_end)
        .map(|word| word.text.as_str())
        .collect();
    assert_eq!(ends, ["said", "Tolkien"]);

    let last = chapter.words().last().unwrap();
    assert_eq!(last.text, "end");
    assert_eq!(last.pause_type, PauseType::None);
}

#[test]
fn long_words_get_small_pause() {
    let chapter = process("Such incomprehensibilities happen daily.");
    let long = &chapter.words()[1];
    assert_eq!(long.special_case, Some(SpecialCase::LongWord));
    assert_eq!(long.pause_type, PauseType::Small);
}

#[test]
fn empty_and_whitespace_input() {
    for text in ["", "   ", "\n\n\t \n"] {
        let chapter = process(text);
        assert!(chapter.is_empty());
        assert_eq!(chapter.sentence_count(), 0);
        assert_eq!(chapter.paragraph_count(), 0);
    }
}

#[test]
fn single_word_is_one_sentence_without_pause() {
    let chapter = process("Hello");
    assert_eq!(chapter.paragraph_count(), 1);
    assert_eq!(chapter.sentence_count(), 1);
    assert_eq!(chapter.word_count(), 1);
    assert_eq!(chapter.words()[0].pause_type, PauseType::None);
}

#[test]
fn punctuation_only_text_still_yields_a_word() {
    let chapter = process("...");
    assert_eq!(chapter.word_count(), 1);
    let word = &chapter.words()[0];
    assert_eq!(word.display_as, "...");
    assert_eq!(word.punctuation.end_of_sentence, "...");
    assert_eq!(word.special_case, Some(SpecialCase::Ellipsis));
    assert_eq!(word.pause_type, PauseType::Full);
}

#[test]
fn single_linebreak_fallback_recovers_paragraphs() {
    let chapter = process("First paragraph ends.\nSecond one starts here.\nthird line continues.");
    assert_eq!(chapter.paragraph_count(), 2);
    assert!(chapter.words()[2].context.is_paragraph_end);
}

#[test]
fn russian_abbreviations_follow_language() {
    let text = "Он пришёл, т.е. Вернулся домой.";
    let english = process(text);
    let russian = Segmenter::new(Language::new("ru")).process(text);
    assert_eq!(english.sentence_count(), 2);
    assert_eq!(russian.sentence_count(), 1);
    assert_eq!(russian.language().as_str(), "ru");
}

#[test]
fn elements_interleave_structure_markers() {
    let chapter = process("One two. Three.\n\nFour.");
    let kinds: Vec<&str> = chapter
        .elements()
        .map(|element| match element {
            ChapterElement::Word(word) => word.text.as_str(),
            ChapterElement::SentenceEnd => "|",
            ChapterElement::ParagraphEnd => "¶",
        })
        .collect();
    assert_eq!(
        kinds,
        ["One", "two", "|", "Three", "|", "¶", "Four", "|", "¶"]
    );
}

#[test]
fn sentence_lookup_by_word_index() {
    let chapter = process("One two. Three four five. Six.");
    assert_eq!(chapter.sentence_of_word(0), Some(0));
    assert_eq!(chapter.sentence_of_word(1), Some(0));
    assert_eq!(chapter.sentence_of_word(2), Some(1));
    assert_eq!(chapter.sentence_of_word(5), Some(2));
    assert_eq!(chapter.sentence_of_word(6), None);
    assert_eq!(chapter.sentence_starts().collect::<Vec<_>>(), [0, 2, 5]);
}

#[test]
fn paragraph_starts_and_word_ranges() {
    let text = "One two.\n\nThree four. Five.\n\nSix";
    let chapter = process(text);
    assert_eq!(chapter.paragraph_starts().collect::<Vec<_>>(), [0, 2, 5]);
    let range = chapter.word_text_range(3).unwrap();
    assert_eq!(&text[range], "four.");
    assert_eq!(chapter.word_text_range(6), None);
}
