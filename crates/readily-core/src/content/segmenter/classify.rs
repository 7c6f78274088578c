use super::{
    super::{EnrichedWord, Language, PauseType, SpecialCase},
    LONG_WORD_CHARS,
};

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "mt.", "vs.", "etc.", "i.e.",
    "e.g.", "a.m.", "p.m.", "inc.", "ltd.", "co.", "no.", "vol.", "fig.", "approx.", "dept.",
    "est.", "gen.", "col.", "capt.", "lt.", "sgt.", "rev.",
];

const RUSSIAN_ABBREVIATIONS: &[&str] = &[
    "т.е.", "т.д.", "т.п.", "т.к.", "г.", "гг.", "см.", "им.", "ул.", "др.", "стр.", "тов.",
];

/// Locale-aware abbreviation lookup. Entries are lowercase and keep their
/// trailing period.
#[derive(Clone, Copy, Debug)]
pub(super) struct AbbreviationSet {
    extra: &'static [&'static str],
}

impl Default for AbbreviationSet {
    fn default() -> Self {
        Self { extra: &[] }
    }
}

impl AbbreviationSet {
    pub(super) fn for_language(language: &Language) -> Self {
        match language.primary() {
            "ru" | "uk" | "be" => Self {
                extra: RUSSIAN_ABBREVIATIONS,
            },
            _ => Self::default(),
        }
    }

    /// Case-insensitive membership test on a token such as `"Mr."`.
    pub(super) fn contains(&self, token: &str) -> bool {
        ENGLISH_ABBREVIATIONS
            .iter()
            .chain(self.extra.iter())
            .any(|entry| lowercase_eq(token, entry))
    }
}

fn lowercase_eq(token: &str, entry: &str) -> bool {
    token.chars().flat_map(char::to_lowercase).eq(entry.chars())
}

/// One capital letter followed by a period (`"J."`).
pub(super) fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.'), None) if letter.is_uppercase()
    )
}

/// `^\d+\.\d+$`
pub(super) fn is_decimal(text: &str) -> bool {
    let Some((int, frac)) = text.split_once('.') else {
        return false;
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && all_digits(frac)
}

pub(super) fn is_ellipsis(core: &str) -> bool {
    core.contains("...") || core.contains('…')
}

/// Special case of a word, checked in priority order. `core` is the word with
/// its terminal marks but without quotes, brackets or clause marks.
pub(super) fn classify_special_case(
    text: &str,
    core: &str,
    grouped_initials: bool,
    abbreviations: &AbbreviationSet,
) -> Option<SpecialCase> {
    if is_decimal(text) {
        Some(SpecialCase::Decimal)
    } else if is_ellipsis(core) {
        Some(SpecialCase::Ellipsis)
    } else if abbreviations.contains(core) {
        Some(SpecialCase::Abbreviation)
    } else if grouped_initials || is_initial(core) {
        Some(SpecialCase::Initial)
    } else if text.chars().count() >= LONG_WORD_CHARS {
        Some(SpecialCase::LongWord)
    } else {
        None
    }
}

pub(super) fn determine_pause_type(word: &EnrichedWord) -> PauseType {
    if word.context.is_paragraph_end || word.ends_sentence() {
        PauseType::Full
    } else if word.punctuation.clause_mark().is_some()
        || word.special_case == Some(SpecialCase::LongWord)
    {
        PauseType::Small
    } else {
        PauseType::None
    }
}
