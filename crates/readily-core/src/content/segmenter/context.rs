use super::super::EnrichedWord;

/// Dialog/bracket nesting carried across sentences of one chapter.
///
/// Words must be fed in document order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct ScanContext {
    dialog_depth: u16,
    /// Open `‘` spans, counted within `dialog_depth`. Only these close on `’`.
    single_quote_depth: u16,
    bracket_depth: u16,
}

impl ScanContext {
    pub(super) fn apply(&mut self, word: &mut EnrichedWord) {
        for ch in word.punctuation.before.chars() {
            match ch {
                // A straight quote inside dialog re-opens the same span.
                '"' if self.dialog_depth > 0 => {}
                '"' | '“' | '«' | '„' => {
                    word.context.dialog_start |= self.dialog_depth == 0;
                    self.dialog_depth = self.dialog_depth.saturating_add(1);
                }
                '‘' => {
                    word.context.dialog_start |= self.dialog_depth == 0;
                    self.dialog_depth = self.dialog_depth.saturating_add(1);
                    self.single_quote_depth = self.single_quote_depth.saturating_add(1);
                }
                '(' | '[' | '{' => {
                    word.context.bracket_start |= self.bracket_depth == 0;
                    self.bracket_depth = self.bracket_depth.saturating_add(1);
                }
                _ => {}
            }
        }

        word.context.in_dialog = self.dialog_depth > 0;
        word.context.in_brackets = self.bracket_depth > 0;

        for ch in word.punctuation.after.chars() {
            match ch {
                // `“` closes `„` in German and Russian typesetting.
                '"' | '”' | '“' | '»' if self.dialog_depth > self.single_quote_depth => {
                    self.dialog_depth -= 1;
                    word.context.dialog_end |= self.dialog_depth == 0;
                }
                // Apostrophes (`students’`) outside a `‘` span are ignored.
                '’' if self.single_quote_depth > 0 => {
                    self.single_quote_depth -= 1;
                    self.dialog_depth -= 1;
                    word.context.dialog_end |= self.dialog_depth == 0;
                }
                ')' | ']' | '}' if self.bracket_depth > 0 => {
                    self.bracket_depth -= 1;
                    word.context.bracket_end |= self.bracket_depth == 0;
                }
                _ => {}
            }
        }
    }

    pub(super) fn in_dialog(&self) -> bool {
        self.dialog_depth > 0
    }

    pub(super) fn in_brackets(&self) -> bool {
        self.bracket_depth > 0
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    fn word(before: &str, after: &str) -> EnrichedWord {
        let mut word = EnrichedWord::default();
        word.punctuation.before = String::from(before);
        word.punctuation.after = String::from(after);
        word
    }

    #[test]
    fn dialog_span_crosses_sentences() {
        let mut scan = ScanContext::default();

        let mut open = word("\"", "");
        scan.apply(&mut open);
        assert!(open.context.dialog_start && open.context.in_dialog);

        // Next sentence, still quoted.
        let mut middle = word("", "");
        scan.apply(&mut middle);
        assert!(middle.context.in_dialog);
        assert!(!middle.context.dialog_start);

        let mut close = word("", ",\"");
        scan.apply(&mut close);
        assert!(close.context.in_dialog && close.context.dialog_end);
        assert!(!scan.in_dialog());

        let mut after = word("", "");
        scan.apply(&mut after);
        assert!(!after.context.in_dialog);
    }

    #[test]
    fn nested_brackets_end_at_outermost_close() {
        let mut scan = ScanContext::default();
        let mut outer = word("(", "");
        let mut inner = word("[", "]");
        let mut close = word("", ")");
        scan.apply(&mut outer);
        scan.apply(&mut inner);
        assert!(inner.context.in_brackets);
        assert!(!inner.context.bracket_start);
        assert!(!inner.context.bracket_end);
        assert!(scan.in_brackets());
        scan.apply(&mut close);
        assert!(close.context.bracket_end);
        assert!(!scan.in_brackets());
    }

    #[test]
    fn low_quote_closes_on_high_quote() {
        let mut scan = ScanContext::default();
        let mut quoted = word("„", "“");
        scan.apply(&mut quoted);
        assert!(quoted.context.dialog_start && quoted.context.dialog_end);
        assert!(!scan.in_dialog());
    }

    #[test]
    fn curly_single_quotes_track_dialog() {
        let mut scan = ScanContext::default();
        let mut possessive = word("", "’");
        scan.apply(&mut possessive);
        assert!(!possessive.context.in_dialog && !possessive.context.dialog_end);

        let mut open = word("‘", "");
        let mut close = word("", "’");
        scan.apply(&mut open);
        assert!(open.context.dialog_start && open.context.in_dialog);
        scan.apply(&mut close);
        assert!(close.context.in_dialog && close.context.dialog_end);
        assert!(!scan.in_dialog());
    }

    #[test]
    fn apostrophe_inside_double_quotes_keeps_span_open() {
        let mut scan = ScanContext::default();
        let mut open = word("“", "");
        let mut plural = word("", "’");
        scan.apply(&mut open);
        scan.apply(&mut plural);
        assert!(scan.in_dialog());
        assert!(!plural.context.dialog_end);
    }

    #[test]
    fn single_word_quote_opens_and_closes() {
        let mut scan = ScanContext::default();
        let mut quoted = word("«", "»");
        scan.apply(&mut quoted);
        let context = quoted.context;
        assert!(context.dialog_start && context.dialog_end && context.in_dialog);
        assert!(!scan.in_dialog());
    }
}
