impl<L> PlaybackEngine<L>
where
    L: StateListener,
{
    pub fn next_word(&mut self, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        self.cancel_timer();

        if self.word_index + 1 < self.chapter.word_count() {
            self.move_to(self.word_index + 1);
            self.resume_if_playing(now_ms);
        } else {
            self.is_playing = false;
        }
        self.publish();
    }

    pub fn prev_word(&mut self, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        self.cancel_timer();

        if self.word_index > 0 {
            self.move_to(self.word_index - 1);
        }
        self.resume_if_playing(now_ms);
        self.publish();
    }

    /// Jumps to the first word of the following sentence, clamped to the last.
    pub fn next_sentence(&mut self, now_ms: u64) {
        let target = self.sentence_index.saturating_add(1);
        self.jump_to_sentence(target, now_ms);
    }

    /// Jumps to the first word of the preceding sentence, clamped to the first.
    pub fn prev_sentence(&mut self, now_ms: u64) {
        let target = self.sentence_index.saturating_sub(1);
        self.jump_to_sentence(target, now_ms);
    }

    /// Back to the first word of the current sentence.
    pub fn restart_sentence(&mut self, now_ms: u64) {
        self.jump_to_sentence(self.sentence_index, now_ms);
    }

    /// Leaves a boundary stop for the next sentence's first word. Autoplay
    /// continues when it was running or halted by the stop.
    pub fn advance_to_next_sentence(&mut self, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        let resume = self.is_playing || self.is_stopped_at_boundary();
        self.cancel_timer();
        self.clear_stop();

        let next = self.sentence_index + 1;
        match self.chapter.sentence_range(next) {
            Some(range) => {
                self.move_to(range.start);
                self.is_playing = resume;
                self.resume_if_playing(now_ms);
            }
            None => {
                self.is_playing = false;
                debug!("playback: no sentence after {}", self.sentence_index);
            }
        }
        self.publish();
    }

    /// Stops playback and rewinds to the first word.
    pub fn reset(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_timer();
        self.is_playing = false;
        self.move_to(0);
        self.publish();
    }

    pub fn seek_word(&mut self, index: usize, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        self.cancel_timer();
        let index = index.min(self.chapter.word_count() - 1);
        self.move_to(index);
        self.resume_if_playing(now_ms);
        self.publish();
    }

    /// Jumps to the first word of a paragraph, clamped to the last paragraph.
    pub fn seek_paragraph(&mut self, index: usize, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        let index = index.min(self.chapter.paragraph_count().saturating_sub(1));
        let Some(word_index) = self.chapter.paragraph_first_word(index) else {
            return;
        };
        self.cancel_timer();
        self.move_to(word_index);
        self.resume_if_playing(now_ms);
        self.publish();
    }

    fn jump_to_sentence(&mut self, sentence: usize, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        let sentence = sentence.min(self.max_sentence_index());
        let Some(range) = self.chapter.sentence_range(sentence) else {
            return;
        };
        self.cancel_timer();
        self.move_to(range.start);
        self.resume_if_playing(now_ms);
        self.publish();
    }

    /// Moves the cursor and drops any boundary stop.
    fn move_to(&mut self, word_index: usize) {
        self.word_index = word_index;
        self.sentence_index = self.chapter.sentence_of_word(word_index).unwrap_or(0);
        self.clear_stop();
    }

    fn resume_if_playing(&mut self, now_ms: u64) {
        if self.is_playing {
            self.schedule_current(now_ms);
        }
    }
}
