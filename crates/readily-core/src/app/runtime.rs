impl<L> PlaybackEngine<L>
where
    L: StateListener,
{
    /// Fires the pending transition once `now_ms` reaches its deadline.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        if self.destroyed || !self.is_playing {
            return TickResult::NoRender;
        }

        let Some(deadline) = self.next_word_ms else {
            return TickResult::NoRender;
        };
        if now_ms < deadline {
            return TickResult::NoRender;
        }
        self.next_word_ms = None;

        if self.word_index + 1 >= self.chapter.word_count() {
            self.is_playing = false;
            debug!(
                "playback: end of chapter word={}/{}",
                self.word_index.saturating_add(1),
                self.chapter.word_count()
            );
            self.publish();
            return TickResult::RenderRequested;
        }

        self.move_to(self.word_index + 1);
        self.schedule_current(now_ms);
        self.publish();
        TickResult::RenderRequested
    }

    /// Starts autoplay. From a boundary stop this first steps past the stop word.
    pub fn play(&mut self, now_ms: u64) {
        if self.destroyed || self.chapter.is_empty() {
            return;
        }
        self.cancel_timer();

        if self.is_stopped_at_boundary() {
            self.clear_stop();
            if self.word_index + 1 >= self.chapter.word_count() {
                self.is_playing = false;
                self.publish();
                return;
            }
            self.move_to(self.word_index + 1);
        }

        self.is_playing = true;
        self.schedule_current(now_ms);
        self.publish();
    }

    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_timer();
        self.is_playing = false;
        self.publish();
    }

    pub fn toggle_play(&mut self, now_ms: u64) {
        if self.is_playing {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    /// Non-positive rates are ignored. While playing, the pending word is
    /// rescheduled at the new rate.
    pub fn set_wpm(&mut self, wpm: i32, now_ms: u64) {
        if self.destroyed {
            return;
        }
        let wpm = match u16::try_from(wpm) {
            Ok(wpm) if wpm > 0 => wpm,
            _ => {
                debug!("playback: rejected wpm={} keeping={}", wpm, self.config.wpm);
                return;
            }
        };
        if wpm == self.config.wpm {
            return;
        }

        self.config.wpm = wpm;
        if self.is_playing {
            self.cancel_timer();
            self.schedule_current(now_ms);
        }
        self.publish();
    }

    pub fn set_auto_stop(&mut self, on_sentence_end: bool, on_paragraph_end: bool) {
        self.config.auto_stop_on_sentence_end = on_sentence_end;
        self.config.auto_stop_on_paragraph_end = on_paragraph_end;
    }

    pub fn set_pause_config(&mut self, pause_config: PauseConfig) {
        self.config.pause_config = pause_config;
    }

    /// Stops, rewinds and swaps in another chapter with a single publish.
    pub fn load_chapter(&mut self, chapter: Arc<ProcessedChapter>) {
        if self.destroyed {
            return;
        }
        self.cancel_timer();
        self.is_playing = false;
        self.chapter = chapter;
        self.move_to(0);
        debug!(
            "playback: chapter loaded words={} sentences={}",
            self.chapter.word_count(),
            self.chapter.sentence_count()
        );
        self.publish();
    }

    /// Swaps in a re-segmented chapter, clamping the position into its bounds.
    pub fn update_processed_text(&mut self, chapter: Arc<ProcessedChapter>, now_ms: u64) {
        if self.destroyed {
            return;
        }
        self.cancel_timer();
        self.chapter = chapter;

        let word_count = self.chapter.word_count();
        if word_count == 0 {
            self.word_index = 0;
            self.sentence_index = 0;
            self.is_playing = false;
            self.clear_stop();
        } else {
            self.word_index = self.word_index.min(word_count - 1);
            self.sentence_index = self.chapter.sentence_of_word(self.word_index).unwrap_or(0);
        }

        debug!(
            "playback: chapter updated words={} position={} playing={}",
            word_count, self.word_index, self.is_playing
        );
        if self.is_playing {
            self.schedule_current(now_ms);
        }
        self.publish();
    }

    /// Cancels the pending transition for good; later commands are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.cancel_timer();
        self.is_playing = false;
        self.destroyed = true;
        debug!("playback: destroyed at word={}", self.word_index);
        self.publish();
    }

    /// Display time of a word before autoplay moves on.
    pub fn word_delay_ms(&self, index: usize) -> u32 {
        let scaled = 60_000.0 * self.word_multiplier(index) / self.config.wpm.max(1) as f32;
        (scaled + 0.5) as u32
    }

    fn word_multiplier(&self, index: usize) -> f32 {
        let Some(word) = self.chapter.word(index) else {
            return 1.0;
        };
        let pauses = &self.config.pause_config;

        let word_pause = if word.ends_sentence() {
            pauses.sentence_end
        } else if let Some(mark) = word.punctuation.clause_mark() {
            match mark {
                ',' => pauses.comma,
                ';' => pauses.semicolon,
                ':' => pauses.colon,
                _ => pauses.dash,
            }
        } else {
            match word.special_case {
                Some(SpecialCase::Ellipsis) => pauses.ellipsis,
                Some(SpecialCase::LongWord) => pauses.long_word,
                _ => 0.0,
            }
        };

        let paragraph_start = word.paragraph_index > 0 && word.sentence_index == 0 && word.word_index == 0;
        let paragraph_pause = if paragraph_start {
            pauses.paragraph_start
        } else {
            0.0
        };

        1.0 + word_pause + paragraph_pause
    }

    /// Schedules the transition off the current word, or halts when the word
    /// needs a full stop under the auto-stop policy.
    fn schedule_current(&mut self, now_ms: u64) {
        let Some(word) = self.chapter.word(self.word_index) else {
            self.is_playing = false;
            return;
        };

        if word.requires_full_stop() {
            let paragraph_stop =
                word.context.is_paragraph_end && self.config.auto_stop_on_paragraph_end;
            if paragraph_stop || self.config.auto_stop_on_sentence_end {
                self.is_playing = false;
                self.next_word_ms = None;
                if paragraph_stop {
                    self.stopped_at_paragraph_end = true;
                } else {
                    self.stopped_at_sentence_end = true;
                }
                debug!(
                    "playback: stop word={} sentence={}/{} paragraph_end={}",
                    self.word_index,
                    self.sentence_index.saturating_add(1),
                    self.chapter.sentence_count(),
                    paragraph_stop
                );
                return;
            }
        }

        let delay = self.word_delay_ms(self.word_index) as u64;
        self.next_word_ms = Some(now_ms.saturating_add(delay));
    }

    fn cancel_timer(&mut self) {
        self.next_word_ms = None;
    }

    fn clear_stop(&mut self) {
        self.stopped_at_sentence_end = false;
        self.stopped_at_paragraph_end = false;
    }
}
