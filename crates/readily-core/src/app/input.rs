impl<L> PlaybackEngine<L>
where
    L: StateListener,
{
    /// Dispatches one host command.
    pub fn apply_command(&mut self, command: ReaderCommand, now_ms: u64) {
        match command {
            ReaderCommand::Play => self.play(now_ms),
            ReaderCommand::Pause => self.pause(),
            ReaderCommand::TogglePlay => self.toggle_play(now_ms),
            ReaderCommand::NextWord => self.next_word(now_ms),
            ReaderCommand::PrevWord => self.prev_word(now_ms),
            ReaderCommand::NextSentence => self.next_sentence(now_ms),
            ReaderCommand::PrevSentence => self.prev_sentence(now_ms),
            ReaderCommand::RestartSentence => self.restart_sentence(now_ms),
            ReaderCommand::AdvanceToNextSentence => self.advance_to_next_sentence(now_ms),
            ReaderCommand::Reset => self.reset(),
            ReaderCommand::SetWpm(wpm) => self.set_wpm(wpm, now_ms),
            ReaderCommand::StepWpm { faster } => {
                let wpm = stepped_wpm(self.config.wpm, faster);
                self.set_wpm(i32::from(wpm), now_ms);
            }
            ReaderCommand::SeekWord(index) => self.seek_word(index, now_ms),
            ReaderCommand::SeekParagraph(index) => self.seek_paragraph(index, now_ms),
        }
    }
}

/// One [`WPM_STEP`] up or down, kept within the adjustable range.
pub fn stepped_wpm(wpm: u16, faster: bool) -> u16 {
    let stepped = if faster {
        wpm.saturating_add(WPM_STEP)
    } else {
        wpm.saturating_sub(WPM_STEP)
    };
    stepped.clamp(MIN_WPM, MAX_WPM)
}
