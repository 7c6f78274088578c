//! Reading session: chapter lookups through the cache feeding one engine.

use alloc::sync::Arc;

use log::{debug, info};

use super::{PlaybackEngine, PlaybackPhase, StateListener, TickResult, WarmupRamp, stepped_wpm};
use crate::{
    content::{ChapterCache, ChapterSource, DEFAULT_CHAPTER_CACHE_CAPACITY, ProcessedChapter},
    input::{CommandProvider, ReaderCommand},
    settings::ReaderSettings,
};

pub struct ReaderSession<S, L, const N: usize = DEFAULT_CHAPTER_CACHE_CAPACITY>
where
    S: ChapterSource,
    L: StateListener,
{
    cache: ChapterCache<S, N>,
    engine: PlaybackEngine<L>,
    chapter_id: Option<S::ChapterId>,
    settings: ReaderSettings,
    warmup: Option<WarmupRamp>,
}

impl<S, L, const N: usize> ReaderSession<S, L, N>
where
    S: ChapterSource,
    L: StateListener,
{
    /// Starts with no chapter open.
    pub fn new(source: S, settings: ReaderSettings, listener: L) -> Self {
        let empty = Arc::new(ProcessedChapter::empty(source.language()));
        let engine = PlaybackEngine::new(empty, settings.to_playback_config(), listener);
        Self {
            cache: ChapterCache::new(source),
            engine,
            chapter_id: None,
            warmup: settings.warmup_ramp(),
            settings,
        }
    }

    /// Rewinds and loads `id`. Unknown ids leave the engine with no words.
    pub fn open_chapter(&mut self, id: S::ChapterId, now_ms: u64) -> bool {
        self.settle_warmup(now_ms);

        match self.cache.get(&id) {
            Some(chapter) => {
                info!(
                    "session: open chapter={:?} words={} sentences={} paragraphs={}",
                    id,
                    chapter.word_count(),
                    chapter.sentence_count(),
                    chapter.paragraph_count()
                );
                self.engine.load_chapter(chapter);
                self.chapter_id = Some(id);
                true
            }
            None => {
                info!("session: chapter={:?} has no content", id);
                let empty = Arc::new(ProcessedChapter::empty(self.cache.source().language()));
                self.engine.load_chapter(empty);
                self.chapter_id = None;
                false
            }
        }
    }

    /// Opens `id` positioned at `word_index`, clamped to the chapter.
    pub fn resume_chapter(&mut self, id: S::ChapterId, word_index: usize, now_ms: u64) -> bool {
        if !self.open_chapter(id, now_ms) {
            return false;
        }
        self.engine.seek_word(word_index, now_ms);
        true
    }

    /// Re-segments the open chapter after its text changed, keeping position.
    pub fn reload_chapter(&mut self, now_ms: u64) -> bool {
        let Some(id) = self.chapter_id.clone() else {
            return false;
        };
        self.cache.invalidate(&id);
        match self.cache.get(&id) {
            Some(chapter) => {
                self.engine.update_processed_text(chapter, now_ms);
                true
            }
            None => {
                debug!("session: chapter={:?} vanished on reload", id);
                let empty = Arc::new(ProcessedChapter::empty(self.cache.source().language()));
                self.engine.update_processed_text(empty, now_ms);
                self.chapter_id = None;
                false
            }
        }
    }

    /// Drops every cached chapter, e.g. after a locale change, and reloads the
    /// open one.
    pub fn clear_cache(&mut self, now_ms: u64) {
        self.cache.clear_cache();
        self.reload_chapter(now_ms);
    }

    pub fn apply_command(&mut self, command: ReaderCommand, now_ms: u64) {
        match command {
            ReaderCommand::SetWpm(wpm) => match u16::try_from(wpm) {
                Ok(wpm) if wpm > 0 => self.retarget_wpm(wpm, now_ms),
                _ => self.engine.apply_command(command, now_ms),
            },
            ReaderCommand::StepWpm { faster } => {
                let wpm = stepped_wpm(self.settings.wpm, faster);
                self.retarget_wpm(wpm, now_ms);
            }
            ReaderCommand::Play
            | ReaderCommand::TogglePlay
            | ReaderCommand::AdvanceToNextSentence
                if self.starts_autoplay(command) =>
            {
                if let Some(ramp) = self.warmup.as_mut() {
                    ramp.restart(now_ms);
                    self.engine.set_wpm(i32::from(ramp.wpm_at(now_ms)), now_ms);
                }
                self.engine.apply_command(command, now_ms);
                if !self.engine.is_playing() {
                    self.settle_warmup(now_ms);
                }
            }
            _ => self.engine.apply_command(command, now_ms),
        }
    }

    /// Drains the provider. Returns how many commands were applied.
    pub fn process_commands<P>(&mut self, provider: &mut P, now_ms: u64) -> Result<usize, P::Error>
    where
        P: CommandProvider,
    {
        let mut applied = 0usize;
        while let Some(command) = provider.poll_command()? {
            self.apply_command(command, now_ms);
            applied = applied.saturating_add(1);
        }
        Ok(applied)
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let result = self.engine.tick(now_ms);
        if result == TickResult::RenderRequested && self.engine.is_playing() {
            self.sample_warmup(now_ms);
        }
        result
    }

    /// Replaces the settings; a running warmup restarts toward the new rate.
    pub fn update_settings(&mut self, settings: ReaderSettings, now_ms: u64) {
        let (on_sentence_end, on_paragraph_end) = settings.auto_stop.flags();
        self.engine.set_auto_stop(on_sentence_end, on_paragraph_end);
        self.settings = settings;
        self.warmup = settings.warmup_ramp();

        match self.warmup.as_mut() {
            Some(ramp) if self.engine.is_playing() => {
                ramp.restart(now_ms);
                self.engine.set_wpm(i32::from(ramp.wpm_at(now_ms)), now_ms);
            }
            _ => self.engine.set_wpm(i32::from(settings.wpm), now_ms),
        }
        debug!(
            "session: settings wpm={} auto_stop={:?} warmup={}",
            settings.wpm,
            settings.auto_stop,
            settings.warmup.is_some()
        );
    }

    pub fn destroy(&mut self) {
        self.engine.destroy();
    }

    pub fn engine(&self) -> &PlaybackEngine<L> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<L> {
        &mut self.engine
    }

    pub fn cache(&self) -> &ChapterCache<S, N> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ChapterCache<S, N> {
        &mut self.cache
    }

    pub fn chapter_id(&self) -> Option<&S::ChapterId> {
        self.chapter_id.as_ref()
    }

    /// Settings as last applied, including rate changes made by commands.
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Autoplay starts from idle on play, and from a boundary stop on play or advance.
    fn starts_autoplay(&self, command: ReaderCommand) -> bool {
        match self.engine.phase() {
            PlaybackPhase::Playing => false,
            PlaybackPhase::StoppedAtBoundary => true,
            PlaybackPhase::Idle => command != ReaderCommand::AdvanceToNextSentence,
        }
    }

    fn retarget_wpm(&mut self, wpm: u16, now_ms: u64) {
        self.settings.wpm = wpm;
        match self.warmup.as_mut() {
            Some(ramp) if self.engine.is_playing() => {
                ramp.retarget(wpm, now_ms);
                self.engine.set_wpm(i32::from(ramp.wpm_at(now_ms)), now_ms);
            }
            Some(ramp) => {
                *ramp = WarmupRamp::new(ramp.start_wpm(), wpm, ramp.duration_ms());
                self.engine.set_wpm(i32::from(wpm), now_ms);
            }
            None => self.engine.set_wpm(i32::from(wpm), now_ms),
        }
    }

    fn sample_warmup(&mut self, now_ms: u64) {
        let Some(ramp) = self.warmup.as_mut() else {
            return;
        };
        if !ramp.is_running() {
            return;
        }
        let wpm = ramp.wpm_at(now_ms);
        if ramp.is_complete(now_ms) {
            ramp.stop();
        }
        if wpm != self.engine.wpm() {
            self.engine.set_wpm(i32::from(wpm), now_ms);
        }
    }

    /// Abandons a running ramp and restores the configured rate.
    fn settle_warmup(&mut self, now_ms: u64) {
        if let Some(ramp) = self.warmup.as_mut() {
            ramp.stop();
        }
        self.engine.set_wpm(i32::from(self.settings.wpm), now_ms);
    }
}
