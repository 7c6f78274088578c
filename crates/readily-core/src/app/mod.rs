//! RSVP playback engine: walks one chapter's words under a timing policy.
//!
//! Time is injected by the host. Commands that may schedule the next word take
//! `now_ms`, and [`PlaybackEngine::tick`] fires the single pending transition
//! once its deadline passes.

use alloc::{sync::Arc, vec::Vec};

use log::debug;

use crate::{
    content::{EnrichedWord, ProcessedChapter, SpecialCase},
    input::ReaderCommand,
    settings::{MAX_WPM, MIN_WPM, WPM_STEP},
};

mod session;
mod warmup;


pub use session::ReaderSession;
pub use warmup::WarmupRamp;

pub const DEFAULT_WPM: u16 = 300;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

/// Fractional delay increments added to a base multiplier of 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PauseConfig {
    pub comma: f32,
    pub semicolon: f32,
    pub colon: f32,
    pub dash: f32,
    pub ellipsis: f32,
    pub sentence_end: f32,
    pub long_word: f32,
    /// Added on the first word of every paragraph after the first.
    pub paragraph_start: f32,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            comma: 0.3,
            semicolon: 0.5,
            colon: 0.4,
            dash: 0.3,
            ellipsis: 0.5,
            sentence_end: 0.4,
            long_word: 0.2,
            paragraph_start: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackConfig {
    pub wpm: u16,
    pub pause_config: PauseConfig,
    pub auto_stop_on_sentence_end: bool,
    pub auto_stop_on_paragraph_end: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            pause_config: PauseConfig::default(),
            auto_stop_on_sentence_end: false,
            auto_stop_on_paragraph_end: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    /// Halted on a full-pause word; the next play steps past it.
    StoppedAtBoundary,
}

/// Immutable snapshot published after every transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_word_index: usize,
    /// Global sentence index.
    pub current_sentence_index: usize,
    pub current_word: Option<EnrichedWord>,
    pub current_sentence: Vec<EnrichedWord>,
    pub max_sentence_index: usize,
    pub wpm: u16,
    pub is_stopped_at_sentence_end: bool,
    pub is_stopped_at_paragraph_end: bool,
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing
        } else if self.is_stopped_at_sentence_end || self.is_stopped_at_paragraph_end {
            PlaybackPhase::StoppedAtBoundary
        } else {
            PlaybackPhase::Idle
        }
    }
}

/// Receives every published [`PlaybackState`], synchronously.
pub trait StateListener {
    fn on_state_change(&mut self, state: &PlaybackState);
}

impl<F> StateListener for F
where
    F: FnMut(&PlaybackState),
{
    fn on_state_change(&mut self, state: &PlaybackState) {
        self(state)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl StateListener for NoopListener {
    fn on_state_change(&mut self, _state: &PlaybackState) {}
}

pub struct PlaybackEngine<L>
where
    L: StateListener,
{
    chapter: Arc<ProcessedChapter>,
    config: PlaybackConfig,
    listener: L,
    word_index: usize,
    sentence_index: usize,
    is_playing: bool,
    stopped_at_sentence_end: bool,
    stopped_at_paragraph_end: bool,
    /// Deadline of the single pending word transition.
    next_word_ms: Option<u64>,
    destroyed: bool,
}

impl<L> PlaybackEngine<L>
where
    L: StateListener,
{
    /// Starts idle at word 0 and publishes the initial state.
    pub fn new(chapter: Arc<ProcessedChapter>, config: PlaybackConfig, listener: L) -> Self {
        let config = PlaybackConfig {
            wpm: config.wpm.max(1),
            ..config
        };
        let mut engine = Self {
            chapter,
            config,
            listener,
            word_index: 0,
            sentence_index: 0,
            is_playing: false,
            stopped_at_sentence_end: false,
            stopped_at_paragraph_end: false,
            next_word_ms: None,
            destroyed: false,
        };
        debug!(
            "playback: new words={} sentences={} wpm={}",
            engine.chapter.word_count(),
            engine.chapter.sentence_count(),
            engine.config.wpm
        );
        engine.publish();
        engine
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing,
            current_word_index: self.word_index,
            current_sentence_index: self.sentence_index,
            current_word: self.chapter.word(self.word_index).cloned(),
            current_sentence: self
                .chapter
                .sentence(self.sentence_index)
                .map(<[EnrichedWord]>::to_vec)
                .unwrap_or_default(),
            max_sentence_index: self.max_sentence_index(),
            wpm: self.config.wpm,
            is_stopped_at_sentence_end: self.stopped_at_sentence_end,
            is_stopped_at_paragraph_end: self.stopped_at_paragraph_end,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing
        } else if self.is_stopped_at_boundary() {
            PlaybackPhase::StoppedAtBoundary
        } else {
            PlaybackPhase::Idle
        }
    }

    pub fn chapter(&self) -> &Arc<ProcessedChapter> {
        &self.chapter
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn wpm(&self) -> u16 {
        self.config.wpm
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn current_word(&self) -> Option<&EnrichedWord> {
        self.chapter.word(self.word_index)
    }

    /// `(word_index, word_count)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.word_index, self.chapter.word_count())
    }

    /// Deadline of the pending transition, if one is scheduled.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.next_word_ms
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    fn is_stopped_at_boundary(&self) -> bool {
        self.stopped_at_sentence_end || self.stopped_at_paragraph_end
    }

    fn max_sentence_index(&self) -> usize {
        self.chapter.sentence_count().saturating_sub(1)
    }

    fn publish(&mut self) {
        let state = self.state();
        self.listener.on_state_change(&state);
    }
}

include!("runtime.rs");
include!("navigation.rs");
include!("input.rs");
