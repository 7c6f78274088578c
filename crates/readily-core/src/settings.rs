//! Persisted reader settings abstraction.

use crate::app::{DEFAULT_WPM, PlaybackConfig, WarmupRamp};

pub const MIN_WPM: u16 = 60;
pub const MAX_WPM: u16 = 1_200;
pub const WPM_STEP: u16 = 10;

/// Where autoplay halts on its own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum AutoStopMode {
    Never,
    SentenceEnd,
    #[default]
    ParagraphEnd,
}

impl AutoStopMode {
    /// `(on_sentence_end, on_paragraph_end)`.
    pub const fn flags(self) -> (bool, bool) {
        match self {
            Self::Never => (false, false),
            Self::SentenceEnd => (true, true),
            Self::ParagraphEnd => (false, true),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "never" | "off" => Some(Self::Never),
            "sentence" | "sentence-end" => Some(Self::SentenceEnd),
            "paragraph" | "paragraph-end" => Some(Self::ParagraphEnd),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarmupSettings {
    pub start_wpm: u16,
    pub duration_ms: u32,
}

/// User-tunable settings that should survive restarts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ReaderSettings {
    pub wpm: u16,
    pub auto_stop: AutoStopMode,
    pub warmup: Option<WarmupSettings>,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self::new(DEFAULT_WPM)
    }
}

impl ReaderSettings {
    pub const fn new(wpm: u16) -> Self {
        Self {
            wpm,
            auto_stop: AutoStopMode::ParagraphEnd,
            warmup: None,
        }
    }

    pub const fn with_auto_stop(mut self, auto_stop: AutoStopMode) -> Self {
        self.auto_stop = auto_stop;
        self
    }

    pub const fn with_warmup(mut self, warmup: Option<WarmupSettings>) -> Self {
        self.warmup = warmup;
        self
    }

    /// Copy with the rate pulled into `MIN_WPM..=MAX_WPM`.
    pub fn clamped(self) -> Self {
        Self {
            wpm: self.wpm.clamp(MIN_WPM, MAX_WPM),
            ..self
        }
    }

    pub fn to_playback_config(&self) -> PlaybackConfig {
        let (auto_stop_on_sentence_end, auto_stop_on_paragraph_end) = self.auto_stop.flags();
        PlaybackConfig {
            wpm: self.wpm.max(1),
            auto_stop_on_sentence_end,
            auto_stop_on_paragraph_end,
            ..PlaybackConfig::default()
        }
    }

    pub fn warmup_ramp(&self) -> Option<WarmupRamp> {
        self.warmup
            .map(|warmup| WarmupRamp::new(warmup.start_wpm, self.wpm, warmup.duration_ms))
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<ReaderSettings>, Self::Error>;
    fn save(&mut self, settings: &ReaderSettings) -> Result<(), Self::Error>;
}
