//! Host command abstraction layer.

mod mock;

pub use mock::ScriptedCommands;

/// Logical actions consumed by the playback engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderCommand {
    Play,
    Pause,
    TogglePlay,
    NextWord,
    PrevWord,
    NextSentence,
    PrevSentence,
    RestartSentence,
    AdvanceToNextSentence,
    Reset,
    /// Raw host value; non-positive rates are rejected by the engine.
    SetWpm(i32),
    StepWpm { faster: bool },
    SeekWord(usize),
    SeekParagraph(usize),
}

/// Polled command provider.
pub trait CommandProvider {
    type Error;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error>;
}
