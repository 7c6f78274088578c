//! Terminal front end: line commands from stdin, one anchored word per line out.

use std::{
    fmt,
    io::{self, BufRead, Write},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use log::{debug, warn};
use readily_core::{
    app::{PlaybackPhase, PlaybackState, StateListener},
    input::{CommandProvider, ReaderCommand},
};

pub(super) const HELP: &str = "keys: <enter> play/pause, n/b word, ]/[ sentence, r restart sentence, \
a continue, 0 reset, +/- speed, w N wpm, g N word, p N paragraph, q quit";

/// Column the optimal recognition point is pinned to.
const ORP_ANCHOR_COLUMN: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum HostInput {
    Command(ReaderCommand),
    Quit,
}

pub(super) fn parse_line(line: &str) -> Option<HostInput> {
    let line = line.trim();
    let (key, arg) = match line.split_once(char::is_whitespace) {
        Some((key, arg)) => (key, Some(arg.trim())),
        None => (line, None),
    };

    let command = match (key, arg) {
        ("", None) | ("t", None) => ReaderCommand::TogglePlay,
        ("n", None) => ReaderCommand::NextWord,
        ("b", None) => ReaderCommand::PrevWord,
        ("]", None) => ReaderCommand::NextSentence,
        ("[", None) => ReaderCommand::PrevSentence,
        ("r", None) => ReaderCommand::RestartSentence,
        ("a", None) => ReaderCommand::AdvanceToNextSentence,
        ("0", None) => ReaderCommand::Reset,
        ("+", None) => ReaderCommand::StepWpm { faster: true },
        ("-", None) => ReaderCommand::StepWpm { faster: false },
        ("w", Some(value)) => ReaderCommand::SetWpm(value.parse().ok()?),
        ("g", Some(value)) => ReaderCommand::SeekWord(value.parse().ok()?),
        ("p", Some(value)) => ReaderCommand::SeekParagraph(value.parse().ok()?),
        ("q", None) => return Some(HostInput::Quit),
        _ => return None,
    };
    Some(HostInput::Command(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command input closed")
    }
}

impl std::error::Error for InputClosed {}

/// Commands typed on stdin, read on a helper thread.
pub(super) struct StdinCommands {
    rx: Receiver<HostInput>,
    quit: bool,
}

impl StdinCommands {
    pub(super) fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-commands".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    match parse_line(&line) {
                        Some(input) => {
                            if tx.send(input).is_err() {
                                break;
                            }
                        }
                        None => warn!("input: unknown command `{}`; {}", line.trim(), HELP),
                    }
                }
                debug!("input: stdin reader finished");
            })?;
        Ok(Self::from_receiver(rx))
    }

    pub(super) fn from_receiver(rx: Receiver<HostInput>) -> Self {
        Self { rx, quit: false }
    }

    pub(super) fn quit_requested(&self) -> bool {
        self.quit
    }
}

impl CommandProvider for StdinCommands {
    type Error = InputClosed;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        match self.rx.try_recv() {
            Ok(HostInput::Command(command)) => Ok(Some(command)),
            Ok(HostInput::Quit) => {
                self.quit = true;
                Ok(None)
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(InputClosed),
        }
    }
}

/// Prints each newly shown word with its recognition point on a fixed column.
pub(super) struct WordPrinter<W>
where
    W: Write,
{
    out: W,
    last_word: Option<(usize, usize)>,
    last_phase: PlaybackPhase,
}

impl<W> WordPrinter<W>
where
    W: Write,
{
    pub(super) fn new(out: W) -> Self {
        Self {
            out,
            last_word: None,
            last_phase: PlaybackPhase::Idle,
        }
    }

    #[cfg(test)]
    pub(super) fn output(&self) -> &W {
        &self.out
    }

    fn write_state(&mut self, state: &PlaybackState) -> io::Result<()> {
        let mut word_changed = false;
        if let Some(word) = &state.current_word {
            let key = (state.current_word_index, word.char_index);
            if self.last_word != Some(key) {
                self.last_word = Some(key);
                word_changed = true;
                writeln!(self.out, "{}", anchored(&word.display_as, ORP_ANCHOR_COLUMN))?;
            }
        } else if self.last_word.take().is_some() {
            writeln!(self.out, "(no content)")?;
        }

        let phase = state.phase();
        let newly_stopped = phase != self.last_phase || word_changed;
        self.last_phase = phase;
        if phase == PlaybackPhase::StoppedAtBoundary && newly_stopped {
            let boundary = if state.is_stopped_at_paragraph_end {
                "paragraph"
            } else {
                "sentence"
            };
            writeln!(self.out, "[{boundary} end, `a` to continue]")?;
        }
        self.out.flush()
    }
}

impl<W> StateListener for WordPrinter<W>
where
    W: Write,
{
    fn on_state_change(&mut self, state: &PlaybackState) {
        if let Err(err) = self.write_state(state) {
            debug!("output: write failed: {err}");
        }
    }
}

/// Left-pads `word` so its recognition point lands on `anchor_column`.
pub(super) fn anchored(word: &str, anchor_column: usize) -> String {
    let pad = anchor_column.saturating_sub(orp_char_index(word));
    format!("{}{}", " ".repeat(pad), word)
}

pub(super) fn orp_char_index(word: &str) -> usize {
    let total_chars = word.chars().count();
    let letter_chars = word.chars().filter(|ch| ch.is_alphanumeric()).count();

    if total_chars == 0 {
        return 0;
    }
    if letter_chars == 0 {
        return total_chars.saturating_sub(1) / 2;
    }

    let target_letter = orp_letter_index(letter_chars).min(letter_chars - 1);
    word.chars()
        .enumerate()
        .filter(|(_, ch)| ch.is_alphanumeric())
        .nth(target_letter)
        .map(|(index, _)| index)
        .unwrap_or(total_chars.saturating_sub(1) / 2)
}

fn orp_letter_index(letter_count: usize) -> usize {
    match letter_count {
        0 | 1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, mpsc};

    use readily_core::{
        app::{PlaybackConfig, PlaybackEngine},
        content::process,
    };

    use super::*;

    #[test]
    fn parses_keys_and_arguments() {
        assert_eq!(
            parse_line(""),
            Some(HostInput::Command(ReaderCommand::TogglePlay))
        );
        assert_eq!(
            parse_line(" w 450 "),
            Some(HostInput::Command(ReaderCommand::SetWpm(450)))
        );
        assert_eq!(
            parse_line("w -10"),
            Some(HostInput::Command(ReaderCommand::SetWpm(-10)))
        );
        assert_eq!(
            parse_line("p 3"),
            Some(HostInput::Command(ReaderCommand::SeekParagraph(3)))
        );
        assert_eq!(parse_line("q"), Some(HostInput::Quit));
        assert_eq!(parse_line("g nine"), None);
        assert_eq!(parse_line("x"), None);
    }

    #[test]
    fn channel_provider_reports_quit_and_close() {
        let (tx, rx) = mpsc::channel();
        let mut commands = StdinCommands::from_receiver(rx);
        tx.send(HostInput::Command(ReaderCommand::NextWord)).unwrap();
        tx.send(HostInput::Quit).unwrap();

        assert_eq!(commands.poll_command(), Ok(Some(ReaderCommand::NextWord)));
        assert_eq!(commands.poll_command(), Ok(None));
        assert!(commands.quit_requested());
        assert_eq!(commands.poll_command(), Ok(None));

        drop(tx);
        assert_eq!(commands.poll_command(), Err(InputClosed));
    }

    #[test]
    fn recognition_point_follows_letter_count() {
        assert_eq!(orp_char_index(""), 0);
        assert_eq!(orp_char_index("a"), 0);
        assert_eq!(orp_char_index("word"), 1);
        assert_eq!(orp_char_index("\"reading"), 3);
        assert_eq!(orp_char_index("incomprehensibilities"), 4);
        assert_eq!(orp_char_index("..."), 1);
        assert_eq!(anchored("word", 5), "    word");
    }

    #[test]
    fn printer_writes_each_word_once_and_marks_stops() {
        let config = PlaybackConfig {
            wpm: 60,
            auto_stop_on_sentence_end: true,
            ..PlaybackConfig::default()
        };
        let chapter = Arc::new(process("Hi there. Bye."));
        let mut engine = PlaybackEngine::new(chapter, config, WordPrinter::new(Vec::new()));
        engine.play(0);
        engine.tick(1_000);
        engine.tick(5_000);

        let printed = String::from_utf8(engine.listener().output().clone()).unwrap();
        let lines: Vec<&str> = printed.lines().map(str::trim).collect();
        assert_eq!(lines, ["Hi", "there.", "[sentence end, `a` to continue]"]);
    }
}
