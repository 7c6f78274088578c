use std::{
    env,
    fmt::Display,
    io::{self, Write},
    process, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use log::{info, warn};
use readily_core::{
    app::{PlaybackPhase, ReaderSession, TickResult},
    content::{ChapterSource, Language},
    input::{CommandProvider, ReaderCommand},
    settings::{ReaderSettings, SettingsStore},
};

use book::BookSource;
use cli::{CliArgs, USAGE};
use settings_file::{TomlSettingsStore, default_settings_path};
use settings_sync::SettingsSyncState;
use terminal::{HELP, StdinCommands, WordPrinter};

#[path = "main/book.rs"]
mod book;
#[path = "main/cli.rs"]
mod cli;
#[path = "main/settings_file.rs"]
mod settings_file;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/terminal.rs"]
mod terminal;

const POLL_INTERVAL_MS: u64 = 20;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Finished,
}

/// Walks the book chapter by chapter on top of a [`ReaderSession`].
struct Reader<W>
where
    W: Write,
{
    session: ReaderSession<BookSource, WordPrinter<W>>,
    chapter: usize,
    chapter_count: usize,
    hold_ms: Option<u64>,
    stopped_since: Option<u64>,
    input_open: bool,
}

impl<W> Reader<W>
where
    W: Write,
{
    fn new(book: BookSource, settings: ReaderSettings, out: W, hold_ms: Option<u64>) -> Self {
        let chapter_count = book.chapter_count();
        Self {
            session: ReaderSession::new(book, settings, WordPrinter::new(out)),
            chapter: 0,
            chapter_count,
            hold_ms,
            stopped_since: None,
            input_open: true,
        }
    }

    /// Opens the first chapter with content and starts playing.
    fn start(&mut self, now_ms: u64) -> bool {
        if !self.open_from(0, now_ms) {
            return false;
        }
        self.session.apply_command(ReaderCommand::Play, now_ms);
        true
    }

    fn step<P>(&mut self, now_ms: u64, commands: &mut P) -> Step
    where
        P: CommandProvider,
        P::Error: Display,
    {
        let mut chapter_done = false;

        while self.input_open {
            match commands.poll_command() {
                Ok(Some(command)) => {
                    let resumed = !self.session.engine().is_playing();
                    self.session.apply_command(command, now_ms);
                    let continues = matches!(
                        command,
                        ReaderCommand::Play
                            | ReaderCommand::TogglePlay
                            | ReaderCommand::AdvanceToNextSentence
                    );
                    if continues && resumed && self.at_chapter_end() {
                        chapter_done = true;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    info!("input: {err}, reading on without commands");
                    self.input_open = false;
                }
            }
        }

        if self.session.tick(now_ms) == TickResult::RenderRequested && self.at_chapter_end() {
            chapter_done = true;
        }

        match self.session.engine().phase() {
            PlaybackPhase::StoppedAtBoundary => {
                if let Some(hold_ms) = self.hold_ms {
                    let since = *self.stopped_since.get_or_insert(now_ms);
                    if now_ms.saturating_sub(since) >= hold_ms {
                        self.stopped_since = None;
                        self.session
                            .apply_command(ReaderCommand::AdvanceToNextSentence, now_ms);
                        chapter_done |= self.at_chapter_end();
                    }
                }
            }
            PlaybackPhase::Playing | PlaybackPhase::Idle => self.stopped_since = None,
        }

        if chapter_done {
            if !self.open_from(self.chapter + 1, now_ms) {
                return Step::Finished;
            }
            self.session.apply_command(ReaderCommand::Play, now_ms);
        }

        let waiting_forever = match self.session.engine().phase() {
            PlaybackPhase::Playing => false,
            PlaybackPhase::StoppedAtBoundary => self.hold_ms.is_none(),
            PlaybackPhase::Idle => true,
        };
        if !self.input_open && waiting_forever {
            return Step::Finished;
        }
        Step::Continue
    }

    /// How long the host may sleep before the next step.
    fn idle_wait_ms(&self, now_ms: u64) -> u64 {
        self.session
            .engine()
            .next_deadline_ms()
            .map_or(POLL_INTERVAL_MS, |deadline| deadline.saturating_sub(now_ms))
            .clamp(1, POLL_INTERVAL_MS)
    }

    fn settings(&self) -> ReaderSettings {
        *self.session.settings()
    }

    fn finish(&mut self) {
        let (word, words) = self.session.engine().progress();
        info!(
            "readily: stopped chapter={}/{} word={}/{}",
            self.chapter.saturating_add(1),
            self.chapter_count,
            word.saturating_add(1),
            words
        );
        self.session.destroy();
    }

    fn open_from(&mut self, first: usize, now_ms: u64) -> bool {
        for index in first..self.chapter_count {
            let source = self.session.cache().source();
            if source.chapter_text(&index).is_none() {
                warn!("book: skipping chapter {index} without text {:?}", source.chapter_path(index));
                continue;
            }
            if self.session.open_chapter(index, now_ms) {
                self.chapter = index;
                return true;
            }
        }
        false
    }

    fn at_chapter_end(&self) -> bool {
        let engine = self.session.engine();
        let (word, words) = engine.progress();
        engine.phase() == PlaybackPhase::Idle && word.saturating_add(1) >= words
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match CliArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err:#}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let mut store = TomlSettingsStore::new(
        args.settings_path
            .clone()
            .unwrap_or_else(default_settings_path),
    );
    let stored = match store.load() {
        Ok(stored) => stored.unwrap_or_default(),
        Err(err) => {
            warn!("settings: {err:#}, using defaults");
            ReaderSettings::default()
        }
    };
    let settings = args.apply_to(stored).clamped();

    let language = args
        .language
        .as_deref()
        .map(Language::new)
        .unwrap_or_default();
    let book = BookSource::load(&args.files, language)?;
    info!(
        "readily: chapters={} wpm={} auto_stop={:?} warmup={:?} language={}",
        book.chapter_count(),
        settings.wpm,
        settings.auto_stop,
        settings.warmup,
        book.language().as_str()
    );

    let mut commands = StdinCommands::spawn().context("starting stdin command reader")?;
    eprintln!("{HELP}");

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let mut reader = Reader::new(book, settings, io::stdout(), args.hold_ms);
    if !reader.start(now_ms()) {
        bail!("no readable text in {} file(s)", args.files.len());
    }

    let mut sync = SettingsSyncState::new(settings);
    loop {
        let now = now_ms();
        let step = reader.step(now, &mut commands);
        sync.track_current(reader.settings(), now);
        sync.flush_if_due(&mut store, now);

        if step == Step::Finished || commands.quit_requested() {
            break;
        }
        thread::sleep(Duration::from_millis(reader.idle_wait_ms(now)));
    }

    reader.finish();
    sync.flush_now(&mut store, now_ms());
    Ok(())
}
