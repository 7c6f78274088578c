use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use readily_core::settings::{AutoStopMode, ReaderSettings, WarmupSettings};

pub(super) const USAGE: &str = "Usage: readily <file>... [--wpm N] [--lang xx] \
[--auto-stop never|sentence|paragraph] [--warmup-ms N] [--warmup-start N] [--hold-ms N] \
[--settings PATH]";

const DEFAULT_WARMUP_START_WPM: u16 = 150;

/// Command line options. Anything left unset falls back to stored settings.
#[derive(Debug, Default, PartialEq)]
pub(super) struct CliArgs {
    /// One chapter per file, in order.
    pub(super) files: Vec<PathBuf>,
    pub(super) wpm: Option<u16>,
    pub(super) language: Option<String>,
    pub(super) auto_stop: Option<AutoStopMode>,
    pub(super) warmup_ms: Option<u32>,
    pub(super) warmup_start_wpm: Option<u16>,
    /// Pause at a boundary stop before moving on by itself.
    pub(super) hold_ms: Option<u64>,
    pub(super) settings_path: Option<PathBuf>,
}

impl CliArgs {
    pub(super) fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wpm" => parsed.wpm = Some(number(&arg, args.next())?),
                "--lang" => parsed.language = Some(value(&arg, args.next())?),
                "--auto-stop" => {
                    let mode = value(&arg, args.next())?;
                    parsed.auto_stop = Some(
                        AutoStopMode::parse(&mode)
                            .ok_or_else(|| anyhow!("unknown --auto-stop mode `{mode}`"))?,
                    );
                }
                "--warmup-ms" => parsed.warmup_ms = Some(number(&arg, args.next())?),
                "--warmup-start" => parsed.warmup_start_wpm = Some(number(&arg, args.next())?),
                "--hold-ms" => parsed.hold_ms = Some(number(&arg, args.next())?),
                "--settings" => parsed.settings_path = Some(PathBuf::from(value(&arg, args.next())?)),
                flag if flag.starts_with("--") => bail!("unknown flag `{flag}`"),
                _ => parsed.files.push(PathBuf::from(&arg)),
            }
        }

        if parsed.files.is_empty() {
            bail!("no input file given");
        }
        Ok(parsed)
    }

    /// Layers the flags over stored settings.
    pub(super) fn apply_to(&self, stored: ReaderSettings) -> ReaderSettings {
        let mut settings = stored;
        if let Some(wpm) = self.wpm {
            settings.wpm = wpm;
        }
        if let Some(auto_stop) = self.auto_stop {
            settings.auto_stop = auto_stop;
        }
        match (self.warmup_ms, self.warmup_start_wpm) {
            (Some(0), _) => settings.warmup = None,
            (Some(duration_ms), start) => {
                settings.warmup = Some(WarmupSettings {
                    start_wpm: start.unwrap_or(DEFAULT_WARMUP_START_WPM),
                    duration_ms,
                });
            }
            (None, Some(start_wpm)) => {
                if let Some(warmup) = settings.warmup.as_mut() {
                    warmup.start_wpm = start_wpm;
                }
            }
            (None, None) => {}
        }
        settings
    }
}

fn value(flag: &str, next: Option<String>) -> Result<String> {
    next.ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn number<T>(flag: &str, next: Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(flag, next)?;
    raw.parse()
        .with_context(|| format!("{flag} expects a number, got `{raw}`"))
}
