use log::warn;
use readily_core::settings::{ReaderSettings, SettingsStore};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Debounces settings writes so a burst of rate changes saves once.
pub(super) struct SettingsSyncState {
    last_saved: ReaderSettings,
    pending: Option<(ReaderSettings, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(initial: ReaderSettings) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: ReaderSettings, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Display,
    {
        let Some((candidate, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }
        self.save(store, candidate, now_ms);
    }

    /// Writes any pending change regardless of the debounce window.
    pub(super) fn flush_now<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Display,
    {
        if let Some((candidate, _)) = self.pending {
            self.save(store, candidate, now_ms);
        }
    }

    fn save<S>(&mut self, store: &mut S, candidate: ReaderSettings, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Display,
    {
        match store.save(&candidate) {
            Ok(()) => {
                self.last_saved = candidate;
                self.pending = None;
            }
            Err(err) => {
                warn!("settings: save failed, will retry: {err}");
                self.pending = Some((candidate, now_ms));
            }
        }
    }
}
