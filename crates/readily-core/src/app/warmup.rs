//! Linear WPM ramp applied when autoplay starts.

use log::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WarmupRamp {
    start_wpm: u16,
    target_wpm: u16,
    duration_ms: u32,
    started_at_ms: Option<u64>,
}

impl WarmupRamp {
    pub const fn new(start_wpm: u16, target_wpm: u16, duration_ms: u32) -> Self {
        Self {
            start_wpm,
            target_wpm,
            duration_ms,
            started_at_ms: None,
        }
    }

    pub const fn start_wpm(&self) -> u16 {
        self.start_wpm
    }

    pub const fn target_wpm(&self) -> u16 {
        self.target_wpm
    }

    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub const fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Starts ramping from `start_wpm` at `now_ms`, discarding any progress.
    pub fn restart(&mut self, now_ms: u64) {
        debug!(
            "warmup: start {}->{} wpm over {}ms",
            self.start_wpm, self.target_wpm, self.duration_ms
        );
        self.started_at_ms = Some(now_ms);
    }

    pub fn stop(&mut self) {
        self.started_at_ms = None;
    }

    /// Changes the destination rate and restarts the ramp.
    pub fn retarget(&mut self, target_wpm: u16, now_ms: u64) {
        self.target_wpm = target_wpm;
        self.restart(now_ms);
    }

    /// Rate at `now_ms`. A ramp that has not been started sits at the target.
    pub fn wpm_at(&self, now_ms: u64) -> u16 {
        let Some(started_at) = self.started_at_ms else {
            return self.target_wpm;
        };
        let elapsed = now_ms.saturating_sub(started_at);
        if self.duration_ms == 0 || elapsed >= u64::from(self.duration_ms) {
            return self.target_wpm;
        }

        let start = i64::from(self.start_wpm);
        let span = i64::from(self.target_wpm) - start;
        let wpm = start + span * elapsed as i64 / i64::from(self.duration_ms);
        wpm.clamp(1, i64::from(u16::MAX)) as u16
    }

    pub fn is_complete(&self, now_ms: u64) -> bool {
        match self.started_at_ms {
            Some(started_at) => now_ms.saturating_sub(started_at) >= u64::from(self.duration_ms),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_linearly_to_target() {
        let mut ramp = WarmupRamp::new(100, 300, 2_000);
        assert_eq!(ramp.wpm_at(0), 300);

        ramp.restart(1_000);
        assert_eq!(ramp.wpm_at(1_000), 100);
        assert_eq!(ramp.wpm_at(2_000), 200);
        assert_eq!(ramp.wpm_at(2_500), 250);
        assert_eq!(ramp.wpm_at(3_000), 300);
        assert!(ramp.is_complete(3_000));
        assert!(!ramp.is_complete(2_999));
    }

    #[test]
    fn ramps_down_and_handles_zero_duration() {
        let mut down = WarmupRamp::new(400, 200, 1_000);
        down.restart(0);
        assert_eq!(down.wpm_at(500), 300);

        let mut instant = WarmupRamp::new(100, 250, 0);
        instant.restart(10);
        assert_eq!(instant.wpm_at(10), 250);
    }

    #[test]
    fn retarget_restarts_from_start_rate() {
        let mut ramp = WarmupRamp::new(100, 300, 1_000);
        ramp.restart(0);
        assert_eq!(ramp.wpm_at(1_000), 300);

        ramp.retarget(500, 1_000);
        assert_eq!(ramp.wpm_at(1_000), 100);
        assert_eq!(ramp.wpm_at(2_000), 500);

        ramp.stop();
        assert!(!ramp.is_running());
        assert_eq!(ramp.wpm_at(2_000), 500);
    }
}
