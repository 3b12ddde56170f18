/// Seconds at or below which the countdown is shown as running low.
pub const LOW_TIME_SECONDS: u32 = 5;

/// Per-question timer, advanced one second per [`Countdown::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        let duration = duration.max(1);
        Self {
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// Refill and start.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns true exactly once, on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_low(&self) -> bool {
        self.remaining <= LOW_TIME_SECONDS
    }

    /// `mm:ss`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
