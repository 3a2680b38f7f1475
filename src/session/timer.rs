/// Outcome of delivering one tick to a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock decremented and keeps running.
    Ticked {
        /// Seconds left after this tick
        remaining_secs: u64,
    },
    /// Clock reached zero on this tick and stopped.
    Expired,
}

/// Countdown clock for an interview room.
///
/// Pure state machine: `start`, `pause`, `reset` and `tick` are plain
/// transitions with no timing of their own. The owning session wires a
/// one-second `tokio::time::interval` task to `tick` while the clock runs
/// and cancels that task on every exit path (pause, reset, teardown).
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    /// Whether the clock is counting down
    running: bool,

    /// Seconds left on the clock
    remaining_secs: u64,
}

impl CountdownTimer {
    /// Create a stopped clock with `remaining_secs` on it
    pub fn new(remaining_secs: u64) -> Self {
        Self {
            running: false,
            remaining_secs,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Start counting down. Returns whether the clock actually transitioned:
    /// starting an already-running or exhausted clock is a no-op.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Stop counting down. Returns whether the clock actually transitioned.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Put `to_secs` on the clock and stop it, regardless of prior state.
    pub fn reset(&mut self, to_secs: u64) {
        self.running = false;
        self.remaining_secs = to_secs;
    }

    /// Deliver one tick. Only meaningful while running: a tick arriving on
    /// a paused or exhausted clock is dropped (returns `None`), which keeps
    /// a late-firing scheduled callback from ever double-stopping the clock.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.running = false;
            Some(TickOutcome::Expired)
        } else {
            Some(TickOutcome::Ticked {
                remaining_secs: self.remaining_secs,
            })
        }
    }
}
