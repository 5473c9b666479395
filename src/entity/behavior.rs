//! The pursuer behaviour state machine: pen release, the scatter/chase cycle and the fright overlay.

use std::time::Duration;

use crate::constants::timing::{CHASE_DURATION, FRIGHTENED_DURATION, SCATTER_DURATION};

/// The behavioural mode a pursuer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    SpawnWait,
    SpawnExit,
    Scatter,
    Chase,
    Frightened,
}

/// Durations driving the mode transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub scatter: Duration,
    pub chase: Duration,
    pub frightened: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            scatter: SCATTER_DURATION,
            chase: CHASE_DURATION,
            frightened: FRIGHTENED_DURATION,
        }
    }
}

/// The underlying phase; fright is layered on top of [`Phase::Cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SpawnWait { remaining: Duration },
    SpawnExit,
    Cycle(Mode),
}

/// A transition produced by [`Behavior::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The pen wait ran out; the pursuer now heads for the exit.
    Released,
    /// The scatter/chase cycle flipped to the given mode.
    Cycled(Mode),
    /// The fright timer ran out.
    FrightEnded,
}

#[derive(Debug, Clone)]
pub struct Behavior {
    timings: Timings,
    phase: Phase,
    /// Time spent in the current scatter/chase phase. Frozen while frightened.
    cycle_timer: Duration,
    fright_remaining: Option<Duration>,
}

impl Behavior {
    /// A pursuer already released from the pen wait.
    pub fn released(timings: Timings, in_pen: bool) -> Self {
        Self {
            timings,
            phase: if in_pen { Phase::SpawnExit } else { Phase::Cycle(Mode::Scatter) },
            cycle_timer: Duration::ZERO,
            fright_remaining: None,
        }
    }

    /// A pursuer waiting in the pen for `delay`.
    pub fn waiting(timings: Timings, delay: Duration) -> Self {
        Self {
            timings,
            phase: Phase::SpawnWait { remaining: delay },
            cycle_timer: Duration::ZERO,
            fright_remaining: None,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.phase {
            Phase::SpawnWait { .. } => Mode::SpawnWait,
            Phase::SpawnExit => Mode::SpawnExit,
            Phase::Cycle(_) if self.fright_remaining.is_some() => Mode::Frightened,
            Phase::Cycle(mode) => mode,
        }
    }

    pub fn is_frightened(&self) -> bool {
        self.fright_remaining.is_some()
    }

    pub fn cycle_timer(&self) -> Duration {
        self.cycle_timer
    }

    pub fn fright_remaining(&self) -> Option<Duration> {
        self.fright_remaining
    }

    /// Remaining pen wait, if the pursuer is still waiting.
    pub fn release_remaining(&self) -> Option<Duration> {
        match self.phase {
            Phase::SpawnWait { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Advances every running timer by `elapsed`, returning the transition it caused.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Transition> {
        match self.phase {
            Phase::SpawnWait { remaining } => {
                let remaining = remaining.saturating_sub(elapsed);
                if remaining.is_zero() {
                    self.phase = Phase::SpawnExit;
                    Some(Transition::Released)
                } else {
                    self.phase = Phase::SpawnWait { remaining };
                    None
                }
            }
            Phase::SpawnExit => None,
            Phase::Cycle(mode) => {
                if let Some(remaining) = self.fright_remaining {
                    let remaining = remaining.saturating_sub(elapsed);
                    if remaining.is_zero() {
                        self.fright_remaining = None;
                        return Some(Transition::FrightEnded);
                    }
                    self.fright_remaining = Some(remaining);
                    return None;
                }

                self.cycle_timer += elapsed;
                let (limit, next) = match mode {
                    Mode::Chase => (self.timings.chase, Mode::Scatter),
                    _ => (self.timings.scatter, Mode::Chase),
                };
                if self.cycle_timer >= limit {
                    self.phase = Phase::Cycle(next);
                    self.cycle_timer = Duration::ZERO;
                    Some(Transition::Cycled(next))
                } else {
                    None
                }
            }
        }
    }

    /// Leaves the pen; the cycle starts over in scatter.
    pub fn finish_exit(&mut self) {
        if self.phase == Phase::SpawnExit {
            self.phase = Phase::Cycle(Mode::Scatter);
            self.cycle_timer = Duration::ZERO;
        }
    }

    /// Starts (or restarts) the fright timer. Ignored while in or leaving the pen.
    pub fn frighten(&mut self) -> bool {
        match self.phase {
            Phase::Cycle(_) => {
                self.fright_remaining = Some(self.timings.frightened);
                true
            }
            _ => false,
        }
    }

    /// Back into the pen with a fresh wait.
    pub fn reset(&mut self, delay: Duration) {
        *self = Self::waiting(self.timings, delay);
    }
}
