use crate::time::{Duration, Instant};

/// Indicates that the `AX5043` instance is not initialized yet
#[derive(Debug)]
pub struct Uninitialized;

/// Indicates that the `AX5043` instance is configured and in standby
#[derive(Debug)]
pub struct Ready;

/// Indicates that the `AX5043` instance is currently sending
#[derive(Debug)]
pub struct Sending {
    pub(super) started: Instant,
    pub(super) timeout: Duration,
    pub(super) finished: bool,
}

/// Indicates that the `AX5043` instance is powered down
///
/// Register contents are kept in this mode.
#[derive(Debug)]
pub struct Sleeping;

/// Any state in which the chip is powered and its oscillator may run
pub trait Awake {}

impl Awake for Ready {}
impl Awake for Sending {}

impl Sending {
    /// Mark the transmission as finished
    pub(super) fn mark_finished(&mut self) {
        self.finished = true;
    }

    /// Indicates whether the transmission completed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The time budget of this transmission
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
