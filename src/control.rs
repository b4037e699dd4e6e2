//! Knobs a caller turns while a search is running: cancellation, animation speed and the hook
//! that is invoked at every suspension point.
use crate::pathing_grid::PathingGrid;
use crate::{DEFAULT_STEP_DELAY_MS, PATH_STAMP_DELAY_MS};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cooperative cancellation flag. Clones share the flag; the search polls it, it never
/// interrupts a step in progress.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Delay between search iterations in milliseconds. Clones share the value, which can be
/// changed at any time and is re-read at every suspension point.
#[derive(Clone, Debug)]
pub struct StepDelay {
    millis: Arc<AtomicU64>,
}

impl StepDelay {
    pub fn new(millis: u64) -> StepDelay {
        StepDelay {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Relaxed);
    }
    pub fn get(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::Relaxed))
    }
}

impl Default for StepDelay {
    fn default() -> StepDelay {
        StepDelay::new(DEFAULT_STEP_DELAY_MS)
    }
}

/// Which suspension point a [Pacer] is called from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pause {
    /// After a frontier iteration.
    Expansion,
    /// After a cell has been stamped as part of the path.
    PathStamp,
}

/// Called at every suspension point with the grid as it currently looks. This is where a
/// front end draws a frame; the delay is only a suggestion for how long to wait.
pub trait Pacer {
    fn pause(&mut self, kind: Pause, grid: &PathingGrid, delay: Duration);
}

/// Blocks the current thread for the requested delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&mut self, _kind: Pause, _grid: &PathingGrid, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Never waits. Useful for headless runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self, _kind: Pause, _grid: &PathingGrid, _delay: Duration) {}
}

impl<F> Pacer for F
where
    F: FnMut(Pause, &PathingGrid, Duration),
{
    fn pause(&mut self, kind: Pause, grid: &PathingGrid, delay: Duration) {
        self(kind, grid, delay)
    }
}

/// Everything a running search reads from its caller.
#[derive(Clone, Debug)]
pub struct SearchControl {
    pub cancel: CancellationToken,
    pub step_delay: StepDelay,
    /// Fixed pause after each path stamp.
    pub path_delay: Duration,
}

impl SearchControl {
    pub fn new() -> SearchControl {
        SearchControl::default()
    }
    /// A control that never asks the pacer to wait.
    pub fn immediate() -> SearchControl {
        SearchControl {
            cancel: CancellationToken::new(),
            step_delay: StepDelay::new(0),
            path_delay: Duration::ZERO,
        }
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Default for SearchControl {
    fn default() -> SearchControl {
        SearchControl {
            cancel: CancellationToken::new(),
            step_delay: StepDelay::default(),
            path_delay: Duration::from_millis(PATH_STAMP_DELAY_MS),
        }
    }
}
