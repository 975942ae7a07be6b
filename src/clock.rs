//! Time sources
//!
//! Two clocks, never conflated: a monotonically increasing tick counter
//! advanced by the host's fixed-rate loop (cooldowns, active windows) and
//! a calendar source (daily challenge rollover). Components take the one
//! they need through the `Clock` trait, which keeps the engine
//! deterministic under test.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;

/// Simulation steps per real-time second in the reference host.
pub const TICKS_PER_SECOND: i64 = 20;

/// Abstract time source.
pub trait Clock: Send + Sync {
    /// Current simulation tick.
    fn now_tick(&self) -> i64;

    /// Current calendar day.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by a host-advanced tick counter and the system calendar.
#[derive(Debug, Default)]
pub struct SystemClock {
    tick: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one simulation step. Called once per host loop iteration.
    pub fn advance(&self) -> i64 {
        self.tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Clock for SystemClock {
    fn now_tick(&self) -> i64 {
        self.tick.load(Ordering::Relaxed)
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Fully controllable clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    tick: AtomicI64,
    date: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(tick: i64, date: NaiveDate) -> Self {
        Self {
            tick: AtomicI64::new(tick),
            date: Mutex::new(date),
        }
    }

    pub fn set_tick(&self, tick: i64) {
        self.tick.store(tick, Ordering::Relaxed);
    }

    pub fn advance_ticks(&self, ticks: i64) -> i64 {
        self.tick.fetch_add(ticks, Ordering::Relaxed) + ticks
    }

    pub fn set_date(&self, date: NaiveDate) {
        *self.date.lock() = date;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }
}

impl Clock for ManualClock {
    fn now_tick(&self) -> i64 {
        self.tick.load(Ordering::Relaxed)
    }

    fn today(&self) -> NaiveDate {
        *self.date.lock()
    }
}
