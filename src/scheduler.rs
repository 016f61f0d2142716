/// Periodic timer multiplexing.
///
/// Each source keeps its own next-due instant.  `poll` compares them all and
/// fires at most one: the earliest due, ties going to the source listed
/// first in `TimerSource::ALL`.  Nothing here blocks or sleeps.

use std::cell::Cell;
use std::time::{Duration, Instant};

use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerSource {
    Scroll,
    Update,
    HostileSpawn,
    Countdown,
}

impl TimerSource {
    /// Tie-break priority, highest first.
    pub const ALL: [TimerSource; 4] = [
        TimerSource::Scroll,
        TimerSource::Update,
        TimerSource::HostileSpawn,
        TimerSource::Countdown,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerPeriods {
    pub scroll: Duration,
    pub update: Duration,
    pub hostile_spawn: Duration,
    pub countdown: Duration,
}

impl Default for TimerPeriods {
    /// 16 Hz scroll and update, a hostile every 2 s, a 1 s clock.
    fn default() -> Self {
        TimerPeriods {
            scroll: Duration::from_micros(62_500),
            update: Duration::from_micros(62_500),
            hostile_spawn: Duration::from_secs(2),
            countdown: Duration::from_secs(1),
        }
    }
}

impl TimerPeriods {
    pub fn period(&self, source: TimerSource) -> Duration {
        match source {
            TimerSource::Scroll => self.scroll,
            TimerSource::Update => self.update,
            TimerSource::HostileSpawn => self.hostile_spawn,
            TimerSource::Countdown => self.countdown,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    source: TimerSource,
    period: Duration,
    next_due: Instant,
}

#[derive(Clone, Debug)]
pub struct TickScheduler {
    timers: [Timer; 4],
}

impl TickScheduler {
    /// Every source first comes due one period after `start`.
    pub fn new(periods: TimerPeriods, start: Instant) -> Self {
        let timers = TimerSource::ALL.map(|source| {
            let period = periods.period(source);
            Timer {
                source,
                period,
                next_due: start + period,
            }
        });
        TickScheduler { timers }
    }

    /// Fire the earliest-due source, if any is due at `now`, and schedule
    /// its next firing.  A source that fell more than a period behind
    /// drops the backlog instead of firing in a burst.
    pub fn poll(&mut self, now: Instant) -> Option<TimerSource> {
        // `min_by_key` keeps the first of equal keys, and timers sit in
        // priority order.
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due <= now)
            .min_by_key(|t| t.next_due)?;

        timer.next_due += timer.period;
        if timer.next_due <= now {
            timer.next_due = now + timer.period;
        }
        trace!("timer {:?} fired", timer.source);
        Some(timer.source)
    }

    pub fn next_due(&self, source: TimerSource) -> Instant {
        // `ALL` lists sources in declaration order, so the discriminant
        // is the index.
        self.timers[source as usize].next_due
    }

    /// Time until the earliest source comes due (zero when one already is).
    pub fn until_next(&self, now: Instant) -> Duration {
        self.timers
            .iter()
            .map(|t| t.next_due.saturating_duration_since(now))
            .min()
            .unwrap_or_default()
    }
}

// ── Clocks ────────────────────────────────────────────────────────────────────

pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock: every `now()` returns the current reading and then
/// moves it forward by `step`.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: Instant, step: Duration) -> Self {
        ManualClock {
            now: Cell::new(start),
            step,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn peek(&self) -> Instant {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
