//! Virtual-clock timer queue
//!
//! Every delayed step of the pipeline (container polls, the settle delay, the
//! resize debounce and the orientation deferral) is an entry here. Time only
//! moves when the owner pops due entries, so tests drive it deterministically
//! and the binary maps it onto the wall clock.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle of a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Pending tasks ordered by deadline, ties broken by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    entries: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward; never backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Run `task` once `delay` has elapsed from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((self.now + delay, seq), task);
        TimerId(seq)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.entries.keys().find(|(_, seq)| *seq == id.0).copied();
        match key {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel every pending timer whose task matches.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, task| !predicate(task));
        before - self.entries.len()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Take the earliest task due at or before `until`, advancing the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, T)> {
        let (&(deadline, _), _) = self.entries.first_key_value()?;
        if deadline > until {
            return None;
        }
        let ((deadline, _), task) = self.entries.pop_first()?;
        self.set_now(deadline);
        Some((deadline, task))
    }

    /// Drop every pending timer, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Whether any pending task matches
    pub fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.entries.values().any(|task| predicate(task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
