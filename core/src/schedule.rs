use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Reveal,
    ShuffleTick,
    Celebration,
    Compliment,
    FunMessage,
}

/// Payload handed back to [`QuestController::on_timer`] when a timer fires.
///
/// The ticket identifies the arming that produced the event; a controller only honors events whose ticket
/// matches the timer it currently holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub ticket: u64,
}

/// Source of non-blocking timers.
///
/// Dropping the returned handle cancels the timer. Dropping a handle whose timer already fired is a no-op.
pub trait Scheduler {
    type Handle;

    fn schedule_once(&mut self, delay: Millis, event: TimerEvent) -> Self::Handle;

    fn schedule_repeating(&mut self, period: Millis, event: TimerEvent) -> Self::Handle;
}

#[derive(Clone, Debug)]
struct Entry {
    due: u64,
    period: Option<Millis>,
    event: TimerEvent,
}

#[derive(Debug, Default)]
struct Clock {
    now: u64,
    next_id: u64,
    entries: BTreeMap<u64, Entry>,
}

impl Clock {
    fn arm(&mut self, delay: Millis, period: Option<Millis>, event: TimerEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now + u64::from(delay);
        self.entries.insert(id, Entry { due, period, event });
        id
    }

    fn next_due(&self, until: u64) -> Option<(u64, u64)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.due <= until)
            .map(|(&id, entry)| (entry.due, id))
            .min()
    }
}

/// Virtual clock scheduler. Time only moves when the owner advances it, which makes timer-driven flows
/// reproducible in tests and headless drivers.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    /// Number of armed timers, repeating ones included.
    pub fn pending(&self) -> usize {
        self.clock.borrow().entries.len()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.clock
            .borrow()
            .entries
            .values()
            .any(|entry| entry.event.kind == kind)
    }

    /// Fires the earliest timer due at or before `until`, moving the clock to its due time.
    ///
    /// Timers due at the same instant fire in the order they were armed. Repeating timers are re-armed one
    /// period later.
    pub fn fire_next(&self, until: u64) -> Option<TimerEvent> {
        let mut clock = self.clock.borrow_mut();
        let (due, id) = clock.next_due(until)?;
        clock.now = clock.now.max(due);

        let (period, event) = {
            let entry = clock.entries.get(&id)?;
            (entry.period, entry.event)
        };
        match period {
            Some(period) => {
                if let Some(entry) = clock.entries.get_mut(&id) {
                    entry.due = due + u64::from(period.max(1));
                }
            }
            None => {
                clock.entries.remove(&id);
            }
        }
        Some(event)
    }

    /// Moves the clock forward without firing anything. Callers normally drain [`Self::fire_next`] first.
    pub fn settle(&self, until: u64) {
        let mut clock = self.clock.borrow_mut();
        clock.now = clock.now.max(until);
    }

    fn handle(&self, id: u64) -> ManualHandle {
        ManualHandle {
            id,
            clock: Rc::downgrade(&self.clock),
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule_once(&mut self, delay: Millis, event: TimerEvent) -> Self::Handle {
        let id = self.clock.borrow_mut().arm(delay, None, event);
        self.handle(id)
    }

    fn schedule_repeating(&mut self, period: Millis, event: TimerEvent) -> Self::Handle {
        let id = self.clock.borrow_mut().arm(period, Some(period), event);
        self.handle(id)
    }
}

/// Cancels its timer on drop.
#[derive(Debug)]
pub struct ManualHandle {
    id: u64,
    clock: Weak<RefCell<Clock>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(clock) = self.clock.upgrade() {
            clock.borrow_mut().entries.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: TimerKind, ticket: u64) -> TimerEvent {
        TimerEvent { kind, ticket }
    }

    #[test]
    fn once_fires_a_single_time() {
        let mut scheduler = ManualScheduler::new();
        let _handle = scheduler.schedule_once(100, event(TimerKind::Reveal, 1));

        assert_eq!(scheduler.fire_next(99), None);
        assert_eq!(scheduler.fire_next(100), Some(event(TimerKind::Reveal, 1)));
        assert_eq!(scheduler.fire_next(1_000), None);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn repeating_rearms_each_period() {
        let mut scheduler = ManualScheduler::new();
        let _handle = scheduler.schedule_repeating(50, event(TimerKind::ShuffleTick, 2));

        let mut fired = 0;
        while scheduler.fire_next(175).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(scheduler.now(), 150);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn dropping_handle_cancels() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(10, event(TimerKind::FunMessage, 3));
        drop(handle);

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.fire_next(100), None);
    }

    #[test]
    fn dropping_fired_handle_is_noop() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule_once(10, event(TimerKind::Compliment, 4));
        let _second = scheduler.schedule_once(20, event(TimerKind::Celebration, 5));

        assert!(scheduler.fire_next(10).is_some());
        drop(first);

        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.is_armed(TimerKind::Celebration));
    }

    #[test]
    fn same_instant_fires_in_arming_order() {
        let mut scheduler = ManualScheduler::new();
        let _a = scheduler.schedule_once(30, event(TimerKind::Celebration, 1));
        let _b = scheduler.schedule_once(30, event(TimerKind::Compliment, 2));

        assert_eq!(scheduler.fire_next(30).map(|e| e.ticket), Some(1));
        assert_eq!(scheduler.fire_next(30).map(|e| e.ticket), Some(2));
    }
}
