//! Single-threaded virtual clock with cancellable timers.
//!
//! Nothing fires on its own: callers move time forward with
//! [`Scheduler::advance`]. Every timer is owned by a [`TimerHandle`] and is
//! cancelled when that handle is dropped, including from inside a callback.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

type Callback = Box<dyn FnMut() -> bool>;

struct Timer {
    due: u64,
    /// Tie-breaker so timers due at the same instant fire in schedule order.
    seq: u64,
    period: Option<u64>,
    callback: Option<Callback>,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct Inner {
    now: u64,
    next_id: u64,
    next_seq: u64,
    timers: BTreeMap<u64, Timer>,
}

impl Inner {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn next_due(&self, limit: u64) -> Option<u64> {
        self.timers
            .iter()
            .filter(|(_, t)| !t.cancelled.get() && t.callback.is_some() && t.due <= limit)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(id, _)| *id)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<Inner>>,
}

/// Owns one timer. Dropping it cancels the timer.
pub struct TimerHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
    inner: Weak<RefCell<Inner>>,
}

impl TimerHandle {
    /// False once cancelled or once a one-shot timer has fired.
    pub fn is_active(&self) -> bool {
        !self.cancelled.get()
            && self
                .inner
                .upgrade()
                .is_some_and(|inner| inner.try_borrow().map_or(true, |i| i.timers.contains_key(&self.id)))
    }

    pub fn cancel(self) {}
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
        if let Some(inner) = self.inner.upgrade() {
            // While `advance` holds the borrow the flag alone is enough; the
            // timer is swept on the next pass.
            let removed = match inner.try_borrow_mut() {
                Ok(mut guard) => guard.timers.remove(&self.id),
                Err(_) => None,
            };
            drop(removed);
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        Duration::from_millis(self.inner.borrow().now)
    }

    /// Live timers.
    pub fn pending(&self) -> usize {
        self.inner
            .borrow()
            .timers
            .values()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Run `f` once, `delay` from now.
    pub fn after<F>(&self, delay: Duration, f: F) -> TimerHandle
    where
        F: FnOnce() + 'static,
    {
        let mut f = Some(f);
        self.schedule(millis(delay), None, move || {
            if let Some(f) = f.take() {
                f();
            }
            false
        })
    }

    /// Run `f` every `period` until it returns `false` or the handle drops.
    /// A zero period is treated as one millisecond.
    pub fn every<F>(&self, period: Duration, f: F) -> TimerHandle
    where
        F: FnMut() -> bool + 'static,
    {
        let period = millis(period).max(1);
        self.schedule(period, Some(period), f)
    }

    fn schedule<F>(&self, delay: u64, period: Option<u64>, f: F) -> TimerHandle
    where
        F: FnMut() -> bool + 'static,
    {
        let cancelled = Rc::new(Cell::new(false));
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        let seq = inner.seq();
        let due = inner.now.saturating_add(delay);
        inner.timers.insert(
            id,
            Timer {
                due,
                seq,
                period,
                callback: Some(Box::new(f)),
                cancelled: Rc::clone(&cancelled),
            },
        );

        TimerHandle {
            id,
            cancelled,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Move virtual time forward by `by`, firing every due callback in due
    /// order. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.borrow().now.saturating_add(millis(by));
        let mut fired = 0;

        loop {
            let next = self.inner.borrow().next_due(target);
            let Some(id) = next else { break };

            let callback = {
                let mut inner = self.inner.borrow_mut();
                let Some(timer) = inner.timers.get_mut(&id) else {
                    continue;
                };
                let (due, cb) = (timer.due, timer.callback.take());
                inner.now = due;
                cb
            };
            let Some(mut callback) = callback else {
                continue;
            };

            // No borrow is held here: the callback may schedule, cancel or
            // drop handles freely.
            let keep = callback();
            fired += 1;

            let mut callback = Some(callback);
            let removed = {
                let mut inner = self.inner.borrow_mut();
                let seq = inner.seq();
                let rearm = inner
                    .timers
                    .get(&id)
                    .and_then(|t| t.period.filter(|_| keep && !t.cancelled.get()));
                match rearm {
                    Some(period) => {
                        if let Some(timer) = inner.timers.get_mut(&id) {
                            timer.due += period;
                            timer.seq = seq;
                            timer.callback = callback.take();
                        }
                        None
                    }
                    None => {
                        let removed = inner.timers.remove(&id);
                        if let Some(t) = &removed {
                            t.cancelled.set(true);
                        }
                        removed
                    }
                }
            };
            // Closures may own handles whose Drop borrows the scheduler.
            drop(removed);
            drop(callback);
        }

        self.sweep();
        self.inner.borrow_mut().now = target;
        fired
    }

    /// Remove timers cancelled while a callback was running.
    fn sweep(&self) {
        let removed: Vec<Timer> = {
            let mut inner = self.inner.borrow_mut();
            let dead: Vec<u64> = inner
                .timers
                .iter()
                .filter(|(_, t)| t.cancelled.get())
                .map(|(id, _)| *id)
                .collect();
            dead.iter()
                .filter_map(|id| inner.timers.remove(id))
                .collect()
        };
        drop(removed);
    }
}
