use crate::sim::scheduler::{Scheduler, TimerHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub const NAV_TICK: Duration = Duration::from_millis(50);
pub const GPS_CONFIRM_AFTER: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Preview,
    Navigating,
    Arrived,
}

/// Turn-by-turn prompt for a given route progress (0..=100).
pub fn instruction_for(progress: u8) -> &'static str {
    match progress {
        0..20 => "Head North on Main St",
        20..50 => "Turn Right onto Highway 95",
        50..80 => "Take Exit 42 towards Industrial Park",
        _ => "Destination is on your right",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavState {
    phase: NavPhase,
    progress: u8,
}

/// Simulated drive to a job site: one percent of the route per tick.
pub struct NavigationView {
    state: Rc<RefCell<NavState>>,
    tick: Duration,
    // Dropping the view drops this handle, which stops the ticker.
    ticker: Option<TimerHandle>,
}

impl NavigationView {
    pub fn new(tick: Duration) -> Self {
        Self {
            state: Rc::new(RefCell::new(NavState {
                phase: NavPhase::Preview,
                progress: 0,
            })),
            tick,
            ticker: None,
        }
    }

    /// Start (or restart) the drive from 0%.
    pub fn start(&mut self, scheduler: &Scheduler) {
        *self.state.borrow_mut() = NavState {
            phase: NavPhase::Navigating,
            progress: 0,
        };

        let state = Rc::downgrade(&self.state);
        self.ticker = Some(scheduler.every(self.tick, move || {
            let Some(state) = state.upgrade() else {
                return false;
            };
            let mut s = state.borrow_mut();
            s.progress = (s.progress + 1).min(100);
            if s.progress >= 100 {
                s.phase = NavPhase::Arrived;
                return false;
            }
            true
        }));
    }

    pub fn phase(&self) -> NavPhase {
        self.state.borrow().phase
    }

    pub fn progress(&self) -> u8 {
        self.state.borrow().progress
    }

    pub fn instruction(&self) -> &'static str {
        instruction_for(self.progress())
    }

    pub fn meters_remaining(&self) -> u32 {
        (100 - u32::from(self.progress())) * 10
    }

    /// Whether the ticker is still scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(TimerHandle::is_active)
    }
}

/// GPS approach detection: confirmed once `after` has elapsed.
pub struct GeofenceCheck {
    confirmed: Rc<Cell<bool>>,
    _timer: TimerHandle,
}

impl GeofenceCheck {
    pub fn start(scheduler: &Scheduler, after: Duration) -> Self {
        let confirmed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&confirmed);
        let timer = scheduler.after(after, move || flag.set(true));
        Self {
            confirmed,
            _timer: timer,
        }
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed.get()
    }
}
