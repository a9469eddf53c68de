//! Virtual-time simulations of the device's timers: turn-by-turn
//! navigation and GPS approach detection.

pub mod navigation;
pub mod scheduler;

pub use navigation::{GeofenceCheck, NavPhase, NavigationView};
pub use scheduler::{Scheduler, TimerHandle};
