pub mod asbuilt;
pub mod backup;
pub mod jsa;
pub mod lifecycle;
pub mod log;
pub mod offline;
pub mod reminders;
pub mod service;
pub mod session;
pub mod validate;

pub use asbuilt::{AsBuiltStep, AsBuiltWizard};
pub use jsa::JsaWizard;
pub use lifecycle::{JobAction, JobLifecycle, available_actions};
pub use offline::OfflineQueue;
pub use service::{FieldService, SyncReport, WriteOutcome};
