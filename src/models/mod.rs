pub mod draft;
pub mod forms;
pub mod incident;
pub mod job;
pub mod job_status;
pub mod queued_write;
pub mod reminder;
pub mod user;
