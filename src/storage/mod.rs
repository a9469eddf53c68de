//! Device-local persistence seams: the key-value store backing drafts and
//! session keys, and the job repository backing the mock backend.

pub mod draft_store;
pub mod kv;
pub mod repository;
pub mod seed;

pub use draft_store::DraftStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use repository::{JobRepository, MemoryJobRepository};
