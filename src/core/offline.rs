use crate::errors::AppResult;
use crate::models::queued_write::QueuedWrite;
use crate::storage::kv::{KeyValueStore, keys, load_json, save_json};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// FIFO of writes captured while offline, replayed in enqueue order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfflineQueue {
    items: VecDeque<QueuedWrite>,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> AppResult<Self> {
        Ok(load_json(store, keys::OFFLINE_QUEUE)?.unwrap_or_default())
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> AppResult<()> {
        if self.items.is_empty() {
            return store.remove(keys::OFFLINE_QUEUE);
        }
        save_json(store, keys::OFFLINE_QUEUE, self)
    }

    pub fn enqueue(&mut self, write: QueuedWrite) {
        self.items.push_back(write);
    }

    /// Drain the whole queue. The caller owns the batch from here on.
    pub fn take_batch(&mut self) -> Vec<QueuedWrite> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an As-Built for `job_id` is waiting to sync.
    pub fn has_as_built(&self, job_id: &str) -> bool {
        self.items
            .iter()
            .any(|w| matches!(w, QueuedWrite::AsBuilt { job_id: id, .. } if id == job_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedWrite> {
        self.items.iter()
    }
}

pub fn load_flag<S: KeyValueStore + ?Sized>(store: &S) -> AppResult<bool> {
    Ok(load_json(store, keys::OFFLINE_MODE)?.unwrap_or(false))
}

pub fn save_flag<S: KeyValueStore + ?Sized>(store: &mut S, offline: bool) -> AppResult<()> {
    save_json(store, keys::OFFLINE_MODE, &offline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::{Answer, PreJsaAnswers};
    use crate::storage::kv::MemoryStore;

    fn pre(job: &str) -> QueuedWrite {
        QueuedWrite::PreJsa {
            job_id: job.to_string(),
            payload: PreJsaAnswers::all(Answer::Yes),
        }
    }

    #[test]
    fn batch_keeps_enqueue_order() {
        let mut q = OfflineQueue::new();
        q.enqueue(pre("JOB-002"));
        q.enqueue(pre("JOB-001"));

        let batch = q.take_batch();
        assert!(q.is_empty());
        let ids: Vec<_> = batch.iter().filter_map(|w| w.job_id()).collect();
        assert_eq!(ids, vec!["JOB-002", "JOB-001"]);
    }

    #[test]
    fn persisted_queue_survives_reload() {
        let mut store = MemoryStore::new();
        let mut q = OfflineQueue::new();
        q.enqueue(pre("JOB-001"));
        q.persist(&mut store).unwrap();

        let loaded = OfflineQueue::load(&store).unwrap();
        assert_eq!(loaded, q);

        let mut empty = OfflineQueue::new();
        empty.persist(&mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn finds_a_pending_as_built_by_job() {
        let mut q = OfflineQueue::new();
        q.enqueue(pre("JOB-001"));
        assert!(!q.has_as_built("JOB-001"));

        q.enqueue(QueuedWrite::AsBuilt {
            job_id: "JOB-001".to_string(),
            payload: Box::default(),
        });
        assert!(q.has_as_built("JOB-001"));
        assert!(!q.has_as_built("JOB-002"));
    }

    #[test]
    fn flag_defaults_to_online() {
        let mut store = MemoryStore::new();
        assert!(!load_flag(&store).unwrap());
        save_flag(&mut store, true).unwrap();
        assert!(load_flag(&store).unwrap());
    }
}
