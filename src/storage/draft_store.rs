use crate::errors::AppResult;
use crate::models::draft::{Draft, FormType};
use crate::storage::kv::{KeyValueStore, save_json};
use serde_json::Value;

/// One draft per `(job, form)`; overwritten on save, gone only on `clear`.
///
/// Questionnaire drafts are stored as the bare answers object, the way the
/// mobile client writes `prejsa_<jobId>`. As-Built drafts keep the step, so
/// they are stored as the whole [`Draft`].
pub struct DraftStore<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore + ?Sized> DraftStore<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, job_id: &str, draft: &Draft) -> AppResult<()> {
        let key = draft.form_type.storage_key(job_id);
        match draft.form_type {
            FormType::PreJsa | FormType::PostJsa => save_json(&mut *self.store, &key, &draft.payload),
            FormType::AsBuilt => save_json(&mut *self.store, &key, draft),
        }
    }

    /// An entry that cannot be decoded is logged and treated as absent, so
    /// the wizard starts over instead of failing on every open.
    pub fn load(&self, job_id: &str, form: FormType) -> AppResult<Option<Draft>> {
        let Some(text) = self.store.get(&form.storage_key(job_id))? else {
            return Ok(None);
        };

        match decode(form, &text) {
            Ok(draft) => Ok(draft),
            Err(e) => {
                tracing::warn!(job = job_id, form = %form, error = %e, "unreadable draft, starting over");
                Ok(None)
            }
        }
    }

    pub fn clear(&mut self, job_id: &str, form: FormType) -> AppResult<()> {
        self.store.remove(&form.storage_key(job_id))
    }
}

fn decode(form: FormType, text: &str) -> serde_json::Result<Option<Draft>> {
    let value: Value = serde_json::from_str(text)?;

    let wrapped = value.get("formType").is_some() && value.get("payload").is_some();
    if form == FormType::AsBuilt || wrapped {
        let draft: Draft = serde_json::from_value(value)?;
        // A draft stored under the wrong key is not ours to resume.
        return Ok(Some(draft).filter(|d| d.form_type == form));
    }

    Ok(Some(Draft::new(form, 1, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn questionnaire_draft_is_stored_bare() {
        let mut store = MemoryStore::new();
        let payload = json!({"q1": {"answer": true, "details": ""}});
        DraftStore::new(&mut store)
            .save("JOB-001", &Draft::new(FormType::PreJsa, 1, payload.clone()))
            .unwrap();

        let text = store.get("prejsa_JOB-001").unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), payload);

        let loaded = DraftStore::new(&mut store)
            .load("JOB-001", FormType::PreJsa)
            .unwrap();
        assert_eq!(loaded, Some(Draft::new(FormType::PreJsa, 1, payload)));
    }

    #[test]
    fn as_built_draft_keeps_its_step() {
        let mut store = MemoryStore::new();
        let draft = Draft::new(FormType::AsBuilt, 4, json!({"drawing": "site.png"}));
        let mut drafts = DraftStore::new(&mut store);
        drafts.save("JOB-002", &draft).unwrap();
        assert_eq!(drafts.load("JOB-002", FormType::AsBuilt).unwrap(), Some(draft));
    }

    #[test]
    fn wrapped_questionnaire_draft_still_loads() {
        let mut store = MemoryStore::new();
        store
            .set(
                "postjsa_JOB-001",
                r#"{"formType":"post-jsa","step":1,"payload":{"q1":{"answer":false,"details":"x"}}}"#,
            )
            .unwrap();

        let draft = DraftStore::new(&mut store)
            .load("JOB-001", FormType::PostJsa)
            .unwrap()
            .unwrap();
        assert_eq!(draft.payload["q1"]["details"], "x");
    }

    #[test]
    fn garbage_is_treated_as_no_draft() {
        let mut store = MemoryStore::new();
        store.set("asbuilt_progress_JOB-001", "{not json").unwrap();
        store.set("prejsa_JOB-001", "[1, 2").unwrap();

        let drafts = DraftStore::new(&mut store);
        assert!(drafts.load("JOB-001", FormType::AsBuilt).unwrap().is_none());
        assert!(drafts.load("JOB-001", FormType::PreJsa).unwrap().is_none());
    }
}
