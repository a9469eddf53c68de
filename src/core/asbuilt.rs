//! Six-step As-Built wizard with a resumable draft.

use crate::core::service::{FieldService, WriteOutcome};
use crate::core::validate;
use crate::errors::{AppError, AppResult};
use crate::models::draft::{Draft, FormType};
use crate::models::forms::AsBuiltForm;
use crate::models::job::Job;
use crate::models::user::User;
use crate::storage::draft_store::DraftStore;
use crate::storage::kv::KeyValueStore;
use crate::storage::repository::JobRepository;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AsBuiltStep {
    Header = 1,
    Drawing,
    Items,
    Photos,
    Checklist,
    Signature,
}

impl AsBuiltStep {
    pub const ALL: [AsBuiltStep; 6] = [
        AsBuiltStep::Header,
        AsBuiltStep::Drawing,
        AsBuiltStep::Items,
        AsBuiltStep::Photos,
        AsBuiltStep::Checklist,
        AsBuiltStep::Signature,
    ];

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            AsBuiltStep::Header => "Job header",
            AsBuiltStep::Drawing => "Site drawing",
            AsBuiltStep::Items => "Items installed",
            AsBuiltStep::Photos => "Site photos",
            AsBuiltStep::Checklist => "Completion checklist",
            AsBuiltStep::Signature => "Foreman signature",
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.index() == index)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(&self) -> bool {
        *self == AsBuiltStep::Signature
    }
}

impl fmt::Display for AsBuiltStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/6 {}", self.index(), self.title())
    }
}

#[derive(Debug, Clone)]
pub struct AsBuiltWizard {
    job_id: String,
    step: AsBuiltStep,
    form: AsBuiltForm,
    restored: bool,
}

impl AsBuiltWizard {
    /// Resume the saved draft for `job`, or start a fresh form prefilled
    /// from the job, the signed-in foreman, the day's truck and `today`.
    pub fn open<S: KeyValueStore + ?Sized>(
        drafts: &DraftStore<'_, S>,
        job: &Job,
        user: Option<&User>,
        truck: Option<&str>,
        today: NaiveDate,
    ) -> AppResult<Self> {
        if let Some(draft) = drafts.load(&job.id, FormType::AsBuilt)? {
            match serde_json::from_value::<AsBuiltForm>(draft.payload) {
                Ok(form) => {
                    return Ok(Self {
                        job_id: job.id.clone(),
                        step: AsBuiltStep::from_index(draft.step).unwrap_or(AsBuiltStep::Header),
                        form,
                        restored: true,
                    });
                }
                Err(e) => {
                    tracing::warn!(job = %job.id, error = %e, "unreadable As-Built draft, starting over");
                }
            }
        }

        let mut form = AsBuiltForm::default();
        form.header.job_name = job.customer_name.clone();
        form.header.street_address = job.address.clone();
        form.header.foreman = user.map(|u| u.name.clone()).unwrap_or_default();
        form.header.truck = truck
            .map(str::to_string)
            .or_else(|| job.truck_number.clone())
            .unwrap_or_default();
        form.header.date = today.format("%Y-%m-%d").to_string();

        Ok(Self {
            job_id: job.id.clone(),
            step: AsBuiltStep::Header,
            form,
            restored: false,
        })
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn step(&self) -> AsBuiltStep {
        self.step
    }

    pub fn form(&self) -> &AsBuiltForm {
        &self.form
    }

    /// Whether this wizard picked up a saved draft.
    pub fn restored(&self) -> bool {
        self.restored
    }

    /// Apply a field change and persist it.
    pub fn edit<S, F>(&mut self, drafts: &mut DraftStore<'_, S>, change: F) -> AppResult<()>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce(&mut AsBuiltForm),
    {
        change(&mut self.form);
        self.persist(drafts)
    }

    /// Validate the current step and move forward. On the last step this
    /// only validates.
    pub fn next<S: KeyValueStore + ?Sized>(
        &mut self,
        drafts: &mut DraftStore<'_, S>,
    ) -> AppResult<AsBuiltStep> {
        validate::as_built_step(&self.form, self.step)?;

        if let Some(next) = self.step.next() {
            self.step = next;
            self.persist(drafts)?;
        }
        Ok(self.step)
    }

    /// Step back without validating; stays on the first step.
    pub fn back<S: KeyValueStore + ?Sized>(
        &mut self,
        drafts: &mut DraftStore<'_, S>,
    ) -> AppResult<AsBuiltStep> {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.persist(drafts)?;
        Ok(self.step)
    }

    /// Submit from the signature step. On success the draft is gone and the
    /// job is completed (or both are queued while offline).
    pub fn submit<R, S>(self, svc: &mut FieldService<R, S>) -> AppResult<WriteOutcome>
    where
        R: JobRepository,
        S: KeyValueStore,
    {
        if !self.step.is_last() {
            return Err(AppError::validation(format!(
                "The As-Built can only be submitted from step 6 (currently on step {})",
                self.step.index()
            )));
        }
        svc.submit_as_built(&self.job_id, self.form)
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, drafts: &mut DraftStore<'_, S>) -> AppResult<()> {
        let payload = serde_json::to_value(&self.form)?;
        drafts.save(
            &self.job_id,
            &Draft::new(FormType::AsBuilt, self.step.index(), payload),
        )
    }
}
