//! Pre-JSA and Post-JSA questionnaires: a single screen of yes/no questions
//! whose every change is saved as a draft.

use crate::core::service::{FieldService, WriteOutcome};
use crate::core::validate;
use crate::errors::{AppError, AppResult};
use crate::models::draft::Draft;
use crate::models::forms::{Answer, PostJsaAnswers, PreJsaAnswers, Question, Questionnaire};
use crate::storage::draft_store::DraftStore;
use crate::storage::kv::KeyValueStore;
use crate::storage::repository::JobRepository;

#[derive(Debug, Clone)]
pub struct JsaWizard<F: Questionnaire> {
    job_id: String,
    answers: F,
    restored: bool,
}

impl<F: Questionnaire> JsaWizard<F> {
    pub fn open<S: KeyValueStore + ?Sized>(drafts: &DraftStore<'_, S>, job_id: &str) -> AppResult<Self> {
        let saved = drafts
            .load(job_id, F::FORM)?
            .and_then(|d| match serde_json::from_value::<F>(d.payload) {
                Ok(answers) => Some(answers),
                Err(e) => {
                    tracing::warn!(job = job_id, form = %F::FORM, error = %e, "unreadable draft, starting over");
                    None
                }
            });

        Ok(Self {
            job_id: job_id.to_string(),
            restored: saved.is_some(),
            answers: saved.unwrap_or_default(),
        })
    }

    pub fn answers(&self) -> &F {
        &self.answers
    }

    pub fn restored(&self) -> bool {
        self.restored
    }

    pub fn answer<S: KeyValueStore + ?Sized>(
        &mut self,
        drafts: &mut DraftStore<'_, S>,
        id: &str,
        answer: Answer,
    ) -> AppResult<()> {
        self.question(id)?.answer = answer;
        self.persist(drafts)
    }

    pub fn details<S: KeyValueStore + ?Sized>(
        &mut self,
        drafts: &mut DraftStore<'_, S>,
        id: &str,
        text: &str,
    ) -> AppResult<()> {
        self.question(id)?.details = text.to_string();
        self.persist(drafts)
    }

    pub fn validate(&self) -> AppResult<()> {
        validate::questions(&self.answers)
    }

    pub fn is_valid(&self) -> bool {
        validate::questions_ok(&self.answers)
    }

    fn question(&mut self, id: &str) -> AppResult<&mut Question> {
        self.answers
            .question_mut(id)
            .ok_or_else(|| AppError::validation(format!("{}: no question '{id}'", F::TITLE)))
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, drafts: &mut DraftStore<'_, S>) -> AppResult<()> {
        let payload = serde_json::to_value(&self.answers)?;
        drafts.save(&self.job_id, &Draft::new(F::FORM, 1, payload))
    }
}

impl JsaWizard<PreJsaAnswers> {
    pub fn submit<R: JobRepository, S: KeyValueStore>(
        self,
        svc: &mut FieldService<R, S>,
    ) -> AppResult<WriteOutcome> {
        svc.submit_pre_jsa(&self.job_id, self.answers)
    }
}

impl JsaWizard<PostJsaAnswers> {
    pub fn submit<R: JobRepository, S: KeyValueStore>(
        self,
        svc: &mut FieldService<R, S>,
    ) -> AppResult<WriteOutcome> {
        svc.submit_post_jsa(&self.job_id, self.answers)
    }
}
