use std::collections::HashSet;

use color_eyre::{eyre::eyre, Result};

use crate::answer::NativeAnswer;
use crate::api::{SurveyApi, SurveyDetail};
use crate::logic::{LogicError, SurveyLogicGraph};
use crate::models::{Survey, SurveyListItem};
use crate::store::{AnswerStore, StoreError};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("no survey selected")]
    NoSurvey,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answers accepted; for a first submission this carries the minted
    /// response id the respondent can log back in with later.
    Submitted { response_id: String },
    /// A submission for this response id is still in flight; nothing was
    /// sent. Re-trigger once the first one settles.
    AlreadyPending,
    /// The backend refused the payload. Answers stay in the store.
    Rejected,
}

// ---------------------------------------------------------------------------
// Guards for the two boundary-ordering rules
// ---------------------------------------------------------------------------

/// Token handed out when a survey-detail fetch starts. Only the token from
/// the most recent `begin` installs its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// Last-selection-wins: a slow fetch for an earlier selection must not
/// overwrite a faster later one.
#[derive(Debug, Default)]
pub struct SelectionGuard {
    generation: u64,
}

impl SelectionGuard {
    pub fn begin(&mut self) -> SelectionToken {
        self.generation += 1;
        SelectionToken(self.generation)
    }

    pub fn is_current(&self, token: SelectionToken) -> bool {
        token.0 == self.generation
    }
}

/// At-most-one-in-flight per response id. No retries, no timeouts; a failed
/// call frees the slot and the user re-triggers explicitly.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    pending: HashSet<String>,
}

impl SubmissionGate {
    /// Claim the slot for `response_id`. `false` means a submission is
    /// already in flight and the caller must not issue another.
    pub fn try_begin(&mut self, response_id: &str) -> bool {
        self.pending.insert(response_id.to_owned())
    }

    pub fn finish(&mut self, response_id: &str) {
        self.pending.remove(response_id);
    }

    pub fn is_pending(&self, response_id: &str) -> bool {
        self.pending.contains(response_id)
    }
}

// ---------------------------------------------------------------------------
// SurveyService
// ---------------------------------------------------------------------------

struct ActiveSurvey {
    survey: Survey,
    logic: SurveyLogicGraph,
    store: AnswerStore,
}

/// Drives one survey-taking or answer-review screen: survey selection,
/// answer edits, branching lookups, and submission, over an opaque backend.
pub struct SurveyService<S: SurveyApi> {
    api: S,
    active: Option<ActiveSurvey>,
    selection: SelectionGuard,
    gate: SubmissionGate,
}

impl<S: SurveyApi> SurveyService<S> {
    pub fn new(api: S) -> Self {
        Self {
            api,
            active: None,
            selection: SelectionGuard::default(),
            gate: SubmissionGate::default(),
        }
    }

    pub async fn surveys(&self) -> Result<Vec<SurveyListItem>> {
        self.api.list_surveys().await
    }

    /// Start a selection; pair with `install_survey` when the fetch lands.
    /// `select_survey` does both for callers without interleaving concerns.
    pub fn begin_selection(&mut self) -> SelectionToken {
        self.selection.begin()
    }

    /// Install a fetched survey definition unless a newer selection has been
    /// started since `token` was issued. Returns whether it was installed.
    /// Cyclic or ambiguous branching rules reject the survey here, before
    /// any question is shown.
    pub fn install_survey(
        &mut self,
        token: SelectionToken,
        detail: SurveyDetail,
    ) -> Result<bool, LogicError> {
        if !self.selection.is_current(token) {
            tracing::debug!(
                survey_id = detail.survey.survey_id,
                "dropping stale survey fetch result"
            );
            return Ok(false);
        }

        let survey = Survey {
            survey_id: detail.survey.survey_id,
            title: detail.survey.title,
            description: detail.survey.description,
            questions: detail.questions,
        };
        let logic = SurveyLogicGraph::new(survey.survey_id, &detail.logic)?;
        let store = AnswerStore::for_survey(&survey);

        tracing::info!(survey_id = survey.survey_id, title = %survey.title, "survey selected");
        self.active = Some(ActiveSurvey {
            survey,
            logic,
            store,
        });
        Ok(true)
    }

    /// Fetch and install a survey. Returns `false` when the result arrived
    /// stale (a later selection won).
    pub async fn select_survey(&mut self, survey_id: i64) -> Result<bool> {
        let token = self.begin_selection();
        let detail = self.api.get_survey(survey_id).await?;
        Ok(self.install_survey(token, detail)?)
    }

    /// Navigation away discards the survey and its answers.
    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.active.as_ref().map(|a| &a.survey)
    }

    pub fn set_answer(&mut self, question_id: i64, value: NativeAnswer) -> Result<(), FlowError> {
        let active = self.active.as_mut().ok_or(FlowError::NoSurvey)?;
        active.store.set(question_id, value)?;
        Ok(())
    }

    pub fn answer(&self, question_id: i64) -> Option<&NativeAnswer> {
        self.active.as_ref()?.store.get(question_id)
    }

    /// Required questions still unanswered, in survey order. Empty when no
    /// survey is selected.
    pub fn validate(&self) -> Vec<i64> {
        match &self.active {
            Some(active) => active.store.validate(&active.survey),
            None => vec![],
        }
    }

    /// Where the flow goes after `question_id`, based on the current answer:
    /// `Some(target)` for a branching rule hit, `None` to fall through to
    /// sequence order. Conflicting multi-select rules surface as an error.
    pub fn next_question_after(&self, question_id: i64) -> Result<Option<i64>, LogicError> {
        let Some(active) = &self.active else {
            return Ok(None);
        };
        match active.store.get(question_id) {
            Some(NativeAnswer::SingleChoice(Some(option_id))) => {
                Ok(active.logic.next_question(question_id, *option_id))
            }
            Some(NativeAnswer::MultiChoice(selected)) => {
                active.logic.next_for_selection(question_id, selected)
            }
            _ => Ok(None),
        }
    }

    /// Load a respondent's prior answers into the store for review/editing.
    /// Returns whether any exist — the `has_prior_answers` flag the access
    /// rules consume.
    pub async fn load_respondent_answers(&mut self, response_id: &str) -> Result<bool> {
        if self.active.is_none() {
            return Err(eyre!("no survey selected"));
        }
        let answers = self.api.get_respondent_answers(response_id).await?;
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| eyre!("no survey selected"))?;
        active.store.load(&active.survey, &answers);
        Ok(!answers.is_empty())
    }

    /// Submit the current answers. `response_id` is `None` for a first
    /// submission, in which case a fresh id is minted. Required-ness gating
    /// is the caller's decision via `validate`; this sends whatever the
    /// store holds, unanswered questions included.
    pub async fn submit(&mut self, response_id: Option<String>) -> Result<SubmitOutcome> {
        let active = self.active.as_ref().ok_or_else(|| eyre!("no survey selected"))?;
        let response_id = response_id.unwrap_or_else(|| ulid::Ulid::new().to_string());

        if !self.gate.try_begin(&response_id) {
            tracing::warn!(%response_id, "submission already in flight");
            return Ok(SubmitOutcome::AlreadyPending);
        }

        let survey_id = active.survey.survey_id;
        let answers = active.store.snapshot(&active.survey, &response_id);

        let result = self.api.submit_answers(survey_id, &response_id, answers).await;
        self.gate.finish(&response_id);

        match result {
            Ok(true) => {
                tracing::info!(survey_id, %response_id, "answers submitted");
                if let Some(active) = self.active.as_mut() {
                    active.store.clear();
                }
                Ok(SubmitOutcome::Submitted { response_id })
            }
            Ok(false) => {
                tracing::warn!(survey_id, %response_id, "backend rejected submission");
                Ok(SubmitOutcome::Rejected)
            }
            // Transport fault: the store keeps its last valid state so the
            // user can re-trigger.
            Err(e) => Err(e),
        }
    }

    /// Persist edits to an existing response. Unlike `submit`, success keeps
    /// the store populated — the review screen stays on the same answers.
    pub async fn save_edits(&mut self, response_id: &str) -> Result<SubmitOutcome> {
        let active = self.active.as_ref().ok_or_else(|| eyre!("no survey selected"))?;

        if !self.gate.try_begin(response_id) {
            tracing::warn!(response_id, "update already in flight");
            return Ok(SubmitOutcome::AlreadyPending);
        }

        let answers = active.store.snapshot(&active.survey, response_id);
        let result = self.api.update_answers(response_id, answers).await;
        self.gate.finish(response_id);

        match result {
            Ok(true) => {
                tracing::info!(response_id, "answer edits saved");
                Ok(SubmitOutcome::Submitted {
                    response_id: response_id.to_owned(),
                })
            }
            Ok(false) => Ok(SubmitOutcome::Rejected),
            Err(e) => Err(e),
        }
    }

    pub fn is_submission_pending(&self, response_id: &str) -> bool {
        self.gate.is_pending(response_id)
    }

    #[cfg(test)]
    fn gate_mut(&mut self) -> &mut SubmissionGate {
        &mut self.gate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
