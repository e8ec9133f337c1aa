// In-memory answers for one survey attempt. Owned by the active
// survey-taking or answer-review screen and discarded on navigation away.

use std::collections::HashMap;

use crate::answer::{from_wire, to_wire, NativeAnswer};
use crate::models::{Survey, WireAnswer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("question {0} does not belong to this survey")]
    UnknownQuestion(i64),
}

/// Current native-form answers keyed by question id. The key set is fixed at
/// construction from the survey; `set` never grows or silently drops keys.
#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: HashMap<i64, NativeAnswer>,
}

impl AnswerStore {
    /// An empty store for `survey`: every question present, unanswered.
    pub fn for_survey(survey: &Survey) -> Self {
        let answers = survey
            .questions
            .iter()
            .map(|q| (q.question_id, NativeAnswer::empty(q.question_type)))
            .collect();
        Self { answers }
    }

    /// Replace the value for a question. No type checking happens here (the
    /// screen only produces type-consistent values), but an unknown question
    /// id is an error, never a silent insert.
    pub fn set(&mut self, question_id: i64, value: NativeAnswer) -> Result<(), StoreError> {
        match self.answers.get_mut(&question_id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::UnknownQuestion(question_id)),
        }
    }

    pub fn get(&self, question_id: i64) -> Option<&NativeAnswer> {
        self.answers.get(&question_id)
    }

    /// Every question in survey display order as a wire record, unanswered
    /// ones included as empty/null — never omitted. This is the submission
    /// payload order.
    pub fn snapshot(&self, survey: &Survey, response_id: &str) -> Vec<WireAnswer> {
        survey
            .ordered_questions()
            .iter()
            .map(|q| {
                let native = self
                    .answers
                    .get(&q.question_id)
                    .cloned()
                    .unwrap_or_else(|| NativeAnswer::empty(q.question_type));
                to_wire(q, &native, response_id)
            })
            .collect()
    }

    /// Decode previously submitted answers for review/editing. Records for
    /// questions outside the survey are skipped with a warning.
    pub fn load(&mut self, survey: &Survey, wire_answers: &[WireAnswer]) {
        for wire in wire_answers {
            let Some(question) = survey.question(wire.question_id) else {
                tracing::warn!(
                    question_id = wire.question_id,
                    "skipping stored answer for a question not in this survey"
                );
                continue;
            };
            self.answers
                .insert(question.question_id, from_wire(question, wire));
        }
    }

    /// Ids of required questions that are unanswered, in survey display
    /// order. Does not mutate and does not gate `snapshot`; submission
    /// gating is the caller's decision.
    pub fn validate(&self, survey: &Survey) -> Vec<i64> {
        survey
            .ordered_questions()
            .iter()
            .filter(|q| q.is_required)
            .filter(|q| {
                self.answers
                    .get(&q.question_id)
                    .is_none_or(|a| !a.is_answered())
            })
            .map(|q| q.question_id)
            .collect()
    }

    /// Explicit wipe, used on submission success and on navigating away.
    pub fn clear(&mut self) {
        for value in self.answers.values_mut() {
            let empty = match value {
                NativeAnswer::SingleChoice(_) => NativeAnswer::SingleChoice(None),
                NativeAnswer::MultiChoice(_) => NativeAnswer::MultiChoice(Default::default()),
                NativeAnswer::Text(_) => NativeAnswer::Text(String::new()),
                NativeAnswer::Rating(_) => NativeAnswer::Rating(None),
            };
            *value = empty;
        }
    }
}
