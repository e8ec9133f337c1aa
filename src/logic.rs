// Conditional survey flow: (question, selected option) -> next question.
// The graph is validated at construction; runtime lookups never loop.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::SurveyLogic;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LogicError {
    #[error("duplicate branching rule for question {question_id}, option {option_id}")]
    DuplicateRule { question_id: i64, option_id: i64 },

    #[error("logic entry {logic_id} belongs to survey {entry_survey_id}, not {survey_id}")]
    ForeignEntry {
        logic_id: i64,
        entry_survey_id: i64,
        survey_id: i64,
    },

    #[error("question {question_id} branches to itself")]
    SelfReference { question_id: i64 },

    #[error("branching rules form a cycle through question {question_id}")]
    Cycle { question_id: i64 },

    #[error("selected options on question {question_id} branch to different targets")]
    ConflictingTargets { question_id: i64 },
}

/// Branching rules for one survey, keyed by `(question_id, option_id)`.
#[derive(Debug, Default)]
pub struct SurveyLogicGraph {
    targets: HashMap<(i64, i64), i64>,
}

impl SurveyLogicGraph {
    /// Build and validate the graph. Rejected outright: entries from another
    /// survey, two rules for the same `(question, option)`, self-references,
    /// and rule sets whose branch edges form a cycle.
    pub fn new(survey_id: i64, entries: &[SurveyLogic]) -> Result<Self, LogicError> {
        let mut targets = HashMap::new();

        for entry in entries {
            if entry.survey_id != survey_id {
                return Err(LogicError::ForeignEntry {
                    logic_id: entry.logic_id,
                    entry_survey_id: entry.survey_id,
                    survey_id,
                });
            }
            if entry.target_question_id == entry.question_id {
                return Err(LogicError::SelfReference {
                    question_id: entry.question_id,
                });
            }
            let key = (entry.question_id, entry.option_id);
            if targets.insert(key, entry.target_question_id).is_some() {
                return Err(LogicError::DuplicateRule {
                    question_id: entry.question_id,
                    option_id: entry.option_id,
                });
            }
        }

        let graph = Self { targets };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// The configured target for a single selection, or `None` meaning
    /// "fall through to natural sequence order".
    pub fn next_question(&self, question_id: i64, option_id: i64) -> Option<i64> {
        self.targets.get(&(question_id, option_id)).copied()
    }

    /// The target for a multi-select answer. Policy: every selected option
    /// that has a rule must agree on the target; disagreeing rules are a
    /// configuration hazard surfaced as an error, never resolved by
    /// precedence.
    pub fn next_for_selection(
        &self,
        question_id: i64,
        selected: &BTreeSet<i64>,
    ) -> Result<Option<i64>, LogicError> {
        let mut resolved: Option<i64> = None;
        for option_id in selected {
            let Some(target) = self.next_question(question_id, *option_id) else {
                continue;
            };
            match resolved {
                None => resolved = Some(target),
                Some(previous) if previous != target => {
                    return Err(LogicError::ConflictingTargets { question_id });
                }
                Some(_) => {}
            }
        }
        Ok(resolved)
    }

    /// Depth-first search over the question -> target edge set. Options on
    /// the same question are collapsed into one node: any rule on a question
    /// contributes an outgoing edge.
    fn check_acyclic(&self) -> Result<(), LogicError> {
        let mut edges: HashMap<i64, Vec<i64>> = HashMap::new();
        for ((question_id, _), target) in &self.targets {
            edges.entry(*question_id).or_default().push(*target);
        }

        let mut done = HashSet::new();
        for start in edges.keys() {
            if done.contains(start) {
                continue;
            }
            let mut in_progress = HashSet::new();
            Self::visit(*start, &edges, &mut in_progress, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        question_id: i64,
        edges: &HashMap<i64, Vec<i64>>,
        in_progress: &mut HashSet<i64>,
        done: &mut HashSet<i64>,
    ) -> Result<(), LogicError> {
        if done.contains(&question_id) {
            return Ok(());
        }
        if !in_progress.insert(question_id) {
            return Err(LogicError::Cycle { question_id });
        }
        for target in edges.get(&question_id).into_iter().flatten() {
            Self::visit(*target, edges, in_progress, done)?;
        }
        in_progress.remove(&question_id);
        done.insert(question_id);
        Ok(())
    }
}
