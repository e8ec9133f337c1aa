// Conversion between per-type native answer values and the normalized wire
// record. The nullable-triplet wire shape exists only at this boundary; the
// rest of the crate works with `NativeAnswer`.

use std::collections::BTreeSet;

use crate::models::{Question, QuestionType, WireAnswer};
use crate::names;

/// A star rating in [0, 5], half-star steps. Stored in half-steps so the
/// value is exactly representable and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: f64) -> Option<Self> {
        if !(names::RATING_MIN..=names::RATING_MAX).contains(&value) {
            return None;
        }
        let half_steps = value / names::RATING_STEP;
        if half_steps.fract() != 0.0 {
            return None;
        }
        Some(Self(half_steps as u8))
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) * names::RATING_STEP
    }

    /// The decimal string carried in `numerical_answer`: whole ratings print
    /// without a fraction ("4"), half ratings with one ("3.5").
    fn to_wire_string(self) -> String {
        if self.0 % 2 == 0 {
            format!("{}", self.0 / 2)
        } else {
            format!("{:.1}", self.value())
        }
    }

    fn parse(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok().and_then(Self::new)
    }
}

/// The in-memory answer value for one question, discriminated to match the
/// owning question's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeAnswer {
    SingleChoice(Option<i64>),
    MultiChoice(BTreeSet<i64>),
    Text(String),
    Rating(Option<Rating>),
}

impl NativeAnswer {
    /// The unanswered value for a question of the given type.
    pub fn empty(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::SingleChoice => Self::SingleChoice(None),
            QuestionType::MultiChoice => Self::MultiChoice(BTreeSet::new()),
            QuestionType::ShortText | QuestionType::LongText => Self::Text(String::new()),
            QuestionType::Rating => Self::Rating(None),
        }
    }

    /// Empty string, empty set, no selection, and no rating all count as
    /// unanswered for required-ness validation.
    pub fn is_answered(&self) -> bool {
        match self {
            Self::SingleChoice(selected) => selected.is_some(),
            Self::MultiChoice(selected) => !selected.is_empty(),
            Self::Text(text) => !text.is_empty(),
            Self::Rating(rating) => rating.is_some(),
        }
    }
}

/// Encode a native value into the wire record. Total: an unanswered value
/// encodes as empty/null and is caught by required-ness validation, never
/// here. A native value whose variant does not match the question's type is
/// encoded as unanswered, mirroring the decode side's defensive default.
pub fn to_wire(question: &Question, native: &NativeAnswer, response_id: &str) -> WireAnswer {
    let mut wire = WireAnswer {
        answer_id: None,
        response_id: response_id.to_owned(),
        question_id: question.question_id,
        option_id: vec![],
        text_answer: None,
        numerical_answer: None,
        type_id: question.question_type.type_id(),
    };

    match (question.question_type, native) {
        (QuestionType::SingleChoice, NativeAnswer::SingleChoice(selected)) => {
            wire.option_id = selected.iter().copied().collect();
        }
        (QuestionType::MultiChoice, NativeAnswer::MultiChoice(selected)) => {
            wire.option_id = ordered_selection(question, selected);
        }
        (QuestionType::ShortText | QuestionType::LongText, NativeAnswer::Text(text)) => {
            wire.text_answer = Some(text.clone());
        }
        (QuestionType::Rating, NativeAnswer::Rating(rating)) => {
            wire.numerical_answer = rating.map(Rating::to_wire_string);
        }
        (expected, got) => {
            tracing::warn!(
                question_id = question.question_id,
                ?expected,
                ?got,
                "native answer variant does not match question type; encoding as unanswered"
            );
            if matches!(
                expected,
                QuestionType::ShortText | QuestionType::LongText
            ) {
                wire.text_answer = Some(String::new());
            }
        }
    }

    wire
}

/// Selected option ids in the question's display order. Ids not among the
/// question's options are kept rather than dropped, appended in ascending
/// order after the known ones.
fn ordered_selection(question: &Question, selected: &BTreeSet<i64>) -> Vec<i64> {
    let mut ordered: Vec<i64> = question
        .ordered_options()
        .iter()
        .map(|o| o.option_id)
        .filter(|id| selected.contains(id))
        .collect();
    for id in selected {
        if !ordered.contains(id) {
            ordered.push(*id);
        }
    }
    ordered
}

/// Decode a wire record back to the native value, dispatching on the owning
/// question's type. A populated field that does not belong to the type is
/// treated as absent rather than rejected; so is an unparseable rating.
/// Masking upstream integrity bugs this way is deliberate and pinned by
/// tests.
pub fn from_wire(question: &Question, wire: &WireAnswer) -> NativeAnswer {
    if wire.type_id != question.question_type.type_id() {
        tracing::warn!(
            question_id = question.question_id,
            wire_type_id = wire.type_id,
            question_type_id = question.question_type.type_id(),
            "wire answer type_id disagrees with question; decoding by question type"
        );
    }

    match question.question_type {
        QuestionType::SingleChoice => NativeAnswer::SingleChoice(wire.option_id.first().copied()),
        QuestionType::MultiChoice => {
            NativeAnswer::MultiChoice(wire.option_id.iter().copied().collect())
        }
        QuestionType::ShortText | QuestionType::LongText => {
            NativeAnswer::Text(wire.text_answer.clone().unwrap_or_default())
        }
        QuestionType::Rating => NativeAnswer::Rating(
            wire.numerical_answer
                .as_deref()
                .and_then(Rating::parse),
        ),
    }
}
