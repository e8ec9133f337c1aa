// Survey domain types shared across the crate.

use serde::{Deserialize, Serialize};

/// The five supported question shapes. The numeric `type_id` is the wire
/// discriminant and is stable: answers carry it, and decode dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    ShortText,
    LongText,
    Rating,
}

impl QuestionType {
    pub fn from_type_id(type_id: i64) -> Option<Self> {
        match type_id {
            1 => Some(Self::SingleChoice),
            2 => Some(Self::MultiChoice),
            3 => Some(Self::ShortText),
            4 => Some(Self::LongText),
            5 => Some(Self::Rating),
            _ => None,
        }
    }

    pub fn type_id(self) -> i64 {
        match self {
            Self::SingleChoice => 1,
            Self::MultiChoice => 2,
            Self::ShortText => 3,
            Self::LongText => 4,
            Self::Rating => 5,
        }
    }

    /// Choice-typed questions carry options; the other three never do.
    pub fn has_options(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

impl TryFrom<i64> for QuestionType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_type_id(value).ok_or_else(|| format!("unknown question type_id {value}"))
    }
}

impl From<QuestionType> for i64 {
    fn from(value: QuestionType) -> Self {
        value.type_id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub option_id: i64,
    pub option_text: String,
    pub sequence_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub question_text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type_id")]
    pub question_type: QuestionType,
    pub is_required: bool,
    pub sequence_number: i64,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Options in display order: stable sort by `sequence_number` ascending.
    /// Storage order is insertion order and must never be assumed sorted.
    pub fn ordered_options(&self) -> Vec<&QuestionOption> {
        let mut options: Vec<&QuestionOption> = self.options.iter().collect();
        options.sort_by_key(|o| o.sequence_number);
        options
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyListItem {
    pub survey_id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub survey_id: i64,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Survey {
    /// Questions in display order: stable sort by `sequence_number` ascending.
    pub fn ordered_questions(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.sequence_number);
        questions
    }

    pub fn question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }
}

/// The normalized answer record crossing the system boundary. Exactly one of
/// `option_id` (non-empty), `text_answer`, `numerical_answer` is meaningful
/// for a given `type_id`; the codec enforces this on every encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<i64>,
    pub response_id: String,
    pub question_id: i64,
    #[serde(default)]
    pub option_id: Vec<i64>,
    pub text_answer: Option<String>,
    pub numerical_answer: Option<String>,
    pub type_id: i64,
}

/// One branching rule: selecting `option_id` on `question_id` redirects the
/// flow to `target_question_id` instead of the natural sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyLogic {
    pub logic_id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub option_id: i64,
    pub target_question_id: i64,
}
