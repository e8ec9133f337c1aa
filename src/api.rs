// Boundary traits for the remote backend. Transport is someone else's
// problem; the services only see these shapes.

use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Question, SurveyListItem, SurveyLogic, WireAnswer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReply {
    pub success: bool,
    /// Backend failure detail. The literal "Username already exists" is
    /// distinguished so the UI can offer a go-to-login affordance.
    #[serde(default)]
    pub error: Option<String>,
}

/// A survey definition as fetched for one selection: header, questions, and
/// the branching rules that apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDetail {
    pub survey: SurveyListItem,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub logic: Vec<SurveyLogic>,
}

// ---------------------------------------------------------------------------
// AuthApi trait (the credential check itself is an opaque remote call)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<LoginReply>> + Send;

    fn register(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<RegisterReply>> + Send;
}

// ---------------------------------------------------------------------------
// SurveyApi trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait SurveyApi: Send + Sync {
    fn list_surveys(&self) -> impl std::future::Future<Output = Result<Vec<SurveyListItem>>> + Send;

    fn get_survey(
        &self,
        survey_id: i64,
    ) -> impl std::future::Future<Output = Result<SurveyDetail>> + Send;

    fn get_respondent_answers(
        &self,
        response_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<WireAnswer>>> + Send;

    fn submit_answers(
        &self,
        survey_id: i64,
        response_id: &str,
        answers: Vec<WireAnswer>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn update_answers(
        &self,
        response_id: &str,
        answers: Vec<WireAnswer>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
