// In-memory backend fakes shared by the end-to-end flow tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use color_eyre::Result;
use surveycore::api::{AuthApi, LoginReply, RegisterReply, SurveyApi, SurveyDetail};
use surveycore::models::{
    Question, QuestionOption, QuestionType, SurveyListItem, SurveyLogic, WireAnswer,
};

/// Credential backend: remembers registered usernames, accepts any password
/// for a registered user.
#[derive(Default, Clone)]
pub struct FakeAuthBackend {
    registered: Arc<Mutex<HashSet<String>>>,
}

impl FakeAuthBackend {
    pub fn with_user(username: &str) -> Self {
        let backend = Self::default();
        backend
            .registered
            .lock()
            .expect("lock")
            .insert(username.to_owned());
        backend
    }
}

impl AuthApi for FakeAuthBackend {
    fn login(
        &self,
        username: &str,
        _password: &str,
    ) -> impl Future<Output = Result<LoginReply>> + Send {
        let known = self.registered.lock().expect("lock").contains(username);
        let user_id = username.to_owned();
        async move {
            Ok(LoginReply {
                success: known,
                user_id: known.then_some(user_id),
            })
        }
    }

    fn register(
        &self,
        username: &str,
        _password: &str,
    ) -> impl Future<Output = Result<RegisterReply>> + Send {
        let fresh = self.registered.lock().expect("lock").insert(username.to_owned());
        async move {
            if fresh {
                Ok(RegisterReply {
                    success: true,
                    error: None,
                })
            } else {
                Ok(RegisterReply {
                    success: false,
                    error: Some("Username already exists".to_owned()),
                })
            }
        }
    }
}

/// Survey backend holding one survey definition and submitted responses.
#[derive(Default, Clone)]
pub struct FakeSurveyBackend {
    responses: Arc<Mutex<HashMap<String, Vec<WireAnswer>>>>,
}

impl FakeSurveyBackend {
    /// The answers a submission stored, if any.
    pub fn answers_for(&self, response_id: &str) -> Option<Vec<WireAnswer>> {
        self.responses.lock().expect("lock").get(response_id).cloned()
    }

    pub fn survey_detail() -> SurveyDetail {
        SurveyDetail {
            survey: SurveyListItem {
                survey_id: 1,
                title: "course feedback".to_owned(),
                description: "three quick questions".to_owned(),
            },
            questions: vec![
                Question {
                    question_id: 10,
                    question_text: "which sessions did you attend".to_owned(),
                    description: None,
                    question_type: QuestionType::MultiChoice,
                    is_required: false,
                    sequence_number: 1,
                    options: vec![
                        QuestionOption {
                            option_id: 101,
                            option_text: "morning".to_owned(),
                            sequence_number: 1,
                        },
                        QuestionOption {
                            option_id: 102,
                            option_text: "afternoon".to_owned(),
                            sequence_number: 2,
                        },
                    ],
                },
                Question {
                    question_id: 11,
                    question_text: "overall rating".to_owned(),
                    description: None,
                    question_type: QuestionType::Rating,
                    is_required: true,
                    sequence_number: 2,
                    options: vec![],
                },
                Question {
                    question_id: 12,
                    question_text: "comments".to_owned(),
                    description: None,
                    question_type: QuestionType::LongText,
                    is_required: false,
                    sequence_number: 3,
                    options: vec![],
                },
            ],
            logic: vec![SurveyLogic {
                logic_id: 1,
                survey_id: 1,
                question_id: 10,
                option_id: 102,
                target_question_id: 12,
            }],
        }
    }
}

impl SurveyApi for FakeSurveyBackend {
    fn list_surveys(&self) -> impl Future<Output = Result<Vec<SurveyListItem>>> + Send {
        async move { Ok(vec![Self::survey_detail().survey]) }
    }

    fn get_survey(&self, _survey_id: i64) -> impl Future<Output = Result<SurveyDetail>> + Send {
        async move { Ok(Self::survey_detail()) }
    }

    fn get_respondent_answers(
        &self,
        response_id: &str,
    ) -> impl Future<Output = Result<Vec<WireAnswer>>> + Send {
        let answers = self
            .responses
            .lock()
            .expect("lock")
            .get(response_id)
            .cloned()
            .unwrap_or_default();
        async move { Ok(answers) }
    }

    fn submit_answers(
        &self,
        _survey_id: i64,
        response_id: &str,
        answers: Vec<WireAnswer>,
    ) -> impl Future<Output = Result<bool>> + Send {
        self.responses
            .lock()
            .expect("lock")
            .insert(response_id.to_owned(), answers);
        async move { Ok(true) }
    }

    fn update_answers(
        &self,
        response_id: &str,
        answers: Vec<WireAnswer>,
    ) -> impl Future<Output = Result<bool>> + Send {
        let known = {
            let mut responses = self.responses.lock().expect("lock");
            match responses.get_mut(response_id) {
                Some(stored) => {
                    *stored = answers;
                    true
                }
                None => false,
            }
        };
        async move { Ok(known) }
    }
}
