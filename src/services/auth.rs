use color_eyre::Result;

use crate::api::AuthApi;
use crate::names;
use crate::session::{Role, SessionState};

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Sentinel administrator login; resolved locally, no network call.
    Admin(SessionState),
    /// Login succeeded; the respondent has credentials on the backend.
    Success {
        session: SessionState,
        user_id: String,
    },
    /// Username failed the local format rule; nothing was sent.
    InvalidUsername,
    /// Backend rejected the credentials.
    InvalidCredentials,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Registration succeeded and the session is live as a new respondent.
    Registered(SessionState),
    /// Username failed the local format rule; nothing was sent.
    InvalidUsername,
    /// The sentinel name cannot be registered; rejected locally.
    AdminReserved,
    /// The username is taken. Distinguished so the UI can offer "go to
    /// login" instead of a generic failure.
    UsernameTaken,
    /// Any other backend refusal, with its message.
    Rejected(String),
}

const USERNAME_TAKEN_ERROR: &str = "Username already exists";

/// The local username rule, enforced before any remote call: the literal
/// sentinel, or digits only.
pub fn validate_username(username: &str) -> bool {
    if username == names::ADMIN_USERNAME {
        return true;
    }
    !username.is_empty() && username.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<A: AuthApi> {
    api: A,
}

impl<A: AuthApi> AuthService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        if !validate_username(username) {
            tracing::warn!("rejected login attempt with malformed username");
            return Ok(LoginOutcome::InvalidUsername);
        }

        if username == names::ADMIN_USERNAME {
            tracing::info!("administrator login via sentinel username");
            return Ok(LoginOutcome::Admin(SessionState::admin()));
        }

        let reply = self.api.login(username, password).await?;

        if !reply.success {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let user_id = reply.user_id.unwrap_or_else(|| username.to_owned());
        tracing::info!(username, "respondent logged in");

        Ok(LoginOutcome::Success {
            session: SessionState::login(username, Role::ExistingRespondent),
            user_id,
        })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome> {
        if username == names::ADMIN_USERNAME {
            tracing::warn!("rejected attempt to register the sentinel username");
            return Ok(RegisterOutcome::AdminReserved);
        }

        if !validate_username(username) {
            tracing::warn!("rejected registration with malformed username");
            return Ok(RegisterOutcome::InvalidUsername);
        }

        let reply = self.api.register(username, password).await?;

        if reply.success {
            tracing::info!(username, "respondent registered");
            return Ok(RegisterOutcome::Registered(SessionState::login(
                username,
                Role::NewRespondent,
            )));
        }

        match reply.error.as_deref() {
            Some(USERNAME_TAKEN_ERROR) => Ok(RegisterOutcome::UsernameTaken),
            Some(message) => Ok(RegisterOutcome::Rejected(message.to_owned())),
            None => Ok(RegisterOutcome::Rejected("Registration failed".to_owned())),
        }
    }

    /// Logout is purely local: the session is replaced with the empty state.
    pub fn logout(&self, session: &mut SessionState) {
        tracing::info!(id = session.id(), "logging out");
        session.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::{LoginReply, MockAuthApi, RegisterReply};

    #[test]
    fn username_rule_accepts_digits_and_the_sentinel() {
        assert!(validate_username("admin"));
        assert!(validate_username("42"));
        assert!(validate_username("0070"));
        assert!(!validate_username(""));
        assert!(!validate_username("alice"));
        assert!(!validate_username("42a"));
        assert!(!validate_username("4 2"));
        assert!(!validate_username("Admin"));
    }

    #[tokio::test]
    async fn login_with_malformed_username_never_hits_the_network() {
        // no expectations set: any api call would panic the mock
        let svc = AuthService::new(MockAuthApi::new());
        let outcome = svc.login("alice", "password").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidUsername);
    }

    #[tokio::test]
    async fn admin_login_is_resolved_locally() {
        let svc = AuthService::new(MockAuthApi::new());
        let outcome = svc.login("admin", "anything").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Admin(SessionState::admin()));
    }

    #[tokio::test]
    async fn numeric_login_success_creates_an_existing_respondent_session() {
        let mut mock = MockAuthApi::new();
        mock.expect_login().returning(|_, _| {
            Box::pin(async {
                Ok(LoginReply {
                    success: true,
                    user_id: Some("7".to_owned()),
                })
            })
        });

        let svc = AuthService::new(mock);
        let outcome = svc.login("42", "password").await.unwrap();

        assert_eq!(
            outcome,
            LoginOutcome::Success {
                session: SessionState::login("42", Role::ExistingRespondent),
                user_id: "7".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn rejected_credentials_return_invalid_credentials() {
        let mut mock = MockAuthApi::new();
        mock.expect_login().returning(|_, _| {
            Box::pin(async {
                Ok(LoginReply {
                    success: false,
                    user_id: None,
                })
            })
        });

        let svc = AuthService::new(mock);
        let outcome = svc.login("42", "wrong").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn registering_the_sentinel_username_is_rejected_locally() {
        let svc = AuthService::new(MockAuthApi::new());
        let outcome = svc.register("admin", "password").await.unwrap();
        assert_eq!(outcome, RegisterOutcome::AdminReserved);
    }

    #[tokio::test]
    async fn register_success_creates_a_new_respondent_session() {
        let mut mock = MockAuthApi::new();
        mock.expect_register().returning(|_, _| {
            Box::pin(async {
                Ok(RegisterReply {
                    success: true,
                    error: None,
                })
            })
        });

        let svc = AuthService::new(mock);
        let outcome = svc.register("42", "password").await.unwrap();
        assert_eq!(
            outcome,
            RegisterOutcome::Registered(SessionState::login("42", Role::NewRespondent))
        );
    }

    #[tokio::test]
    async fn taken_username_is_distinguished_from_other_failures() {
        let mut mock = MockAuthApi::new();
        mock.expect_register().returning(|_, _| {
            Box::pin(async {
                Ok(RegisterReply {
                    success: false,
                    error: Some("Username already exists".to_owned()),
                })
            })
        });

        let svc = AuthService::new(mock);
        let outcome = svc.register("42", "password").await.unwrap();
        assert_eq!(outcome, RegisterOutcome::UsernameTaken);
    }

    #[tokio::test]
    async fn other_backend_refusals_carry_their_message() {
        let mut mock = MockAuthApi::new();
        mock.expect_register().returning(|_, _| {
            Box::pin(async {
                Ok(RegisterReply {
                    success: false,
                    error: Some("maintenance window".to_owned()),
                })
            })
        });

        let svc = AuthService::new(mock);
        let outcome = svc.register("42", "password").await.unwrap();
        assert_eq!(
            outcome,
            RegisterOutcome::Rejected("maintenance window".to_owned())
        );
    }

    #[tokio::test]
    async fn logout_clears_the_session_whole() {
        let svc = AuthService::new(MockAuthApi::new());
        let mut session = SessionState::login("42", Role::ExistingRespondent);
        svc.logout(&mut session);
        assert_eq!(session, SessionState::unauthenticated());
    }
}
