// Role-gated navigation rules. Pure functions over the session state; the
// shell performs the actual redirects.

use crate::names;
use crate::session::{Role, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Statistics,
    Responses,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => names::LOGIN_URL,
            Self::Dashboard => names::DASHBOARD_URL,
            Self::Statistics => names::STATISTICS_URL,
            Self::Responses => names::RESPONSES_URL,
        }
    }
}

/// Where a session lands after login, or when it hits a route it may not
/// enter. Total: every session has a default.
pub fn default_route(session: &SessionState) -> Route {
    match session.role() {
        Some(Role::Administrator) => Route::Statistics,
        Some(Role::ExistingRespondent) => Route::Responses,
        Some(Role::NewRespondent) => Route::Dashboard,
        None => Route::Login,
    }
}

/// Whether `session` may enter `route`. Callers redirect to Login on `false`
/// and redirect authenticated users away from Login to `default_route`; the
/// Login route itself always answers `false` here so that rule has a single
/// source of truth.
///
/// An existing respondent who has already answered may not re-enter the
/// survey-taking dashboard; review and editing happen on Responses.
pub fn can_access(session: &SessionState, has_prior_answers: bool, route: Route) -> bool {
    if !session.is_authenticated() {
        return false;
    }

    match session.role() {
        Some(Role::ExistingRespondent) => match route {
            Route::Responses => true,
            Route::Dashboard => !has_prior_answers,
            Route::Statistics | Route::Login => false,
        },
        Some(Role::NewRespondent) => route == Route::Dashboard,
        Some(Role::Administrator) => route == Route::Statistics,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> SessionState {
        SessionState::login("42", Role::ExistingRespondent)
    }

    fn new_respondent() -> SessionState {
        SessionState::login("43", Role::NewRespondent)
    }

    #[test]
    fn default_route_is_total() {
        assert_eq!(default_route(&SessionState::admin()), Route::Statistics);
        assert_eq!(default_route(&existing()), Route::Responses);
        assert_eq!(default_route(&new_respondent()), Route::Dashboard);
        assert_eq!(
            default_route(&SessionState::unauthenticated()),
            Route::Login
        );
    }

    #[test]
    fn route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
        assert_eq!(Route::Statistics.path(), "/statistics");
        assert_eq!(Route::Responses.path(), "/responses");
    }

    #[test]
    fn access_table_is_exact() {
        use Route::{Dashboard, Responses, Statistics};

        let unauthenticated = SessionState::unauthenticated();
        let admin = SessionState::admin();

        // (session, has_prior_answers, route, expected)
        let cases = [
            (&unauthenticated, false, Dashboard, false),
            (&unauthenticated, false, Statistics, false),
            (&unauthenticated, false, Responses, false),
            (&unauthenticated, true, Dashboard, false),
            (&unauthenticated, true, Statistics, false),
            (&unauthenticated, true, Responses, false),
        ];
        for (session, prior, route, expected) in cases {
            assert_eq!(can_access(session, prior, route), expected);
        }

        let existing = existing();
        let cases = [
            (false, Dashboard, true),
            (false, Statistics, false),
            (false, Responses, true),
            (true, Dashboard, false),
            (true, Statistics, false),
            (true, Responses, true),
        ];
        for (prior, route, expected) in cases {
            assert_eq!(
                can_access(&existing, prior, route),
                expected,
                "existing respondent, has_prior_answers={prior}, {route:?}"
            );
        }

        let new = new_respondent();
        for prior in [false, true] {
            assert!(can_access(&new, prior, Dashboard));
            assert!(!can_access(&new, prior, Statistics));
            assert!(!can_access(&new, prior, Responses));
        }

        for prior in [false, true] {
            assert!(can_access(&admin, prior, Statistics));
            assert!(!can_access(&admin, prior, Dashboard));
            assert!(!can_access(&admin, prior, Responses));
        }
    }

    #[test]
    fn login_route_is_never_entered_via_can_access() {
        for session in [
            SessionState::unauthenticated(),
            SessionState::admin(),
            existing(),
            new_respondent(),
        ] {
            assert!(!can_access(&session, false, Route::Login));
        }
    }
}
