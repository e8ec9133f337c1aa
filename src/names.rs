pub const LOGIN_URL: &str = "/login";
pub const DASHBOARD_URL: &str = "/dashboard";
pub const STATISTICS_URL: &str = "/statistics";
pub const RESPONSES_URL: &str = "/responses";

/// Fixed sentinel username that maps to the Administrator role without a
/// network round-trip.
pub const ADMIN_USERNAME: &str = "admin";

// Rating scale bounds. Half-star steps, matching the star widget the
// ratings are collected with.
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;
pub const RATING_STEP: f64 = 0.5;
