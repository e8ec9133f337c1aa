//! Core of a multi-type survey system: the role-gated navigation rules, the
//! typed question/answer model with its normalized wire format, and the
//! conditional branching logic that redirects survey flow based on selected
//! options.
//!
//! Transport, persistence, and rendering live behind the [`api`] traits; an
//! application shell owns a [`session::SessionState`] and drives the
//! [`services`] with it.

pub mod access;
pub mod answer;
pub mod api;
pub mod logic;
pub mod models;
pub mod names;
pub mod services;
pub mod session;
pub mod store;
