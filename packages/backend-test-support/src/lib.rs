//! Shared helpers for `crease` unit and integration tests.

pub mod logging;
pub mod problem_details;
