//! Shared test harness modules for the Sojourn CLI.
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

use super::*;

mod compare_steps;
mod helpers;
