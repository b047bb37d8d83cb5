//! testrig - convention-driven async test-suite orchestration
//!
//! Runs a named collection of async operations (a [`Suite`]) either as a
//! whole or filtered down to operations named on the command line, wrapping
//! each call with the optional `before` / `beforeEach` / `afterEach` /
//! `after` lifecycle hooks and leveled console logging.
//!
//! Operations whose name ends in [`FAILURE_SUFFIX`] are expected to fail:
//! their error is recorded as their result instead of aborting the run. Any
//! other failure aborts the run after the surrounding hooks execute, and
//! surfaces as [`Error::Aborted`] carrying the original error as its source.

pub mod common;
pub mod failure;
pub mod runner;
pub mod suite;

pub use common::logging::{Level, Logger};
pub use common::{Error, OpError, Result};
pub use failure::{expect_failure, FailureExpectation, FailureFlags};
pub use runner::report::{Outcome, RunReport};
pub use runner::Runner;
pub use suite::{
    Suite, AFTER, AFTER_EACH, BEFORE, BEFORE_EACH, FAILURE_SUFFIX, LIFECYCLE_HOOKS,
};
