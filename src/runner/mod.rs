//! Suite execution
//!
//! The core of the crate: selects which operations of a [`Suite`] to run
//! (explicit letter-led launch tokens, else every registered operation) and
//! executes them strictly sequentially, each call fully awaited, wrapped in
//! the optional `before` / `beforeEach` / `afterEach` / `after` lifecycle
//! hooks.
//!
//! Failure policy: an operation whose name ends in
//! [`FAILURE_SUFFIX`](crate::suite::FAILURE_SUFFIX) records its error as its
//! result and the run continues. Any other operation error marks the run
//! failed — remaining operations are skipped, but the current iteration's
//! `afterEach` and the final `after` still execute before the aggregated
//! error is thrown. A hook that fails while the run is healthy aborts
//! immediately with its raw error; a hook that fails after the run is
//! already failed is only logged.

pub mod report;

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use serde_json::Value;

use crate::common::logging::{Level, Logger};
use crate::common::{Error, OpError, Result};
use crate::suite::{Suite, AFTER, AFTER_EACH, BEFORE, BEFORE_EACH, FAILURE_SUFFIX, LIFECYCLE_HOOKS};

use report::{Outcome, RunReport};

/// Entry executable names recognized as test runners
const TEST_RUNNER_NAMES: &[&str] = &["cargo-nextest", "nextest"];

/// Executes suites. Holds the two pieces of ambient context a run needs:
/// the leveled logger and the invocation tokens used for explicit operation
/// selection.
pub struct Runner {
    logger: Logger,
    argv: Vec<String>,
}

impl Runner {
    /// Build a runner with explicit context (tests inject both)
    pub fn new(logger: Logger, argv: Vec<String>) -> Self {
        Self { logger, argv }
    }

    /// Capture the process launch arguments and derive the logger from them
    pub fn from_env() -> Self {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        let logger = Logger::detect(std::env::var("NODE_ENV").ok().as_deref(), &argv);
        Self::new(logger, argv)
    }

    /// The logger this runner emits through
    pub fn logger(&self) -> Logger {
        self.logger
    }

    /// Run the suite and return the per-name result map.
    ///
    /// `excludes` names operations to skip, honored only when the full suite
    /// runs (explicit selection ignores it). `args` is forwarded identically
    /// to every invoked operation and hook.
    ///
    /// Returns [`Error::Aborted`] when an operation failed unexpectedly, or
    /// [`Error::Hook`] when a hook failed while the run was still healthy.
    pub async fn run(
        &self,
        suite: &Suite,
        excludes: &[&str],
        args: &[Value],
    ) -> Result<RunReport> {
        let (selected, explicit) = self.selection(suite);
        let arg_list = join_args(args);
        self.logger.info(format_args!(
            "Preparing execution of {}.{}",
            suite.name(),
            selected.join(&format!(", {}.", suite.name()))
        ));

        let mut report = RunReport::default();

        if let Some(hook) = suite.hook(BEFORE) {
            self.banner(&format!("Executing: {}.{BEFORE}({arg_list})", suite.name()));
            let value = hook(args.to_vec()).await.map_err(Error::Hook)?;
            report.record(BEFORE, Outcome::Value(value));
        }

        let mut failure: Option<(String, OpError)> = None;
        for name in &selected {
            let Some(op) = suite.get(name) else { continue };
            if LIFECYCLE_HOOKS.contains(&name.as_str())
                || (!explicit && excludes.contains(&name.as_str()))
            {
                continue;
            }

            if let Some(hook) = suite.hook(BEFORE_EACH) {
                self.banner(&format!(
                    "Executing: {}.{BEFORE_EACH}({arg_list})",
                    suite.name()
                ));
                let value = hook(args.to_vec()).await.map_err(Error::Hook)?;
                report.record(BEFORE_EACH, Outcome::Value(value));
            }

            self.banner(&format!(
                "Executing: await {}.{name}({arg_list})",
                suite.name()
            ));
            match op(args.to_vec()).await {
                Ok(value) => {
                    self.logger.info(format_args!(
                        "\nExecution complete for: await {}.{name}({arg_list})",
                        suite.name()
                    ));
                    report.record(name.clone(), Outcome::Value(value));
                }
                Err(err) if name.ends_with(FAILURE_SUFFIX) => {
                    self.logger.info(format_args!(
                        "\nExecution complete for: await {}.{name}({arg_list}) -> Expected error: \"{err}\"",
                        suite.name()
                    ));
                    report.record(name.clone(), Outcome::ExpectedError(err));
                }
                Err(err) => {
                    self.logger.error(&err);
                    failure = Some((
                        format!(
                            "Execution failed for: await {}.{name}({arg_list})",
                            suite.name()
                        ),
                        err,
                    ));
                }
            }

            if let Some(hook) = suite.hook(AFTER_EACH) {
                self.banner(&format!(
                    "Executing: {}.{AFTER_EACH}({arg_list})",
                    suite.name()
                ));
                match hook(args.to_vec()).await {
                    Ok(value) => report.record(AFTER_EACH, Outcome::Value(value)),
                    // The operation's error takes precedence over the hook's
                    Err(err) if failure.is_some() => self.logger.error(&err),
                    Err(err) => return Err(Error::Hook(err)),
                }
            }

            if failure.is_some() {
                break;
            }
        }

        if let Some(hook) = suite.hook(AFTER) {
            self.banner(&format!("Executing: {}.{AFTER}({arg_list})", suite.name()));
            match hook(args.to_vec()).await {
                Ok(value) => report.record(AFTER, Outcome::Value(value)),
                Err(err) if failure.is_some() => self.logger.error(&err),
                Err(err) => return Err(Error::Hook(err)),
            }
        }

        match failure {
            Some((cause, source)) => Err(Error::Aborted { cause, source }),
            None => Ok(report),
        }
    }

    /// Emit a single decorated header line at the given level.
    ///
    /// Silent no-op when the level is disabled; never fails.
    pub fn header(&self, msg: &str, level: Level) {
        self.logger.log(
            level,
            format_args!("\n{}", format!("---> {msg} <---").white().on_blue()),
        );
    }

    /// Timer helper: resolve with `val` after `delay_ms`, or fail with `val`
    /// coerced into an [`OpError`] when `reject` is set.
    pub async fn wait(
        delay_ms: u64,
        val: Option<Value>,
        reject: bool,
    ) -> std::result::Result<Value, OpError> {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if reject {
            Err(match val {
                Some(Value::String(message)) => OpError::new(message),
                Some(other) => OpError::new(other.to_string()),
                None => OpError::new("rejected"),
            })
        } else {
            Ok(val.unwrap_or(Value::Null))
        }
    }

    /// Whether the process entry file name matches a known test-runner
    /// executable
    pub fn using_test_runner() -> bool {
        std::env::args()
            .next()
            .is_some_and(|argv0| entry_is_test_runner(&argv0))
    }

    /// Explicit names from letter-led invocation tokens, else the suite's
    /// full insertion-ordered name list. The bool reports which mode won.
    fn selection(&self, suite: &Suite) -> (Vec<String>, bool) {
        let explicit: Vec<String> = self
            .argv
            .iter()
            .filter(|token| {
                token
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic())
            })
            .cloned()
            .collect();
        if explicit.is_empty() {
            (suite.names().map(str::to_string).collect(), false)
        } else {
            (explicit, true)
        }
    }

    fn banner(&self, text: &str) {
        self.logger.info(format_args!(
            "\n{}",
            format!("============>> {text} <<============").white().on_blue()
        ));
    }
}

fn entry_is_test_runner(argv0: &str) -> bool {
    Path::new(argv0)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|name| TEST_RUNNER_NAMES.contains(&name))
}

/// Render the forwarded argument list the way it appears in log and cause
/// strings
fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runner_with(argv: &[&str]) -> Runner {
        Runner::new(Logger::silent(), argv.iter().map(|s| s.to_string()).collect())
    }

    fn sample_suite() -> Suite {
        Suite::new("Sample")
            .op("fooTest", |_| async { Ok(json!(1)) })
            .op("barTest", |_| async { Ok(json!(2)) })
            .op(BEFORE, |_| async { Ok(Value::Null) })
    }

    #[test]
    fn letter_led_tokens_win_over_fallback() {
        let (selected, explicit) = runner_with(&["fooTest"]).selection(&sample_suite());
        assert!(explicit);
        assert_eq!(selected, ["fooTest"]);
    }

    #[test]
    fn flags_and_numbers_are_not_selections() {
        let (selected, explicit) =
            runner_with(&["-NODE_ENV=test", "42", "--verbose", ""]).selection(&sample_suite());
        assert!(!explicit);
        assert_eq!(selected, ["fooTest", "barTest", BEFORE]);
    }

    #[test]
    fn explicit_tokens_keep_their_order() {
        let (selected, _) = runner_with(&["barTest", "fooTest"]).selection(&sample_suite());
        assert_eq!(selected, ["barTest", "fooTest"]);
    }

    #[test]
    fn entry_name_matching() {
        assert!(entry_is_test_runner("/usr/local/bin/cargo-nextest"));
        assert!(entry_is_test_runner("nextest"));
        assert!(!entry_is_test_runner("/usr/bin/cargo"));
        assert!(!entry_is_test_runner(""));
    }

    #[test]
    fn join_args_renders_json() {
        assert_eq!(join_args(&[]), "");
        assert_eq!(join_args(&[json!(7), json!("x")]), "7,\"x\"");
    }
}
