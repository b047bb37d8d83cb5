//! Run results
//!
//! The aggregate output of a run: one recorded [`Outcome`] per executed
//! operation and lifecycle hook, keyed by name. Built incrementally while
//! the run progresses and returned wholesale on success.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::common::OpError;

/// Recorded result of one executed operation or hook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The call resolved with a value
    Value(Value),
    /// The call carried the expected-failure suffix and failed; the error
    /// itself is its recorded result
    ExpectedError(OpError),
}

impl Outcome {
    /// The resolved value, when the call succeeded
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::ExpectedError(_) => None,
        }
    }

    /// The captured error, when the call was an expected failure
    pub fn expected_error(&self) -> Option<&OpError> {
        match self {
            Self::Value(_) => None,
            Self::ExpectedError(err) => Some(err),
        }
    }
}

/// Mapping from executed name (hooks included) to its recorded outcome.
///
/// Key order is not guaranteed; per-iteration hooks (`beforeEach` /
/// `afterEach`) keep only their most recent result.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RunReport {
    outcomes: HashMap<String, Outcome>,
}

impl RunReport {
    pub(crate) fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        self.outcomes.insert(name.into(), outcome);
    }

    /// The outcome recorded under `name`
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.get(name)
    }

    /// Shortcut for the resolved value recorded under `name`
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Outcome::value)
    }

    /// Shortcut for the expected-failure error recorded under `name`
    pub fn expected_error(&self, name: &str) -> Option<&OpError> {
        self.get(name).and_then(Outcome::expected_error)
    }

    /// Names of everything that ran, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_distinguish_values_from_expected_errors() {
        let mut report = RunReport::default();
        report.record("a", Outcome::Value(json!(1)));
        report.record("bError", Outcome::ExpectedError(OpError::new("x")));

        assert_eq!(report.value("a"), Some(&json!(1)));
        assert_eq!(report.expected_error("a"), None);
        assert_eq!(report.expected_error("bError"), Some(&OpError::new("x")));
        assert_eq!(report.value("bError"), None);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn serializes_values_and_errors() {
        let mut report = RunReport::default();
        report.record("ok", Outcome::Value(json!({"n": 3})));
        report.record("failsError", Outcome::ExpectedError(OpError::with_code("x", "EFAIL")));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"]["ok"]["n"], 3);
        assert_eq!(json["outcomes"]["failsError"]["code"], "EFAIL");
    }
}
