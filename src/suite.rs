//! The operation collection executed by the runner
//!
//! A [`Suite`] is a named, insertion-ordered mapping from operation name to a
//! boxed async callable. The four lifecycle hook names are stored like any
//! other entry but are never part of the executable operation set; the
//! runner looks them up explicitly.

use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::common::OpError;

/// Hook invoked once before any operation runs
pub const BEFORE: &str = "before";
/// Hook invoked before every operation
pub const BEFORE_EACH: &str = "beforeEach";
/// Hook invoked once after the last operation (even on failure)
pub const AFTER: &str = "after";
/// Hook invoked after every operation (even on failure)
pub const AFTER_EACH: &str = "afterEach";

/// The reserved lifecycle hook names, excluded from operation selection
pub const LIFECYCLE_HOOKS: [&str; 4] = [BEFORE, BEFORE_EACH, AFTER, AFTER_EACH];

/// Operations whose name ends with this suffix are expected to fail: their
/// error becomes their recorded result instead of aborting the run.
///
/// The convention is deliberate but fragile — an operation that happens to
/// end in the suffix without meaning to fail silently changes the run's
/// failure semantics. Name operations accordingly.
pub const FAILURE_SUFFIX: &str = "Error";

/// A boxed async operation: receives the forwarded argument list, resolves
/// to a value or fails with an [`OpError`].
pub type OpFn = Box<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value, OpError>> + Send + Sync>;

/// A named, insertion-ordered collection of operations and lifecycle hooks.
///
/// The runner never mutates a suite; all run state lives in the run itself.
pub struct Suite {
    name: String,
    entries: Vec<(String, OpFn)>,
}

impl Suite {
    /// Create an empty suite. The name shows up in log lines and in the
    /// cause string of an aborted run.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Register a named operation or lifecycle hook.
    ///
    /// Registering an existing name replaces the callable in place, keeping
    /// its original position in the iteration order.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, OpError>> + Send + 'static,
    {
        let name = name.into();
        let op: OpFn = Box::new(move |args| Box::pin(f(args)));
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = op;
        } else {
            self.entries.push((name, op));
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn op<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, OpError>> + Send + 'static,
    {
        self.register(name, f);
        self
    }

    /// The suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every registered name in insertion order, lifecycle hooks included
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a callable by name
    pub fn get(&self, name: &str) -> Option<&OpFn> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, op)| op)
    }

    /// Look up one of the reserved lifecycle hooks
    pub fn hook(&self, name: &str) -> Option<&OpFn> {
        debug_assert!(LIFECYCLE_HOOKS.contains(&name));
        self.get(name)
    }

    /// Number of registered entries (hooks included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("entries", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_preserve_insertion_order() {
        let suite = Suite::new("T")
            .op("zeta", |_| async { Ok(json!(1)) })
            .op("alpha", |_| async { Ok(json!(2)) })
            .op("mid", |_| async { Ok(json!(3)) });
        let names: Vec<&str> = suite.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn reregistering_replaces_in_place() {
        let mut suite = Suite::new("T");
        suite.register("a", |_| async { Ok(json!("old")) });
        suite.register("b", |_| async { Ok(json!("b")) });
        suite.register("a", |_| async { Ok(json!("new")) });

        let names: Vec<&str> = suite.names().collect();
        assert_eq!(names, ["a", "b"]);

        let result = suite.get("a").unwrap()(Vec::new()).await.unwrap();
        assert_eq!(result, json!("new"));
    }

    #[test]
    fn missing_names_are_absent() {
        let suite = Suite::new("T");
        assert!(suite.get("nope").is_none());
        assert!(suite.is_empty());
    }
}
