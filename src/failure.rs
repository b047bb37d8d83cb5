//! Expected-failure bridge
//!
//! Adapts a test body to an external "failure flag" convention: the caller
//! names the kinds of captured failures it expects (unhandled rejection,
//! uncaught exception, ...), the external mechanism later delivers the
//! captured error through [`FailureFlags::trigger`], and the registered
//! handler checks the error against the expectation before resolving the
//! pending receiver. A thin bridge, not core logic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::common::logging::{Level, Logger};
use crate::common::{Error, OpError, Result};

/// What a captured failure is expected to look like
#[derive(Debug, Default, Clone)]
pub struct FailureExpectation {
    /// Label prefixed to assertion messages
    pub label: Option<String>,
    /// Expected machine-readable error code, when any
    pub code: Option<String>,
}

type Handler = Arc<dyn Fn(&OpError) + Send + Sync>;

/// Registry of named failure handlers — the delivery side of the bridge.
///
/// The external mechanism that captured an error calls
/// [`trigger`](Self::trigger) with the kind it was registered under.
#[derive(Default)]
pub struct FailureFlags {
    handlers: HashMap<String, Handler>,
}

impl FailureFlags {
    /// Register (or replace) the handler for a failure kind
    pub fn set(&mut self, kind: impl Into<String>, handler: Handler) {
        self.handlers.insert(kind.into(), handler);
    }

    /// Whether a handler is registered for `kind`
    pub fn is_registered(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Deliver a captured error to the handler registered under `kind`.
    /// Returns false when nothing is registered for it.
    pub fn trigger(&self, kind: &str, err: &OpError) -> bool {
        match self.handlers.get(kind) {
            Some(handler) => {
                handler(err);
                true
            }
            None => false,
        }
    }
}

/// Build an adapter for a test body that expects a captured failure.
///
/// Validates its inputs up front (fatal [`Error::FailureSpec`] on malformed
/// kinds or an empty expected code). The returned closure, when invoked by
/// the external flag mechanism with its [`FailureFlags`] registry, registers
/// one handler per kind and then invokes `func` synchronously. The receiver
/// it hands back resolves once any handler fires: `Ok(())` when the captured
/// error matched the expectation, the assertion failure otherwise.
pub fn expect_failure<F>(
    kinds: &[&str],
    expectation: FailureExpectation,
    logger: Logger,
    func: F,
) -> Result<impl FnOnce(&mut FailureFlags) -> oneshot::Receiver<std::result::Result<(), OpError>>>
where
    F: FnOnce(),
{
    if kinds.is_empty() {
        return Err(Error::FailureSpec(
            "at least one failure kind is required".to_string(),
        ));
    }
    if kinds.iter().any(|kind| kind.is_empty()) {
        return Err(Error::FailureSpec(
            "failure kinds must be non-empty names".to_string(),
        ));
    }
    if expectation.code.as_deref() == Some("") {
        return Err(Error::FailureSpec(
            "an expected code must be a non-empty string".to_string(),
        ));
    }

    let kinds: Vec<String> = kinds.iter().map(|kind| kind.to_string()).collect();
    Ok(move |flags: &mut FailureFlags| {
        let (tx, rx) = oneshot::channel();
        // One sender shared by every kind; first trigger wins
        let tx = Arc::new(Mutex::new(Some(tx)));
        for kind in &kinds {
            let tx = Arc::clone(&tx);
            let expectation = expectation.clone();
            let handler: Handler = Arc::new(move |err: &OpError| {
                log_receipt(&logger, err);
                let verdict = check(&expectation, err);
                if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
                    let _ = tx.send(verdict);
                }
            });
            flags.set(kind.clone(), handler);
        }
        func();
        rx
    })
}

fn log_receipt(logger: &Logger, err: &OpError) {
    let line = match &err.code {
        Some(code) => format!("Expected error message received for (code {code}): {err}"),
        None => format!("Expected error message received for: {err}"),
    };
    if logger.enabled(Level::Debug) {
        logger.debug(line);
    } else {
        logger.info(line);
    }
}

fn check(
    expectation: &FailureExpectation,
    err: &OpError,
) -> std::result::Result<(), OpError> {
    if let Some(code) = &expectation.code {
        if err.code.as_deref() != Some(code.as_str()) {
            let label = expectation.label.as_deref().unwrap_or("");
            return Err(OpError::new(format!(
                "{label} error.code: expected \"{code}\", found {:?}",
                err.code
            )));
        }
    }
    Ok(())
}
