//! # ENGINE ERRORS

use schema_constraint::{ConfigError, RouteError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Domain error type for the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Constraint options were rejected at registration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A route pattern, method or schema declaration was rejected.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// The server was started twice.
    #[error("server already running")]
    AlreadyRunning,
    /// Binding or runtime setup failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A route handler panicked.
    #[error("handler panicked: {0}")]
    HandlerPanic(String),
}

/// Translate handler panics into [`EngineError::HandlerPanic`].
pub fn catch_unwind_handler<F, R>(f: F) -> Result<R, EngineError>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "rust panic".to_string());
        EngineError::HandlerPanic(message)
    })
}
