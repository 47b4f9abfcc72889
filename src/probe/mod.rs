//! Access to an external persistence store, as seen by the diagnostic endpoint.
//!
//! Nothing in the service reads or writes data through this interface. It only
//! answers "is a store wired in, is it initialized, what does it contain".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    #[cfg_attr(not(test), allow(dead_code))]
    Query(String),
}

pub trait PersistenceProbe: Send + Sync {
    /// Whether a persistence module is wired in at all
    fn is_installed(&self) -> bool {
        true
    }

    fn is_available(&self) -> bool;

    fn name(&self) -> Option<String> {
        None
    }

    fn list_collections(&self) -> Result<Vec<String>, ProbeError>;
}

/// Used when no backing store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProbe;

impl PersistenceProbe for NoopProbe {
    fn is_installed(&self) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        false
    }

    fn list_collections(&self) -> Result<Vec<String>, ProbeError> {
        Err(ProbeError::Unavailable("no persistence store configured".to_string()))
    }
}
