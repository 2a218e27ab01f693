//! # Core Error Types
//!
//! Only configuration-time failures are errors. Per-entity failures
//! (capacity exhaustion, stale ids) are `Option` returns on the store,
//! because they are expected and recovered locally by the caller.

use thiserror::Error;

/// Errors that can occur while configuring the dispatch core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// More distinct component types were registered than the signature
    /// word can represent. Raised at registration time so it can never
    /// surface mid-simulation.
    #[error("component type limit exceeded: the signature word holds {limit} bits")]
    SignatureOverflow {
        /// Width of the signature word in bits.
        limit: u32,
    },
}

/// Result type for core configuration operations.
pub type CoreResult<T> = Result<T, CoreError>;
