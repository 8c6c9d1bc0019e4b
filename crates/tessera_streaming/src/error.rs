//! # Streaming Error Types
//!
//! All errors that can occur in the streaming layer. Conditions the
//! design defines as no-ops (double load, double unload, removing an
//! unknown viewer, empty queues) are deliberately *not* errors.

use thiserror::Error;

use tessera_procedural::GenError;

/// Errors that can occur configuring or driving the world generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A write-once setting was written after activation.
    #[error("cannot change {field} after initialization")]
    ConfigurationSealed {
        /// Which setting was touched.
        field: &'static str,
    },

    /// The generator was initialized twice.
    #[error("world generator is already initialized")]
    AlreadyInitialized,

    /// A streaming entry point was called before `initialize`.
    #[error("world generator is not initialized")]
    NotInitialized,

    /// A configuration value is out of range or unparseable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid generation parameters (e.g. an empty biome catalog).
    #[error(transparent)]
    Generation(#[from] GenError),
}

/// Result type for streaming operations.
pub type WorldResult<T> = Result<T, WorldError>;
