//! Error types for container mutation and configuration.
//!
//! None of these cross the pipeline's public entry points: converters absorb
//! `ContainerError` and drop the offending event.

use thiserror::Error;

use tessera_types::BlockId;

/// Errors from mutating a block container.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContainerError {
    /// Block not found in container.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// Block already present.
    #[error("block already exists: {0:?}")]
    DuplicateBlock(BlockId),

    /// Block exists but its content doesn't support the edit.
    #[error("operation not supported on {kind} block {id:?}")]
    UnsupportedContent { id: BlockId, kind: &'static str },
}

/// Errors from loading [`HandlerConfig`](crate::HandlerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}
