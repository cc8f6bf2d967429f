//! Error types for quarto-deferred-config

use crate::invoke::FunctionRef;
use thiserror::Error;

/// Failure of a function invoked through the `FunctionTable`.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    #[error("Unknown function: {0}")]
    UnknownFunction(FunctionRef),

    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: FunctionRef,
        expected: usize,
        actual: usize,
    },

    /// The function rejected one of its arguments.
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// The function ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Fatal failure of a resolver's transform.
///
/// These are never caught by the walk or the populator: they abort the pass
/// and no configuration is written back.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Calling {function} failed: {source}")]
    Invoke {
        function: FunctionRef,
        #[source]
        source: InvokeError,
    },

    /// `transform` was called on a value its resolver does not recognize.
    #[error("Resolver '{resolver}' cannot transform unrecognized value {value}")]
    UnrecognizedShape { resolver: String, value: String },

    #[error("Resolver '{resolver}' failed: {message}")]
    Resolver { resolver: String, message: String },
}

impl ResolveError {
    /// Create an error from any resolver message.
    pub fn resolver(resolver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolver {
            resolver: resolver.into(),
            message: message.into(),
        }
    }
}

/// A record broke the key-value enumeration contract.
///
/// Recoverable: the walk logs it and leaves the record unchanged.
#[derive(Debug, Clone, Error)]
pub enum EnumerationError {
    #[error("Enumeration failed: {0}")]
    Failed(String),

    #[error("Entry {index} is not a key-value pair: {found}")]
    NotAPair { index: usize, found: String },
}

/// Errors loading configuration values from YAML.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("YAML parse error: {0}")]
    Scan(#[from] yaml_rust2::ScanError),

    #[error("Expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),

    #[error("Top-level keys must be strings, found {0}")]
    NonStringKey(String),

    #[error("Unsupported YAML node: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
