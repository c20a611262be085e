//! Error types for host builtins
//!
//! Every builtin returns either a value or exactly one of these errors.
//! Nothing in the bridge terminates the process or hands back a null-like
//! placeholder in place of a real result.

use crate::handler::Arity;
use crate::value::Handle;
use std::io;

/// Result type for builtin calls
pub type BuiltinResult<T> = Result<T, BuiltinError>;

/// Builtin failure reported to the evaluator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuiltinError {
    /// Handle is unknown, already released, or of the wrong kind
    #[error("invalid handle {handle}: {reason}")]
    InvalidHandle {
        /// The offending handle
        handle: Handle,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Allocation could not be satisfied
    #[error("out of memory: cannot allocate {requested} bytes ({reason})")]
    OutOfMemory {
        /// Requested size in bytes
        requested: u64,
        /// Which limit was hit
        reason: String,
    },

    /// Path does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// OS refused access
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other I/O failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// Math function evaluated outside its domain
    #[error("domain error: {function}({args}) is undefined")]
    DomainError {
        /// Function name
        function: String,
        /// Rendered arguments
        args: String,
    },

    /// No builtin with this name is registered
    #[error("unknown builtin '{0}'")]
    UnknownBuiltin(String),

    /// Wrong number of arguments
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Builtin name
        name: String,
        /// Declared arity
        expected: Arity,
        /// Supplied argument count
        got: usize,
    },

    /// Argument has the wrong type or an unusable value
    #[error("{name}: {message}")]
    InvalidArgument {
        /// Builtin name
        name: String,
        /// What was wrong
        message: String,
    },

    /// Mediated memory access outside the allocation
    #[error("out of bounds: {handle} has {size} bytes, access at {offset}..{offset}+{len}")]
    OutOfBounds {
        /// The allocation
        handle: Handle,
        /// Requested start offset
        offset: u64,
        /// Requested length
        len: u64,
        /// Allocation size
        size: u64,
    },
}

/// Fieldless discriminant of [`BuiltinError`], for matching and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`BuiltinError::InvalidHandle`]
    InvalidHandle,
    /// See [`BuiltinError::OutOfMemory`]
    OutOfMemory,
    /// See [`BuiltinError::NotFound`]
    NotFound,
    /// See [`BuiltinError::PermissionDenied`]
    PermissionDenied,
    /// See [`BuiltinError::IoError`]
    IoError,
    /// See [`BuiltinError::DomainError`]
    DomainError,
    /// See [`BuiltinError::UnknownBuiltin`]
    UnknownBuiltin,
    /// See [`BuiltinError::ArityMismatch`]
    ArityMismatch,
    /// See [`BuiltinError::InvalidArgument`]
    InvalidArgument,
    /// See [`BuiltinError::OutOfBounds`]
    OutOfBounds,
}

impl BuiltinError {
    /// Discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuiltinError::InvalidHandle { .. } => ErrorKind::InvalidHandle,
            BuiltinError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            BuiltinError::NotFound(_) => ErrorKind::NotFound,
            BuiltinError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            BuiltinError::IoError(_) => ErrorKind::IoError,
            BuiltinError::DomainError { .. } => ErrorKind::DomainError,
            BuiltinError::UnknownBuiltin(_) => ErrorKind::UnknownBuiltin,
            BuiltinError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            BuiltinError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            BuiltinError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
        }
    }

    /// Build an `InvalidArgument` error
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        BuiltinError::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Map an OS error onto the builtin taxonomy, prefixing `context`
    /// (usually the path) to the message.
    pub fn from_io(context: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => BuiltinError::NotFound(context.to_string()),
            io::ErrorKind::PermissionDenied => BuiltinError::PermissionDenied(context.to_string()),
            _ => BuiltinError::IoError(format!("{}: {}", context, err)),
        }
    }
}
