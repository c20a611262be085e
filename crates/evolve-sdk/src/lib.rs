//! Evolve SDK - shared types for host builtins
//!
//! This crate provides the value, handle, error and registry types that the
//! Evolve builtin modules (`evolve-stdlib`, `evolve-stdlib-posix`) compile
//! against, without depending on the runtime that composes them.

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod handler;
pub mod handles;
pub mod value;

pub use error::{BuiltinError, BuiltinResult, ErrorKind};
pub use handler::{Arity, BuiltinDescriptor, BuiltinFn, BuiltinRegistry};
pub use handles::HandleRegistry;
pub use value::{Handle, HandleKind, Value};
