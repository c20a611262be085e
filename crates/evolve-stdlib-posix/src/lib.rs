//! Evolve POSIX Standard Library
//!
//! File handle builtins and whole-file helpers.
//!
//! All I/O is synchronous and blocking from the evaluator's point of view.

#![warn(missing_docs)]

pub mod fs;
pub mod registry;

pub use fs::{FileService, OpenMode};
pub use registry::{register_posix, FileHost};
