//! Evolve Standard Library
//!
//! Native implementations for the console, math and memory builtins.

#![warn(missing_docs)]

pub mod console;
pub mod math;
pub mod memory;
pub mod registry;

pub use memory::{MemoryLimits, MemoryService};
pub use registry::{register_stdlib, MemoryHost};
