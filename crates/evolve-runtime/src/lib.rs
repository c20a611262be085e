//! Evolve Runtime
//!
//! Binds the builtin registry with the standard library services.
//!
//! # Example
//!
//! ```rust,ignore
//! use evolve_runtime::{Host, HostConfig, Value};
//!
//! let config = HostConfig::default();
//! evolve_runtime::logging::init(&config.log_filter);
//! let host = Host::new(config);
//! let h = host.dispatch("allocate", &[Value::Int(16)])?;
//! host.dispatch("release", &[h])?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod host;
pub mod logging;

pub use config::HostConfig;
pub use error::ConfigError;
pub use evolve_sdk::{BuiltinError, BuiltinResult, ErrorKind, Handle, HandleKind, Value};
pub use host::{Host, HostServices, ShutdownReport};
