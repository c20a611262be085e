//! Host - the single call surface the evaluator talks to.
//!
//! Owns the memory and file services and a registry holding every stdlib
//! and POSIX builtin. Resources still held by scripts when the host shuts
//! down (or is dropped) are released and reported as leaks.

use crate::config::HostConfig;
use evolve_sdk::{BuiltinRegistry, BuiltinResult, Value};
use evolve_stdlib::{MemoryHost, MemoryService};
use evolve_stdlib_posix::{FileHost, FileService};

/// Native services handed to every builtin implementation
pub struct HostServices {
    memory: MemoryService,
    files: FileService,
}

impl HostServices {
    /// Build services from a config
    pub fn new(config: &HostConfig) -> Self {
        Self {
            memory: MemoryService::new(config.memory_limits()),
            files: FileService::new(config.max_open_files),
        }
    }
}

impl MemoryHost for HostServices {
    fn memory(&self) -> &MemoryService {
        &self.memory
    }
}

impl FileHost for HostServices {
    fn files(&self) -> &FileService {
        &self.files
    }
}

/// What a shutdown had to clean up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// File handles that were still open
    pub files_closed: usize,
    /// Allocations that were never released
    pub allocations_released: usize,
}

impl ShutdownReport {
    /// Check whether scripts left nothing behind
    pub fn is_clean(&self) -> bool {
        self.files_closed == 0 && self.allocations_released == 0
    }
}

/// Builtin host: registry plus the services it dispatches into.
pub struct Host {
    services: HostServices,
    registry: BuiltinRegistry<HostServices>,
}

impl Host {
    /// Create a host with every builtin registered.
    pub fn new(config: HostConfig) -> Self {
        let services = HostServices::new(&config);
        let mut registry = BuiltinRegistry::new();
        evolve_stdlib::register_stdlib(&mut registry);
        evolve_stdlib_posix::register_posix(&mut registry);
        tracing::debug!(builtins = registry.len(), "host ready");
        Self { services, registry }
    }

    /// Call builtin `name` with `args`.
    pub fn dispatch(&self, name: &str, args: &[Value]) -> BuiltinResult<Value> {
        self.registry.dispatch(&self.services, name, args)
    }

    /// Registered builtins
    pub fn registry(&self) -> &BuiltinRegistry<HostServices> {
        &self.registry
    }

    /// Memory service
    pub fn memory(&self) -> &MemoryService {
        &self.services.memory
    }

    /// File service
    pub fn files(&self) -> &FileService {
        &self.services.files
    }

    /// Close every open file and release every allocation.
    ///
    /// Safe to call more than once; later calls find nothing to clean.
    pub fn shutdown(&self) -> ShutdownReport {
        let report = ShutdownReport {
            files_closed: self.services.files.close_all(),
            allocations_released: self.services.memory.release_all(),
        };
        if report.files_closed > 0 {
            tracing::warn!(count = report.files_closed, "closed file handles left open by scripts");
        }
        if report.allocations_released > 0 {
            tracing::warn!(count = report.allocations_released, "released allocations left live by scripts");
        }
        report
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shutdown();
    }
}
