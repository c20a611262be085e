//! Builtin registration for POSIX stdlib
//!
//! Registers the file builtins by name ("open", "readAll", "readFile", ...)
//! into a `BuiltinRegistry`.

use crate::fs::{FileService, OpenMode};
use evolve_sdk::convert::{arg_bytes, arg_handle, arg_str};
use evolve_sdk::{Arity, BuiltinError, BuiltinRegistry, Value};

/// Host context that owns a file service
pub trait FileHost {
    /// The file service backing `open`/`close`
    fn files(&self) -> &FileService;
}

/// Register all POSIX builtins into the given registry.
pub fn register_posix<C: FileHost + 'static>(registry: &mut BuiltinRegistry<C>) {
    register_fs(registry);
}

fn register_fs<C: FileHost + 'static>(registry: &mut BuiltinRegistry<C>) {
    registry.register("open", Arity::Exact(2), |ctx, args| {
        let path = arg_str("open", args, 0)?;
        let mode = arg_str("open", args, 1)?;
        let mode = OpenMode::parse(mode).ok_or_else(|| {
            BuiltinError::invalid_argument("open", format!("unknown mode '{}' (expected read, write or append)", mode))
        })?;
        ctx.files().open(path, mode).map(Value::Handle)
    });
    registry.register("readAll", Arity::Exact(1), |ctx, args| {
        let handle = arg_handle("readAll", args, 0)?;
        ctx.files().read_all(handle).map(Value::Bytes)
    });
    registry.register("write", Arity::Exact(2), |ctx, args| {
        let handle = arg_handle("write", args, 0)?;
        let data = arg_bytes("write", args, 1)?;
        let written = ctx.files().write(handle, data)?;
        Ok(Value::Int(written as i64))
    });
    registry.register("close", Arity::Exact(1), |ctx, args| {
        let handle = arg_handle("close", args, 0)?;
        ctx.files().close(handle)?;
        Ok(Value::Null)
    });
    registry.register("readFile", Arity::Exact(1), |_ctx, args| {
        let path = arg_str("readFile", args, 0)?;
        crate::fs::read_file(path).map(Value::Bytes)
    });
    registry.register("writeFile", Arity::Exact(2), |_ctx, args| {
        let path = arg_str("writeFile", args, 0)?;
        let data = arg_bytes("writeFile", args, 1)?;
        let written = crate::fs::write_file(path, data)?;
        Ok(Value::Int(written as i64))
    });
}
