//! Builtin registration for stdlib
//!
//! Registers the console, math and memory builtins by name (e.g. "print",
//! "sin", "allocate") into a `BuiltinRegistry`. Math builtins need no host
//! state; memory builtins reach the [`MemoryService`] through [`MemoryHost`].

use crate::math;
use crate::memory::MemoryService;
use evolve_sdk::convert::{arg_bytes, arg_f64, arg_handle, arg_u64};
use evolve_sdk::{Arity, BuiltinRegistry, BuiltinResult, Value};

/// Host context that owns a memory service
pub trait MemoryHost {
    /// The memory service backing `allocate`/`release`
    fn memory(&self) -> &MemoryService;
}

/// Register all stdlib builtins into the given registry.
pub fn register_stdlib<C: MemoryHost + 'static>(registry: &mut BuiltinRegistry<C>) {
    register_console(registry);
    register_math(registry);
    register_memory(registry);
}

/// Register `print`
pub fn register_console<C: 'static>(registry: &mut BuiltinRegistry<C>) {
    registry.register("print", Arity::AtLeast(0), |_ctx, args| {
        crate::console::print(args)?;
        Ok(Value::Null)
    });
}

/// Register every entry of the math table under its own name
pub fn register_math<C: 'static>(registry: &mut BuiltinRegistry<C>) {
    for (name, entry) in math::entries() {
        registry.register(name, Arity::Exact(entry.arity()), move |_ctx, args| {
            let nums = (0..args.len())
                .map(|i| arg_f64(name, args, i))
                .collect::<BuiltinResult<Vec<f64>>>()?;
            entry.eval(name, &nums).map(Value::Float)
        });
    }
}

/// Register memory builtins
pub fn register_memory<C: MemoryHost + 'static>(registry: &mut BuiltinRegistry<C>) {
    registry.register("allocate", Arity::Exact(1), |ctx, args| {
        let size = arg_u64("allocate", args, 0)?;
        ctx.memory().allocate(size).map(Value::Handle)
    });
    registry.register("release", Arity::Exact(1), |ctx, args| {
        let handle = arg_handle("release", args, 0)?;
        ctx.memory().release(handle)?;
        Ok(Value::Null)
    });
    registry.register("memSize", Arity::Exact(1), |ctx, args| {
        let handle = arg_handle("memSize", args, 0)?;
        Ok(Value::Int(ctx.memory().size(handle)? as i64))
    });
    registry.register("memRead", Arity::Exact(3), |ctx, args| {
        let handle = arg_handle("memRead", args, 0)?;
        let offset = arg_u64("memRead", args, 1)?;
        let len = arg_u64("memRead", args, 2)?;
        ctx.memory().read(handle, offset, len).map(Value::Bytes)
    });
    registry.register("memWrite", Arity::Exact(3), |ctx, args| {
        let handle = arg_handle("memWrite", args, 0)?;
        let offset = arg_u64("memWrite", args, 1)?;
        let data = arg_bytes("memWrite", args, 2)?;
        let written = ctx.memory().write(handle, offset, data)?;
        Ok(Value::Int(written as i64))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_sdk::{BuiltinError, ErrorKind, Handle, HandleKind};

    struct TestHost {
        memory: MemoryService,
    }

    impl MemoryHost for TestHost {
        fn memory(&self) -> &MemoryService {
            &self.memory
        }
    }

    fn setup() -> (TestHost, BuiltinRegistry<TestHost>) {
        let mut registry = BuiltinRegistry::new();
        register_stdlib(&mut registry);
        (TestHost { memory: MemoryService::default() }, registry)
    }

    #[test]
    fn test_sin_zero() {
        let (host, reg) = setup();
        assert_eq!(reg.dispatch(&host, "sin", &[Value::Int(0)]).unwrap(), Value::Float(0.0));
    }

    #[test]
    fn test_log_negative_is_domain_error() {
        let (host, reg) = setup();
        for _ in 0..3 {
            let err = reg.dispatch(&host, "log", &[Value::Int(-1)]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DomainError);
        }
    }

    #[test]
    fn test_constant_takes_no_args() {
        let (host, reg) = setup();
        assert_eq!(
            reg.dispatch(&host, "pi", &[]).unwrap(),
            Value::Float(std::f64::consts::PI)
        );
        assert_eq!(
            reg.dispatch(&host, "pi", &[Value::Int(1)]).unwrap_err().kind(),
            ErrorKind::ArityMismatch
        );
    }

    #[test]
    fn test_math_rejects_non_numbers() {
        let (host, reg) = setup();
        let err = reg.dispatch(&host, "cos", &[Value::from("0")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_memory_builtins() {
        let (host, reg) = setup();
        let h = reg.dispatch(&host, "allocate", &[Value::Int(4)]).unwrap();
        assert!(matches!(h, Value::Handle(_)));

        let wrote = reg
            .dispatch(&host, "memWrite", &[h.clone(), Value::Int(0), Value::from("ok")])
            .unwrap();
        assert_eq!(wrote, Value::Int(2));
        assert_eq!(
            reg.dispatch(&host, "memRead", &[h.clone(), Value::Int(0), Value::Int(3)]).unwrap(),
            Value::Bytes(b"ok\0".to_vec())
        );
        assert_eq!(reg.dispatch(&host, "memSize", &[h.clone()]).unwrap(), Value::Int(4));

        assert_eq!(reg.dispatch(&host, "release", &[h.clone()]).unwrap(), Value::Null);
        assert_eq!(
            reg.dispatch(&host, "release", &[h]).unwrap_err().kind(),
            ErrorKind::InvalidHandle
        );
    }

    #[test]
    fn test_release_of_integer_is_rejected() {
        let (host, reg) = setup();
        reg.dispatch(&host, "allocate", &[Value::Int(1)]).unwrap();
        let err = reg.dispatch(&host, "release", &[Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(host.memory.live_count(), 1);
    }

    #[test]
    fn test_release_of_file_handle_is_invalid() {
        let (host, reg) = setup();
        let file = Value::Handle(Handle::new(HandleKind::File, 1));
        assert!(matches!(
            reg.dispatch(&host, "release", &[file]),
            Err(BuiltinError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn test_allocate_negative_size() {
        let (host, reg) = setup();
        let err = reg.dispatch(&host, "allocate", &[Value::Int(-5)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
