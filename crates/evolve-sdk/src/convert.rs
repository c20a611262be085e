//! Argument extraction helpers for builtin implementations.
//!
//! Arity has already been checked by the registry when these run, but a
//! missing index is still reported as an error rather than a panic.

use crate::error::{BuiltinError, BuiltinResult};
use crate::value::{Handle, Value};

fn arg<'a>(name: &str, args: &'a [Value], index: usize) -> BuiltinResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| BuiltinError::invalid_argument(name, format!("missing argument {}", index)))
}

fn mismatch(name: &str, index: usize, expected: &str, got: &Value) -> BuiltinError {
    BuiltinError::invalid_argument(
        name,
        format!("argument {} must be {}, got {}", index, expected, got.type_name()),
    )
}

/// Numeric argument, integers promoted to f64
pub fn arg_f64(name: &str, args: &[Value], index: usize) -> BuiltinResult<f64> {
    let v = arg(name, args, index)?;
    v.as_f64().ok_or_else(|| mismatch(name, index, "a number", v))
}

/// Integer argument. Floats with no fractional part are accepted when
/// they fit in an `i64`.
pub fn arg_i64(name: &str, args: &[Value], index: usize) -> BuiltinResult<i64> {
    let v = arg(name, args, index)?;
    match v {
        Value::Int(i) => Ok(*i),
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        Value::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Ok(*f as i64)
        }
        Value::Float(f) if f.fract() == 0.0 => Err(BuiltinError::invalid_argument(
            name,
            format!("argument {} is out of integer range, got {}", index, f),
        )),
        _ => Err(mismatch(name, index, "an integer", v)),
    }
}

/// Non-negative integer argument (sizes, offsets, lengths)
pub fn arg_u64(name: &str, args: &[Value], index: usize) -> BuiltinResult<u64> {
    let i = arg_i64(name, args, index)?;
    u64::try_from(i).map_err(|_| {
        BuiltinError::invalid_argument(name, format!("argument {} must be non-negative, got {}", index, i))
    })
}

/// String argument
pub fn arg_str<'a>(name: &str, args: &'a [Value], index: usize) -> BuiltinResult<&'a str> {
    let v = arg(name, args, index)?;
    v.as_str().ok_or_else(|| mismatch(name, index, "a string", v))
}

/// Byte content argument (`Str` or `Bytes`)
pub fn arg_bytes<'a>(name: &str, args: &'a [Value], index: usize) -> BuiltinResult<&'a [u8]> {
    let v = arg(name, args, index)?;
    v.as_bytes().ok_or_else(|| mismatch(name, index, "a string or bytes", v))
}

/// Handle argument. Integers are rejected.
pub fn arg_handle(name: &str, args: &[Value], index: usize) -> BuiltinResult<Handle> {
    let v = arg(name, args, index)?;
    v.as_handle().ok_or_else(|| mismatch(name, index, "a handle", v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::HandleKind;

    #[test]
    fn test_integer_does_not_pass_as_handle() {
        let err = arg_handle("release", &[Value::Int(1)], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "release: argument 0 must be a handle, got int");

        let h = Handle::new(HandleKind::Memory, 1);
        assert_eq!(arg_handle("release", &[Value::Handle(h)], 0).unwrap(), h);
    }

    #[test]
    fn test_arg_u64_rejects_negative() {
        assert_eq!(arg_u64("allocate", &[Value::Int(8)], 0).unwrap(), 8);
        assert_eq!(arg_u64("allocate", &[Value::Float(8.0)], 0).unwrap(), 8);
        assert!(arg_u64("allocate", &[Value::Int(-1)], 0).is_err());
        assert!(arg_u64("allocate", &[Value::Float(1.5)], 0).is_err());
    }

    #[test]
    fn test_huge_float_is_not_saturated() {
        for f in [1e300, 1e20, 9_223_372_036_854_775_808.0, -1e19, f64::INFINITY, f64::NAN] {
            let err = arg_u64("memRead", &[Value::Float(f)], 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{}", f);
        }
        let err = arg_i64("allocate", &[Value::Float(1e300)], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            arg_i64("x", &[Value::Float(-9_223_372_036_854_775_808.0)], 0).unwrap(),
            i64::MIN
        );
        assert_eq!(arg_u64("x", &[Value::Float(4_503_599_627_370_496.0)], 0).unwrap(), 1 << 52);
    }

    #[test]
    fn test_missing_argument_is_error() {
        assert!(arg_f64("sin", &[], 0).is_err());
        assert!(arg_bytes("write", &[Value::Null], 0).is_err());
        assert_eq!(arg_bytes("write", &[Value::from("ab")], 0).unwrap(), b"ab");
    }
}
