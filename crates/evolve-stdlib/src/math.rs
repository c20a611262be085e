//! Math native implementations
//!
//! A read-only table mapping names to constants and pure numeric functions.
//! The table is built once on first use and never mutated afterwards.
//!
//! # Domain errors
//!
//! One rule covers the whole table: integer arguments are promoted to
//! f64, and when every argument is a real number (not NaN) but the result
//! is NaN, the call fails with `DomainError`. Infinite results such as
//! `log(0)` are returned unchanged.

use evolve_sdk::{BuiltinError, BuiltinResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One entry of the math table
#[derive(Debug, Clone, Copy)]
pub enum MathEntry {
    /// Named constant
    Constant(f64),
    /// Function of one argument
    Unary(fn(f64) -> f64),
    /// Function of two arguments
    Binary(fn(f64, f64) -> f64),
}

impl MathEntry {
    /// Number of arguments the entry takes
    pub fn arity(&self) -> usize {
        match self {
            MathEntry::Constant(_) => 0,
            MathEntry::Unary(_) => 1,
            MathEntry::Binary(_) => 2,
        }
    }

    /// Evaluate the entry, applying the table's domain rule.
    pub fn eval(&self, name: &str, args: &[f64]) -> BuiltinResult<f64> {
        let result = match (self, args) {
            (MathEntry::Constant(c), []) => return Ok(*c),
            (MathEntry::Unary(f), [x]) => f(*x),
            (MathEntry::Binary(f), [a, b]) => f(*a, *b),
            _ => {
                return Err(BuiltinError::invalid_argument(
                    name,
                    format!("expects {} numeric argument(s), got {}", self.arity(), args.len()),
                ))
            }
        };
        if result.is_nan() && !args.iter().any(|a| a.is_nan()) {
            return Err(BuiltinError::DomainError {
                function: name.to_string(),
                args: args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "),
            });
        }
        Ok(result)
    }
}

/// Sign of number (-1, 0, or 1)
pub fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x
    } else {
        x.signum()
    }
}

static TABLE: Lazy<HashMap<&'static str, MathEntry>> = Lazy::new(|| {
    use std::f64::consts;
    use MathEntry::{Binary, Constant, Unary};

    HashMap::from([
        ("pi", Constant(consts::PI)),
        ("e", Constant(consts::E)),
        ("tau", Constant(consts::TAU)),
        ("inf", Constant(f64::INFINITY)),
        ("abs", Unary(f64::abs)),
        ("sign", Unary(sign)),
        ("floor", Unary(f64::floor)),
        ("ceil", Unary(f64::ceil)),
        ("round", Unary(f64::round)),
        ("trunc", Unary(f64::trunc)),
        ("sqrt", Unary(f64::sqrt)),
        ("cbrt", Unary(f64::cbrt)),
        ("sin", Unary(f64::sin)),
        ("cos", Unary(f64::cos)),
        ("tan", Unary(f64::tan)),
        ("asin", Unary(f64::asin)),
        ("acos", Unary(f64::acos)),
        ("atan", Unary(f64::atan)),
        ("sinh", Unary(f64::sinh)),
        ("cosh", Unary(f64::cosh)),
        ("tanh", Unary(f64::tanh)),
        ("exp", Unary(f64::exp)),
        ("ln", Unary(f64::ln)),
        ("log", Unary(f64::ln)),
        ("log2", Unary(f64::log2)),
        ("log10", Unary(f64::log10)),
        ("pow", Binary(f64::powf)),
        ("atan2", Binary(f64::atan2)),
        ("min", Binary(f64::min)),
        ("max", Binary(f64::max)),
        ("hypot", Binary(f64::hypot)),
    ])
});

/// Look up an entry by name
pub fn lookup(name: &str) -> Option<&'static MathEntry> {
    TABLE.get(name)
}

/// All entries in the table, sorted by name
pub fn entries() -> Vec<(&'static str, &'static MathEntry)> {
    let mut all: Vec<_> = TABLE.iter().map(|(k, v)| (*k, v)).collect();
    all.sort_unstable_by_key(|(k, _)| *k);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_sdk::ErrorKind;

    fn call(name: &str, args: &[f64]) -> BuiltinResult<f64> {
        lookup(name).expect("entry").eval(name, args)
    }

    #[test]
    fn test_abs_and_sign() {
        assert_eq!(call("abs", &[-5.0]).unwrap(), 5.0);
        assert_eq!(call("sign", &[-5.0]).unwrap(), -1.0);
        assert_eq!(call("sign", &[3.0]).unwrap(), 1.0);
        assert_eq!(call("sign", &[0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_floor_ceil_round_trunc() {
        assert_eq!(call("floor", &[3.7]).unwrap(), 3.0);
        assert_eq!(call("ceil", &[3.2]).unwrap(), 4.0);
        assert_eq!(call("round", &[3.5]).unwrap(), 4.0);
        assert_eq!(call("trunc", &[3.7]).unwrap(), 3.0);
    }

    #[test]
    fn test_pow_sqrt_minmax() {
        assert_eq!(call("pow", &[2.0, 10.0]).unwrap(), 1024.0);
        assert_eq!(call("sqrt", &[16.0]).unwrap(), 4.0);
        assert_eq!(call("min", &[1.0, 2.0]).unwrap(), 1.0);
        assert_eq!(call("max", &[1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(call("hypot", &[3.0, 4.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_trig() {
        assert_eq!(call("sin", &[0.0]).unwrap(), 0.0);
        assert!((call("cos", &[0.0]).unwrap() - 1.0).abs() < 1e-10);
        assert!((call("atan2", &[1.0, 1.0]).unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-10);
    }

    #[test]
    fn test_exp_log() {
        assert!((call("exp", &[0.0]).unwrap() - 1.0).abs() < 1e-10);
        assert!((call("log", &[std::f64::consts::E]).unwrap() - 1.0).abs() < 1e-10);
        assert!((call("log10", &[100.0]).unwrap() - 2.0).abs() < 1e-10);
        assert_eq!(call("log2", &[8.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_domain_errors_are_consistent() {
        for (name, args) in [
            ("log", vec![-1.0]),
            ("ln", vec![-1.0]),
            ("sqrt", vec![-4.0]),
            ("asin", vec![2.0]),
            ("pow", vec![-8.0, 0.5]),
        ] {
            let err = call(name, &args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DomainError, "{}", name);
        }
    }

    #[test]
    fn test_infinite_results_pass_through() {
        assert_eq!(call("log", &[0.0]).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_input_is_not_a_domain_error() {
        assert!(call("sin", &[f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_constants() {
        assert_eq!(call("pi", &[]).unwrap(), std::f64::consts::PI);
        assert_eq!(call("e", &[]).unwrap(), std::f64::consts::E);
        assert_eq!(lookup("pi").unwrap().arity(), 0);
    }

    #[test]
    fn test_wrong_arg_count() {
        assert!(call("atan2", &[1.0]).is_err());
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn test_entries_sorted() {
        let names: Vec<_> = entries().into_iter().map(|(n, _)| n).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"hypot"));
    }
}
