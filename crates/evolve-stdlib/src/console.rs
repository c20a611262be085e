//! Console native implementations
//!
//! `print` concatenates the display form of its arguments, with no
//! separator, and writes a single line.

use evolve_sdk::{BuiltinError, BuiltinResult, Value};
use std::io::Write;

/// Render arguments the way `print` does
pub fn render(args: &[Value]) -> String {
    args.iter().map(|v| v.to_string()).collect()
}

/// Write the rendered arguments and a newline to `out`
pub fn print_to(out: &mut impl Write, args: &[Value]) -> BuiltinResult<()> {
    let line = render(args);
    out.write_all(line.as_bytes())
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(|e| BuiltinError::from_io("print", e))
}

/// Write the rendered arguments and a newline to stdout
pub fn print(args: &[Value]) -> BuiltinResult<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    print_to(&mut lock, args)
}
