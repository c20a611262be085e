//! Value - the tagged value exchanged between the evaluator and builtins
//!
//! Builtins only consume and produce a handful of shapes: numbers, text,
//! raw bytes and opaque handles. Handles are a distinct variant so an
//! integer can never be mistaken for (or turned into) a live resource.

use std::fmt;

/// Kind of native resource a [`Handle`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// A block reserved by the memory service
    Memory,
    /// A file opened by the file service
    File,
}

impl HandleKind {
    /// Lowercase label used in diagnostics and display output
    pub fn label(self) -> &'static str {
        match self {
            HandleKind::Memory => "memory",
            HandleKind::File => "file",
        }
    }
}

/// Opaque token naming a native resource owned by a host service.
///
/// The id indexes into the owning service's table; it is never an address
/// or an OS descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: HandleKind,
    id: u64,
}

impl Handle {
    /// Create a handle. Only services that own a table should mint these.
    pub fn new(kind: HandleKind, id: u64) -> Self {
        Self { kind, id }
    }

    /// Resource kind
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Table index
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.kind.label(), self.id)
    }
}

/// Script-level value as seen by the builtin bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a result (`print`, `close`, ...)
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 text
    Str(String),
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// Opaque native resource handle
    Handle(Handle),
}

impl Value {
    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Handle(_) => "handle",
        }
    }

    /// Get as f64, promoting integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice if this is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the byte content of a `Str` or `Bytes`
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the handle if this is a `Handle`
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => {
                if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
                    write!(f, "{}", *x as i64)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Value::Handle(h) => write!(f, "{}", h),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}
