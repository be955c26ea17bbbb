//! Dynamic value representation
//!
//! Values are a plain tagged enum rather than a packed encoding: the object
//! model here is reflective (descriptors hold values by name), so there is no
//! hot dispatch loop to optimize for. Callable values carry a shared native
//! function and compare by reference identity, matching how the host object
//! model distinguishes "same function" from "equal-looking function".

use crate::object::Instance;
use std::fmt;
use std::rc::Rc;

/// Native function invoked as a method: receives the target instance and
/// positional arguments
pub type NativeFn = Rc<dyn Fn(&mut Instance, &[Value]) -> Value>;

/// Accessor getter: reads a computed value off the target instance
pub type GetterFn = Rc<dyn Fn(&Instance) -> Value>;

/// Accessor setter: writes a computed value through the target instance
pub type SetterFn = Rc<dyn Fn(&mut Instance, Value)>;

/// Tagged dynamic value
#[derive(Clone)]
pub enum Value {
    /// Absent / null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    Str(String),
    /// Callable value (identity-compared)
    Function(NativeFn),
}

impl Value {
    /// Create a callable value from a closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + 'static,
    {
        Value::Function(Rc::new(f))
    }

    /// Check whether this value is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Borrow the string contents, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Function(func) => write!(f, "Function({:p})", Rc::as_ptr(func)),
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
