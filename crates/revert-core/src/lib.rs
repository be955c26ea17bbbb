//! Revert core runtime
//!
//! This crate provides a small dynamic object model and the reset engine
//! built on top of it:
//! - Tagged dynamic values (including callable values)
//! - Property descriptors with accessor/method/data kinds
//! - Class descriptors with single inheritance and a class registry
//! - `reset`: restore an instance to the shape declared by its class chain
//!
//! The reset operation undoes per-instance overrides of inherited methods and
//! accessors while preserving plain data values and members the instance added
//! on its own.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod object;
pub mod registry;
pub mod reset;
pub mod value;

pub use object::{Class, Instance, Property, PropertyKind};
pub use registry::{ClassId, ClassRegistry};
pub use reset::reset;
pub use value::{GetterFn, NativeFn, SetterFn, Value};

/// Errors raised by the reset engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    /// The target has no class descriptor chain to restore from
    #[error("target is not an instance of a registered class")]
    NotAnInstance,

    /// The target's member table is sealed against structural changes
    #[error("target instance is sealed")]
    SealedTarget,
}

/// Reset operation result
pub type ResetResult<T> = Result<T, ResetError>;
