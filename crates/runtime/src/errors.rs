use thiserror::Error;

use crate::{props::PropertyKey, values::TypeOf};

pub type ObjectResult<T> = Result<T, ObjectError>;

/// Failure of an object model operation
///
/// Reflection failures (revoked proxies, traps) are what the emptiness predicate can surface;
/// the remaining variants come from mutations performed while building values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("cannot perform '{operation}' on a proxy that has been revoked")]
    RevokedProxy { operation: &'static str },

    #[error("maximum proxy nesting depth exceeded ({limit})")]
    ProxyDepthExceeded { limit: usize },

    #[error("proxy trap '{trap}' failed: {message}")]
    TrapFailed { trap: &'static str, message: String },

    #[error("proxy trap '{trap}' returned an invalid result: {reason}")]
    TrapInvariant { trap: &'static str, reason: String },

    #[error("cannot add property {key}, object is not extensible")]
    NotExtensible { key: PropertyKey },

    #[error("cannot assign to read only property {key}")]
    NonWritable { key: PropertyKey },

    #[error("cannot redefine or delete non-configurable property {key}")]
    NonConfigurable { key: PropertyKey },

    #[error("cannot set property {key} which only has a getter")]
    AccessorWithoutSetter { key: PropertyKey },

    #[error("invalid property descriptor: {reason}")]
    InvalidDescriptor { reason: &'static str },

    #[error("{operation} called on non-object (found {found})")]
    NotAnObject {
        operation: &'static str,
        found: TypeOf,
    },

    #[error("{name} is not a constructor")]
    NotAConstructor { name: String },

    #[error("invalid array length: {found}")]
    InvalidArrayLength { found: String },

    #[error("cannot convert {text:?} to a BigInt")]
    InvalidBigInt { text: String },
}
