#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(unused_crate_dependencies)]

pub mod conf;
pub mod emptiness;
pub mod errors;
pub mod gc;
pub mod json;
pub mod pretty_impl;
pub mod props;
pub mod proxy;
pub mod realm;
pub mod reflect;
pub mod values;

pub use self::emptiness::{is_empty_object, is_empty_object_with};

/// Alias of [`is_empty_object`]
pub use self::emptiness::is_empty_object as is_object_empty;
