//!
//! Emptiness predicate.
//!
//! A value is a plain, empty object when it is object-typed (not callable), not an array,
//! and has no enumerable own property, be it string-keyed or symbol-keyed.
//! Inherited and non-enumerable properties are ignored, as are integrity levels and prototypes.
//!

use tracing::trace;

use crate::{
    conf::RuntimeConf,
    errors::ObjectResult,
    reflect::{self, KeyFilter},
    values::{TypeOf, Value},
};

/// Check if a value is a plain object without any enumerable own property
///
/// Only fails if inspecting the value's properties fails (e.g. on a revoked proxy),
/// in which case the error is returned as is.
///
/// ```
/// use emptyobj_runtime::{is_empty_object, realm::Realm, values::Value};
///
/// let realm = Realm::new();
///
/// assert!(is_empty_object(&realm.new_object()).unwrap());
/// assert!(!is_empty_object(&realm.new_array([])).unwrap());
/// assert!(!is_empty_object(&Value::Null).unwrap());
/// ```
pub fn is_empty_object(value: &Value) -> ObjectResult<bool> {
    is_empty_object_with(value, &RuntimeConf::default())
}

/// Same as [`is_empty_object`], with a custom configuration
pub fn is_empty_object_with(value: &Value, conf: &RuntimeConf) -> ObjectResult<bool> {
    let verdict = check(value, conf)?;

    trace!(
        step = verdict.step(),
        empty = verdict.is_empty(),
        "emptiness decided"
    );

    Ok(verdict.is_empty())
}

/// What settled the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Nullish,
    NotAnObject(TypeOf),
    Array,
    HasStringKeys,
    HasSymbolKeys,
    Empty,
}

impl Verdict {
    fn is_empty(self) -> bool {
        self == Verdict::Empty
    }

    fn step(self) -> &'static str {
        match self {
            Verdict::Nullish => "nullish",
            Verdict::NotAnObject(TypeOf::Function) => "callable",
            Verdict::NotAnObject(_) => "primitive",
            Verdict::Array => "array",
            Verdict::HasStringKeys => "enumerable string keys",
            Verdict::HasSymbolKeys => "enumerable symbol keys",
            Verdict::Empty => "empty",
        }
    }
}

fn check(value: &Value, conf: &RuntimeConf) -> ObjectResult<Verdict> {
    if value.is_nullish() {
        return Ok(Verdict::Nullish);
    }

    let typ = value.type_of();

    if typ != TypeOf::Object {
        return Ok(Verdict::NotAnObject(typ));
    }

    if reflect::is_array(value, conf)? {
        return Ok(Verdict::Array);
    }

    if !reflect::enumerable_own_keys(value, KeyFilter::Strings, conf)?.is_empty() {
        return Ok(Verdict::HasStringKeys);
    }

    if !reflect::enumerable_own_keys(value, KeyFilter::Symbols, conf)?.is_empty() {
        return Ok(Verdict::HasSymbolKeys);
    }

    Ok(Verdict::Empty)
}
