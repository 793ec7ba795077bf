//!
//! Reflection primitives: the internal methods used to inspect a value's own properties.
//!
//! Primitives have no own properties and are not arrays. Proxies dispatch to their handler,
//! which is why every function here may fail.
//!

use crate::{
    conf::RuntimeConf,
    errors::ObjectResult,
    props::{Property, PropertyKey},
    values::Value,
};

/// Which keys to keep when listing enumerable own properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFilter {
    /// String keys (what `Object.keys` lists)
    Strings,

    /// Symbol keys (what `Object.getOwnPropertySymbols` lists, restricted to enumerable ones)
    Symbols,
}

impl KeyFilter {
    fn accepts(self, key: &PropertyKey) -> bool {
        match self {
            KeyFilter::Strings => !key.is_symbol(),
            KeyFilter::Symbols => key.is_symbol(),
        }
    }
}

/// List the own property keys of a value, in enumeration order (`Reflect.ownKeys`)
pub fn own_property_keys(value: &Value, conf: &RuntimeConf) -> ObjectResult<Vec<PropertyKey>> {
    own_keys_at(value, conf, 0)
}

/// Get an own property of a value (`Object.getOwnPropertyDescriptor`)
pub fn get_own_property(
    value: &Value,
    key: &PropertyKey,
    conf: &RuntimeConf,
) -> ObjectResult<Option<Property>> {
    get_own_property_at(value, key, conf, 0)
}

/// Check if a value is an array (`Array.isArray`)
pub fn is_array(value: &Value, conf: &RuntimeConf) -> ObjectResult<bool> {
    is_array_at(value, conf, 0)
}

/// Check if new properties can be added to a value (`Object.isExtensible`)
pub fn is_extensible(value: &Value, conf: &RuntimeConf) -> ObjectResult<bool> {
    is_extensible_at(value, conf, 0)
}

/// List the enumerable own keys of a value, restricted to one kind of keys
///
/// The keys are listed first, then each of them is looked up to check if it is enumerable.
/// Accessors are never called.
pub fn enumerable_own_keys(
    value: &Value,
    filter: KeyFilter,
    conf: &RuntimeConf,
) -> ObjectResult<Vec<PropertyKey>> {
    let mut enumerable = vec![];

    for key in own_property_keys(value, conf)? {
        if !filter.accepts(&key) {
            continue;
        }

        // Properties may disappear between the listing and the lookup (e.g. with proxies)
        if get_own_property(value, &key, conf)?.is_some_and(|prop| prop.enumerable) {
            enumerable.push(key);
        }
    }

    Ok(enumerable)
}

pub(crate) fn own_keys_at(
    value: &Value,
    conf: &RuntimeConf,
    depth: usize,
) -> ObjectResult<Vec<PropertyKey>> {
    match value {
        Value::Object(obj) => Ok(obj.read().properties.keys()),
        Value::Proxy(proxy) => proxy.own_keys(conf, depth),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::String(_)
        | Value::Symbol(_) => Ok(vec![]),
    }
}

pub(crate) fn get_own_property_at(
    value: &Value,
    key: &PropertyKey,
    conf: &RuntimeConf,
    depth: usize,
) -> ObjectResult<Option<Property>> {
    match value {
        Value::Object(obj) => Ok(obj.read().properties.get(key).cloned()),
        Value::Proxy(proxy) => proxy.get_own_property(key, conf, depth),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::String(_)
        | Value::Symbol(_) => Ok(None),
    }
}

pub(crate) fn is_array_at(value: &Value, conf: &RuntimeConf, depth: usize) -> ObjectResult<bool> {
    match value {
        Value::Object(obj) => Ok(obj.read().is_array()),
        Value::Proxy(proxy) => proxy.is_array(conf, depth),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::String(_)
        | Value::Symbol(_) => Ok(false),
    }
}

pub(crate) fn is_extensible_at(
    value: &Value,
    conf: &RuntimeConf,
    depth: usize,
) -> ObjectResult<bool> {
    match value {
        Value::Object(obj) => Ok(obj.read().extensible),
        Value::Proxy(proxy) => proxy.is_extensible(conf, depth),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::String(_)
        | Value::Symbol(_) => Ok(false),
    }
}
