//!
//! Properties handling module.
//!
//! Provides property keys, attributes and own-properties storage, as well as the mutations
//! used to build objects (assignment, definition, deletion, integrity levels).
//!

use std::fmt::Display;

use indexmap::IndexMap;

use crate::{
    errors::{ObjectError, ObjectResult},
    proxy::resolve_target,
    values::{ObjectRef, ObjectValue, Symbol, TypeOf, Value},
};

/// Key of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(Symbol),
}

impl PropertyKey {
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Get the array index this key designates, if any
    ///
    /// Only canonical numeric strings below 2^32 - 1 are array indices
    pub fn array_index(&self) -> Option<u32> {
        let PropertyKey::String(key) = self else {
            return None;
        };

        if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
            return None;
        }

        if !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyKey {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&Symbol> for PropertyKey {
    fn from(value: &Symbol) -> Self {
        Self::Symbol(value.clone())
    }
}

impl From<Symbol> for PropertyKey {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<u32> for PropertyKey {
    fn from(value: u32) -> Self {
        Self::String(value.to_string())
    }
}

impl Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::String(key) => write!(f, "'{key}'"),
            PropertyKey::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// An own property
#[derive(Debug, Clone)]
pub struct Property {
    /// Content of the property
    pub slot: PropertySlot,

    /// Is the property visible to enumeration?
    pub enumerable: bool,

    /// Can the property be deleted or have its attributes changed?
    pub configurable: bool,
}

impl Property {
    /// Property created by a plain assignment
    pub fn data(value: Value) -> Self {
        Self {
            slot: PropertySlot::Data {
                value,
                writable: true,
            },
            enumerable: true,
            configurable: true,
        }
    }

    /// Property as installed on builtins (methods on prototypes)
    pub fn hidden(value: Value) -> Self {
        Self {
            slot: PropertySlot::Data {
                value,
                writable: true,
            },
            enumerable: false,
            configurable: true,
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.slot, PropertySlot::Accessor { .. })
    }

    /// Writability of a data property (`None` for accessors)
    pub fn writable(&self) -> Option<bool> {
        match &self.slot {
            PropertySlot::Data { value: _, writable } => Some(*writable),
            PropertySlot::Accessor { .. } => None,
        }
    }

    /// Value of a data property (`None` for accessors)
    pub fn value(&self) -> Option<&Value> {
        match &self.slot {
            PropertySlot::Data { value, writable: _ } => Some(value),
            PropertySlot::Accessor { .. } => None,
        }
    }
}

/// Content of a property
#[derive(Debug, Clone)]
pub enum PropertySlot {
    Data {
        value: Value,
        writable: bool,
    },

    /// Accessor functions are stored, never called
    Accessor {
        get: Option<Value>,
        set: Option<Value>,
    },
}

/// Partial property description, used to define or update a property
///
/// Absent fields default to `false` / `undefined` when creating a property and
/// are left untouched when updating one.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = Some(writable);
        self
    }

    pub fn getter(mut self, get: Value) -> Self {
        self.get = Some(get);
        self
    }

    pub fn setter(mut self, set: Value) -> Self {
        self.set = Some(set);
        self
    }

    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = Some(enumerable);
        self
    }

    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = Some(configurable);
        self
    }

    fn is_accessor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    fn is_data(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    fn validate(&self) -> ObjectResult<()> {
        if self.is_accessor() && self.is_data() {
            return Err(ObjectError::InvalidDescriptor {
                reason: "cannot both specify accessors and a value or writable attribute",
            });
        }

        for accessor in [&self.get, &self.set].into_iter().flatten() {
            if !matches!(accessor, Value::Undefined) && !accessor.is_callable() {
                return Err(ObjectError::InvalidDescriptor {
                    reason: "getters and setters must be functions or undefined",
                });
            }
        }

        Ok(())
    }

    /// Build a full property from this description, for a property that doesn't exist yet
    fn into_new_property(self) -> Property {
        let slot = if self.is_accessor() {
            PropertySlot::Accessor {
                get: self.get.filter(|get| !matches!(get, Value::Undefined)),
                set: self.set.filter(|set| !matches!(set, Value::Undefined)),
            }
        } else {
            PropertySlot::Data {
                value: self.value.unwrap_or(Value::Undefined),
                writable: self.writable.unwrap_or(false),
            }
        };

        Property {
            slot,
            enumerable: self.enumerable.unwrap_or(false),
            configurable: self.configurable.unwrap_or(false),
        }
    }
}

/// Own properties of an object, in insertion order
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: IndexMap<PropertyKey, Property>,
}

impl PropertyMap {
    pub fn get(&self, key: &PropertyKey) -> Option<&Property> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut Property> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: PropertyKey, property: Property) -> Option<Property> {
        self.entries.insert(key, property)
    }

    pub fn remove(&mut self, key: &PropertyKey) -> Option<Property> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Own keys in enumeration order
    ///
    /// Array indices come first in ascending order, then the other string keys
    /// in insertion order, then symbols in insertion order.
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut indices = vec![];
        let mut strings = vec![];
        let mut symbols = vec![];

        for key in self.entries.keys() {
            match key {
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
                PropertyKey::String(_) => match key.array_index() {
                    Some(index) => indices.push((index, key.clone())),
                    None => strings.push(key.clone()),
                },
            }
        }

        indices.sort_by_key(|(index, _)| *index);

        indices
            .into_iter()
            .map(|(_, key)| key)
            .chain(strings)
            .chain(symbols)
            .collect()
    }

    /// Iterate over the properties, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Property)> {
        self.entries.iter()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.entries.values_mut()
    }
}

impl ObjectValue {
    /// Length of an array (`None` for other kinds of objects)
    pub fn array_length(&self) -> Option<u32> {
        if !self.is_array() {
            return None;
        }

        match self.properties.get(&PropertyKey::from("length"))?.value()? {
            // Lengths are always stored as integers in the u32 range
            Value::Number(length) => Some(*length as u32),
            _ => None,
        }
    }

    /// Assign a value to an own property, creating it if required
    ///
    /// Setters are opaque: assigning through an accessor with a setter leaves the object untouched.
    pub fn set(&mut self, key: PropertyKey, value: Value) -> ObjectResult<()> {
        let value = self.check_array_length_update(&key, value)?;

        match self.properties.get_mut(&key) {
            Some(existing) => match &mut existing.slot {
                PropertySlot::Data {
                    value: current,
                    writable: true,
                } => {
                    *current = value;
                    Ok(())
                }

                PropertySlot::Data {
                    value: _,
                    writable: false,
                } => Err(ObjectError::NonWritable { key }),

                PropertySlot::Accessor { get: _, set } => match set {
                    Some(_) => Ok(()),
                    None => Err(ObjectError::AccessorWithoutSetter { key }),
                },
            },

            None => {
                if !self.extensible {
                    return Err(ObjectError::NotExtensible { key });
                }

                self.grow_array_length(&key)?;
                self.properties.insert(key, Property::data(value));

                Ok(())
            }
        }
    }

    /// Define or update an own property
    pub fn define_property(
        &mut self,
        key: PropertyKey,
        desc: PropertyDescriptor,
    ) -> ObjectResult<()> {
        desc.validate()?;
        self.apply_descriptor(key, desc)
    }

    /// Define or update an own property from an already validated descriptor
    fn apply_descriptor(
        &mut self,
        key: PropertyKey,
        mut desc: PropertyDescriptor,
    ) -> ObjectResult<()> {
        if let Some(value) = desc.value.take() {
            desc.value = Some(self.check_array_length_update(&key, value)?);
        }

        let Some(current) = self.properties.get_mut(&key) else {
            if !self.extensible {
                return Err(ObjectError::NotExtensible { key });
            }

            self.grow_array_length(&key)?;
            self.properties.insert(key, desc.into_new_property());

            return Ok(());
        };

        if !current.configurable {
            if desc.configurable == Some(true)
                || desc.enumerable.is_some_and(|enumerable| enumerable != current.enumerable)
            {
                return Err(ObjectError::NonConfigurable { key });
            }

            match &current.slot {
                PropertySlot::Data { value, writable } => {
                    if desc.is_accessor() {
                        return Err(ObjectError::NonConfigurable { key });
                    }

                    if !writable {
                        if desc.writable == Some(true) {
                            return Err(ObjectError::NonConfigurable { key });
                        }

                        if desc.value.as_ref().is_some_and(|new| !new.same_value(value)) {
                            return Err(ObjectError::NonWritable { key });
                        }
                    }
                }

                PropertySlot::Accessor { get, set } => {
                    if desc.is_data() {
                        return Err(ObjectError::NonConfigurable { key });
                    }

                    let unchanged = |current: &Option<Value>, new: &Option<Value>| match new {
                        None => true,
                        Some(new) => new.same_value(current.as_ref().unwrap_or(&Value::Undefined)),
                    };

                    if !unchanged(get, &desc.get) || !unchanged(set, &desc.set) {
                        return Err(ObjectError::NonConfigurable { key });
                    }
                }
            }
        }

        // Switching between data and accessor resets the slot's attributes
        if desc.is_accessor() && !current.is_accessor() {
            current.slot = PropertySlot::Accessor {
                get: None,
                set: None,
            };
        } else if desc.is_data() && current.is_accessor() {
            current.slot = PropertySlot::Data {
                value: Value::Undefined,
                writable: false,
            };
        }

        match &mut current.slot {
            PropertySlot::Data { value, writable } => {
                if let Some(new) = desc.value {
                    *value = new;
                }

                if let Some(new) = desc.writable {
                    *writable = new;
                }
            }

            PropertySlot::Accessor { get, set } => {
                if let Some(new) = desc.get {
                    *get = Some(new).filter(|get| !matches!(get, Value::Undefined));
                }

                if let Some(new) = desc.set {
                    *set = Some(new).filter(|set| !matches!(set, Value::Undefined));
                }
            }
        }

        if let Some(enumerable) = desc.enumerable {
            current.enumerable = enumerable;
        }

        if let Some(configurable) = desc.configurable {
            current.configurable = configurable;
        }

        Ok(())
    }

    /// Delete an own property (deleting a missing property succeeds)
    pub fn delete_property(&mut self, key: &PropertyKey) -> ObjectResult<()> {
        match self.properties.get(key) {
            None => Ok(()),
            Some(property) if property.configurable => {
                self.properties.remove(key);
                Ok(())
            }
            Some(_) => Err(ObjectError::NonConfigurable { key: key.clone() }),
        }
    }

    /// Append an element to an array
    pub fn push(&mut self, value: Value) -> ObjectResult<()> {
        let Some(length) = self.array_length() else {
            return Err(ObjectError::NotAnObject {
                operation: "Array.prototype.push",
                found: TypeOf::Object,
            });
        };

        self.set(PropertyKey::from(length), value)
    }

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    pub fn seal(&mut self) {
        self.extensible = false;

        for property in self.properties.values_mut() {
            property.configurable = false;
        }
    }

    pub fn freeze(&mut self) {
        self.extensible = false;

        for property in self.properties.values_mut() {
            property.configurable = false;

            if let PropertySlot::Data { value: _, writable } = &mut property.slot {
                *writable = false;
            }
        }
    }

    pub fn is_sealed(&self) -> bool {
        !self.extensible && self.properties.iter().all(|(_, prop)| !prop.configurable)
    }

    pub fn is_frozen(&self) -> bool {
        self.is_sealed()
            && self
                .properties
                .iter()
                .all(|(_, prop)| prop.writable() != Some(true))
    }

    /// Validate an assignment to an array's `length`, truncating the array if it shrinks
    ///
    /// Returns the value to store. Other keys and non-array objects are left untouched.
    fn check_array_length_update(
        &mut self,
        key: &PropertyKey,
        value: Value,
    ) -> ObjectResult<Value> {
        if !self.is_array() || !matches!(key, PropertyKey::String(key) if key == "length") {
            return Ok(value);
        }

        let length = match value {
            Value::Number(length)
                if length >= 0.0 && length.fract() == 0.0 && length < f64::from(u32::MAX) =>
            {
                length as u32
            }

            Value::Number(length) => {
                return Err(ObjectError::InvalidArrayLength {
                    found: length.to_string(),
                });
            }

            _ => {
                return Err(ObjectError::InvalidArrayLength {
                    found: value.type_of().to_string(),
                });
            }
        };

        let current = self.array_length().unwrap_or(0);

        if length == current {
            return Ok(Value::Number(f64::from(length)));
        }

        if self.properties.get(key).and_then(Property::writable) == Some(false) {
            return Err(ObjectError::NonWritable { key: key.clone() });
        }

        let removed = self
            .properties
            .keys()
            .into_iter()
            .filter(|key| key.array_index().is_some_and(|index| index >= length))
            .collect::<Vec<_>>();

        if let Some(key) = removed
            .iter()
            .find(|key| self.properties.get(key).is_some_and(|prop| !prop.configurable))
        {
            return Err(ObjectError::NonConfigurable { key: key.clone() });
        }

        for key in &removed {
            self.properties.remove(key);
        }

        Ok(Value::Number(f64::from(length)))
    }

    /// Make room for a new index property in an array
    fn grow_array_length(&mut self, key: &PropertyKey) -> ObjectResult<()> {
        if !self.is_array() {
            return Ok(());
        }

        let Some(index) = key.array_index() else {
            return Ok(());
        };

        let length_key = PropertyKey::from("length");

        let Some(length) = self.properties.get_mut(&length_key) else {
            return Ok(());
        };

        if let PropertySlot::Data { value, writable } = &mut length.slot {
            let current = match value {
                Value::Number(current) => *current,
                _ => 0.0,
            };

            let wanted = f64::from(index) + 1.0;

            if wanted > current {
                if !*writable {
                    return Err(ObjectError::NonWritable { key: length_key });
                }

                *value = Value::Number(wanted);
            }
        }

        Ok(())
    }
}

/// Mutations on values
///
/// Proxies forward these to their target (no trap intercepts them),
/// primitives are rejected like in strict mode code.
///
/// Proxy chains are bounded by the default [`RuntimeConf`](crate::conf::RuntimeConf) depth limit,
/// whatever configuration reflection is later performed with.
impl Value {
    /// Assign a property (`value[key] = content`)
    pub fn set(&self, key: impl Into<PropertyKey>, content: impl Into<Value>) -> ObjectResult<()> {
        self.target_for("set")?
            .write()
            .set(key.into(), content.into())
    }

    /// Define a property (`Object.defineProperty`)
    pub fn define_property(
        &self,
        key: impl Into<PropertyKey>,
        desc: PropertyDescriptor,
    ) -> ObjectResult<()> {
        // Accessors must be checked before locking, as they may be the object itself
        desc.validate()?;

        self.target_for("Object.defineProperty")?
            .write()
            .apply_descriptor(key.into(), desc)
    }

    /// Delete a property (`delete value[key]`)
    pub fn delete_property(&self, key: impl Into<PropertyKey>) -> ObjectResult<()> {
        self.target_for("delete")?
            .write()
            .delete_property(&key.into())
    }

    /// Append an element (`Array.prototype.push`)
    pub fn push(&self, content: impl Into<Value>) -> ObjectResult<()> {
        self.target_for("Array.prototype.push")?
            .write()
            .push(content.into())
    }

    /// `Object.preventExtensions` (no-op on primitives)
    pub fn prevent_extensions(&self) -> ObjectResult<()> {
        if let Some(target) = resolve_target(self, "Object.preventExtensions")? {
            target.write().prevent_extensions();
        }

        Ok(())
    }

    /// `Object.seal` (no-op on primitives)
    pub fn seal(&self) -> ObjectResult<()> {
        if let Some(target) = resolve_target(self, "Object.seal")? {
            target.write().seal();
        }

        Ok(())
    }

    /// `Object.freeze` (no-op on primitives)
    pub fn freeze(&self) -> ObjectResult<()> {
        if let Some(target) = resolve_target(self, "Object.freeze")? {
            target.write().freeze();
        }

        Ok(())
    }

    /// `Object.isSealed` (primitives are sealed)
    pub fn is_sealed(&self) -> ObjectResult<bool> {
        Ok(resolve_target(self, "Object.isSealed")?.is_none_or(|target| target.read().is_sealed()))
    }

    /// `Object.isFrozen` (primitives are frozen)
    pub fn is_frozen(&self) -> ObjectResult<bool> {
        Ok(resolve_target(self, "Object.isFrozen")?.is_none_or(|target| target.read().is_frozen()))
    }

    fn target_for(&self, operation: &'static str) -> ObjectResult<ObjectRef> {
        resolve_target(self, operation)?.ok_or_else(|| ObjectError::NotAnObject {
            operation,
            found: self.type_of(),
        })
    }
}
