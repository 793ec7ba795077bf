//!
//! Realm: intrinsic prototypes, value factories and the global symbol registry.
//!

use indexmap::IndexMap;

use crate::{
    errors::{ObjectError, ObjectResult},
    gc::GcCell,
    props::{Property, PropertyKey, PropertySlot},
    values::{ConstructorBody, FunctionValue, ObjectKind, ObjectValue, Symbol, Value},
};

/// Methods installed (non-enumerable) on `Object.prototype`
static OBJECT_PROTOTYPE_METHODS: &[&str] = &[
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
];

/// Methods installed (non-enumerable) on `Array.prototype`
static ARRAY_PROTOTYPE_METHODS: &[&str] = &[
    "concat", "every", "filter", "find", "forEach", "includes", "indexOf", "join", "map", "pop",
    "push", "reduce", "slice", "some", "sort",
];

/// Methods installed (non-enumerable) on `Function.prototype`
static FUNCTION_PROTOTYPE_METHODS: &[&str] = &["apply", "bind", "call", "toString"];

/// Set of intrinsics all values created through it share
#[derive(Debug, Clone)]
pub struct Realm {
    object_prototype: Value,
    array_prototype: Value,
    function_prototype: Value,
    symbol_registry: GcCell<IndexMap<String, Symbol>>,
}

impl Realm {
    pub fn new() -> Self {
        let object_prototype = Value::Object(GcCell::new(ObjectValue::new(
            ObjectKind::Ordinary,
            None,
        )));

        let function_prototype = Value::Object(GcCell::new(ObjectValue::new(
            ObjectKind::Function(FunctionValue {
                name: String::new(),
                constructor: None,
            }),
            Some(object_prototype.clone()),
        )));

        let array_prototype = Value::Object(GcCell::new(array_object(Some(
            object_prototype.clone(),
        ))));

        let realm = Self {
            object_prototype,
            array_prototype,
            function_prototype,
            symbol_registry: GcCell::new(IndexMap::new()),
        };

        for (prototype, methods) in [
            (&realm.object_prototype, OBJECT_PROTOTYPE_METHODS),
            (&realm.array_prototype, ARRAY_PROTOTYPE_METHODS),
            (&realm.function_prototype, FUNCTION_PROTOTYPE_METHODS),
        ] {
            if let Value::Object(prototype) = prototype {
                let mut prototype = prototype.write();

                for name in methods {
                    prototype.properties.insert(
                        PropertyKey::from(*name),
                        Property::hidden(realm.new_function(*name)),
                    );
                }
            }
        }

        realm
    }

    /// `Object.prototype`
    pub fn object_prototype(&self) -> &Value {
        &self.object_prototype
    }

    /// `Array.prototype`
    pub fn array_prototype(&self) -> &Value {
        &self.array_prototype
    }

    /// `Function.prototype`
    pub fn function_prototype(&self) -> &Value {
        &self.function_prototype
    }

    /// Create an empty object literal (`{}`)
    pub fn new_object(&self) -> Value {
        Value::Object(GcCell::new(ObjectValue::new(
            ObjectKind::Ordinary,
            Some(self.object_prototype.clone()),
        )))
    }

    /// Create an object literal from a list of entries (`{ a: 1, [sym]: 2 }`)
    pub fn new_object_from<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let mut obj = ObjectValue::new(ObjectKind::Ordinary, Some(self.object_prototype.clone()));

        for (key, value) in entries {
            obj.properties
                .insert(key.into(), Property::data(value.into()));
        }

        Value::Object(GcCell::new(obj))
    }

    /// Create an object with a given prototype (`Object.create(proto)`)
    ///
    /// `None` creates a null-prototype object.
    pub fn new_object_with_proto(&self, prototype: Option<&Value>) -> ObjectResult<Value> {
        if let Some(prototype) = prototype {
            if !prototype.is_object() {
                return Err(ObjectError::NotAnObject {
                    operation: "Object.create",
                    found: prototype.type_of(),
                });
            }
        }

        Ok(Value::Object(GcCell::new(ObjectValue::new(
            ObjectKind::Ordinary,
            prototype.cloned(),
        ))))
    }

    /// Create an array (`[a, b, c]`)
    pub fn new_array(&self, items: impl IntoIterator<Item = Value>) -> Value {
        let mut array = array_object(Some(self.array_prototype.clone()));

        let mut length: u32 = 0;

        for item in items {
            array
                .properties
                .insert(PropertyKey::from(length), Property::data(item));

            length += 1;
        }

        set_array_length(&mut array, length);

        Value::Object(GcCell::new(array))
    }

    /// Create a function which can't be used as a constructor
    pub fn new_function(&self, name: impl Into<String>) -> Value {
        Value::Object(GcCell::new(self.function_object(name.into(), None)))
    }

    /// Create a constructor function
    ///
    /// Its `prototype` property is an object whose `constructor` property points back to it.
    /// `body` runs on each instance created with [`Realm::construct`].
    pub fn new_constructor(&self, name: impl Into<String>, body: ConstructorBody) -> Value {
        let func = Value::Object(GcCell::new(self.function_object(name.into(), Some(body))));

        let prototype = self.new_object();

        if let (Value::Object(func_obj), Value::Object(proto_obj)) = (&func, &prototype) {
            proto_obj.write().properties.insert(
                PropertyKey::from("constructor"),
                Property::hidden(func.clone()),
            );

            func_obj.write().properties.insert(
                PropertyKey::from("prototype"),
                Property {
                    slot: PropertySlot::Data {
                        value: prototype.clone(),
                        writable: true,
                    },
                    enumerable: false,
                    configurable: false,
                },
            );
        }

        func
    }

    /// Instantiate a constructor (`new Ctor()`)
    pub fn construct(&self, constructor: &Value) -> ObjectResult<Value> {
        let not_a_constructor = |name: String| ObjectError::NotAConstructor { name };

        let Value::Object(func) = constructor else {
            return Err(not_a_constructor(constructor.type_of().to_string()));
        };

        let (body, prototype) = {
            let func = func.read();

            let Some(FunctionValue {
                name,
                constructor: body,
            }) = func.function()
            else {
                return Err(not_a_constructor("object".to_owned()));
            };

            let Some(body) = *body else {
                return Err(not_a_constructor(name.clone()));
            };

            let prototype = func
                .properties
                .get(&PropertyKey::from("prototype"))
                .and_then(Property::value)
                .filter(|prototype| prototype.is_object())
                .cloned()
                .unwrap_or_else(|| self.object_prototype.clone());

            (body, prototype)
        };

        let instance = Value::Object(GcCell::new(ObjectValue::new(
            ObjectKind::Ordinary,
            Some(prototype),
        )));

        body(&instance)?;

        Ok(instance)
    }

    /// Get a symbol from the global registry, creating it if required (`Symbol.for(key)`)
    pub fn symbol_for(&self, key: &str) -> Symbol {
        self.symbol_registry
            .write()
            .entry(key.to_owned())
            .or_insert_with(|| Symbol::new(key))
            .clone()
    }

    /// Get the key of a symbol from the global registry (`Symbol.keyFor(sym)`)
    pub fn symbol_key_for(&self, symbol: &Symbol) -> Option<String> {
        self.symbol_registry
            .read()
            .iter()
            .find(|(_, registered)| *registered == symbol)
            .map(|(key, _)| key.clone())
    }

    fn function_object(&self, name: String, constructor: Option<ConstructorBody>) -> ObjectValue {
        let mut func = ObjectValue::new(
            ObjectKind::Function(FunctionValue {
                name: name.clone(),
                constructor,
            }),
            Some(self.function_prototype.clone()),
        );

        for (key, value) in [("length", Value::Number(0.0)), ("name", Value::String(name))] {
            func.properties.insert(
                PropertyKey::from(key),
                Property {
                    slot: PropertySlot::Data {
                        value,
                        writable: false,
                    },
                    enumerable: false,
                    configurable: true,
                },
            );
        }

        func
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

fn array_object(prototype: Option<Value>) -> ObjectValue {
    let mut array = ObjectValue::new(ObjectKind::Array, prototype);
    set_array_length(&mut array, 0);
    array
}

fn set_array_length(array: &mut ObjectValue, length: u32) {
    array.properties.insert(
        PropertyKey::from("length"),
        Property {
            slot: PropertySlot::Data {
                value: Value::Number(f64::from(length)),
                writable: true,
            },
            enumerable: false,
            configurable: false,
        },
    );
}
