use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    errors::{ObjectError, ObjectResult},
    gc::{GcCell, GcReadOnlyCell},
    props::PropertyMap,
    proxy::ProxyValue,
};

/// Shared handle to an object
pub type ObjectRef = GcCell<ObjectValue>;

/// Shared handle to a proxy
pub type ProxyRef = GcReadOnlyCell<ProxyValue>;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    // These are copied around, they have no identity
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigIntValue),
    String(String),
    Symbol(Symbol),

    // Objects
    // Cloning one of these clones the handle, not the object
    Object(ObjectRef),
    Proxy(ProxyRef),
}

impl Value {
    /// Compute the runtime classification of a value (what `typeof` reports)
    pub fn type_of(&self) -> TypeOf {
        match self {
            Value::Undefined => TypeOf::Undefined,
            Value::Null => TypeOf::Object,
            Value::Bool(_) => TypeOf::Boolean,
            Value::Number(_) => TypeOf::Number,
            Value::BigInt(_) => TypeOf::BigInt,
            Value::String(_) => TypeOf::String,
            Value::Symbol(_) => TypeOf::Symbol,
            Value::Object(obj) => match obj.read().kind {
                ObjectKind::Function(_) => TypeOf::Function,
                ObjectKind::Ordinary | ObjectKind::Array => TypeOf::Object,
            },
            Value::Proxy(proxy) => {
                if proxy.is_callable() {
                    TypeOf::Function
                } else {
                    TypeOf::Object
                }
            }
        }
    }

    /// Check if a value is one of the two "no value" sentinels
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if a value is an object or a proxy (callable ones included)
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Proxy(_))
    }

    pub fn is_callable(&self) -> bool {
        self.type_of() == TypeOf::Function
    }

    /// SameValue comparison
    ///
    /// Primitives are compared by content (`NaN` is equal to itself, `+0` and `-0` differ),
    /// objects, proxies and symbols by identity.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b && a.is_sign_negative() == b.is_sign_negative()
                }
            }
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Proxy(a), Value::Proxy(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Identity of an object or proxy, used to detect cycles
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(obj) => Some(obj.addr()),
            Value::Proxy(proxy) => Some(proxy.addr()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<BigIntValue> for Value {
    fn from(value: BigIntValue) -> Self {
        Self::BigInt(value)
    }
}

/// Result of the `typeof` classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOf {
    Undefined,
    Object,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    Function,
}

impl TypeOf {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeOf::Undefined => "undefined",
            TypeOf::Object => "object",
            TypeOf::Boolean => "boolean",
            TypeOf::Number => "number",
            TypeOf::BigInt => "bigint",
            TypeOf::String => "string",
            TypeOf::Symbol => "symbol",
            TypeOf::Function => "function",
        }
    }
}

impl Display for TypeOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arbitrary-precision integer
///
/// Only its canonical decimal representation is stored, as no arithmetic is ever performed on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigIntValue(Box<str>);

impl BigIntValue {
    /// Parse a decimal integer (optional sign, digits, optional `n` suffix)
    pub fn parse(text: &str) -> ObjectResult<Self> {
        let invalid = || ObjectError::InvalidBigInt {
            text: text.to_owned(),
        };

        let trimmed = text.trim();
        let trimmed = trimmed.strip_suffix('n').unwrap_or(trimmed);

        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = digits.trim_start_matches('0');

        Ok(Self(
            match (digits.is_empty(), negative) {
                (true, _) => "0".to_owned(),
                (false, true) => format!("-{digits}"),
                (false, false) => digits.to_owned(),
            }
            .into_boxed_str(),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for BigIntValue {
    fn from(value: i64) -> Self {
        Self(value.to_string().into_boxed_str())
    }
}

impl Display for BigIntValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique symbol
///
/// Two symbols are only equal if they are the same symbol, descriptions are irrelevant.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

struct SymbolData {
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Self(Arc::new(SymbolData {
            description: Some(description.into()),
        }))
    }

    pub fn anonymous() -> Self {
        Self(Arc::new(SymbolData { description: None }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Content of an object
#[derive(Debug)]
pub struct ObjectValue {
    /// What kind of object this is
    pub kind: ObjectKind,

    /// Own properties
    pub properties: PropertyMap,

    /// Prototype (`None` for null-prototype objects)
    pub prototype: Option<Value>,

    /// Can new properties be added?
    pub extensible: bool,
}

impl ObjectValue {
    pub fn new(kind: ObjectKind, prototype: Option<Value>) -> Self {
        Self {
            kind,
            properties: PropertyMap::default(),
            prototype,
            extensible: true,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }

    pub fn function(&self) -> Option<&FunctionValue> {
        match &self.kind {
            ObjectKind::Function(func) => Some(func),
            ObjectKind::Ordinary | ObjectKind::Array => None,
        }
    }
}

/// Kind of an object
#[derive(Debug)]
pub enum ObjectKind {
    /// Keyed object (literals, instances, null-prototype objects)
    Ordinary,

    /// Ordered sequence, its elements are stored as index properties
    Array,

    /// Callable object
    Function(FunctionValue),
}

/// Callable part of a function object
#[derive(Debug)]
pub struct FunctionValue {
    /// Function's name (may be empty for anonymous functions)
    pub name: String,

    /// Body run by `new`, if the function is a constructor
    pub constructor: Option<ConstructorBody>,
}

/// Body of a native constructor, receiving the freshly created instance as `this`
pub type ConstructorBody = fn(&Value) -> ObjectResult<()>;
