use crate::model::enums::ValueSource;
use std::fmt::{Display, Formatter};

/// Represents a primitive config value delivered by the backend or supplied as a default.
///
/// # Examples
///
/// ```rust
/// use remote_config::Value;
///
/// let bool_val = Value::Bool(true);
/// let int_val = Value::Int(42);
/// ```
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A whole number value.
    Int(i64),
    /// A decimal number value.
    Float(f64),
    /// A text value.
    String(String),
}

impl Value {
    /// Reads the value as `bool`. Returns [`None`] if it's not a [`Value::Bool`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Value;
    ///
    /// let value = Value::Bool(true);
    /// assert!(value.as_bool().unwrap());
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `i64`. Returns [`None`] if it's not a [`Value::Int`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Value;
    ///
    /// let value = Value::Int(42);
    /// assert_eq!(value.as_int().unwrap(), 42);
    /// ```
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `f64`. Returns [`None`] if it's not a [`Value::Float`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Value;
    ///
    /// let value = Value::Float(3.14);
    /// assert_eq!(value.as_float().unwrap(), 3.14);
    /// ```
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as [`String`]. Returns [`None`] if it's not a [`Value::String`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Value;
    ///
    /// let value = Value::String("foo".to_owned());
    /// assert_eq!(value.as_str().unwrap(), "foo".to_owned());
    /// ```
    pub fn as_str(&self) -> Option<String> {
        if let Value::String(val) = self {
            return Some(val.clone());
        }
        None
    }

    /// Creates a [`Value`] from a [`serde_json::Value`]. Returns [`None`] if the conversion is not possible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Value;
    ///
    /// let json_str = serde_json::Value::String("foo".to_owned());
    /// assert_eq!(Value::String("foo".to_owned()), Value::from_json_val(&json_str).unwrap())
    /// ```
    pub fn from_json_val(json_val: &serde_json::Value) -> Option<Value> {
        match json_val {
            serde_json::Value::Bool(val) => Some(Value::Bool(*val)),
            serde_json::Value::String(val) => Some(Value::String(val.clone())),
            serde_json::Value::Number(val) => {
                if let Some(int_val) = val.as_i64() {
                    return Some(Value::Int(int_val));
                }
                if let Some(float_val) = val.as_f64() {
                    return Some(Value::Float(float_val));
                }
                None
            }
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(val) => write!(f, "{val}"),
            Value::Int(val) => write!(f, "{val}"),
            Value::Float(val) => write!(f, "{val}"),
            Value::String(val) => f.write_str(val),
        }
    }
}

/// Represents a primitive type that a config value can be read as.
pub trait ValuePrimitive: Into<Value> {
    /// Reads the primitive value from a [`Value`].
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! primitive_impl {
    ($ob:ident $to:ident $as_m:ident $t:ty) => (
        from_val_to_enum!($ob $to $t);

        impl ValuePrimitive for $t {
            fn from_value(value: &Value) -> Option<Self> {
                value.$as_m()
            }
        }
    )
}

primitive_impl!(Value String as_str String);
primitive_impl!(Value Float as_float f64);
primitive_impl!(Value Int as_int i64);
primitive_impl!(Value Bool as_bool bool);
from_val_to_enum_into!(Value String &str);
from_val_to_enum_into!(Value Int i32 u32);

/// The result of resolving a key: the value (if any) and the tier that satisfied the lookup.
///
/// # Examples
///
/// ```rust
/// use remote_config::{ConfigValue, Value, ValueSource};
///
/// let value = ConfigValue::new("welcome", Some(Value::from("hi")), ValueSource::Default);
/// assert_eq!(value.get::<String>().unwrap(), "hi");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValue {
    /// The key that was resolved.
    pub key: String,
    /// The resolved value. [`None`] when no tier holds a value for the key.
    pub value: Option<Value>,
    /// The tier the value was taken from.
    pub source: ValueSource,
}

impl ConfigValue {
    /// Creates a new [`ConfigValue`].
    pub fn new(key: &str, value: Option<Value>, source: ValueSource) -> Self {
        Self {
            key: key.to_owned(),
            value,
            source,
        }
    }

    pub(crate) fn unset(key: &str) -> Self {
        Self::new(key, None, ValueSource::Static)
    }

    /// Reads the resolved value as `T`. Returns [`None`] if there's no value or its type differs.
    pub fn get<T: ValuePrimitive>(&self) -> Option<T> {
        self.value.as_ref().and_then(T::from_value)
    }
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value} ({})", self.source),
            None => write!(f, "<undefined> ({})", self.source),
        }
    }
}
