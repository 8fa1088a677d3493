//! Parameter values and serialisable filter requests.
//!
//! A [`FilterSpec`] is how an outer layer asks for a filter: an id plus named
//! primitive parameters, round-tripped through JSON.

use crate::core::error::ImagingResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive parameter value.
///
/// Untagged so that requests read naturally: `{"kernel_size": 5, "sigma": 1.4}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
}

/// The type a parameter accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Whole numbers.
    Integer,
    /// Real numbers; integers are accepted too.
    Float,
    /// Free text or an enumerated choice.
    String,
}

impl Value {
    /// Get the parameter type of this value.
    pub fn get_type(&self) -> ParamType {
        match self {
            Value::Integer(_) => ParamType::Integer,
            Value::Float(_) => ParamType::Float,
            Value::String(_) => ParamType::String,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::String(_) => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl ParamType {
    /// Check if a value matches this type.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ParamType::Integer, Value::Integer(_))
                | (ParamType::Float, Value::Float(_))
                | (ParamType::Float, Value::Integer(_))
                | (ParamType::String, Value::String(_))
        )
    }

    /// Get the display name for this type.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParamType::Integer => "Integer",
            ParamType::Float => "Float",
            ParamType::String => "String",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A request to build one filter: its registry id and parameter overrides.
///
/// Parameters left out take the filter's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Registry id, e.g. `"gaussian"`.
    pub filter: String,
    /// Named parameter overrides.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, Value>,
}

impl FilterSpec {
    /// Request `filter` with default parameters.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            params: IndexMap::new(),
        }
    }

    /// Override one parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> ImagingResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> ImagingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> ImagingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
