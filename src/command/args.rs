//! Typed command arguments and lenient coercion from raw field text.

use std::collections::BTreeMap;
use std::fmt;

/// Declared datatype of a command parameter. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Bool,
    Int,
    Float,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    /// The value substituted when a field fails to parse.
    pub fn zero_value(self) -> ArgValue {
        match self {
            Self::String => ArgValue::String(String::new()),
            Self::Bool => ArgValue::Bool(false),
            Self::Int => ArgValue::Int(0),
            Self::Float => ArgValue::Float(0.0),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coerced value of one command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ArgValue {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
        }
    }
}

/// Converts raw field text into a value of the declared type.
///
/// Never fails: text that does not parse becomes the type's zero value so one
/// malformed field cannot block the whole command.
pub fn coerce(raw: &str, datatype: DataType) -> ArgValue {
    match datatype {
        DataType::String => ArgValue::String(raw.to_string()),
        DataType::Bool => ArgValue::Bool(parse_bool(&raw.to_lowercase()).unwrap_or(false)),
        DataType::Int => ArgValue::Int(raw.parse::<i64>().unwrap_or(0)),
        DataType::Float => ArgValue::Float(raw.parse::<f64>().unwrap_or(0.0)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Argument map handed to the dispatcher, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(BTreeMap<String, ArgValue>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ArgValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(ArgValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(ArgValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(ArgValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}
