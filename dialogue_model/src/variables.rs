//! Typed participant variables read by conditions and written by events.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four variable kinds a dialogue can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    Int,
    Float,
    Bool,
    Name,
}

impl VariableType {
    /// Zero value returned for variables that were never set.
    pub fn zero_value(&self) -> VariableValue {
        match self {
            VariableType::Int => VariableValue::Int(0),
            VariableType::Float => VariableValue::Float(0.0),
            VariableType::Bool => VariableValue::Bool(false),
            VariableType::Name => VariableValue::Name(String::new()),
        }
    }
}

/// A single typed variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Name(String),
}

impl VariableValue {
    /// Get the type of this value.
    pub fn variable_type(&self) -> VariableType {
        match self {
            VariableValue::Int(_) => VariableType::Int,
            VariableValue::Float(_) => VariableType::Float,
            VariableValue::Bool(_) => VariableType::Bool,
            VariableValue::Name(_) => VariableType::Name,
        }
    }
}

/// Per-participant variable storage.
///
/// Each type has its own namespace, so an int and a bool may share a name.
/// Reads of unknown names return the type's zero value and never fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    #[serde(default)]
    ints: HashMap<String, i64>,
    #[serde(default)]
    floats: HashMap<String, f64>,
    #[serde(default)]
    bools: HashMap<String, bool>,
    #[serde(default)]
    names: HashMap<String, String>,
}

impl VariableStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_int(&self, name: &str) -> i64 {
        self.ints.get(name).copied().unwrap_or(0)
    }

    pub fn get_float(&self, name: &str) -> f64 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn get_name(&self, name: &str) -> &str {
        self.names.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i64) {
        self.ints.insert(name.into(), value);
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f64) {
        self.floats.insert(name.into(), value);
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.bools.insert(name.into(), value);
    }

    pub fn set_name(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.names.insert(name.into(), value.into());
    }

    /// Read a variable of the given type, falling back to its zero value.
    pub fn get(&self, variable_type: VariableType, name: &str) -> VariableValue {
        match variable_type {
            VariableType::Int => VariableValue::Int(self.get_int(name)),
            VariableType::Float => VariableValue::Float(self.get_float(name)),
            VariableType::Bool => VariableValue::Bool(self.get_bool(name)),
            VariableType::Name => VariableValue::Name(self.get_name(name).to_string()),
        }
    }

    /// Upsert a variable. The value's type selects the namespace.
    pub fn set(&mut self, name: impl Into<String>, value: VariableValue) {
        match value {
            VariableValue::Int(v) => self.set_int(name, v),
            VariableValue::Float(v) => self.set_float(name, v),
            VariableValue::Bool(v) => self.set_bool(name, v),
            VariableValue::Name(v) => self.set_name(name, v),
        }
    }

    /// Check whether a variable of the given type was ever set.
    pub fn contains(&self, variable_type: VariableType, name: &str) -> bool {
        match variable_type {
            VariableType::Int => self.ints.contains_key(name),
            VariableType::Float => self.floats.contains_key(name),
            VariableType::Bool => self.bools.contains_key(name),
            VariableType::Name => self.names.contains_key(name),
        }
    }

    /// Total number of stored variables across all types.
    pub fn len(&self) -> usize {
        self.ints.len() + self.floats.len() + self.bools.len() + self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every variable.
    pub fn clear(&mut self) {
        self.ints.clear();
        self.floats.clear();
        self.bools.clear();
        self.names.clear();
    }
}
