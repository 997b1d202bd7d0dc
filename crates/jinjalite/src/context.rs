/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and context types.
//!
//! A [`Value`] is one of the three scalar kinds a template variable can be
//! bound to. A [`Context`] is the name→value binding set a template is
//! rendered against; loop rendering mutates it transiently, everything else
//! only reads it.

use std::collections::HashMap;

/// A scalar value bound to a template variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer value.
    Int(i64),

    /// A floating-point value.
    Float(f64),

    /// A string value.
    Text(String),
}

impl Value {
    /// Render this value as output text.
    ///
    /// - `Int`: decimal form
    /// - `Float`: decimal form, always with a fractional part (`2.0`, not `2`)
    /// - `Text`: the string itself
    pub fn render(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Check if this value is "truthy" for conditional evaluation.
    ///
    /// - `Int`: non-zero
    /// - `Float`: non-zero
    /// - `Text`: non-empty
    pub fn is_true(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Convert a JSON scalar into a template value.
    ///
    /// Integers map to `Int`, other numbers to `Float`, strings to `Text`,
    /// booleans to the conventional `Int` 1/0. Arrays, objects and null
    /// have no scalar form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// The set of name→value bindings a template is rendered against.
///
/// Keys are unique; each entry exclusively owns its value, so removing a
/// binding releases the value with it. Top-level rebinding through
/// [`Context::insert`] overwrites; the stricter no-shadowing rule for loop
/// variables is enforced by the `for` renderer, not by the map.
#[derive(Debug, Clone, Default)]
pub struct Context {
    bindings: HashMap<String, Value>,
}

impl Context {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any existing binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Remove the binding for `name`, returning the value it held.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Look up the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Check whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether the context has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
