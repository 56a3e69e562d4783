//! Closed value model shared across the runtime boundary.

use std::fmt;

/// Type tag of a [`RuntimeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    Str,
    Array,
    Hash,
    Error,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "NULL",
            Self::Bool => "BOOLEAN",
            Self::Number => "NUMBER",
            Self::Str => "STRING",
            Self::Array => "ARRAY",
            Self::Hash => "HASH",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A value produced or consumed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeValue {
    /// The canonical "no value" sentinel.
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<RuntimeValue>),
    /// Mapping with insertion-ordered keys.
    Hash(Vec<(String, RuntimeValue)>),
    Error(String),
}

impl RuntimeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::Str(_) => ValueKind::Str,
            Self::Array(_) => ValueKind::Array,
            Self::Hash(_) => ValueKind::Hash,
            Self::Error(_) => ValueKind::Error,
        }
    }

    /// True for the runtime's "no printable result" sentinel.
    pub fn is_no_value(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Look up `key` in a hash value.
    pub fn get(&self, key: &str) -> Option<&RuntimeValue> {
        match self {
            Self::Hash(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert or replace `key` in a hash value. No-op for other kinds.
    pub fn set(&mut self, key: String, value: RuntimeValue) {
        if let Self::Hash(pairs) = self {
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
    }

    /// Printed form shown in the transcript and in completion comments.
    pub fn printed(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.nested_form(),
        }
    }

    fn nested_form(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Str(s) => quote(s),
            Self::Array(items) => {
                let inner: Vec<String> = items.iter().map(Self::nested_form).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Hash(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.nested_form()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Error(msg) => format!("ERROR: {msg}"),
        }
    }
}

/// Integers print without a fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
