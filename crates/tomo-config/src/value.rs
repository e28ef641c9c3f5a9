//! Typed configuration values
//!
//! Node contents and option values are stored as loosely typed values and
//! converted on lookup, so `"3"` and `3` both satisfy a numerical query.

use std::fmt;

/// A single configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Numerical list, nested lists are stored row-major
    List(Vec<f64>),
}

impl ConfigValue {
    /// Interpret the value as a number
    ///
    /// Text is parsed after trimming whitespace. Booleans and lists are never
    /// numerical.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::List(_) => None,
        }
    }

    /// Interpret the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) if *n == 1.0 => Some(true),
            Self::Number(n) if *n == 0.0 => Some(false),
            Self::Text(s) => match s.trim() {
                "1" | "yes" | "true" | "True" => Some(true),
                "0" | "no" | "false" | "False" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a numerical list
    ///
    /// A single number is a list of length one. Text is split on commas,
    /// semicolons and whitespace.
    pub fn as_list(&self) -> Option<Vec<f64>> {
        match self {
            Self::List(values) => Some(values.clone()),
            Self::Number(n) => Some(vec![*n]),
            Self::Text(s) => s
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(|part| part.parse().ok())
                .collect(),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::List(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for ConfigValue {
    fn from(value: Vec<f64>) -> Self {
        Self::List(value)
    }
}

impl From<&[f64]> for ConfigValue {
    fn from(value: &[f64]) -> Self {
        Self::List(value.to_vec())
    }
}
