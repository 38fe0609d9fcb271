use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// A scalar literal that ends up in generated SQL.
///
/// Values never reach SQL text directly; they are always passed through the
/// dialect's quoting primitive by the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        use Value::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Int(v) => v.hash(state),
            Float(v) => {
                // Hash the bits of the float to handle NaN and -0.0 correctly
                let bits = v.to_bits();
                bits.hash(state);
            }
            String(v) => v.hash(state),
            Boolean(v) => v.hash(state),
            Null => {}
        }
    }
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::String(v) => v.trim().parse::<f64>().ok(),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Null => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Float(_) => None,
            Value::String(v) => v.trim().parse::<i64>().ok(),
            Value::Boolean(v) => Some(i64::from(*v)),
            Value::Null => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(if *v { "1".into() } else { "0".into() }),
            Value::Null => None,
        }
    }

    /// Grid checkboxes send `true`, `1`, `"1"`, `"true"` or `"on"`.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::String(v) => matches!(
                v.trim().to_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
            Value::Boolean(v) => *v,
            Value::Null => false,
        }
    }

    /// Turns a numeric-looking value into a number literal, leaving anything
    /// else as it is.
    pub fn to_numeric(&self) -> Value {
        match self {
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Value::Int(i)
                } else if let Ok(f) = trimmed.parse::<f64>()
                    && f.is_finite()
                {
                    Value::Float(f)
                } else {
                    self.clone()
                }
            }
            Value::Boolean(b) => Value::Int(i64::from(*b)),
            other => other.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_numeric() {
        assert_eq!(Value::from("42").to_numeric(), Value::Int(42));
        assert_eq!(Value::from(" 4.5 ").to_numeric(), Value::Float(4.5));
        assert_eq!(Value::from("abc").to_numeric(), Value::from("abc"));
        assert_eq!(Value::Boolean(true).to_numeric(), Value::Int(1));
    }

    #[test]
    fn test_as_bool() {
        assert!(Value::from("1").as_bool());
        assert!(Value::from("true").as_bool());
        assert!(Value::Int(1).as_bool());
        assert!(!Value::from("0").as_bool());
        assert!(!Value::from("").as_bool());
        assert!(!Value::Null.as_bool());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Float(3.0).as_i64(), Some(3));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert_eq!(Value::from("17").as_i64(), Some(17));
    }
}
