//! Values passed to OpenSCAD as `-D` variable definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// An OpenSCAD literal
///
/// Deserializes from plain JSON values (`true`, `3`, `"text"`, `[1, 2]`), which
/// is how defines appear in a render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScadValue {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ScadValue>),
}

impl ScadValue {
    /// `-Dname=value` argument for this value
    pub fn define(&self, name: &str) -> String {
        format!("-D{}={}", name, self)
    }
}

impl fmt::Display for ScadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScadValue::Bool(value) => write!(f, "{}", value),
            ScadValue::Number(value) => write!(f, "{}", value),
            ScadValue::String(value) => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            ScadValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for ScadValue {
    fn from(value: bool) -> Self {
        ScadValue::Bool(value)
    }
}

impl From<f64> for ScadValue {
    fn from(value: f64) -> Self {
        ScadValue::Number(value)
    }
}

impl From<i32> for ScadValue {
    fn from(value: i32) -> Self {
        ScadValue::Number(value.into())
    }
}

impl From<&str> for ScadValue {
    fn from(value: &str) -> Self {
        ScadValue::String(value.to_string())
    }
}

impl From<String> for ScadValue {
    fn from(value: String) -> Self {
        ScadValue::String(value)
    }
}

impl<T: Into<ScadValue>> From<Vec<T>> for ScadValue {
    fn from(items: Vec<T>) -> Self {
        ScadValue::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(ScadValue::from(true).to_string(), "true");
        assert_eq!(ScadValue::from(3).to_string(), "3");
        assert_eq!(ScadValue::from(0.25).to_string(), "0.25");
        assert_eq!(ScadValue::from(-2.0).to_string(), "-2");
        assert_eq!(ScadValue::from("M3").to_string(), "\"M3\"");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(ScadValue::from(r#"a "b" \c"#).to_string(), r#""a \"b\" \\c""#);
    }

    #[test]
    fn test_nested_arrays() {
        let value = ScadValue::Array(vec![
            ScadValue::from(1),
            ScadValue::from(vec![2.5, 3.0]),
            ScadValue::from("x"),
        ]);
        assert_eq!(value.to_string(), r#"[1, [2.5, 3], "x"]"#);
        assert_eq!(ScadValue::Array(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn test_define() {
        assert_eq!(ScadValue::from(true).define("$preview"), "-D$preview=true");
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: ScadValue = serde_json::from_str(r#"[true, 2, "s", [1]]"#).unwrap();
        assert_eq!(
            value,
            ScadValue::Array(vec![
                ScadValue::Bool(true),
                ScadValue::Number(2.0),
                ScadValue::String("s".to_string()),
                ScadValue::Array(vec![ScadValue::Number(1.0)]),
            ])
        );
    }
}
