//! Named log field values.
//!
//! A [`Field`] is one `key = value` pair in a log record. The middleware
//! builds the fixed field set itself; applications add their own through
//! [`Config::custom_fields`](crate::Config::custom_fields).

use std::borrow::Cow;
use std::fmt;

/// One named log field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

/// The value side of a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
}

impl Field {
    /// A string field.
    pub fn str(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: FieldValue::Str(value.into()) }
    }

    /// A signed integer field.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self { key: key.into(), value: FieldValue::I64(value) }
    }

    /// An unsigned integer field.
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self { key: key.into(), value: FieldValue::U64(value) }
    }

    /// A floating-point field.
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self { key: key.into(), value: FieldValue::F64(value) }
    }

    /// A boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self { key: key.into(), value: FieldValue::Bool(value) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v)  => f.write_str(v),
            Self::I64(v)  => write!(f, "{v}"),
            Self::U64(v)  => write!(f, "{v}"),
            Self::F64(v)  => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Renders a field list as `k1=v1 k2=v2 …` — used by the built-in sinks to
/// carry dynamically-named custom fields inside a single statically-named
/// event field.
pub(crate) struct FieldList<'a>(pub(crate) &'a [Field]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_key_value() {
        assert_eq!(Field::str("route", "/users").to_string(), "route=/users");
        assert_eq!(Field::int("shard", -3).to_string(), "shard=-3");
        assert_eq!(Field::uint("tenant", 42).to_string(), "tenant=42");
        assert_eq!(Field::float("ratio", 0.5).to_string(), "ratio=0.5");
        assert_eq!(Field::bool("cached", true).to_string(), "cached=true");
    }

    #[test]
    fn field_list_is_space_separated() {
        let fields = [Field::str("a", "1"), Field::str("b", "2")];
        assert_eq!(FieldList(&fields).to_string(), "a=1 b=2");
    }
}
