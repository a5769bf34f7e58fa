//! Allowed fields: public names clients may request and the storage columns behind them.

use crate::case::to_snake_case;
use crate::request::set_array_value_delimiter;

/// One publicly exposable field. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowedField {
    name: String,
    /// Empty means the public name is the storage name.
    internal_names: Vec<String>,
}

impl AllowedField {
    /// Field whose storage column has the same name as the public name.
    pub fn new(name: impl Into<String>) -> Self {
        AllowedField {
            name: name.into(),
            internal_names: Vec::new(),
        }
    }

    /// Field exposed under `name` that expands to one or more storage columns.
    pub fn aliased<I, S>(name: impl Into<String>, internal_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedField {
            name: name.into(),
            internal_names: internal_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Like [`AllowedField::aliased`], also setting the process-wide array value delimiter when one
    /// is given.
    pub fn partial<I, S>(name: impl Into<String>, internal_names: I, array_value_delimiter: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::set_array_value_delimiter(array_value_delimiter);
        Self::aliased(name, internal_names)
    }

    /// No-op when `delimiter` is `None`.
    pub fn set_array_value_delimiter(delimiter: Option<&str>) {
        set_array_value_delimiter(delimiter);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage names for this field, snake-cased when `snake_case` is set. Falls back to the public
    /// name when no internal names were declared.
    pub fn internal_names(&self, snake_case: bool) -> Vec<String> {
        let names: Vec<&str> = if self.internal_names.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.internal_names.iter().map(String::as_str).collect()
        };
        names
            .into_iter()
            .map(|n| if snake_case { to_snake_case(n) } else { n.to_string() })
            .collect()
    }
}

/// Allow-list entry as handed to registration: a bare name or a prepared [`AllowedField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Name(String),
    Field(AllowedField),
}

impl FieldInput {
    pub fn into_allowed_field(self) -> AllowedField {
        match self {
            FieldInput::Name(name) => AllowedField::new(name),
            FieldInput::Field(field) => field,
        }
    }
}

impl From<&str> for FieldInput {
    fn from(name: &str) -> Self {
        FieldInput::Name(name.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(name: String) -> Self {
        FieldInput::Name(name)
    }
}

impl From<AllowedField> for FieldInput {
    fn from(field: AllowedField) -> Self {
        FieldInput::Field(field)
    }
}
