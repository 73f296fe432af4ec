//! Typed, defaulted view over the parsed input documents of one run.

use crate::error::CheckError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Selects a value inside a named document by dotted path.
///
/// An empty path selects the whole document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    document: String,
    path: String,
}

impl Field {
    pub fn new(document: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            path: path.into(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child(&self, key: &str) -> Field {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        Field::new(self.document.clone(), path)
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.document)
        } else {
            write!(f, "{}.{}", self.document, self.path)
        }
    }
}

/// Selects a list of strings: either a list of scalars, or the `key` member
/// of each object in a list. Plain strings are accepted in either form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Items {
    field: Field,
    key: Option<String>,
}

impl Items {
    pub fn strings(field: Field) -> Self {
        Self { field, key: None }
    }

    pub fn key(field: Field, key: &str) -> Self {
        Self {
            field,
            key: Some(key.to_string()),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }
}

impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}[].{}", self.field, key),
            None => write!(f, "{}[]", self.field),
        }
    }
}

/// Header-keyed rows parsed from a tabular input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<BTreeMap<String, String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<BTreeMap<String, String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[BTreeMap<String, String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` in row order. `table` names the table in errors.
    pub fn column_values(&self, table: &str, column: &str) -> Result<Vec<&str>, CheckError> {
        let missing = || CheckError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        };
        if !self.columns.iter().any(|c| c == column) && !self.rows.is_empty() {
            return Err(missing());
        }
        self.rows
            .iter()
            .map(|row| row.get(column).map(String::as_str).ok_or_else(missing))
            .collect()
    }
}

/// An input that could not be obtained or parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFailure {
    pub input: String,
    pub reason: String,
}

impl InputFailure {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InputFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Immutable view over one evaluation's inputs.
///
/// Getters resolve absent optional values to documented defaults (empty
/// list, `None`) and only fail when a value is present but has the wrong
/// shape, or when the caller asks for a required value via a `require_*`
/// accessor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    documents: BTreeMap<String, Value>,
    tables: BTreeMap<String, Table>,
    failures: Vec<InputFailure>,
}

#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    inner: Snapshot,
}

impl SnapshotBuilder {
    pub fn document(mut self, name: impl Into<String>, value: Value) -> Self {
        self.inner.documents.insert(name.into(), value);
        self
    }

    pub fn table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.inner.tables.insert(name.into(), table);
        self
    }

    pub fn failure(mut self, failure: InputFailure) -> Self {
        self.inner.failures.push(failure);
        self
    }

    pub fn build(self) -> Snapshot {
        self.inner
    }
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn failures(&self) -> &[InputFailure] {
        &self.failures
    }

    pub fn document(&self, name: &str) -> Option<&Value> {
        self.documents.get(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn require_table(&self, name: &str) -> Result<&Table, CheckError> {
        self.table(name)
            .ok_or_else(|| CheckError::MissingTable(name.to_string()))
    }

    /// Table names starting with `prefix`, in lexicographic order.
    pub fn table_names(&self, prefix: &str) -> impl Iterator<Item = &str> {
        self.tables
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }

    /// The value at `field`; `null` is treated as absent.
    pub fn value(&self, field: &Field) -> Option<&Value> {
        let mut current = self.documents.get(field.document())?;
        for segment in field.segments() {
            current = current.as_object()?.get(segment)?;
        }
        if current.is_null() { None } else { Some(current) }
    }

    pub fn text(&self, field: &Field) -> Option<String> {
        self.value(field).and_then(scalar_to_string)
    }

    /// Absent or `null` resolves to `None`; numeric strings are accepted.
    pub fn number(&self, field: &Field) -> Result<Option<f64>, CheckError> {
        match self.value(field) {
            None => Ok(None),
            Some(v) => value_number(v, &field.to_string()),
        }
    }

    pub fn number_or(&self, field: &Field, default: f64) -> Result<f64, CheckError> {
        Ok(self.number(field)?.unwrap_or(default))
    }

    pub fn require_number(&self, field: &Field) -> Result<f64, CheckError> {
        self.number(field)?
            .ok_or_else(|| CheckError::MissingField(field.to_string()))
    }

    /// Absent resolves to an empty list.
    pub fn list(&self, field: &Field) -> Result<&[Value], CheckError> {
        match self.value(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(CheckError::NotAList(field.to_string())),
        }
    }

    pub fn require_list(&self, field: &Field) -> Result<&[Value], CheckError> {
        if self.value(field).is_none() {
            return Err(CheckError::MissingField(field.to_string()));
        }
        self.list(field)
    }

    pub fn items(&self, items: &Items) -> Result<Vec<String>, CheckError> {
        let list = self.list(&items.field)?;
        list.iter()
            .enumerate()
            .map(|(i, item)| match (&items.key, item) {
                (_, Value::String(s)) => Ok(s.clone()),
                (Some(key), Value::Object(obj)) => obj
                    .get(key)
                    .and_then(scalar_to_string)
                    .ok_or_else(|| CheckError::MissingField(format!("{}[{i}].{key}", items.field))),
                (_, other) => scalar_to_string(other)
                    .ok_or_else(|| CheckError::NotAString(format!("{}[{i}]", items.field))),
            })
            .collect()
    }
}

/// Strings, numbers, and booleans as text; anything else is `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interpret a JSON value as a number. `null` is `None`; numeric strings are
/// parsed; anything else is a [`CheckError::NotNumeric`] naming `label`.
pub fn value_number(value: &Value, label: &str) -> Result<Option<f64>, CheckError> {
    let not_numeric = || CheckError::NotNumeric {
        field: label.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(not_numeric),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| not_numeric()),
        _ => Err(not_numeric()),
    }
}
