//! Raw result rows.
//!
//! A [`Row`] is exactly what the query layer hands back: a flat mapping from column name to a
//! scalar. Rows are never merged and never mutated; each one is decoded into the typed schema for
//! its resource kind (see [`crate::schema`]) and mapped to exactly one resource.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row from a named query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style column setter, mostly useful for fixtures and tests.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_owned(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode this row into a typed row schema.
    ///
    /// `resource_type` only labels the error. Failures carry the offending column path as
    /// reported by `serde_path_to_error`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RowSchema`] if a required column is missing or empty, or if any
    /// column holds a non-scalar value.
    pub fn decode<T: DeserializeOwned>(&self, resource_type: &'static str) -> CoreResult<T> {
        let value = Value::Object(self.0.clone());
        serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
            let path = err.path().to_string();
            let source = err.into_inner();
            CoreError::RowSchema {
                resource_type,
                path: if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                },
                message: source.to_string(),
            }
        })
    }
}

impl From<Map<String, Value>> for Row {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Narrow {
        #[serde(rename = "ID", deserialize_with = "sider_types::present::required")]
        id: sider_types::NonEmptyText,
        #[serde(default, deserialize_with = "sider_types::present::optional")]
        note: Option<String>,
    }

    #[test]
    fn decodes_typed_schema() {
        let row = Row::new().with("ID", 7).with("note", "hello").with("extra", "ignored");
        let narrow: Narrow = row.decode("Test").expect("decode");
        assert_eq!(narrow.id.as_str(), "7");
        assert_eq!(narrow.note.as_deref(), Some("hello"));
    }

    #[test]
    fn schema_errors_name_the_column() {
        let row = Row::new()
            .with("ID", "1")
            .with("note", serde_json::json!(["not", "scalar"]));
        let err = row.decode::<Narrow>("Test").expect_err("should fail");
        match err {
            CoreError::RowSchema {
                resource_type,
                path,
                ..
            } => {
                assert_eq!(resource_type, "Test");
                assert_eq!(path, "note");
            }
            other => panic!("expected RowSchema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = Row::new().decode::<Narrow>("Test").expect_err("should fail");
        assert!(err.to_string().contains("ID"));
    }
}
