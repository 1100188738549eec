//! Fixture-backed query executor.
//!
//! Serves rows from a JSON document instead of a database:
//!
//! ```json
//! { "sp_FHIR_IMS_Conditions": { "9999999999": [ { "PTdiagnosisID": "1", "MRN": "100234" } ] } }
//! ```
//!
//! Rows are keyed by procedure name and then by the query's filter value. An unknown procedure
//! is an execution failure; an unknown filter value simply matches no rows.

use crate::query::{QueryError, QueryExecutor, ResourceQuery, RowCursor};
use crate::row::Row;
use crate::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::Path;

type FixtureRows = BTreeMap<String, BTreeMap<String, Vec<Row>>>;

#[derive(Clone, Debug, Default)]
pub struct FixtureQueryExecutor {
    rows: FixtureRows,
}

impl FixtureQueryExecutor {
    /// Load fixtures from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FixtureRead`] if the file cannot be read and
    /// [`CoreError::FixtureParse`] if it is not a valid fixture document.
    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(CoreError::FixtureRead)?;
        Self::from_json_str(&text)
    }

    /// Parse fixtures from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FixtureParse`] if the text is not a valid fixture document.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let rows: FixtureRows = serde_json::from_str(text).map_err(CoreError::FixtureParse)?;
        Ok(Self { rows })
    }

    /// Register rows for `procedure` and `filter_value`.
    pub fn insert(&mut self, procedure: &str, filter_value: &str, rows: Vec<Row>) {
        self.rows
            .entry(procedure.to_owned())
            .or_default()
            .insert(filter_value.to_owned(), rows);
    }

    pub fn procedures(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

impl QueryExecutor for FixtureQueryExecutor {
    fn execute(&self, query: &ResourceQuery, _api_key: &str) -> Result<RowCursor, QueryError> {
        let by_value = self.rows.get(query.procedure).ok_or_else(|| {
            QueryError::Execution(format!(
                "Could not find stored procedure '{}'",
                query.procedure
            ))
        })?;

        let rows = by_value
            .get(&query.filter.value)
            .cloned()
            .unwrap_or_default();
        tracing::debug!(
            procedure = query.procedure,
            rows = rows.len(),
            "served rows from fixtures"
        );
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use crate::ResourceKind;
    use std::io::Write;

    const FIXTURES: &str = r#"{
        "sp_FHIR_IMS_Flag_Read": {
            "A1": [ { "PT_alertID": "A1", "MRN": "100234" } ]
        }
    }"#;

    fn read_query(kind: ResourceKind, id: &str) -> ResourceQuery {
        QueryBuilder::new("https://fhir.nhs.uk/Id/nhs-number")
            .build_read(kind, id)
            .expect("query")
    }

    #[test]
    fn loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(FIXTURES.as_bytes()).expect("write fixtures");

        let executor = FixtureQueryExecutor::from_path(file.path()).expect("load fixtures");
        assert_eq!(executor.procedures().collect::<Vec<_>>(), ["sp_FHIR_IMS_Flag_Read"]);

        let rows: Vec<Row> = executor
            .execute(&read_query(ResourceKind::Flag, "A1"), "key")
            .expect("execute")
            .collect::<Result<_, _>>()
            .expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("MRN").and_then(|v| v.as_str()), Some("100234"));
    }

    #[test]
    fn unknown_value_matches_nothing() {
        let executor = FixtureQueryExecutor::from_json_str(FIXTURES).expect("fixtures");
        let rows = executor
            .execute(&read_query(ResourceKind::Flag, "missing"), "key")
            .expect("execute");
        assert_eq!(rows.count(), 0);
    }

    #[test]
    fn unknown_procedure_is_an_execution_failure() {
        let executor = FixtureQueryExecutor::from_json_str(FIXTURES).expect("fixtures");
        let err = executor
            .execute(&read_query(ResourceKind::Condition, "1"), "key")
            .err()
            .expect("should fail");
        assert!(err.to_string().contains("sp_FHIR_IMS_Condition_Read"));
    }

    #[test]
    fn reports_missing_and_invalid_files() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let err = FixtureQueryExecutor::from_path(dir.path().join("absent.json"))
            .expect_err("should fail");
        assert!(matches!(err, CoreError::FixtureRead(_)));

        let err = FixtureQueryExecutor::from_json_str("[1, 2]").expect_err("should fail");
        assert!(matches!(err, CoreError::FixtureParse(_)));
    }
}
