//! Field coercion primitives shared by every SIDeR crate.
//!
//! Rows handed to us by the query layer are loosely typed: a column may hold a string, a number,
//! an empty string or nothing at all. Everything downstream works with "present or absent"
//! semantics instead, so the helpers here normalise raw values once at the edge:
//!
//! - [`present_or_absent`] turns empty or missing values into `None`
//! - [`boolean_from_presence`] treats a recorded value as a `true` flag
//! - [`present`] plugs the same rules into serde for typed row schemas
//! - [`NonEmptyText`] carries values that must never be blank (identifiers, config)

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Returns the value unchanged if it is present and non-empty, otherwise `None`.
///
/// Never fails: an empty string and a missing value are both simply "absent".
pub fn present_or_absent<S: AsRef<str>>(value: Option<S>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.as_ref())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Returns `true` when a value was recorded at all.
///
/// Used for flags whose mere presence denotes a true condition, e.g. a recorded date of death
/// implies the patient is deceased.
pub fn boolean_from_presence<S: AsRef<str>>(value: Option<S>) -> bool {
    present_or_absent(value).is_some()
}

/// Serde adapters applying [`present_or_absent`] while deserialising row columns.
///
/// Scalars of any JSON-ish type are accepted: strings pass through, numbers and booleans are
/// rendered to their string form, and `null`/empty strings become absent.
///
/// ```ignore
/// #[derive(serde::Deserialize)]
/// struct Row {
///     #[serde(rename = "MRN", deserialize_with = "sider_types::present::required")]
///     mrn: NonEmptyText,
///     #[serde(default, deserialize_with = "sider_types::present::optional")]
///     dob: Option<String>,
/// }
/// ```
pub mod present {
    use super::NonEmptyText;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(super::present_or_absent(Some(v)))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(if v.is_empty() { None } else { Some(v) })
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(ScalarVisitor)
        }
    }

    /// Deserialise an optional scalar column.
    pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }

    /// Deserialise a scalar column that must carry a value.
    pub fn required<'de, D>(deserializer: D) -> Result<NonEmptyText, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = deserializer
            .deserialize_any(ScalarVisitor)?
            .ok_or_else(|| de::Error::custom("value is required but was empty"))?;
        NonEmptyText::new(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct SampleRow {
        #[serde(rename = "ID", deserialize_with = "present::required")]
        id: NonEmptyText,
        #[serde(default, deserialize_with = "present::optional")]
        name: Option<String>,
        #[serde(default, deserialize_with = "present::optional")]
        count: Option<String>,
    }

    #[test]
    fn present_or_absent_treats_empty_as_absent() {
        assert_eq!(present_or_absent(Some("abc")), Some("abc".to_string()));
        assert_eq!(present_or_absent(Some("")), None);
        assert_eq!(present_or_absent::<&str>(None), None);
    }

    #[test]
    fn boolean_from_presence_follows_presence() {
        assert!(boolean_from_presence(Some("2019-01-01")));
        assert!(!boolean_from_presence(Some("")));
        assert!(!boolean_from_presence::<String>(None));
    }

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  x ").expect("valid").as_str(), "x");
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn row_columns_accept_mixed_scalars() {
        let row: SampleRow = serde_json::from_value(serde_json::json!({
            "ID": 1234,
            "name": "",
            "count": 2.5
        }))
        .expect("row should deserialise");
        assert_eq!(row.id.as_str(), "1234");
        assert_eq!(row.name, None);
        assert_eq!(row.count.as_deref(), Some("2.5"));
    }

    #[test]
    fn missing_optional_columns_default_to_absent() {
        let row: SampleRow =
            serde_json::from_value(serde_json::json!({ "ID": "A1", "name": null }))
                .expect("row should deserialise");
        assert_eq!(row.name, None);
        assert_eq!(row.count, None);
    }

    #[test]
    fn required_column_rejects_null_and_empty() {
        let null_id = serde_json::from_value::<SampleRow>(serde_json::json!({ "ID": null }));
        assert!(null_id.is_err());
        let empty_id = serde_json::from_value::<SampleRow>(serde_json::json!({ "ID": "" }));
        assert!(empty_id.is_err());
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = serde_json::from_value::<SampleRow>(serde_json::json!({
            "ID": "A1",
            "name": { "nested": true }
        }));
        assert!(err.is_err());
    }
}
