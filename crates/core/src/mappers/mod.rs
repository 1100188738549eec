//! Resource mappers.
//!
//! Each mapper turns one typed row into one CareConnect resource. Mappers never fail on missing
//! optional data; the only failure is a row that cannot be decoded against its schema, which
//! [`map_row`] reports before any mapper runs.
//!
//! Shared policy lives here so it is applied identically by every mapper:
//! - subject references are `{base}/patient/{MRN}`
//! - `meta.lastUpdated` and every other date pass the sentinel check in [`crate::dates`]
//! - coded arrays come from [`crate::coding`]

mod appointment;
mod condition;
mod encounter;
mod flag;
mod patient;
mod procedure;

pub use appointment::map_appointment;
pub use condition::map_condition;
pub use encounter::map_encounter;
pub use flag::map_flag;
pub use patient::map_patient;
pub use procedure::map_procedure;

use crate::config::CoreConfig;
use crate::dates;
use crate::error::CoreResult;
use crate::resource_kind::ResourceKind;
use crate::row::Row;
use crate::schema::ClinicalRow;
use chrono::NaiveDateTime;
use fhir::datatypes::{Meta, Reference};
use fhir::Resource;

/// Everything a mapper needs besides the row.
#[derive(Clone, Copy, Debug)]
pub struct MappingContext<'a> {
    pub cfg: &'a CoreConfig,
    /// Reference moment for recency rules.
    pub now: NaiveDateTime,
}

impl<'a> MappingContext<'a> {
    pub fn new(cfg: &'a CoreConfig, now: NaiveDateTime) -> Self {
        Self { cfg, now }
    }

    /// Literal patient reference for `mrn`. Absent when the row has no MRN.
    pub fn subject(&self, mrn: Option<&str>) -> Option<Reference> {
        mrn.map(|mrn| Reference::to(format!("{}/patient/{mrn}", self.cfg.api_url())))
    }
}

/// Stamp `meta.lastUpdated` if the row's value is a real date.
pub(crate) fn stamp_last_updated(meta: &mut Meta, last_updated: Option<&str>) {
    meta.last_updated = dates::recorded(last_updated);
}

/// Decode `row` as `kind` and map it to its resource.
///
/// # Errors
///
/// Returns [`crate::CoreError::RowSchema`] if the row does not match the schema for `kind`.
pub fn map_row(kind: ResourceKind, row: &Row, ctx: &MappingContext<'_>) -> CoreResult<Resource> {
    Ok(match ClinicalRow::decode(kind, row)? {
        ClinicalRow::Patient(row) => map_patient(&row, ctx).into(),
        ClinicalRow::Condition(row) => map_condition(&row, ctx).into(),
        ClinicalRow::Encounter(row) => map_encounter(&row, ctx).into(),
        ClinicalRow::Flag(row) => map_flag(&row, ctx).into(),
        ClinicalRow::Procedure(row) => map_procedure(&row, ctx).into(),
        ClinicalRow::Appointment(row) => map_appointment(&row, ctx).into(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn config() -> CoreConfig {
        CoreConfig::new("https://sider.example.nhs.uk/fhir", "test-key").expect("config")
    }

    pub fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 30)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }
}
