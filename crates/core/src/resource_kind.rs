//! The closed set of resource kinds the listener serves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource kind, parsed case-insensitively from the request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Patient,
    Condition,
    Encounter,
    Flag,
    Procedure,
    Appointment,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Patient,
        ResourceKind::Condition,
        ResourceKind::Encounter,
        ResourceKind::Flag,
        ResourceKind::Procedure,
        ResourceKind::Appointment,
    ];

    /// Parse a resource type name, ignoring case. Returns `None` for unsupported types.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Lowercase name, as used in request paths and query tables.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Patient => "patient",
            ResourceKind::Condition => "condition",
            ResourceKind::Encounter => "encounter",
            ResourceKind::Flag => "flag",
            ResourceKind::Procedure => "procedure",
            ResourceKind::Appointment => "appointment",
        }
    }

    /// The FHIR `resourceType` discriminant.
    pub fn resource_type(self) -> &'static str {
        match self {
            ResourceKind::Patient => "Patient",
            ResourceKind::Condition => "Condition",
            ResourceKind::Encounter => "Encounter",
            ResourceKind::Flag => "Flag",
            ResourceKind::Procedure => "Procedure",
            ResourceKind::Appointment => "Appointment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
