//! Shared care record visibility tags.
//!
//! The downstream viewer reads `meta.tag` to decide whether a resource appears in its summary
//! view, only in the detail view, or not at all. The classification itself is computed in
//! `sider-core`; this module only owns the wire representation.

use crate::datatypes::Coding;
use serde::{Deserialize, Serialize};

/// Terminology system for visibility tags.
pub const VISIBILITY_SYSTEM: &str = "https://fhir.blackpear.com/ui/shared-care-record-visibility";

/// Display classification attached to a resource's metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityTag {
    /// Show in both summary and detail views.
    #[serde(rename = "summary")]
    Summary,
    /// Show only in the detail view.
    #[serde(rename = "detail")]
    Detail,
    /// Suppress entirely.
    #[serde(rename = "none")]
    Hidden,
}

impl VisibilityTag {
    pub fn code(self) -> &'static str {
        match self {
            VisibilityTag::Summary => "summary",
            VisibilityTag::Detail => "detail",
            VisibilityTag::Hidden => "none",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            VisibilityTag::Summary => "Display in Summary and Detail View",
            VisibilityTag::Detail => "Display in Detail View",
            VisibilityTag::Hidden => "Do not Display",
        }
    }

    /// The tag as a `meta.tag` coding.
    pub fn to_coding(self) -> Coding {
        Coding::fixed(VISIBILITY_SYSTEM, self.code(), self.display())
    }
}
