//! Searchset bundles.
//!
//! A bundle is created once per search, grows by appending entries while rows are mapped, and is
//! finalised exactly once with its total and self link before being rendered.

use crate::{FhirResult, Resource};
use serde::{Deserialize, Serialize};

/// A link attached to a bundle (only `self` is produced).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// A resource plus its absolute URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
}

impl BundleEntry {
    /// Wrap `resource`, deriving `fullUrl` as `{base_url}{context_path}/{id}`.
    pub fn new(base_url: &str, context_path: &str, resource: Resource) -> Self {
        let full_url = format!("{base_url}{context_path}/{}", resource.id());
        Self { full_url, resource }
    }
}

/// A searchset bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: String,

    pub total: usize,

    #[serde(default)]
    pub link: Vec<BundleLink>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// An empty searchset bundle.
    pub fn searchset() -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: "searchset".to_string(),
            total: 0,
            link: Vec::new(),
            entry: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: BundleEntry) {
        self.entry.push(entry);
    }

    /// Set `total` to the number of entries and point the self link at `request_url`.
    pub fn finalise(&mut self, request_url: impl Into<String>) {
        self.total = self.entry.len();
        self.link = vec![BundleLink {
            relation: "self".to_string(),
            url: request_url.into(),
        }];
    }

    /// Render the bundle as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError::Json`] if serialisation fails.
    pub fn render(&self) -> FhirResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
