//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables;
//! the binaries build a [`CoreConfig`] from an [`EnvConfig`] and share it behind an `Arc`.

use crate::constants::*;
use crate::{CoreError, CoreResult};
use sider_types::{present_or_absent, NonEmptyText};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Read-only source of named configuration values.
pub trait ConfigSource {
    /// Return the raw value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

/// Configuration read from the process environment.
///
/// Callers are expected to have loaded any `.env` file (via `dotenvy`) before resolving.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Permitted codes for allow-list visibility.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeAllowList {
    pub standard: BTreeSet<String>,
    pub local: BTreeSet<String>,
}

impl CodeAllowList {
    /// True when either code appears in its list.
    pub fn permits(&self, standard_code: Option<&str>, local_code: Option<&str>) -> bool {
        standard_code.is_some_and(|code| self.standard.contains(code))
            || local_code.is_some_and(|code| self.local.contains(code))
    }
}

/// Organisation switchboard contact appended to every patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchboardContact {
    pub name: String,
    pub phone: String,
    pub organisation_reference: String,
    pub organisation_display: String,
}

impl Default for SwitchboardContact {
    fn default() -> Self {
        Self {
            name: DEFAULT_SWITCHBOARD_NAME.to_owned(),
            phone: DEFAULT_SWITCHBOARD_PHONE.to_owned(),
            organisation_reference: DEFAULT_SWITCHBOARD_ORG_REFERENCE.to_owned(),
            organisation_display: DEFAULT_SWITCHBOARD_ORG_DISPLAY.to_owned(),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone)]
pub struct CoreConfig {
    api_url: NonEmptyText,
    api_key: NonEmptyText,
    patient_id_system: String,
    flag_codes: CodeAllowList,
    recency_window_days: i64,
    switchboard: SwitchboardContact,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with default optional settings.
    ///
    /// A trailing `/` on `api_url` is trimmed so references can be built by concatenation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if either value is blank.
    pub fn new(api_url: &str, api_key: &str) -> CoreResult<Self> {
        let api_url = NonEmptyText::new(api_url.trim().trim_end_matches('/')).map_err(|e| {
            CoreError::InvalidConfig {
                key: API_URL_KEY,
                reason: e.to_string(),
            }
        })?;
        let api_key = NonEmptyText::new(api_key).map_err(|e| CoreError::InvalidConfig {
            key: API_KEY_KEY,
            reason: e.to_string(),
        })?;

        Ok(Self {
            api_url,
            api_key,
            patient_id_system: DEFAULT_PATIENT_ID_SYSTEM.to_owned(),
            flag_codes: CodeAllowList::default(),
            recency_window_days: DEFAULT_RECENCY_WINDOW_DAYS,
            switchboard: SwitchboardContact::default(),
        })
    }

    /// Resolve the full configuration from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingConfig`] if a required key is absent or blank, and
    /// [`CoreError::InvalidConfig`] if the recency window is not a non-negative integer.
    pub fn from_source(source: &impl ConfigSource) -> CoreResult<Self> {
        let read = |key: &str| present_or_absent(source.get(key).map(|v| v.trim().to_owned()));

        let api_url = read(API_URL_KEY).ok_or(CoreError::MissingConfig(API_URL_KEY))?;
        let api_key = read(API_KEY_KEY).ok_or(CoreError::MissingConfig(API_KEY_KEY))?;
        let mut cfg = Self::new(&api_url, &api_key)?;

        if let Some(system) = read(PATIENT_ID_SYSTEM_KEY) {
            cfg.patient_id_system = system;
        }

        cfg.flag_codes = CodeAllowList {
            standard: split_list(read(FLAG_SNOMED_CODES_KEY)),
            local: split_list(read(FLAG_LOCAL_CODES_KEY)),
        };

        if let Some(days) = read(RECENCY_WINDOW_DAYS_KEY) {
            cfg.recency_window_days = days
                .parse::<u32>()
                .map(i64::from)
                .map_err(|e| CoreError::InvalidConfig {
                    key: RECENCY_WINDOW_DAYS_KEY,
                    reason: e.to_string(),
                })?;
        }

        let defaults = SwitchboardContact::default();
        cfg.switchboard = SwitchboardContact {
            name: read(SWITCHBOARD_NAME_KEY).unwrap_or(defaults.name),
            phone: read(SWITCHBOARD_PHONE_KEY).unwrap_or(defaults.phone),
            organisation_reference: read(SWITCHBOARD_ORG_REFERENCE_KEY)
                .unwrap_or(defaults.organisation_reference),
            organisation_display: read(SWITCHBOARD_ORG_DISPLAY_KEY)
                .unwrap_or(defaults.organisation_display),
        };

        Ok(cfg)
    }

    pub fn with_flag_codes(mut self, codes: CodeAllowList) -> Self {
        self.flag_codes = codes;
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    pub fn patient_id_system(&self) -> &str {
        &self.patient_id_system
    }

    pub fn flag_codes(&self) -> &CodeAllowList {
        &self.flag_codes
    }

    pub fn recency_window_days(&self) -> i64 {
        self.recency_window_days
    }

    pub fn switchboard(&self) -> &SwitchboardContact {
        &self.switchboard
    }
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"<redacted>")
            .field("patient_id_system", &self.patient_id_system)
            .field("flag_codes", &self.flag_codes)
            .field("recency_window_days", &self.recency_window_days)
            .field("switchboard", &self.switchboard)
            .finish()
    }
}

fn split_list(raw: Option<String>) -> BTreeSet<String> {
    raw.map(|raw| {
        raw.split(',')
            .filter_map(|code| present_or_absent(Some(code.trim())))
            .collect()
    })
    .unwrap_or_default()
}
