//! Report metadata fed to the backend document generator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Provider name proposed when none is stored yet.
pub const DEFAULT_PROVIDER: &str = "HeatSight";

pub const AUDIT_GLOBAL: &str = "Audit GLOBAL";
pub const AUDIT_PARTIAL: &str = "Audit Partiel";

fn default_audit_type() -> String {
    AUDIT_GLOBAL.to_string()
}

/// Body of `report_data`. Unknown keys are kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default = "default_audit_type")]
    pub audit_type: String,
    #[serde(default)]
    pub audit_theme: String,
    #[serde(default)]
    pub provider_company: String,
    #[serde(default)]
    pub auditor_name: String,
    #[serde(default)]
    pub amureba_skills: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ReportData {
    fn default() -> Self {
        Self {
            audit_type: default_audit_type(),
            audit_theme: String::new(),
            provider_company: String::new(),
            auditor_name: String::new(),
            amureba_skills: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl ReportData {
    /// Parse a fetched document; null or non-object bodies give defaults.
    pub fn from_document(doc: Value) -> Result<Self, serde_json::Error> {
        if !doc.is_object() {
            return Ok(Self::default());
        }
        serde_json::from_value(doc)
    }

    /// Fill the provider name when blank.
    pub fn with_defaults(mut self) -> Self {
        if self.provider_company.trim().is_empty() {
            self.provider_company = DEFAULT_PROVIDER.to_string();
        }
        self
    }

    /// A partial audit is scoped to a theme.
    pub fn is_partial(&self) -> bool {
        self.audit_type == AUDIT_PARTIAL
    }
}
