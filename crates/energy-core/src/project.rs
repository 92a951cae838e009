//! Audit projects.

use crate::{require, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InProgress,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// Kind of audited building.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    #[default]
    Residential,
    Tertiary,
    Industrial,
    #[serde(other)]
    Other,
}

/// Fields a user fills in to create a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub project_name: String,
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub building_address: String,
    #[serde(default)]
    pub building_type: BuildingType,
    /// Audit scheme, e.g. "AMUREBA" or "PEB".
    pub audit_type: String,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl ProjectDraft {
    /// Required-field check before submitting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("project_name", &self.project_name)?;
        require("client_name", &self.client_name)?;
        require("client_email", &self.client_email)?;
        require("building_address", &self.building_address)?;
        Ok(())
    }
}

/// A stored project as returned by `GET /projects`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub details: ProjectDraft,
}

impl Project {
    pub fn name(&self) -> &str {
        &self.details.project_name
    }
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_type: Option<BuildingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Merge the set fields into `project`.
    pub fn apply(&self, project: &mut Project) {
        let d = &mut project.details;
        if let Some(v) = &self.project_name {
            d.project_name = v.clone();
        }
        if let Some(v) = &self.client_name {
            d.client_name = v.clone();
        }
        if let Some(v) = &self.client_email {
            d.client_email = v.clone();
        }
        if let Some(v) = &self.client_phone {
            d.client_phone = Some(v.clone());
        }
        if let Some(v) = &self.building_address {
            d.building_address = v.clone();
        }
        if let Some(v) = self.building_type {
            d.building_type = v;
        }
        if let Some(v) = &self.audit_type {
            d.audit_type = v.clone();
        }
        if let Some(v) = self.status {
            d.status = v;
        }
    }
}

/// Most recently created first. `created_at` is ISO-8601, so string order
/// is chronological; ties keep their input order.
pub fn recent_first(projects: &[Project]) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}
