#![deny(warnings)]

//! Core domain models for the energy-audit desk.
//!
//! This crate defines the serializable types shared by every other crate:
//! the per-project energy-accounting document (the year store), lenient
//! numeric coercion, audit documents, and the project / agenda /
//! client-request / report records exchanged with the backend, with
//! validation helpers for their required fields.

pub mod agenda;
pub mod audit;
pub mod coerce;
pub mod format;
pub mod ids;
pub mod project;
pub mod report;
pub mod requests;
pub mod store;
pub mod vector;

pub use agenda::{parse_start, sort_chronologically, Event, EventDraft, EventKind};
pub use audit::{audit_totals, utility_names};
pub use coerce::{coerce, coerce_str, RawValue};
pub use format::{format_number, format_or_placeholder, Locale, PLACEHOLDER};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use project::{recent_first, BuildingType, Project, ProjectDraft, ProjectPatch, ProjectStatus};
pub use report::ReportData;
pub use requests::{
    ClientRequest, ClientRequestDraft, ClientRequestPatch, DocumentItem, NewClientRequest,
    ReceivedFile, RequestStatus,
};
pub use store::{YearRecord, YearStore, YearTotals};
pub use vector::{PricedVector, Vector};

use thiserror::Error;

/// Validation errors for required fields on user-entered records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    #[error("required field is empty: {0}")]
    MissingField(&'static str),
    /// A client request must ask for at least one document.
    #[error("at least one requested document is required")]
    NoDocuments,
    /// An unknown status value was supplied.
    #[error("invalid status '{0}'")]
    InvalidStatus(String),
}

/// Reject blank required text fields.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
