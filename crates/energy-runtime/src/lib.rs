#![deny(warnings)]

//! Page controllers for the energy-audit desk.
//!
//! [`EnergyPage`] drives the energy-accounting screen: it loads a project's
//! year store, applies edits in memory, saves or imports through a
//! [`Backend`](energy_client::Backend) one request at a time, and assembles
//! the derived cost tables and charts into an [`EnergyView`].
//!
//! The free functions in [`records`] and [`requests`] validate user input
//! before it reaches the backend.

pub mod page;
pub mod records;
pub mod requests;
pub mod view;

pub use page::{EnergyPage, PageStatus};
pub use records::{create_event, create_project, load_report};
pub use requests::{send_request, set_request_status, toggle_document};
pub use view::{build_view, chart_series, EnergyView, VectorBars};

use energy_client::ClientError;
use energy_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PageError {
    /// A save or import is already in flight.
    #[error("busy")]
    Busy,
    /// The page has no loaded project to act on.
    #[error("project not loaded")]
    NotReady,
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
