//! Client-side workspace for the Bidder estimation dashboard.
//!
//! Holds the editable job form, previews geometry locally, and coordinates
//! requests to the pricing service while keeping one consistent displayed
//! bid across them.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;
pub mod workspace;

pub use domain::{Bid, JobSpecification, Trade};
pub use error::{ApiError, ApiResult};
pub use services::{PricingBackend, PricingClient};
pub use workspace::{FormUpdate, Workspace, WorkspaceState};
