//! Sankey module - the user's saved budget breakdown.

mod sankey_model;
mod sankey_service;
mod sankey_traits;

pub use sankey_model::{SankeyCategory, SankeyConfig};
pub use sankey_service::SankeyService;
pub use sankey_traits::{SankeyRepositoryTrait, SankeyServiceTrait};
