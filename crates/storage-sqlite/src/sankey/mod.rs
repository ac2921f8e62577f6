//! SQLite storage implementation for sankey configs.

mod model;
mod repository;

pub use model::SankeyConfigDB;
pub use repository::SankeyRepository;
