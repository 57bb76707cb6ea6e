//! Tools module - Tool implementations for the agent
//!
//! Contains the dataset inspection and query tools and the registry that
//! exposes them to the model.

pub mod inspect;
pub mod query;
pub mod registry;

pub use inspect::InspectTool;
pub use query::QueryTool;
pub use registry::ToolRegistry;
