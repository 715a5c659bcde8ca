pub mod analysis;
pub mod engine;
pub mod export;
pub mod graph;
pub mod pipeline;
pub mod query;

pub use crate::domain::model::{EntityRecord, GraphTables, RelationRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
