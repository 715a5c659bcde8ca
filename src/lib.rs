pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub mod app;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpStorage, DataStorage};
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{
    engine::GraphEngine, graph::KnowledgeGraph, pipeline::CsvGraphPipeline,
};
pub use utils::error::{KgError, Result};
