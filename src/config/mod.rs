pub mod cli;
pub mod toml_config;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_NODES_FILE: &str = "nasa_nodes.csv";
pub const DEFAULT_EDGES_FILE: &str = "nasa_edges.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, Command, OutputFormat};

#[cfg(feature = "cli")]
mod args {
    use super::{DEFAULT_DATA_DIR, DEFAULT_EDGES_FILE, DEFAULT_NODES_FILE, DEFAULT_OUTPUT_PATH};
    use crate::core::query;
    use crate::core::ConfigProvider;
    use crate::domain::model::AnalysisSettings;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::{Parser, Subcommand, ValueEnum};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "nasa-kg", version)]
    #[command(about = "Explore the NASA bioscience knowledge graph")]
    pub struct CliConfig {
        /// TOML configuration file; options given here override it
        #[arg(long, global = true)]
        pub config: Option<String>,

        /// Directory or http(s) base URL holding the node and edge tables
        #[arg(long, global = true)]
        pub data_dir: Option<String>,

        #[arg(long, global = true)]
        pub nodes_file: Option<String>,

        #[arg(long, global = true)]
        pub edges_file: Option<String>,

        #[arg(long, global = true)]
        pub output_path: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
        pub format: OutputFormat,

        #[arg(long, help = "Enable verbose output", global = true)]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase", global = true)]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON", global = true)]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum OutputFormat {
        Text,
        Json,
    }

    #[derive(Debug, Clone, PartialEq, Subcommand)]
    pub enum Command {
        /// Entity and relationship counts with the most connected entities
        Stats {
            #[arg(long)]
            top: Option<usize>,
        },
        /// Entity type, predicate and source document distributions
        Overview {
            #[arg(long, default_value_t = query::DEFAULT_TOP_PREDICATES)]
            top_predicates: usize,
            #[arg(long, default_value_t = query::DEFAULT_TOP_SOURCES)]
            top_sources: usize,
        },
        /// Search entity names (case-insensitive regex)
        Search {
            term: String,
            #[arg(long, default_value_t = query::DEFAULT_SEARCH_LIMIT)]
            limit: usize,
        },
        /// Filter relationships by predicate and minimum strength
        Relations {
            /// Predicate to keep; "All" keeps every predicate
            #[arg(long)]
            predicate: Option<String>,
            #[arg(long, default_value_t = 1.0)]
            min_weight: f64,
            #[arg(long, default_value_t = query::DEFAULT_RELATION_LIMIT)]
            limit: usize,
            /// High-confidence threshold (strictly greater than)
            #[arg(long)]
            threshold: Option<f64>,
        },
        /// List predicates and the strength range
        Predicates,
        /// Density, diameter or components, clustering and PageRank
        Analyze {
            #[arg(long)]
            top: Option<usize>,
        },
        /// Entities within N hops of an entity
        Neighbors {
            entity: String,
            #[arg(long, default_value_t = 1)]
            radius: usize,
        },
        /// Write the tables (and optionally a zip bundle) to the output path
        Export {
            #[arg(long)]
            bundle: bool,
            #[arg(long, default_value_t = crate::core::export::DEFAULT_PREVIEW_ROWS)]
            preview: usize,
        },
    }

    impl Command {
        pub fn validate(&self) -> Result<()> {
            match self {
                Command::Stats { top: Some(top) } | Command::Analyze { top: Some(top) } => {
                    validation::validate_positive_number("top", *top, 1)
                }
                Command::Search { term, limit } => {
                    validation::validate_non_empty_string("term", term)?;
                    validation::validate_positive_number("limit", *limit, 1)
                }
                Command::Relations {
                    min_weight,
                    limit,
                    threshold,
                    ..
                } => {
                    validation::validate_range("min_weight", *min_weight, f64::MIN, f64::MAX)?;
                    if let Some(threshold) = threshold {
                        validation::validate_range("threshold", *threshold, 0.0, 1.0e9)?;
                    }
                    validation::validate_positive_number("limit", *limit, 1)
                }
                Command::Neighbors { entity, radius } => {
                    validation::validate_non_empty_string("entity", entity)?;
                    validation::validate_range(
                        "radius",
                        *radius,
                        1,
                        query::MAX_NEIGHBORHOOD_RADIUS,
                    )
                }
                _ => Ok(()),
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn data_dir(&self) -> &str {
            self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
        }

        fn nodes_file(&self) -> &str {
            self.nodes_file.as_deref().unwrap_or(DEFAULT_NODES_FILE)
        }

        fn edges_file(&self) -> &str {
            self.edges_file.as_deref().unwrap_or(DEFAULT_EDGES_FILE)
        }

        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn analysis(&self) -> AnalysisSettings {
            AnalysisSettings::default()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_location("data_dir", self.data_dir())?;
            validation::validate_csv_file_name("nodes_file", self.nodes_file())?;
            validation::validate_csv_file_name("edges_file", self.edges_file())?;
            validation::validate_path("output_path", self.output_path())?;
            self.command.validate()
        }
    }

}
