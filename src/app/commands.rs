use crate::adapters::DataStorage;
use crate::config::cli::LocalStorage;
use crate::config::Command;
use crate::core::analysis::{self, PageRankParams};
use crate::core::engine::GraphEngine;
use crate::core::export::{self, KgReport, TablePreview};
use crate::core::graph::KnowledgeGraph;
use crate::core::pipeline::CsvGraphPipeline;
use crate::core::query::{self, RelationFilter};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredicateList {
    pub predicates: Vec<String>,
    pub max_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    pub output_path: String,
    pub files: Vec<String>,
    pub preview: TablePreview,
}

/// 各子命令的結果，JSON 輸出時直接序列化內容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Stats(query::GraphSummary),
    Overview(query::Overview),
    Search(query::SearchResult),
    Relations(query::RelationReport),
    Predicates(PredicateList),
    Analysis(analysis::NetworkReport),
    Neighbors(query::Neighborhood),
    Export(ExportOutcome),
}

/// 讀取資料表並建立圖譜
pub async fn load_graph<C: ConfigProvider + Clone>(
    config: &C,
    monitor_enabled: bool,
) -> Result<KnowledgeGraph> {
    let storage = DataStorage::for_location(config.data_dir())?;
    let pipeline = CsvGraphPipeline::new(storage, config.clone());
    let engine = GraphEngine::new_with_monitoring(pipeline, monitor_enabled);

    let graph = engine.run().await?;
    engine.monitor().log_final_stats();
    Ok(graph)
}

pub async fn execute<C: ConfigProvider>(
    config: &C,
    command: &Command,
    graph: &KnowledgeGraph,
) -> Result<CommandOutput> {
    let settings = config.analysis();

    let output = match command {
        Command::Stats { top } => {
            CommandOutput::Stats(query::summary(graph, top.unwrap_or(settings.top_entities)))
        }
        Command::Overview {
            top_predicates,
            top_sources,
        } => CommandOutput::Overview(query::overview(graph, *top_predicates, *top_sources)),
        Command::Search { term, limit } => CommandOutput::Search(query::search(graph, term, *limit)?),
        Command::Relations {
            predicate,
            min_weight,
            limit,
            threshold,
        } => {
            let filter = RelationFilter::new(predicate.clone(), *min_weight);
            let threshold = threshold.unwrap_or(settings.high_confidence_threshold);
            CommandOutput::Relations(query::relation_report(graph, &filter, *limit, threshold)?)
        }
        Command::Predicates => CommandOutput::Predicates(PredicateList {
            predicates: query::predicates(graph),
            max_weight: query::max_weight(graph),
        }),
        Command::Analyze { top } => {
            tracing::info!("🔬 Running network analysis...");
            CommandOutput::Analysis(analysis::network_report(
                graph,
                PageRankParams::from(&settings),
                top.unwrap_or(settings.pagerank_top),
            )?)
        }
        Command::Neighbors { entity, radius } => {
            CommandOutput::Neighbors(query::neighborhood(graph, entity, *radius)?)
        }
        Command::Export { bundle, preview } => {
            let storage = LocalStorage::new(config.output_path().to_string());
            let mut files = export::export_tables(graph, &storage).await?;
            if *bundle {
                let report = KgReport::build(graph, &settings)?;
                files.push(export::export_bundle(graph, &report, &storage).await?);
            }
            tracing::info!("📁 Exported {} files to {}", files.len(), config.output_path());
            CommandOutput::Export(ExportOutcome {
                output_path: config.output_path().to_string(),
                files,
                preview: export::preview(graph, *preview),
            })
        }
    };

    Ok(output)
}
