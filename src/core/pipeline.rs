use crate::core::graph::KnowledgeGraph;
use crate::core::{ConfigProvider, GraphTables, Pipeline, Storage};
use crate::domain::model::{EntityRecord, RelationRecord};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

/// 解析帶標頭的 CSV，欄位前後空白會被去除
fn parse_table<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn parse_entities(data: &[u8]) -> Result<Vec<EntityRecord>> {
    parse_table(data)
}

pub fn parse_relations(data: &[u8]) -> Result<Vec<RelationRecord>> {
    parse_table(data)
}

/// 透過 Storage 讀取節點表與邊表並建立圖譜
pub struct CsvGraphPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvGraphPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvGraphPipeline<S, C> {
    async fn extract(&self) -> Result<GraphTables> {
        let nodes_file = self.config.nodes_file();
        let edges_file = self.config.edges_file();
        tracing::debug!(
            "Reading {} and {} from {}",
            nodes_file,
            edges_file,
            self.config.data_dir()
        );

        let (nodes, edges) = tokio::try_join!(
            self.storage.read_file(nodes_file),
            self.storage.read_file(edges_file)
        )?;

        let entities = parse_entities(&nodes)?;
        let relations = parse_relations(&edges)?;
        tracing::debug!(
            "Parsed {} node rows ({} bytes), {} edge rows ({} bytes)",
            entities.len(),
            nodes.len(),
            relations.len(),
            edges.len()
        );

        Ok(GraphTables {
            entities,
            relations,
        })
    }

    async fn transform(&self, tables: GraphTables) -> Result<KnowledgeGraph> {
        KnowledgeGraph::from_tables(tables)
    }
}
