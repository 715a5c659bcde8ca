use crate::core::graph::KnowledgeGraph;
use crate::domain::model::{AnalysisSettings, GraphTables};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn nodes_file(&self) -> &str;
    fn edges_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn analysis(&self) -> AnalysisSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<GraphTables>;
    async fn transform(&self, tables: GraphTables) -> Result<KnowledgeGraph>;
}
