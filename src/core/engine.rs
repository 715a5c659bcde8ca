use crate::core::graph::KnowledgeGraph;
use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 執行 extract → transform，產出知識圖譜
pub struct GraphEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> GraphEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &SystemMonitor {
        &self.monitor
    }

    pub async fn run(&self) -> Result<KnowledgeGraph> {
        tracing::info!("📥 Loading knowledge graph tables...");
        self.monitor.log_stats("Start");

        let tables = self.pipeline.extract().await?;
        tracing::info!(
            "📄 Loaded {} entity rows and {} relation rows",
            tables.entities.len(),
            tables.relations.len()
        );
        self.monitor.log_stats("Extract");

        let graph = self.pipeline.transform(tables).await?;
        tracing::info!(
            "🕸️ Graph ready: {} entities, {} relationships",
            graph.entity_count(),
            graph.relationship_count()
        );
        self.monitor.log_stats("Build");

        Ok(graph)
    }
}
