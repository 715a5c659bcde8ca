use crate::core::analysis::{self, NetworkReport, PageRankParams};
use crate::core::graph::KnowledgeGraph;
use crate::core::query::{self, GraphSummary, Overview};
use crate::core::Storage;
use crate::domain::model::{AnalysisSettings, EntityRecord, GraphTables, RelationRecord};
use crate::utils::error::{KgError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ENTITIES_FILE: &str = "nasa_entities.csv";
pub const RELATIONS_FILE: &str = "nasa_relationships.csv";
pub const BUNDLE_FILE: &str = "nasa_kg_export.zip";
pub const REPORT_FILE: &str = "report.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

const ENTITY_HEADER: [&str; 4] = ["node", "label", "ncbi", "go"];
const RELATION_HEADER: [&str; 5] = ["subject", "predicate", "object", "weight", "sources"];

fn write_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    // 手動寫標頭，空表也會有標頭列
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| KgError::IoError(e.into_error()))
}

pub fn entities_csv(tables: &GraphTables) -> Result<Vec<u8>> {
    write_csv(&ENTITY_HEADER, &tables.entities)
}

pub fn relations_csv(tables: &GraphTables) -> Result<Vec<u8>> {
    write_csv(&RELATION_HEADER, &tables.relations)
}

/// 寫出兩張資料表，回傳檔名
pub async fn export_tables<S: Storage>(graph: &KnowledgeGraph, storage: &S) -> Result<Vec<String>> {
    let tables = graph.tables();
    storage
        .write_file(ENTITIES_FILE, &entities_csv(tables)?)
        .await?;
    storage
        .write_file(RELATIONS_FILE, &relations_csv(tables)?)
        .await?;
    tracing::debug!(
        "Exported {} entity rows and {} relation rows",
        tables.entities.len(),
        tables.relations.len()
    );
    Ok(vec![ENTITIES_FILE.to_string(), RELATIONS_FILE.to_string()])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub entities: Vec<EntityRecord>,
    pub relations: Vec<RelationRecord>,
}

pub fn preview(graph: &KnowledgeGraph, rows: usize) -> TablePreview {
    let tables = graph.tables();
    TablePreview {
        entities: tables.entities.iter().take(rows).cloned().collect(),
        relations: tables.relations.iter().take(rows).cloned().collect(),
    }
}

/// 壓縮包中 report.json 的內容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KgReport {
    pub summary: GraphSummary,
    pub overview: Overview,
    pub network: NetworkReport,
}

impl KgReport {
    pub fn build(graph: &KnowledgeGraph, settings: &AnalysisSettings) -> Result<Self> {
        Ok(Self {
            summary: query::summary(graph, settings.top_entities),
            overview: query::overview(
                graph,
                query::DEFAULT_TOP_PREDICATES,
                query::DEFAULT_TOP_SOURCES,
            ),
            network: analysis::network_report(
                graph,
                PageRankParams::from(settings),
                settings.pagerank_top,
            )?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub tool: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub entity_rows: usize,
    pub relation_rows: usize,
    pub entities: usize,
    pub relationships: usize,
    pub files: Vec<String>,
}

pub fn bundle_bytes(
    graph: &KnowledgeGraph,
    report: &KgReport,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let tables = graph.tables();
    let manifest = Manifest {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at,
        entity_rows: tables.entities.len(),
        relation_rows: tables.relations.len(),
        entities: graph.entity_count(),
        relationships: graph.relationship_count(),
        files: [ENTITIES_FILE, RELATIONS_FILE, REPORT_FILE]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    };

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file(ENTITIES_FILE, options)?;
    zip.write_all(&entities_csv(tables)?)?;

    zip.start_file(RELATIONS_FILE, options)?;
    zip.write_all(&relations_csv(tables)?)?;

    zip.start_file(REPORT_FILE, options)?;
    zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    zip.start_file(MANIFEST_FILE, options)?;
    zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// 寫出 zip 壓縮包，回傳檔名
pub async fn export_bundle<S: Storage>(
    graph: &KnowledgeGraph,
    report: &KgReport,
    storage: &S,
) -> Result<String> {
    let data = bundle_bytes(graph, report, Utc::now())?;
    tracing::debug!("Writing bundle ({} bytes)", data.len());
    storage.write_file(BUNDLE_FILE, &data).await?;
    Ok(BUNDLE_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::tests::sample_tables;
    use crate::core::pipeline::{parse_entities, parse_relations};
    use std::io::Read;

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph::from_tables(sample_tables()).unwrap()
    }

    #[test]
    fn test_tables_reparse_to_same_rows() {
        let graph = sample_graph();
        let entities = entities_csv(graph.tables()).unwrap();
        let relations = relations_csv(graph.tables()).unwrap();

        assert!(String::from_utf8_lossy(&entities).starts_with("node,label,ncbi,go\n"));
        assert_eq!(parse_entities(&entities).unwrap(), graph.tables().entities);
        assert_eq!(parse_relations(&relations).unwrap(), graph.tables().relations);
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let csv = relations_csv(&GraphTables::default()).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "subject,predicate,object,weight,sources\n"
        );
    }

    #[test]
    fn test_preview_caps_rows() {
        let graph = sample_graph();
        let preview = preview(&graph, 2);
        assert_eq!(preview.entities.len(), 2);
        assert_eq!(preview.relations.len(), 2);
        assert_eq!(preview.relations[0].predicate, "expresses");
    }

    #[test]
    fn test_bundle_contents() {
        let graph = sample_graph();
        let report = KgReport::build(&graph, &AnalysisSettings::default()).unwrap();
        let generated_at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);

        let data = bundle_bytes(&graph, &report, generated_at).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 4);

        let mut manifest = String::new();
        archive
            .by_name(MANIFEST_FILE)
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(manifest["relation_rows"], 5);
        assert_eq!(manifest["relationships"], 4);
        assert_eq!(manifest["generated_at"], "2026-01-02T03:04:05Z");

        let mut report_json = String::new();
        archive
            .by_name(REPORT_FILE)
            .unwrap()
            .read_to_string(&mut report_json)
            .unwrap();
        let report_json: serde_json::Value = serde_json::from_str(&report_json).unwrap();
        assert_eq!(report_json["summary"]["entities"], 4);
        assert_eq!(report_json["network"]["connectivity"]["kind"], "connected");
    }
}
