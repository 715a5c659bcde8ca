use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// 節點表的一列 (node,label,ncbi,go)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub node: String,
    pub label: String,
    #[serde(default)]
    pub ncbi: Option<String>,
    #[serde(default)]
    pub go: Option<String>,
}

impl EntityRecord {
    pub fn new(node: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            label: label.into(),
            ncbi: None,
            go: None,
        }
    }

    pub fn with_ncbi(mut self, ncbi: impl Into<String>) -> Self {
        self.ncbi = Some(ncbi.into());
        self
    }

    pub fn with_go(mut self, go: impl Into<String>) -> Self {
        self.go = Some(go.into());
        self
    }

    pub fn ncbi_or_unknown(&self) -> &str {
        non_empty_or_unknown(self.ncbi.as_deref())
    }

    pub fn go_or_unknown(&self) -> &str {
        non_empty_or_unknown(self.go.as_deref())
    }
}

/// 邊表的一列 (subject,predicate,object,weight,sources)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub sources: Option<String>,
}

impl RelationRecord {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            weight: None,
            sources: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    /// 關係強度，缺值視為 1
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// 來源文件清單，已去除空白與空項目
    pub fn source_documents(&self) -> Vec<&str> {
        self.sources
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|doc| !doc.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// 從 CSV 載入的原始資料表，保留檔案順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphTables {
    pub entities: Vec<EntityRecord>,
    pub relations: Vec<RelationRecord>,
}

/// 分析參數，來源可以是 CLI 或 TOML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub top_entities: usize,
    pub pagerank_top: usize,
    pub high_confidence_threshold: f64,
    pub pagerank_alpha: f64,
    pub pagerank_max_iter: usize,
    pub pagerank_tol: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_entities: 5,
            pagerank_top: 15,
            high_confidence_threshold: 2.0,
            pagerank_alpha: 0.85,
            pagerank_max_iter: 100,
            pagerank_tol: 1.0e-6,
        }
    }
}

fn non_empty_or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN,
    }
}
