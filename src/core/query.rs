use crate::core::graph::KnowledgeGraph;
use crate::domain::model::RelationRecord;
use crate::utils::error::{KgError, Result};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

pub const DEFAULT_TOP_ENTITIES: usize = 5;
pub const DEFAULT_TOP_PREDICATES: usize = 10;
pub const DEFAULT_TOP_SOURCES: usize = 10;
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const SAMPLE_RELATIONS: usize = 5;
pub const DEFAULT_RELATION_LIMIT: usize = 100;
pub const DEFAULT_HIGH_CONFIDENCE_THRESHOLD: f64 = 2.0;
pub const DEFAULT_HIGH_CONFIDENCE_LIMIT: usize = 10;
/// BFS 深度上限
pub const MAX_NEIGHBORHOOD_RADIUS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub name: String,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub entities: usize,
    pub relationships: usize,
    pub relation_rows: usize,
    pub average_connections: f64,
    pub most_connected: Vec<RankedEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub entity_types: Vec<CountEntry>,
    pub top_predicates: Vec<CountEntry>,
    pub top_sources: Vec<CountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityHit {
    pub name: String,
    pub label: String,
    pub ncbi: String,
    pub go: String,
    pub outgoing: usize,
    pub incoming: usize,
    pub connections: usize,
    pub sample_relations: Vec<RelationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub term: String,
    pub total_matches: usize,
    pub hits: Vec<EntityHit>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationFilter {
    pub predicate: Option<String>,
    pub min_weight: f64,
}

impl RelationFilter {
    /// `"All"` 等同不過濾
    pub fn new(predicate: Option<String>, min_weight: f64) -> Self {
        let predicate = predicate.filter(|p| p != "All" && !p.trim().is_empty());
        Self {
            predicate,
            min_weight,
        }
    }

    pub fn matches(&self, rel: &RelationRecord) -> bool {
        rel.weight() >= self.min_weight
            && self
                .predicate
                .as_deref()
                .map_or(true, |p| rel.predicate == p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationReport {
    pub predicate: Option<String>,
    pub min_weight: f64,
    pub total: usize,
    pub rows: Vec<RelationRecord>,
    pub high_confidence_threshold: f64,
    pub high_confidence: Vec<RelationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborEntry {
    pub name: String,
    pub label: String,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    pub center: String,
    pub radius: usize,
    pub members: Vec<NeighborEntry>,
}

/// 實體數、關係數與連結最多的實體
pub fn summary(graph: &KnowledgeGraph, top_n: usize) -> GraphSummary {
    let entities = graph.entity_count();
    let relationships = graph.relationship_count();
    let average_connections = if entities == 0 {
        0.0
    } else {
        2.0 * relationships as f64 / entities as f64
    };

    let mut ranked: Vec<RankedEntity> = graph
        .graph()
        .node_indices()
        .map(|idx| RankedEntity {
            name: graph.graph()[idx].name.clone(),
            degree: graph.degree_at(idx),
        })
        .collect();
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(top_n);

    GraphSummary {
        entities,
        relationships,
        relation_rows: graph.relation_row_count(),
        average_connections,
        most_connected: ranked,
    }
}

pub fn overview(graph: &KnowledgeGraph, top_predicates: usize, top_sources: usize) -> Overview {
    let tables = graph.tables();

    let entity_types = count_ranked(tables.entities.iter().map(|e| e.label.as_str()), None);
    let top_predicates = count_ranked(
        tables.relations.iter().map(|r| r.predicate.as_str()),
        Some(top_predicates),
    );
    let top_sources = count_ranked(
        tables.relations.iter().flat_map(|r| r.source_documents()),
        Some(top_sources),
    );

    Overview {
        entity_types,
        top_predicates,
        top_sources,
    }
}

/// 依次數遞減、名稱遞增排序
fn count_ranked<'a>(items: impl Iterator<Item = &'a str>, limit: Option<usize>) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(name, count)| CountEntry {
            name: name.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

fn search_pattern(term: &str) -> Result<Regex> {
    RegexBuilder::new(term)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            tracing::debug!("Search term '{}' is not a valid regex, matching literally", term);
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
        })
        .map_err(|e| KgError::validation(format!("invalid search term: {}", e)))
}

/// 不分大小寫搜尋節點表中的實體名稱
pub fn search(graph: &KnowledgeGraph, term: &str, limit: usize) -> Result<SearchResult> {
    let term = term.trim();
    if term.is_empty() {
        return Err(KgError::validation("search term cannot be empty"));
    }

    let pattern = search_pattern(term)?;
    let matches: Vec<_> = graph
        .tables()
        .entities
        .iter()
        .filter(|e| pattern.is_match(&e.node))
        .collect();

    let hits = matches
        .iter()
        .take(limit)
        .map(|record| {
            let outgoing = graph.outgoing_rows(&record.node);
            let incoming = graph.incoming_rows(&record.node);
            EntityHit {
                name: record.node.clone(),
                label: record.label.clone(),
                ncbi: record.ncbi_or_unknown().to_string(),
                go: record.go_or_unknown().to_string(),
                outgoing: outgoing.len(),
                incoming: incoming.len(),
                connections: outgoing.len() + incoming.len(),
                sample_relations: outgoing
                    .into_iter()
                    .take(SAMPLE_RELATIONS)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    tracing::debug!("Search '{}' matched {} entities", term, matches.len());

    Ok(SearchResult {
        term: term.to_string(),
        total_matches: matches.len(),
        hits,
    })
}

/// 排序後的不重複謂詞
pub fn predicates(graph: &KnowledgeGraph) -> Vec<String> {
    let mut predicates: Vec<String> = graph
        .tables()
        .relations
        .iter()
        .map(|r| r.predicate.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    predicates.sort();
    predicates
}

pub fn max_weight(graph: &KnowledgeGraph) -> f64 {
    graph
        .tables()
        .relations
        .iter()
        .map(RelationRecord::weight)
        .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))))
        .unwrap_or(crate::domain::model::DEFAULT_WEIGHT)
}

pub fn filter_relations<'a>(
    graph: &'a KnowledgeGraph,
    filter: &RelationFilter,
) -> Result<Vec<&'a RelationRecord>> {
    if filter.min_weight.is_nan() {
        return Err(KgError::validation("minimum weight must be a number"));
    }
    Ok(graph
        .tables()
        .relations
        .iter()
        .filter(|r| filter.matches(r))
        .collect())
}

/// 權重大於門檻的資料列，由強到弱
pub fn high_confidence<'a>(
    rows: &[&'a RelationRecord],
    threshold: f64,
    limit: usize,
) -> Vec<&'a RelationRecord> {
    let mut strong: Vec<&RelationRecord> = rows
        .iter()
        .copied()
        .filter(|r| r.weight() > threshold)
        .collect();
    // sort_by 是穩定排序，同權重保留原順序
    strong.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
    strong.truncate(limit);
    strong
}

pub fn relation_report(
    graph: &KnowledgeGraph,
    filter: &RelationFilter,
    limit: usize,
    threshold: f64,
) -> Result<RelationReport> {
    let filtered = filter_relations(graph, filter)?;
    let strong = high_confidence(&filtered, threshold, DEFAULT_HIGH_CONFIDENCE_LIMIT);

    Ok(RelationReport {
        predicate: filter.predicate.clone(),
        min_weight: filter.min_weight,
        total: filtered.len(),
        rows: filtered.iter().take(limit).map(|r| (*r).clone()).collect(),
        high_confidence_threshold: threshold,
        high_confidence: strong.into_iter().cloned().collect(),
    })
}

/// 雙向 BFS 取 N 跳內的鄰居
pub fn neighborhood(graph: &KnowledgeGraph, center: &str, radius: usize) -> Result<Neighborhood> {
    let center_idx = graph
        .index_of(center)
        .ok_or_else(|| KgError::not_found(center))?;
    let radius = radius.min(MAX_NEIGHBORHOOD_RADIUS);
    let g = graph.graph();

    let mut visited: HashSet<NodeIndex> = HashSet::from([center_idx]);
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(center_idx, 0)]);
    let mut members = Vec::new();

    while let Some((current, dist)) = queue.pop_front() {
        if dist >= radius {
            continue;
        }

        let outgoing = g
            .edges_directed(current, Direction::Outgoing)
            .map(|e| e.target());
        let incoming = g
            .edges_directed(current, Direction::Incoming)
            .map(|e| e.source());

        for neighbor in outgoing.chain(incoming) {
            if visited.insert(neighbor) {
                let entity = &g[neighbor];
                members.push(NeighborEntry {
                    name: entity.name.clone(),
                    label: entity.label.clone(),
                    distance: dist + 1,
                });
                queue.push_back((neighbor, dist + 1));
            }
        }
    }

    Ok(Neighborhood {
        center: center.to_string(),
        radius,
        members,
    })
}
