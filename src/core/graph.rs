use crate::domain::model::{EntityRecord, GraphTables, RelationRecord, UNKNOWN};
use crate::utils::error::{KgError, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;

/// 圖節點
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    pub label: String,
    /// 節點表中的列號，只出現在邊表的實體為 None
    pub record: Option<usize>,
}

impl Entity {
    pub fn is_implicit(&self) -> bool {
        self.record.is_none()
    }
}

/// 合併後的邊，同一對 (subject, object) 只有一條
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// 依出現順序去重的謂詞
    pub predicates: Vec<String>,
    /// 各列權重總和
    pub weight: f64,
    pub rows: usize,
}

/// 合併後的知識圖譜，保留原始資料表供逐列查詢與匯出
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    graph: DiGraph<Entity, Link>,
    index: HashMap<String, NodeIndex>,
    tables: GraphTables,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl KnowledgeGraph {
    pub fn from_tables(mut tables: GraphTables) -> Result<Self> {
        let mut graph: DiGraph<Entity, Link> = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        for (row, entity) in tables.entities.iter_mut().enumerate() {
            if entity.node.trim().is_empty() {
                return Err(KgError::processing(format!(
                    "node table row {}: empty node name",
                    row + 1
                )));
            }
            if entity.label.trim().is_empty() {
                entity.label = UNKNOWN.to_string();
            }
            if index.contains_key(&entity.node) {
                tracing::warn!(
                    "⚠️ Duplicate entity '{}' at node table row {}, keeping the first",
                    entity.node,
                    row + 1
                );
                continue;
            }
            let idx = graph.add_node(Entity {
                name: entity.node.clone(),
                label: entity.label.clone(),
                record: Some(row),
            });
            index.insert(entity.node.clone(), idx);
        }

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        let mut implicit = 0usize;

        for (row, rel) in tables.relations.iter().enumerate() {
            if rel.subject.trim().is_empty() || rel.object.trim().is_empty() {
                return Err(KgError::processing(format!(
                    "edge table row {}: subject and object must not be empty",
                    row + 1
                )));
            }
            if !rel.weight().is_finite() {
                return Err(KgError::processing(format!(
                    "edge table row {}: weight must be a finite number",
                    row + 1
                )));
            }

            let mut endpoint = |name: &str| -> NodeIndex {
                if let Some(&idx) = index.get(name) {
                    return idx;
                }
                implicit += 1;
                let idx = graph.add_node(Entity {
                    name: name.to_string(),
                    label: UNKNOWN.to_string(),
                    record: None,
                });
                index.insert(name.to_string(), idx);
                idx
            };
            let from = endpoint(&rel.subject);
            let to = endpoint(&rel.object);

            match graph.find_edge(from, to) {
                Some(edge) => {
                    let link = &mut graph[edge];
                    link.weight += rel.weight();
                    link.rows += 1;
                    if !link.predicates.contains(&rel.predicate) {
                        link.predicates.push(rel.predicate.clone());
                    }
                }
                None => {
                    graph.add_edge(
                        from,
                        to,
                        Link {
                            predicates: vec![rel.predicate.clone()],
                            weight: rel.weight(),
                            rows: 1,
                        },
                    );
                }
            }

            outgoing.entry(rel.subject.clone()).or_default().push(row);
            incoming.entry(rel.object.clone()).or_default().push(row);
        }

        if implicit > 0 {
            tracing::warn!(
                "⚠️ {} entities appear only in the edge table; added with label '{}'",
                implicit,
                UNKNOWN
            );
        }

        tracing::debug!(
            "Built graph: {} entities, {} relationships from {} relation rows",
            graph.node_count(),
            graph.edge_count(),
            tables.relations.len()
        );

        Ok(Self {
            graph,
            index,
            tables,
            outgoing,
            incoming,
        })
    }

    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    /// 合併後的邊數
    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn relation_row_count(&self) -> usize {
        self.tables.relations.len()
    }

    pub fn graph(&self) -> &DiGraph<Entity, Link> {
        &self.graph
    }

    pub fn tables(&self) -> &GraphTables {
        &self.tables
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.index_of(name).map(|idx| &self.graph[idx])
    }

    pub fn entity_record(&self, name: &str) -> Option<&EntityRecord> {
        self.entity(name)
            .and_then(|e| e.record)
            .and_then(|row| self.tables.entities.get(row))
    }

    /// 節點表順序在前，隱含實體在後
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// 入度加出度，自環算兩次
    pub fn degree(&self, name: &str) -> Option<usize> {
        self.index_of(name).map(|idx| self.degree_at(idx))
    }

    pub(crate) fn degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// 以 name 為主詞的資料列，依表格順序
    pub fn outgoing_rows(&self, name: &str) -> Vec<&RelationRecord> {
        self.rows(&self.outgoing, name)
    }

    pub fn incoming_rows(&self, name: &str) -> Vec<&RelationRecord> {
        self.rows(&self.incoming, name)
    }

    fn rows<'a>(&'a self, map: &HashMap<String, Vec<usize>>, name: &str) -> Vec<&'a RelationRecord> {
        map.get(name)
            .map(|rows| rows.iter().map(|&i| &self.tables.relations[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 測試用小型圖:
    /// Arabidopsis -> HSP70 (兩列: expresses, regulates), HSP70 -> heat stress,
    /// microgravity -> Arabidopsis, HSP70 -> HSP70 (self loop)
    pub(crate) fn sample_tables() -> GraphTables {
        GraphTables {
            entities: vec![
                EntityRecord::new("Arabidopsis", "ORGANISM").with_ncbi("3701"),
                EntityRecord::new("HSP70", "PROTEIN").with_go("GO:0006457"),
                EntityRecord::new("heat stress", "PHENOTYPE"),
                EntityRecord::new("microgravity", "CONDITION"),
            ],
            relations: vec![
                RelationRecord::new("Arabidopsis", "expresses", "HSP70")
                    .with_weight(3.0)
                    .with_sources("PMC1,PMC2,PMC3"),
                RelationRecord::new("Arabidopsis", "regulates", "HSP70")
                    .with_weight(1.0)
                    .with_sources("PMC2"),
                RelationRecord::new("HSP70", "responds_to", "heat stress")
                    .with_weight(2.0)
                    .with_sources("PMC1, PMC4"),
                RelationRecord::new("microgravity", "affects", "Arabidopsis")
                    .with_weight(4.0)
                    .with_sources("PMC3"),
                RelationRecord::new("HSP70", "binds", "HSP70"),
            ],
        }
    }

    #[test]
    fn test_merges_parallel_rows() {
        let graph = KnowledgeGraph::from_tables(sample_tables()).unwrap();

        assert_eq!(graph.entity_count(), 4);
        assert_eq!(graph.relation_row_count(), 5);
        assert_eq!(graph.relationship_count(), 4);

        let from = graph.index_of("Arabidopsis").unwrap();
        let to = graph.index_of("HSP70").unwrap();
        let edge = graph.graph().find_edge(from, to).unwrap();
        let link = &graph.graph()[edge];
        assert_eq!(link.rows, 2);
        assert_eq!(link.weight, 4.0);
        assert_eq!(link.predicates, vec!["expresses", "regulates"]);
    }

    #[test]
    fn test_degree_counts_self_loop_twice() {
        let graph = KnowledgeGraph::from_tables(sample_tables()).unwrap();
        // in: Arabidopsis, self; out: heat stress, self
        assert_eq!(graph.degree("HSP70"), Some(4));
        assert_eq!(graph.degree("heat stress"), Some(1));
        assert_eq!(graph.degree("nope"), None);
    }

    #[test]
    fn test_row_lookups_keep_table_order() {
        let graph = KnowledgeGraph::from_tables(sample_tables()).unwrap();
        let out: Vec<_> = graph
            .outgoing_rows("Arabidopsis")
            .iter()
            .map(|r| r.predicate.as_str())
            .collect();
        assert_eq!(out, vec!["expresses", "regulates"]);
        assert_eq!(graph.incoming_rows("HSP70").len(), 3);
        assert!(graph.incoming_rows("microgravity").is_empty());
    }

    #[test]
    fn test_implicit_entities_and_duplicates() {
        let tables = GraphTables {
            entities: vec![
                EntityRecord::new("a", ""),
                EntityRecord::new("a", "GENE"),
            ],
            relations: vec![RelationRecord::new("a", "r", "ghost")],
        };
        let graph = KnowledgeGraph::from_tables(tables).unwrap();

        assert_eq!(graph.entity_count(), 2);
        assert_eq!(graph.entity("a").unwrap().label, "Unknown");
        assert!(graph.entity("ghost").unwrap().is_implicit());
        assert!(graph.entity_record("ghost").is_none());
        // 重複列仍保留在資料表中供匯出
        assert_eq!(graph.tables().entities.len(), 2);
    }

    #[test]
    fn test_rejects_empty_endpoints() {
        let tables = GraphTables {
            entities: vec![],
            relations: vec![RelationRecord::new("a", "r", " ")],
        };
        let err = KnowledgeGraph::from_tables(tables).unwrap_err();
        assert!(err.to_string().contains("edge table row 1"));
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        for weight in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let tables = GraphTables {
                entities: vec![],
                relations: vec![
                    RelationRecord::new("b", "r", "c"),
                    RelationRecord::new("a", "r", "b").with_weight(weight),
                ],
            };
            let err = KnowledgeGraph::from_tables(tables).unwrap_err();
            assert!(matches!(err, KgError::ProcessingError { .. }));
            assert!(err.to_string().contains("edge table row 2"));
        }
    }

    #[test]
    fn test_parses_inf_weight_then_rejects_it() {
        let csv = b"subject,predicate,object,weight,sources\na,r,b,inf,PMC1\n";
        let relations = crate::core::pipeline::parse_relations(csv).unwrap();
        let tables = GraphTables {
            entities: vec![],
            relations,
        };
        assert!(KnowledgeGraph::from_tables(tables).is_err());
    }
}
