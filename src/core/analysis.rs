use crate::core::graph::KnowledgeGraph;
use crate::domain::model::AnalysisSettings;
use crate::utils::error::{KgError, Result};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};

pub const DEFAULT_PAGERANK_TOP: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageRankParams {
    pub alpha: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self {
            alpha: 0.85,
            max_iter: 100,
            tol: 1.0e-6,
        }
    }
}

impl From<&AnalysisSettings> for PageRankParams {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            alpha: settings.pagerank_alpha,
            max_iter: settings.pagerank_max_iter,
            tol: settings.pagerank_tol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Connectivity {
    Connected { diameter: usize },
    Disconnected { components: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntity {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReport {
    pub density: f64,
    pub connectivity: Connectivity,
    pub average_clustering: f64,
    pub pagerank: Vec<ScoredEntity>,
}

/// 有向圖密度 E / (N(N-1))，少於兩個實體時為 0
pub fn density(graph: &KnowledgeGraph) -> f64 {
    let n = graph.entity_count() as f64;
    if n <= 1.0 {
        return 0.0;
    }
    graph.relationship_count() as f64 / (n * (n - 1.0))
}

/// 無向鄰接表，忽略自環
fn undirected_adjacency(graph: &KnowledgeGraph) -> Vec<HashSet<usize>> {
    let g = graph.graph();
    let mut adjacency = vec![HashSet::new(); g.node_count()];
    for edge in g.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a != b {
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }
    }
    adjacency
}

fn bfs_eccentricity(adjacency: &[HashSet<usize>], start: usize) -> usize {
    let mut dist: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    dist[start] = Some(0);
    let mut farthest = 0;

    while let Some(current) = queue.pop_front() {
        let d = dist[current].unwrap_or(0);
        for &next in &adjacency[current] {
            if dist[next].is_none() {
                dist[next] = Some(d + 1);
                farthest = farthest.max(d + 1);
                queue.push_back(next);
            }
        }
    }
    farthest
}

/// 連通時回報直徑，否則回報連通分量數
pub fn connectivity(graph: &KnowledgeGraph) -> Connectivity {
    let components = petgraph::algo::connected_components(graph.graph());
    if components != 1 {
        return Connectivity::Disconnected { components };
    }

    let adjacency = undirected_adjacency(graph);
    let diameter = (0..adjacency.len())
        .map(|start| bfs_eccentricity(&adjacency, start))
        .max()
        .unwrap_or(0);
    Connectivity::Connected { diameter }
}

/// 各實體的局部聚集係數，依圖中順序
pub fn clustering(graph: &KnowledgeGraph) -> Vec<f64> {
    let adjacency = undirected_adjacency(graph);
    adjacency
        .iter()
        .map(|neighbors| {
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }
            let links = neighbors
                .iter()
                .map(|&u| adjacency[u].intersection(neighbors).count())
                .sum::<usize>();
            // 每個三角形被計算兩次
            links as f64 / (k * (k - 1)) as f64
        })
        .collect()
}

pub fn average_clustering(graph: &KnowledgeGraph) -> f64 {
    let scores = clustering(graph);
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// 以冪迭代計算加權 PageRank，依圖中順序回傳
pub fn pagerank(graph: &KnowledgeGraph, params: PageRankParams) -> Result<Vec<f64>> {
    let g = graph.graph();
    let n = g.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }
    let uniform = 1.0 / n as f64;

    let rows: Vec<(usize, usize, f64)> = graph
        .tables()
        .relations
        .iter()
        .filter_map(|rel| {
            let from = graph.index_of(&rel.subject)?.index();
            let to = graph.index_of(&rel.object)?.index();
            Some((from, to, rel.weight().max(0.0)))
        })
        .collect();

    // 先除以來源的最大權重再加總，合併的邊不會溢位
    let mut max_weight = vec![0.0f64; n];
    for &(from, _, w) in &rows {
        max_weight[from] = max_weight[from].max(w);
    }
    let mut edge_weight: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut out_weight = vec![0.0f64; n];
    for &(from, to, w) in &rows {
        if max_weight[from] > 0.0 {
            let scaled = w / max_weight[from];
            *edge_weight.entry((from, to)).or_insert(0.0) += scaled;
            out_weight[from] += scaled;
        }
    }
    let transitions: Vec<(usize, usize, f64)> = edge_weight
        .into_iter()
        .filter(|&((from, _), _)| out_weight[from] > 0.0)
        .map(|((from, to), w)| (from, to, w / out_weight[from]))
        .collect();
    let dangling: Vec<usize> = (0..n).filter(|&i| out_weight[i] <= 0.0).collect();

    let mut x = vec![uniform; n];
    for iteration in 0..params.max_iter {
        let last = x;
        x = vec![0.0; n];

        let dangle_sum: f64 = params.alpha * dangling.iter().map(|&i| last[i]).sum::<f64>();
        for &(from, to, p) in &transitions {
            x[to] += params.alpha * last[from] * p;
        }
        for value in x.iter_mut() {
            *value += dangle_sum * uniform + (1.0 - params.alpha) * uniform;
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * params.tol {
            tracing::debug!("PageRank converged after {} iterations", iteration + 1);
            return Ok(x);
        }
    }

    Err(KgError::processing(format!(
        "PageRank failed to converge within {} iterations",
        params.max_iter
    )))
}

/// PageRank 最高的實體，分數遞減、名稱遞增
pub fn top_pagerank(
    graph: &KnowledgeGraph,
    params: PageRankParams,
    top_n: usize,
) -> Result<Vec<ScoredEntity>> {
    let scores = pagerank(graph, params)?;
    let mut ranked: Vec<ScoredEntity> = graph
        .entities()
        .zip(scores)
        .map(|(entity, score)| ScoredEntity {
            name: entity.name.clone(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(top_n);
    Ok(ranked)
}

pub fn network_report(
    graph: &KnowledgeGraph,
    params: PageRankParams,
    top_n: usize,
) -> Result<NetworkReport> {
    Ok(NetworkReport {
        density: density(graph),
        connectivity: connectivity(graph),
        average_clustering: average_clustering(graph),
        pagerank: top_pagerank(graph, params, top_n)?,
    })
}
