use crate::app::commands::{CommandOutput, ExportOutcome, PredicateList};
use crate::config::OutputFormat;
use crate::core::analysis::{Connectivity, NetworkReport};
use crate::core::query::{GraphSummary, Neighborhood, Overview, RelationReport, SearchResult};
use crate::domain::model::RelationRecord;
use crate::utils::error::Result;
use std::fmt::Write;

pub fn render(output: &CommandOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Text => Ok(render_text(output)),
    }
}

pub fn render_text(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Stats(summary) => stats(summary),
        CommandOutput::Overview(overview) => overview_text(overview),
        CommandOutput::Search(result) => search(result),
        CommandOutput::Relations(report) => relations(report),
        CommandOutput::Predicates(list) => predicates(list),
        CommandOutput::Analysis(report) => analysis(report),
        CommandOutput::Neighbors(hood) => neighbors(hood),
        CommandOutput::Export(outcome) => export(outcome),
    }
}

/// 整數權重不顯示小數
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{:.0}", weight)
    } else {
        format!("{}", weight)
    }
}

fn table_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("  {}\n", padded.join("  ").trim_end())
}

/// 左對齊的純文字表格
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let dashes: Vec<&str> = dashes.iter().map(String::as_str).collect();

    let mut out = table_line(headers, &widths);
    out.push_str(&table_line(&dashes, &widths));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&table_line(&cells, &widths));
    }
    out
}

fn relation_rows(rows: &[RelationRecord]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.subject.clone(),
                r.predicate.clone(),
                r.object.clone(),
                format_weight(r.weight()),
            ]
        })
        .collect()
}

fn stats(summary: &GraphSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Graph Statistics");
    let _ = writeln!(out, "  Total Entities:       {}", summary.entities);
    let _ = writeln!(out, "  Total Relationships:  {}", summary.relationships);
    let _ = writeln!(out, "  Relation Rows:        {}", summary.relation_rows);
    let _ = writeln!(out, "  Average Connections:  {:.1}", summary.average_connections);
    let _ = writeln!(out);
    let _ = writeln!(out, "🔝 Most Connected Entities");
    for entity in &summary.most_connected {
        let _ = writeln!(out, "  - {}: {} connections", entity.name, entity.degree);
    }
    out
}

fn overview_text(overview: &Overview) -> String {
    let count_rows = |entries: &[crate::core::query::CountEntry]| -> Vec<Vec<String>> {
        entries
            .iter()
            .map(|e| vec![e.name.clone(), e.count.to_string()])
            .collect()
    };

    let mut out = String::new();
    let _ = writeln!(out, "📈 Entity Types Distribution");
    out.push_str(&table(&["Type", "Entities"], &count_rows(&overview.entity_types)));
    let _ = writeln!(out);
    let _ = writeln!(out, "🔗 Top Relationship Types");
    out.push_str(&table(&["Relationship", "Count"], &count_rows(&overview.top_predicates)));
    let _ = writeln!(out);
    let _ = writeln!(out, "📚 Source Documents");
    out.push_str(&table(&["Document", "Relationships"], &count_rows(&overview.top_sources)));
    out
}

fn search(result: &SearchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🔍 Found {} matching entities", result.total_matches);
    if result.hits.is_empty() {
        let _ = writeln!(out, "No matches found. Try a different search term.");
        return out;
    }
    if result.hits.len() < result.total_matches {
        let _ = writeln!(out, "(showing first {})", result.hits.len());
    }

    for hit in &result.hits {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", hit.name, hit.label);
        let _ = writeln!(out, "  NCBI: {}", hit.ncbi);
        let _ = writeln!(out, "  GO: {}", hit.go);
        let _ = writeln!(
            out,
            "  Connections: {} (outgoing {}, incoming {})",
            hit.connections, hit.outgoing, hit.incoming
        );
        for rel in &hit.sample_relations {
            let _ = writeln!(out, "  ➡️ {} {} {}", rel.subject, rel.predicate, rel.object);
        }
    }
    out
}

fn relations(report: &RelationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🔗 Showing {} relationships (predicate: {}, min strength: {})",
        report.total,
        report.predicate.as_deref().unwrap_or("All"),
        format_weight(report.min_weight)
    );
    if report.rows.len() < report.total {
        let _ = writeln!(out, "(listing first {})", report.rows.len());
    }
    out.push_str(&table(
        &["Entity 1", "Relationship", "Entity 2", "Strength"],
        &relation_rows(&report.rows),
    ));

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "💎 High-Confidence Relationships (strength > {})",
        format_weight(report.high_confidence_threshold)
    );
    if report.high_confidence.is_empty() {
        let _ = writeln!(out, "No high-confidence relationships found with current filters.");
    }
    for rel in &report.high_confidence {
        let _ = writeln!(
            out,
            "  {} ➡️ {} ➡️ {} (strength: {})",
            rel.subject,
            rel.predicate,
            rel.object,
            format_weight(rel.weight())
        );
    }
    out
}

fn predicates(list: &PredicateList) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Relationship types ({}):", list.predicates.len());
    for predicate in &list.predicates {
        let _ = writeln!(out, "  - {}", predicate);
    }
    let _ = writeln!(out, "Maximum strength: {}", format_weight(list.max_weight));
    out
}

fn analysis(report: &NetworkReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Network Analysis");
    let _ = writeln!(out, "  Network Density:     {:.4}", report.density);
    match report.connectivity {
        Connectivity::Connected { diameter } => {
            let _ = writeln!(out, "  Network Diameter:    {}", diameter);
        }
        Connectivity::Disconnected { components } => {
            let _ = writeln!(out, "  Connected Components: {}", components);
        }
    }
    let _ = writeln!(out, "  Avg Clustering:      {:.4}", report.average_clustering);
    let _ = writeln!(out);
    let _ = writeln!(out, "🎯 Most Important Entities (by PageRank)");
    let rows: Vec<Vec<String>> = report
        .pagerank
        .iter()
        .map(|e| vec![e.name.clone(), format!("{:.6}", e.score)])
        .collect();
    out.push_str(&table(&["Entity", "Importance Score"], &rows));
    out
}

fn neighbors(hood: &Neighborhood) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🕸️ {} entities within {} hops of {}",
        hood.members.len(),
        hood.radius,
        hood.center
    );
    let rows: Vec<Vec<String>> = hood
        .members
        .iter()
        .map(|m| vec![m.name.clone(), m.label.clone(), m.distance.to_string()])
        .collect();
    out.push_str(&table(&["Entity", "Type", "Hops"], &rows));
    out
}

fn export(outcome: &ExportOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📥 Exported to {}", outcome.output_path);
    for file in &outcome.files {
        let _ = writeln!(out, "  - {}", file);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "🔍 Entities preview:");
    let entity_rows: Vec<Vec<String>> = outcome
        .preview
        .entities
        .iter()
        .map(|e| {
            vec![
                e.node.clone(),
                e.label.clone(),
                e.ncbi_or_unknown().to_string(),
                e.go_or_unknown().to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&["node", "label", "ncbi", "go"], &entity_rows));

    let _ = writeln!(out);
    let _ = writeln!(out, "🔍 Relationships preview:");
    out.push_str(&table(
        &["subject", "predicate", "object", "weight"],
        &relation_rows(&outcome.preview.relations),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::RankedEntity;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(3.0), "3");
        assert_eq!(format_weight(2.5), "2.5");
    }

    #[test]
    fn test_table_alignment() {
        let rendered = table(
            &["Entity", "Score"],
            &[vec!["HSP70".to_string(), "0.5".to_string()]],
        );
        assert_eq!(rendered, "  Entity  Score\n  ------  -----\n  HSP70   0.5\n");
    }

    #[test]
    fn test_stats_text_and_json() {
        let output = CommandOutput::Stats(GraphSummary {
            entities: 2,
            relationships: 1,
            relation_rows: 1,
            average_connections: 1.0,
            most_connected: vec![RankedEntity {
                name: "HSP70".to_string(),
                degree: 1,
            }],
        });

        let text = render(&output, OutputFormat::Text).unwrap();
        assert!(text.contains("Average Connections:  1.0"));
        assert!(text.contains("- HSP70: 1 connections"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&output, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["entities"], 2);
    }

    #[test]
    fn test_empty_search_message() {
        let output = CommandOutput::Search(SearchResult {
            term: "mars".to_string(),
            total_matches: 0,
            hits: vec![],
        });
        assert!(render_text(&output).contains("No matches found"));
    }
}
