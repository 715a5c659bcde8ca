use clap::Parser;
use nasa_kg::{app, CliConfig, KgError};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn sample_data_dir() -> String {
    format!("{}/data", env!("CARGO_MANIFEST_DIR"))
}

fn cli(args: &[&str]) -> CliConfig {
    let data_dir = sample_data_dir();
    let mut argv = vec!["nasa-kg", "--data-dir", data_dir.as_str()];
    argv.extend_from_slice(args);
    CliConfig::parse_from(argv)
}

#[tokio::test]
async fn test_stats_text_output() {
    let output = app::run(&cli(&["stats", "--top", "2"])).await.unwrap();

    assert!(output.contains("Total Entities:       12"));
    assert!(output.contains("Total Relationships:  13"));
    assert!(output.contains("Average Connections:  2.2"));
    assert!(output.contains("- bone loss: 3 connections"));
    assert!(output.contains("- spaceflight: 3 connections"));
}

#[tokio::test]
async fn test_search_json_output() {
    let output = app::run(&cli(&["search", "arabidopsis", "--format", "json"]))
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["total_matches"], 1);
    assert_eq!(json["hits"][0]["name"], "Arabidopsis thaliana");
    assert_eq!(json["hits"][0]["ncbi"], "3702");
    assert_eq!(json["hits"][0]["outgoing"], 3);
    assert_eq!(json["hits"][0]["sample_relations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_relations_without_high_confidence() {
    let output = app::run(&cli(&[
        "relations",
        "--predicate",
        "upregulates",
        "--min-weight",
        "1",
    ]))
    .await
    .unwrap();

    assert!(output.contains("Showing 3 relationships (predicate: upregulates, min strength: 1)"));
    assert!(output.contains("No high-confidence relationships found with current filters."));
}

#[tokio::test]
async fn test_analyze_and_neighbors() {
    let output = app::run(&cli(&["analyze", "--top", "3"])).await.unwrap();
    assert!(output.contains("Network Density:     0.0985"));
    assert!(output.contains("Network Diameter:"));
    assert!(output.contains("bone loss"));

    let output = app::run(&cli(&["neighbors", "PIN2", "--radius", "2"]))
        .await
        .unwrap();
    assert!(output.contains("entities within 2 hops of PIN2"));
    assert!(output.contains("root gravitropism"));
    assert!(output.contains("HSP101"));
}

#[tokio::test]
async fn test_unknown_entity() {
    let error = app::run(&cli(&["neighbors", "Mars"])).await.unwrap_err();
    assert!(matches!(error, KgError::EntityNotFound { .. }));
}

#[tokio::test]
async fn test_export_with_toml_config() {
    let output_dir = TempDir::new().unwrap();
    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "[data]\ndir = \"{}\"\n\n[analysis]\ntop_entities = 2\n\n[output]\npath = \"{}\"\n",
        sample_data_dir(),
        output_dir.path().display()
    )
    .unwrap();

    let cli = CliConfig::parse_from([
        "nasa-kg",
        "--config",
        config_file.path().to_str().unwrap(),
        "export",
        "--bundle",
        "--preview",
        "2",
    ]);
    let output = app::run(&cli).await.unwrap();

    assert!(output.contains("nasa_kg_export.zip"));
    assert!(output.contains("🔍 Entities preview:"));
    assert!(output.contains("Arabidopsis thaliana"));
    assert!(!output.contains("Mus musculus"));

    for file in ["nasa_entities.csv", "nasa_relationships.csv", "nasa_kg_export.zip"] {
        assert!(output_dir.path().join(file).exists(), "missing {}", file);
    }
}

#[tokio::test]
async fn test_cli_overrides_toml_data_dir() {
    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, "[data]\ndir = \"/nonexistent/nasa\"\n").unwrap();

    let data_dir = sample_data_dir();
    let cli = CliConfig::parse_from([
        "nasa-kg",
        "--config",
        config_file.path().to_str().unwrap(),
        "--data-dir",
        data_dir.as_str(),
        "predicates",
    ]);
    let output = app::run(&cli).await.unwrap();

    assert!(output.contains("Relationship types (9):"));
    assert!(output.contains("Maximum strength: 5"));
}
