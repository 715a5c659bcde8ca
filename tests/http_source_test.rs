use anyhow::Result;
use httpmock::prelude::*;
use nasa_kg::core::query;
use nasa_kg::core::ConfigProvider;
use nasa_kg::{CsvGraphPipeline, DataStorage, GraphEngine, KgError, TomlConfig};

const NODES_CSV: &str = "node,label,ncbi,go
Arabidopsis thaliana,ORGANISM,3702,
HSP101,PROTEIN,,GO:0009408
spaceflight,CONDITION,,
";

const EDGES_CSV: &str = "subject,predicate,object,weight,sources
Arabidopsis thaliana,expresses,HSP101,3,\"PMC3630201, PMC5587110\"
spaceflight,upregulates,HSP101,,PMC5587110
spaceflight,induces,oxidative stress,1,
";

fn remote_config(base_url: &str) -> Result<TomlConfig> {
    Ok(TomlConfig::from_toml_str(&format!(
        "[data]\ndir = \"{}\"\n",
        base_url
    ))?)
}

#[tokio::test]
async fn test_load_graph_from_http_source() -> Result<()> {
    let server = MockServer::start();

    let nodes_mock = server.mock(|when, then| {
        when.method(GET).path("/kg/nasa_nodes.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(NODES_CSV);
    });
    let edges_mock = server.mock(|when, then| {
        when.method(GET).path("/kg/nasa_edges.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(EDGES_CSV);
    });

    let config = remote_config(&server.url("/kg"))?;
    let storage = DataStorage::for_location(config.data_dir())?;
    assert!(matches!(storage, DataStorage::Http(_)));

    let engine = GraphEngine::new(CsvGraphPipeline::new(storage, config));
    let graph = engine.run().await?;

    nodes_mock.assert();
    edges_mock.assert();

    // oxidative stress 只出現在邊表中
    assert_eq!(graph.entity_count(), 4);
    assert_eq!(graph.relationship_count(), 3);
    assert!(graph.entity("oxidative stress").unwrap().is_implicit());
    assert_eq!(graph.entity("oxidative stress").unwrap().label, "Unknown");

    // 缺少的權重視為 1
    assert_eq!(query::max_weight(&graph), 3.0);
    let overview = query::overview(&graph, 10, 10);
    assert_eq!(overview.top_sources[0].name, "PMC5587110");
    assert_eq!(overview.top_sources[0].count, 2);

    Ok(())
}

#[tokio::test]
async fn test_http_source_missing_table() {
    let server = MockServer::start();

    let nodes_mock = server.mock(|when, then| {
        when.method(GET).path("/kg/nasa_nodes.csv");
        then.status(200).body(NODES_CSV);
    });
    let edges_mock = server.mock(|when, then| {
        when.method(GET).path("/kg/nasa_edges.csv");
        then.status(404);
    });

    let config = remote_config(&server.url("/kg/")).unwrap();
    let storage = DataStorage::for_location(config.data_dir()).unwrap();
    let engine = GraphEngine::new(CsvGraphPipeline::new(storage, config));

    let error = engine.run().await.unwrap_err();
    edges_mock.assert();
    // 兩個請求同時發出，節點表可能已被讀取
    assert!(nodes_mock.hits() <= 1);

    match error {
        KgError::HttpStatusError { url, status } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/kg/nasa_edges.csv"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
