use std::io::Write;

use solvra_gremlin::config::{self, TraversalConfig};
use solvra_gremlin::structure::modern;
use solvra_gremlin::{Argument, ErrorCode, GraphTraversalSource, TraversalStrategy, Value};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[strategies]
identity_removal = true
incident_to_adjacent = false
read_only = true

[computer]
workers = 2
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn load_from_file_reads_toml() {
    let file = write_config(CONFIG);
    let loaded = config::load_from_file(file.path()).expect("load");
    assert!(loaded.strategies.read_only);
    assert!(!loaded.strategies.incident_to_adjacent);
    assert!(!loaded.strategies.lambda_restriction);
    assert_eq!(loaded.computer.and_then(|c| c.workers), Some(2));
}

#[test]
fn missing_file_reports_path() {
    let err = config::load_from_file("/nonexistent/solvra_gremlin.toml").expect_err("missing");
    assert!(err.to_string().contains("solvra_gremlin.toml"));
}

#[test]
fn configured_source_records_and_enforces_strategies() {
    let loaded: TraversalConfig = config::from_toml_str(CONFIG).expect("parse");
    let g = GraphTraversalSource::from_config(modern().expect("graph"), &loaded).expect("source");

    assert_eq!(
        g.strategies().names(),
        ["VertexProgramStrategy", "IdentityRemovalStrategy", "ReadOnlyStrategy"]
    );
    let recorded: Vec<&str> = g
        .bytecode()
        .source_instructions()
        .iter()
        .filter_map(|instruction| match &instruction.arguments()[0] {
            Argument::Strategy(strategy) => Some(strategy.name()),
            _ => None,
        })
        .collect();
    assert_eq!(recorded, ["VertexProgramStrategy", "ReadOnlyStrategy"]);

    let err = g.v().drop().iterate().expect_err("read only");
    assert_eq!(err.code(), ErrorCode::Verification);
    assert_eq!(g.v().count().to_list().expect("count"), vec![Value::Integer(6)]);
}
