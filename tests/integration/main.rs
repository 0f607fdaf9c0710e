//! Integration tests for Skillpath
//!
//! These tests verify that the seed loader, graph store, HTTP server and
//! seed watcher work together.

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use skillpath_core::{GraphStore, Resolver, SeedSet};
use skillpath_server::handlers::{self, AddPrerequisiteRequest, SkillQuery};
use skillpath_server::{create_router, ApiError, ServerState};
use skillpath_watcher::SeedWatcher;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::sleep;

const YAML_SEED: &str = "\
skills:
  - Git
prerequisites:
  - skill: Data Analysis
    requires: [SQL]
  - skill: Machine Learning
    requires: [Data Analysis, Python]
";

fn write_seed(name: &str, contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

fn yaml_store() -> (TempDir, std::path::PathBuf, Arc<GraphStore>) {
    let (dir, path) = write_seed("skills.yaml", YAML_SEED);
    let graph = SeedSet::from_path(&path).unwrap().build().unwrap();
    (dir, path, Arc::new(GraphStore::new(graph)))
}

/// Send one HTTP/1.1 request and return the raw response.
async fn http(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skill prerequisites and learning paths"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_cli_version_skips_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .args(["--config", "/nonexistent/skillpath.toml", "version"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("Skillpath v{}", env!("CARGO_PKG_VERSION"))
    );

    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .args(["--config", "/nonexistent/skillpath.toml", "list"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_cli_path_from_seed_file() {
    let (_dir, path) = write_seed("skills.yaml", YAML_SEED);
    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .arg("--seed")
        .arg(&path)
        .args(["--json", "path", "MACHINE learning"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["target_skill"], "Machine Learning");
    assert_eq!(
        body["learning_path"],
        serde_json::json!(["SQL", "Data Analysis", "Python", "Machine Learning"])
    );
}

#[test]
fn test_cli_unknown_skill_fails() {
    let (_dir, path) = write_seed("skills.yaml", YAML_SEED);
    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .arg("--seed")
        .arg(&path)
        .args(["prereqs", "Pythn"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Did you mean"));
}

#[test]
fn test_cli_check_rejects_cyclic_seed() {
    let (_dir, path) = write_seed(
        "skills.json",
        r#"{"prerequisites": [
            {"skill": "A", "requires": ["B"]},
            {"skill": "B", "requires": ["A"]}
        ]}"#,
    );
    let output = Command::new(env!("CARGO_BIN_EXE_skillpath"))
        .arg("--seed")
        .arg(&path)
        .arg("check")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_builtin_seed_paths_respect_prerequisites() {
    let graph = SeedSet::builtin().unwrap().build().unwrap();
    let resolver = Resolver::new(&graph);

    for skill in graph.all_skills() {
        let path = resolver.learning_path_to(&skill.name).unwrap();
        assert_eq!(path.learning_path.last(), Some(&skill.name));
        for (prereq, dependent) in graph.edges() {
            let (Some(p), Some(d)) = (
                path.learning_path.iter().position(|n| *n == prereq.name),
                path.learning_path.iter().position(|n| *n == dependent.name),
            ) else {
                continue;
            };
            assert!(p < d, "{} listed after {}", prereq.name, dependent.name);
        }
    }
}

/// Edits made through the API are visible to later reads, and a rejected
/// edit leaves the published graph alone.
#[tokio::test]
async fn test_api_edits_share_store() {
    let (_dir, _path, store) = yaml_store();
    let state = Arc::new(ServerState::with_store(Arc::clone(&store)));

    let request = AddPrerequisiteRequest {
        skill: "Deep Learning".to_string(),
        prerequisite: "machine learning".to_string(),
    };
    let Json(added) = handlers::add_prerequisite(State(Arc::clone(&state)), Ok(Json(request)))
        .await
        .unwrap();
    assert_eq!(added.prerequisite, "Machine Learning");

    let Json(path) = handlers::learning_path(
        State(Arc::clone(&state)),
        Query(SkillQuery {
            skill: Some("deep learning".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(
        path.learning_path,
        vec!["SQL", "Data Analysis", "Python", "Machine Learning", "Deep Learning"]
    );

    let before = store.snapshot();
    let cyclic = AddPrerequisiteRequest {
        skill: "SQL".to_string(),
        prerequisite: "Deep Learning".to_string(),
    };
    let err = handlers::add_prerequisite(State(state), Ok(Json(cyclic)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}

/// Test that the server answers real HTTP requests
#[tokio::test]
async fn test_server_over_tcp() {
    let (_dir, _path, store) = yaml_store();
    let app = create_router(Arc::new(ServerState::with_store(store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let response = http(
        addr,
        "GET /skills/graph/prereqs?skill=machine%20learning HTTP/1.1\r\n\
         Host: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains(r#""prerequisites":["Data Analysis","Python"]"#));

    let response = http(
        addr,
        "GET /skills/graph/path?skill=Kubernetes HTTP/1.1\r\n\
         Host: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404"));
    assert!(response.contains(r#""detail":"skill 'Kubernetes' not found""#));

    let response = http(
        addr,
        "GET /skills/graph/related?skill= HTTP/1.1\r\n\
         Host: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 400"));

    server.abort();
}

/// Test that bad POST bodies get the same JSON error shape as other failures
#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let (_dir, _path, store) = yaml_store();
    let app = create_router(Arc::new(ServerState::with_store(Arc::clone(&store))));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let wrong_type = r#"{"skill": 5}"#;
    let response = http(
        addr,
        &format!(
            "POST /skills/add HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{wrong_type}",
            wrong_type.len()
        ),
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 400"), "{response}");
    assert!(response.to_lowercase().contains("content-type: application/json"));
    assert!(response.contains(r#"{"detail":"#));

    let body = r#"{"skill": "Rust"}"#;
    let response = http(
        addr,
        &format!(
            "POST /skills/add-prerequisite HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 400"), "{response}");
    assert!(response.contains(r#""detail":"Expected request with `Content-Type: application/json`""#));

    assert_eq!(store.snapshot().skill_count(), 5);
    server.abort();
}

/// Test that a seed edit reaches API readers through the watcher
#[tokio::test]
async fn test_watcher_reload_visible_to_handlers() {
    let (_dir, path, store) = yaml_store();
    let state = Arc::new(ServerState::with_store(Arc::clone(&store)));

    let mut watcher = SeedWatcher::new(&path, Arc::clone(&store))
        .unwrap()
        .with_debounce(Duration::from_millis(50));
    watcher.start_watching().unwrap();
    let task = tokio::spawn(watcher.process_events());

    sleep(Duration::from_millis(100)).await;
    let updated = format!("{YAML_SEED}  - skill: Deep Learning\n    requires: [Machine Learning]\n");
    std::fs::write(&path, updated).unwrap();

    let mut count = 0;
    for _ in 0..50 {
        let Json(stats) = handlers::graph_stats(State(Arc::clone(&state))).await;
        count = stats.num_skills;
        if count == 6 {
            break;
        }
        sleep(Duration::from_millis(100)).await;
    }
    task.abort();
    assert_eq!(count, 6, "seed change was not picked up");
}
