//! HTTP API integration tests
//!
//! Upload, history and health endpoints against a temporary SQLite database

#![cfg(feature = "server")]

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use equipviz::database::connection::setup_database;
use equipviz::server::app::create_app;
use sea_orm::Database;
use serde_json::Value;
use tempfile::NamedTempFile;

const BOUNDARY: &str = "equipviz-test-boundary";
const TWO_ROWS: &str = "Pressure,Temperature,Flowrate,Type\n10,100,5,X\n20,140,15,Y\n";

async fn setup_test_server() -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, Some("*")).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

/// multipart/form-data body with a single part
fn multipart_body(field: &str, filename: Option<&str>, content: &str) -> Vec<u8> {
    let disposition = match filename {
        Some(filename) => format!("form-data; name=\"{field}\"; filename=\"{filename}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

async fn upload(server: &TestServer, filename: &str, content: &str) -> axum_test::TestResponse {
    server
        .post("/api/summary/")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body("file", Some(filename), content).into())
        .await
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["service"], "equipviz");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_upload_summarises_and_records() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = upload(&server, "plant.csv", TWO_ROWS).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["avg_pressure"], 15.0);
    assert_eq!(body["avg_temperature"], 120.0);
    assert_eq!(body["avg_flowrate"], 10.0);
    assert_eq!(body["type_distribution"]["X"], 1);
    assert_eq!(body["type_distribution"]["Y"], 1);

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["filename"], "plant.csv");
    assert_eq!(history[0]["avg_temp"], 120.0);
    assert!(history[0]["uploaded_at"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_upload_without_trailing_slash() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = server
        .post("/api/summary")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body("file", Some("a.csv"), TWO_ROWS).into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_bad_request() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    // wrong field name
    let response = server
        .post("/api/summary/")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body("document", Some("a.csv"), TWO_ROWS).into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file");

    // plain text field, no file name
    let response = server
        .post("/api/summary/")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body("file", None, TWO_ROWS).into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // not multipart at all
    let response = server.post("/api/summary/").text("Pressure\n1\n").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let history: Vec<Value> = server.get("/api/summary/history").await.json();
    assert!(history.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_file_input_is_bad_request() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    // what a browser sends when the form is submitted with no file chosen
    let response = upload(&server, "", "").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file");

    let history: Vec<Value> = server.get("/api/summary/history").await.json();
    assert!(history.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_table_writes_nothing() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = upload(&server, "bad.csv", "Pressure,Type\nhigh,X\n").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Pressure"));

    let history: Vec<Value> = server.get("/api/summary/history").await.json();
    assert!(history.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_empty_table_is_not_an_error() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = upload(&server, "empty.csv", "Pressure,Temperature,Flowrate,Type\n").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["avg_pressure"], 0.0);
    assert!(body["type_distribution"].as_object().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_history_window_is_newest_first_and_bounded() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let mut last = Value::Null;
    for i in 0..7 {
        last = upload(&server, &format!("batch-{i}.csv"), TWO_ROWS).await.json();
    }

    let history = last["history"].as_array().unwrap();
    assert_eq!(history.len(), 5);
    let names: Vec<&str> = history
        .iter()
        .map(|h| h["filename"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["batch-6.csv", "batch-5.csv", "batch-4.csv", "batch-3.csv", "batch-2.csv"]
    );

    let response = server
        .get("/api/summary/history")
        .add_query_param("limit", 2)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let listed: Vec<Value> = response.json();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["filename"], "batch-6.csv");

    let listed: Vec<Value> = server
        .get("/api/summary/history")
        .add_query_param("limit", 50)
        .await
        .json();
    assert_eq!(listed.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let (server, _db) = setup_test_server().await?;

    let response = server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/summary/"].is_object());
    assert!(doc["components"]["schemas"]["SummaryPayload"].is_object());

    Ok(())
}
