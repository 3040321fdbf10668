//! Integration tests for the HTTP client
//!
//! Each test spins up an in-process axum server on an ephemeral port that
//! echoes what it received, then checks the client's routes, bodies and
//! error mapping against it.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use openset_client::{ClientConfig, ClientError, OpenSetClient, QueryOptions, SortOrder};
use openset_core::{Batch, ColumnDef, ColumnType, Event};
use serde_json::{Value, json};
use std::collections::HashMap;

async fn init_cluster(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "message": "initialized", "partitions": params.get("partitions") }))
}

async fn join(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "host": params.get("host"), "port": params.get("port") }))
}

async fn create_table(Path(table): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "created", "table": table, "columns": body["columns"] }))
}

async fn describe_table(Path(table): Path<String>) -> impl IntoResponse {
    if table == "unknown" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "class": "config", "message": "table not found" } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "table": table, "columns": [{ "name": "total", "type": "double" }] })),
    )
}

async fn add_column(
    Path((table, column)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({
        "message": "added",
        "table": table,
        "column": column,
        "type": params.get("type"),
        "is_set": params.get("is_set"),
    }))
}

async fn drop_column(Path((table, column)): Path<(String, String)>) -> Json<Value> {
    Json(json!({ "message": "dropped", "table": table, "column": column }))
}

async fn insert(Path(table): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
    if table == "missing" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "class": "insert", "message": "missing or invalid table name" } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "message": "yummy",
            "path_table": table,
            "body_table": body["table"],
            "count": body["events"].as_array().map(Vec::len),
            "first": body["events"][0],
        })),
    )
}

async fn query_events(
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    code: String,
) -> Json<Value> {
    Json(json!({ "table": table, "code": code, "params": params }))
}

async fn status() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

fn router() -> Router {
    Router::new()
        .route("/v1/cluster/init", put(init_cluster))
        .route("/v1/cluster/join", put(join))
        .route("/v1/table/{table}", post(create_table).get(describe_table))
        .route(
            "/v1/table/{table}/column/{column}",
            put(add_column).delete(drop_column),
        )
        .route("/v1/insert/{table}", post(insert))
        .route("/v1/query/{table}/event", post(query_events))
        .route("/v1/status", get(status))
}

async fn test_client() -> OpenSetClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    OpenSetClient::new(&ClientConfig::new("127.0.0.1", port)).unwrap()
}

fn event(n: u64) -> Event {
    Event::try_from(json!({ "person": format!("user{n}"), "action": "purchase" })).unwrap()
}

// =============================================================================
// Cluster
// =============================================================================

#[tokio::test]
async fn test_init_cluster_sends_partitions() {
    let client = test_client().await;
    let response = client.init_cluster(4).await.unwrap();
    assert_eq!(response["partitions"], "4");
}

#[tokio::test]
async fn test_invite_node_sends_host_and_port() {
    let client = test_client().await;
    let response = client.invite_node("10.0.0.7", 2021).await.unwrap();
    assert_eq!(response["host"], "10.0.0.7");
    assert_eq!(response["port"], "2021");
}

#[tokio::test]
async fn test_non_envelope_error_maps_to_status() {
    let client = test_client().await;
    match client.status().await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

// =============================================================================
// Tables
// =============================================================================

#[tokio::test]
async fn test_create_table_posts_columns() {
    let client = test_client().await;
    let columns = vec![
        ColumnDef::new("product_name", ColumnType::Text),
        ColumnDef {
            is_set: true,
            ..ColumnDef::new("product_tags", ColumnType::Text)
        },
    ];

    let response = client.create_table("highstreet", &columns).await.unwrap();
    assert_eq!(response["table"], "highstreet");
    assert_eq!(
        response["columns"],
        json!([
            { "name": "product_name", "type": "text" },
            { "name": "product_tags", "type": "text", "is_set": true }
        ])
    );
}

#[tokio::test]
async fn test_describe_table_error_envelope() {
    let client = test_client().await;

    let ok = client.describe_table("highstreet").await.unwrap();
    assert_eq!(ok["table"], "highstreet");

    match client.describe_table("unknown").await {
        Err(ClientError::Remote { status, class, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(class, "config");
            assert_eq!(message, "table not found");
        }
        other => panic!("expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_add_and_drop_column() {
    let client = test_client().await;

    let added = client
        .add_column("highstreet", "gift_wrap", ColumnType::Bool, false)
        .await
        .unwrap();
    assert_eq!(added["column"], "gift_wrap");
    assert_eq!(added["type"], "bool");
    assert_eq!(added["is_set"], "false");

    let dropped = client.drop_column("highstreet", "gift_wrap").await.unwrap();
    assert_eq!(dropped["message"], "dropped");
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
async fn test_insert_sends_table_and_events() {
    let client = test_client().await;
    let batch = Batch::new("highstreet", (0..3).map(event).collect()).unwrap();

    let response = client.insert(&batch).await.unwrap();
    assert_eq!(response["message"], "yummy");
    assert_eq!(response["path_table"], "highstreet");
    assert_eq!(response["body_table"], "highstreet");
    assert_eq!(response["count"], 3);
    assert_eq!(response["first"]["person"], "user0");
}

#[tokio::test]
async fn test_insert_rejected_by_cluster() {
    let client = test_client().await;
    let batch = Batch::new("missing", vec![event(1)]).unwrap();

    let err = client.insert(&batch).await.unwrap_err();
    assert!(matches!(err, ClientError::Remote { ref class, .. } if class == "insert"));
    assert!(err.to_string().contains("missing or invalid table name"));
}

#[tokio::test]
async fn test_query_posts_code_as_text() {
    let client = test_client().await;
    let options = QueryOptions {
        debug: true,
        order: Some(SortOrder::Asc),
        trim: Some(25),
        ..Default::default()
    };

    let response = client
        .query_events("highstreet", "select\n  count person\nend", &options)
        .await
        .unwrap();

    assert_eq!(response["table"], "highstreet");
    assert_eq!(response["code"], "select\n  count person\nend");
    assert_eq!(response["params"]["debug"], "true");
    assert_eq!(response["params"]["order"], "asc");
    assert_eq!(response["params"]["trim"], "25");
    assert!(response["params"].get("sort").is_none());
}

#[tokio::test]
async fn test_unreachable_node_is_request_error() {
    // Bind then drop a listener to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = OpenSetClient::new(&ClientConfig::new("127.0.0.1", port)).unwrap();
    let err = client.status().await.unwrap_err();
    assert!(matches!(err, ClientError::Request(_)));
}
