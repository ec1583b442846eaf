//! Common test utilities for gateway tests
//!
//! Provides shared helper functions for:
//! - Writing the sample dataset into a temp dir
//! - Building a router or executor over it
//! - Posting queries and decoding JSON responses

#![allow(dead_code)]

use askadb_engine::{create_router, write_sample_dataset, DatasetSource, ExecutorConfig, QueryExecutor};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const RELATION: &str = "vendas";

pub fn sample_config() -> (ExecutorConfig, TempDir) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("vendas.parquet");
    write_sample_dataset(&path).expect("Failed to write sample dataset");
    (config_for(&path), tmp_dir)
}

pub fn config_for(path: &Path) -> ExecutorConfig {
    let source = DatasetSource::new(path, RELATION).expect("Invalid dataset source");
    ExecutorConfig::new(source)
}

pub fn create_test_app() -> (axum::Router, TempDir) {
    let (config, tmp_dir) = sample_config();
    (create_router(config), tmp_dir)
}

pub fn create_test_executor() -> (QueryExecutor, TempDir) {
    let (config, tmp_dir) = sample_config();
    (QueryExecutor::new(config), tmp_dir)
}

// Helper to parse JSON response
pub async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn post_raw(
    app: &axum::Router,
    path: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response).await)
}

pub async fn post_query(app: &axum::Router, query: &str) -> (StatusCode, Value) {
    post_raw(
        app,
        "/execute/",
        Some("application/json"),
        json!({ "query": query }).to_string(),
    )
    .await
}

/// Raw response text, for assertions on key order.
pub async fn post_query_text(app: &axum::Router, query: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/execute/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "query": query }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub async fn get_json(app: &axum::Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().method("GET").uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response).await)
}
