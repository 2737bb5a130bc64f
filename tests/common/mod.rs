#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use trivia_api::db::{self, queries::questions::create_question, NewQuestion};
use trivia_api::server::app::{router, AppState};

pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("trivia.db");
    let pool = db::establish_connection(&path.display().to_string())
        .await
        .expect("failed to open test database");
    db::run_migrations(&pool).await.expect("migrations failed");
    TestDb { pool, _dir: dir }
}

pub fn app(pool: &SqlitePool) -> Router {
    router(AppState::new(pool.clone(), StdRng::seed_from_u64(1)))
}

pub async fn add_question(pool: &SqlitePool, question: &str, answer: &str, category: i64) -> i64 {
    create_question(
        pool,
        &NewQuestion {
            question: question.to_owned(),
            answer: answer.to_owned(),
            category,
            difficulty: 1,
        },
    )
    .await
    .expect("insert question")
}

/// Adds `count` numbered questions to `category` and returns their ids.
pub async fn seed_questions(pool: &SqlitePool, category: i64, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for n in 1..=count {
        ids.push(
            add_question(
                pool,
                &format!("Question {n} of category {category}"),
                &format!("Answer {n}"),
                category,
            )
            .await,
        );
    }
    ids
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub fn ids_of(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .expect("questions should be an array")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id"))
        .collect()
}
