use std::sync::{Arc, Mutex};

use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use routes::{category_router, questions_router, quizzes_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::settings::Settings;

/// Random source shared by quiz picks.
pub type QuizRng = Arc<Mutex<StdRng>>;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    rng: QuizRng,
}

impl AppState {
    pub fn new(pool: SqlitePool, rng: StdRng) -> Self {
        Self {
            pool,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        })
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn run_server(pool: SqlitePool, settings: &Settings) -> anyhow::Result<()> {
    let rng = match settings.quiz_seed {
        Some(seed) => {
            tracing::warn!("Quiz picks use a fixed seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let app = router(AppState::new(pool, rng));
    let listener = TcpListener::bind(&settings.address).await?;

    tracing::info!("Serving on {}", settings.address);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(error) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Failed to encode metrics: {error}");
    }
    ([(header::CONTENT_TYPE, encoder.format_type().to_owned())], buf).into_response()
}
