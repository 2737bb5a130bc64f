use std::sync::PoisonError;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    quiz::{Pick, QuizSession},
    server::{
        app::{AppState, QuizRng},
        error::{ApiError, ApiResponse},
    },
    telemetry::QUIZ_PICKS,
};

/// Category id the front-end sends for "All".
const ALL_CATEGORIES: i64 = 0;
const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Question,
    previous_questions: Vec<i64>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(request) = payload?;
    let category_id = request.quiz_category.id;
    let (candidates, category_label) = if category_id == ALL_CATEGORIES {
        (questions::get_all_questions(&pool).await?, "all".to_owned())
    } else {
        // unknown ids share one series so clients cannot grow the registry
        let label = match categories::get_category(&pool, category_id).await? {
            Some(category) => category.id.to_string(),
            None => UNKNOWN_CATEGORY.to_owned(),
        };
        (
            questions::get_questions_for_category(&pool, category_id).await?,
            label,
        )
    };

    let mut session = QuizSession::resume(request.previous_questions);
    let picked = {
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
        match session.next(&candidates, &mut *rng) {
            Pick::Question(question) => Some(question.clone()),
            Pick::Exhausted => None,
        }
    };

    let Some(question) = picked else {
        QUIZ_PICKS
            .with_label_values(&[category_label.as_str(), "exhausted"])
            .inc();
        return Err(ApiError::Unprocessable(format!(
            "No unseen questions left in category {category_id}"
        )));
    };
    QUIZ_PICKS
        .with_label_values(&[category_label.as_str(), "question"])
        .inc();
    tracing::debug!(
        "Picked question {} from category {category_id}, {} seen",
        question.id,
        session.seen().len()
    );

    Ok(Json(QuizResponse {
        success: true,
        question,
        previous_questions: session.into_seen(),
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
