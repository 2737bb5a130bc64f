use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, SearchField,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_lenient_i64, PageQuery},
        error::{ApiError, ApiResponse},
    },
    telemetry::QUESTIONS_CREATED,
};

use super::{category_map, QuestionsPage};

const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

fn default_current_category() -> String {
    "Science".to_owned()
}

#[derive(Deserialize)]
struct QuestionsQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
    #[serde(default = "default_current_category")]
    category: String,
}

#[derive(Deserialize)]
struct QuestionForm {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<QuestionsQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = questions::get_all_questions(&pool).await?;
    let page = QuestionsPage::new(&questions, query.page.unwrap_or(1));
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(
        page.with_categories(category_map(categories))
            .with_current_category(Some(query.category)),
    ))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<QuestionsQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Path(id) = id?;
    questions::delete_question(&pool, id).await?;
    tracing::info!("Deleted question {id}");

    let questions = questions::get_all_questions(&pool).await?;
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(
        QuestionsPage::new(&questions, query.page.unwrap_or(1))
            .with_categories(category_map(categories))
            .with_current_category(Some(query.category))
            .with_deleted(id),
    ))
}

// the same endpoint serves search (body carries `searchTerm`) and creation
async fn post_question(
    State(pool): State<SqlitePool>,
    Query(page): Query<PageQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Response> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if let Some(term) = body.get("searchTerm") {
        let page = search(&pool, term, body.get("searchField"), page.page_number()).await?;
        return Ok(Json(page).into_response());
    }
    let created = create(&pool, body).await?;
    Ok(Json(created).into_response())
}

fn search_field(field: Option<&Value>) -> ApiResponse<SearchField> {
    match field.map(|f| f.as_str()) {
        None => Ok(SearchField::Question),
        Some(Some("question")) => Ok(SearchField::Question),
        Some(Some("answer")) => Ok(SearchField::Answer),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown search field {other:?}"
        ))),
    }
}

async fn search(
    pool: &SqlitePool,
    term: &Value,
    field: Option<&Value>,
    page_number: i64,
) -> ApiResponse<QuestionsPage> {
    let term = match term.as_str().map(str::trim) {
        Some(term) if !term.is_empty() => term,
        _ => {
            return Err(ApiError::BadRequest(
                "searchTerm should be a non-empty string".to_owned(),
            ))
        }
    };
    let field = search_field(field)?;
    let matches = questions::search_questions(pool, field, term).await?;
    tracing::debug!("Search {term:?} matched {} questions", matches.len());
    Ok(QuestionsPage::new(&matches, page_number))
}

async fn create(pool: &SqlitePool, body: Value) -> ApiResponse<Created> {
    let form: QuestionForm =
        serde_json::from_value(body).map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    let new_question = validate(form)?;
    categories::get_category(pool, new_question.category)
        .await?
        .ok_or_else(|| {
            ApiError::Unprocessable(format!("Category {} does not exist", new_question.category))
        })?;

    let id = questions::create_question(pool, &new_question).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {id}");
    Ok(Created {
        success: true,
        created: id,
    })
}

fn validate(form: QuestionForm) -> ApiResponse<NewQuestion> {
    let question = form.question.trim();
    let answer = form.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::Unprocessable(
            "question and answer should not be empty".to_owned(),
        ));
    }
    if !DIFFICULTY_RANGE.contains(&form.difficulty) {
        return Err(ApiError::Unprocessable(format!(
            "difficulty {} is out of range",
            form.difficulty
        )));
    }
    Ok(NewQuestion {
        question: question.to_owned(),
        answer: answer.to_owned(),
        category: form.category,
        difficulty: form.difficulty,
    })
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(post_question))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(difficulty: i64) -> QuestionForm {
        QuestionForm {
            question: "  Who painted the Mona Lisa? ".to_owned(),
            answer: "Leonardo da Vinci".to_owned(),
            category: 2,
            difficulty,
        }
    }

    #[test]
    fn validate_trims_text() {
        let question = validate(form(3)).unwrap();
        assert_eq!(question.question, "Who painted the Mona Lisa?");
    }

    #[test]
    fn validate_rejects_difficulty_out_of_range() {
        assert!(matches!(validate(form(0)), Err(ApiError::Unprocessable(_))));
        assert!(matches!(validate(form(6)), Err(ApiError::Unprocessable(_))));
    }

    #[test]
    fn validate_rejects_blank_answer() {
        let mut form = form(1);
        form.answer = "   ".to_owned();
        assert!(matches!(validate(form), Err(ApiError::Unprocessable(_))));
    }

    #[test]
    fn form_accepts_numbers_as_strings() {
        let form: QuestionForm = serde_json::from_value(json!({
            "question": "q",
            "answer": "a",
            "category": "5",
            "difficulty": 4,
        }))
        .unwrap();
        assert_eq!(form.category, 5);
        assert_eq!(form.difficulty, 4);
    }

    #[test]
    fn search_field_defaults_to_question() {
        assert_eq!(search_field(None).unwrap(), SearchField::Question);
        assert_eq!(
            search_field(Some(&json!("answer"))).unwrap(),
            SearchField::Answer
        );
        assert!(search_field(Some(&json!(3))).is_err());
    }
}
