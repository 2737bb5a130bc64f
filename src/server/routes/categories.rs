use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions},
    server::{
        app::AppState,
        deserializers::{deserialize_lenient_i64, PageQuery},
        error::{ApiError, ApiResponse},
    },
};

use super::{category_map, CategoryMap, QuestionsPage};

#[derive(Deserialize)]
struct CategoriesQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    specific_id: Option<i64>,
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

async fn get_categories(
    State(pool): State<SqlitePool>,
    Query(CategoriesQuery { specific_id }): Query<CategoriesQuery>,
) -> ApiResponse<Json<CategoriesResponse>> {
    if let Some(id) = specific_id {
        categories::get_category(&pool, id)
            .await?
            .ok_or(ApiError::NotFound)?;
    }
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    Query(page): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Path(id) = id?;
    let category = categories::get_category(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, id).await?;
    let page = QuestionsPage::new(&questions, page.page_number())
        .with_current_category(Some(category.kind));
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(page))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
