mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{Category, Question};
use crate::pagination::{select_page, QUESTIONS_PER_PAGE};

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

/// Categories keyed by id, rendered as `{"1": "Science", ...}`.
pub(crate) type CategoryMap = BTreeMap<i64, String>;

pub(crate) fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Serialize)]
pub(crate) struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<CategoryMap>,
    current_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<i64>,
}

impl QuestionsPage {
    /// One page of `questions`; `total_questions` counts the whole set.
    pub(crate) fn new(questions: &[Question], page_number: i64) -> Self {
        Self {
            success: true,
            questions: select_page(questions, page_number, QUESTIONS_PER_PAGE).to_vec(),
            total_questions: questions.len(),
            categories: None,
            current_category: None,
            deleted: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub(crate) fn with_categories(mut self, categories: CategoryMap) -> Self {
        self.categories = Some(categories);
        self
    }

    pub(crate) fn with_current_category(mut self, category: Option<String>) -> Self {
        self.current_category = category;
        self
    }

    pub(crate) fn with_deleted(mut self, id: i64) -> Self {
        self.deleted = Some(id);
        self
    }
}
