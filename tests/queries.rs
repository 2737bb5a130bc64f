mod common;

use common::{add_question, create_test_db, seed_questions};
use trivia_api::db::queries::categories::{get_all_categories, get_category, import_categories};
use trivia_api::db::queries::questions::{
    count_questions, delete_question, get_all_questions, get_question_by_id,
    get_questions_for_category, import_questions, search_questions,
};
use trivia_api::db::{establish_connection, run_migrations, Category, Question, SearchField};

#[tokio::test]
async fn migrations_seed_default_categories() {
    let db = create_test_db().await;
    let names: Vec<String> = get_all_categories(&db.pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.kind)
        .collect();
    assert_eq!(
        names,
        ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
    );
    assert_eq!(get_category(&db.pool, 42).await.unwrap(), None);
}

#[tokio::test]
async fn questions_come_back_ordered_by_id() {
    let db = create_test_db().await;
    let science = seed_questions(&db.pool, 1, 3).await;
    let art = seed_questions(&db.pool, 2, 2).await;

    let all: Vec<i64> = get_all_questions(&db.pool)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(all, [science.clone(), art.clone()].concat());

    let in_art: Vec<i64> = get_questions_for_category(&db.pool, 2)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(in_art, art);
    assert_eq!(count_questions(&db.pool).await.unwrap(), 5);
}

#[tokio::test]
async fn missing_question_lookups() {
    let db = create_test_db().await;
    assert_eq!(get_question_by_id(&db.pool, 1).await.unwrap(), None);
    assert!(matches!(
        delete_question(&db.pool, 1).await,
        Err(sqlx::Error::RowNotFound)
    ));
}

#[tokio::test]
async fn search_by_answer_ignores_question_text() {
    let db = create_test_db().await;
    add_question(&db.pool, "Which planet is red?", "Mars", 1).await;
    let venus = add_question(&db.pool, "Which planet is the hottest?", "Venus", 1).await;

    let by_answer = search_questions(&db.pool, SearchField::Answer, "venus")
        .await
        .unwrap();
    assert_eq!(by_answer.iter().map(|q| q.id).collect::<Vec<i64>>(), vec![venus]);

    let by_question = search_questions(&db.pool, SearchField::Question, "planet")
        .await
        .unwrap();
    assert_eq!(by_question.len(), 2);
}

#[tokio::test]
async fn import_keeps_ids_and_overwrites() {
    let db = create_test_db().await;
    seed_questions(&db.pool, 1, 1).await;

    import_categories(
        &db.pool,
        vec![
            Category {
                id: 1,
                kind: "Natural Science".to_owned(),
            },
            Category {
                id: 7,
                kind: "Music".to_owned(),
            },
        ],
    )
    .await
    .unwrap();
    import_questions(
        &db.pool,
        vec![
            Question {
                id: 1,
                question: "Replaced?".to_owned(),
                answer: "Yes".to_owned(),
                category: 7,
                difficulty: 2,
            },
            Question {
                id: 40,
                question: "Who wrote Fidelio?".to_owned(),
                answer: "Beethoven".to_owned(),
                category: 7,
                difficulty: 3,
            },
        ],
    )
    .await
    .unwrap();

    assert_eq!(
        get_category(&db.pool, 1).await.unwrap().unwrap().kind,
        "Natural Science"
    );
    assert_eq!(get_all_categories(&db.pool).await.unwrap().len(), 7);

    let replaced = get_question_by_id(&db.pool, 1).await.unwrap().unwrap();
    assert_eq!(replaced.question, "Replaced?");
    assert_eq!(replaced.category, 7);
    assert!(get_question_by_id(&db.pool, 40).await.unwrap().is_some());
    assert_eq!(count_questions(&db.pool).await.unwrap(), 2);
}

#[tokio::test]
async fn database_path_is_taken_literally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trivia?mode=memory#v1.db");
    let path = path.to_str().unwrap();

    let pool = establish_connection(path).await.unwrap();
    run_migrations(&pool).await.unwrap();
    assert_eq!(get_all_categories(&pool).await.unwrap().len(), 6);
    pool.close().await;

    assert!(std::path::Path::new(path).is_file());
    let reopened = establish_connection(path).await.unwrap();
    assert_eq!(get_all_categories(&reopened).await.unwrap().len(), 6);
}
