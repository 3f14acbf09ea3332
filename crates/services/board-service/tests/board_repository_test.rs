//! Board repository tests: derived finders, custom queries and staging.

mod support;

use std::collections::BTreeSet;

use board_service_lib::repository::entities::board;
use board_service_lib::repository::{BoardRepository, BoardStore};
use common::AppError;
use persistence::{DerivedQuery, QueryError};

use support::{create_board, setup};

/// writer, title, cnt
const BOARDS: &[(&str, &str, i64)] = &[
    ("홍길동", "MVC", 10),
    ("이순신", "JPA", 5),
    ("홍길동", "Spring", 20),
    ("강감찬", "AWS", 5),
    ("이순신", "Spring Data", 0),
];

async fn seeded() -> (BoardStore, persistence::Persistence) {
    let (services, persistence) = setup().await;
    for (writer, title, cnt) in BOARDS {
        create_board(&services, title, writer, *cnt).await;
    }
    (BoardStore::new().unwrap(), persistence)
}

fn titles(boards: &[domain::Board]) -> Vec<&str> {
    boards.iter().map(|b| b.title.as_str()).collect()
}

#[tokio::test]
async fn test_repository_finders_compile() {
    assert!(BoardStore::new().is_ok());
}

#[test]
fn test_unknown_field_fails_compilation() {
    let err = DerivedQuery::<board::Entity>::parse("findByAuthor").unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { .. }));

    let err = DerivedQuery::<board::Entity>::parse("fetchByWriter").unwrap_err();
    assert!(matches!(err, QueryError::UnknownSubject(_)));

    // Surfaces as a query error at the service boundary
    assert!(matches!(AppError::from(err), AppError::Query(_)));
}

#[tokio::test]
async fn test_find_by_writer() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    let boards = repo.find_by_writer(&mut uow, "홍길동").await.unwrap();
    assert_eq!(titles(&boards), vec!["MVC", "Spring"]);

    let none = repo.find_by_writer(&mut uow, "유관순").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_find_by_title_containing_and_or() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    let boards = repo.find_by_title_containing(&mut uow, "Spring").await.unwrap();
    assert_eq!(titles(&boards), vec!["Spring", "Spring Data"]);

    let boards = repo
        .find_by_title_or_content(&mut uow, "JPA", "AWS content")
        .await
        .unwrap();
    assert_eq!(titles(&boards), vec!["JPA", "AWS"]);
}

#[tokio::test]
async fn test_containing_is_case_sensitive_and_literal() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    let boards = repo.find_by_title_containing(&mut uow, "jpa").await.unwrap();
    assert!(boards.is_empty());

    let boards = repo.find_by_title_containing(&mut uow, "spring").await.unwrap();
    assert!(boards.is_empty());

    let boards = repo.find_by_title_containing(&mut uow, "_").await.unwrap();
    assert!(boards.is_empty());

    let boards = repo.find_by_title_containing(&mut uow, "%").await.unwrap();
    assert!(boards.is_empty());

    let boards = repo.find_by_title_containing(&mut uow, "g D").await.unwrap();
    assert_eq!(titles(&boards), vec!["Spring Data"]);
}

#[tokio::test]
async fn test_greater_than_excludes_equal_values() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    // 5 is held by two boards; neither qualifies
    let boards = repo.find_by_cnt_greater_than(&mut uow, 5).await.unwrap();
    assert_eq!(titles(&boards), vec!["MVC", "Spring"]);
    assert!(boards.iter().all(|b| b.cnt > 5));

    let boards = repo.find_by_cnt_greater_than(&mut uow, -1).await.unwrap();
    assert_eq!(boards.len(), BOARDS.len());

    let boards = repo.find_by_cnt_greater_than(&mut uow, 20).await.unwrap();
    assert!(boards.is_empty());
}

#[tokio::test]
async fn test_in_returns_union_without_duplicates() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    let boards = repo
        .find_by_writer_in(&mut uow, vec!["이순신".to_string(), "홍길동".to_string()])
        .await
        .unwrap();
    let reversed = repo
        .find_by_writer_in(
            &mut uow,
            vec!["홍길동".to_string(), "이순신".to_string(), "홍길동".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(boards.len(), 4);
    assert_eq!(boards, reversed);

    let seqs: BTreeSet<i64> = boards.iter().map(|b| b.seq).collect();
    assert_eq!(seqs.len(), boards.len());
}

#[tokio::test]
async fn test_and_compound_and_order_by() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();

    let boards = repo
        .find_by_writer_and_cnt_greater_than(&mut uow, "홍길동", 10)
        .await
        .unwrap();
    assert_eq!(titles(&boards), vec!["Spring"]);

    let boards = repo
        .find_by_writer_order_by_cnt_desc(&mut uow, "이순신")
        .await
        .unwrap();
    assert_eq!(titles(&boards), vec!["JPA", "Spring Data"]);
}

#[tokio::test]
async fn test_exists_count_and_delete_by_writer() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin().await.unwrap();

    assert!(repo.exists_by_writer(&mut uow, "강감찬").await.unwrap());
    assert_eq!(repo.count_by_writer(&mut uow, "홍길동").await.unwrap(), 2);

    assert_eq!(repo.delete_by_writer(&mut uow, "홍길동").await.unwrap(), 2);
    assert!(!repo.exists_by_writer(&mut uow, "홍길동").await.unwrap());
    assert_eq!(repo.count(&mut uow).await.unwrap(), 3);
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn test_delete_by_id_reports_rows() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin().await.unwrap();

    let seq = repo.find_by_writer(&mut uow, "강감찬").await.unwrap()[0].seq;
    assert_eq!(repo.delete_by_id(&mut uow, seq).await.unwrap(), 1);
    assert_eq!(repo.delete_by_id(&mut uow, seq).await.unwrap(), 0);
    assert!(!repo.exists_by_id(&mut uow, seq).await.unwrap());
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn test_staged_update_is_read_back_then_discarded_on_rollback() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin_read_only().await.unwrap();
    let seq = repo.find_by_writer(&mut uow, "이순신").await.unwrap()[0].seq;
    uow.commit().await.unwrap();

    let mut uow = persistence.begin().await.unwrap();
    let before = repo.find_by_id(&mut uow, seq).await.unwrap().unwrap();
    let mut after = before.clone();
    after.title = "AWS".to_string();
    repo.stage_update(&mut uow, &before, &after).unwrap();
    assert_eq!(uow.pending(), 1);

    let seen = repo.find_by_id(&mut uow, seq).await.unwrap().unwrap();
    assert_eq!(seen.title, "AWS");
    uow.rollback().await.unwrap();

    let mut uow = persistence.begin_read_only().await.unwrap();
    let stored = repo.find_by_id(&mut uow, seq).await.unwrap().unwrap();
    assert_eq!(stored.title, "JPA");
}

#[tokio::test]
async fn test_save_replaces_existing_and_rejects_unknown_seq() {
    let (repo, persistence) = seeded().await;
    let mut uow = persistence.begin().await.unwrap();

    let mut board = repo.find_by_writer(&mut uow, "강감찬").await.unwrap().remove(0);
    board.title = "Azure".to_string();
    board.cnt = 99;
    let saved = repo.save(&mut uow, board.clone()).await.unwrap();
    assert_eq!(saved, board);

    board.seq = 9_999;
    let missing = repo.save(&mut uow, board).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    uow.commit().await.unwrap();
}
