//! Board service integration tests.

mod support;

use common::AppError;
use domain::BoardDto;

use support::{create_board, setup};

#[tokio::test]
async fn test_create_then_fetch_returns_same_fields() {
    let (services, _) = setup().await;

    let seq = services
        .boards
        .create(BoardDto::new("JPA", "이순신", "자바 표준 ORM 스펙입니다."))
        .await
        .unwrap();
    let board = services.boards.fetch_one(seq).await.unwrap();

    assert_eq!(board.seq, Some(seq));
    assert_eq!(board.title.as_deref(), Some("JPA"));
    assert_eq!(board.writer.as_deref(), Some("이순신"));
    assert_eq!(board.content.as_deref(), Some("자바 표준 ORM 스펙입니다."));
    assert_eq!(board.cnt, Some(0));
    assert!(board.created_at.is_some());
}

#[tokio::test]
async fn test_create_keeps_fields_exactly_as_given() {
    let (services, _) = setup().await;

    let seq = services
        .boards
        .create(BoardDto::new(" JPA ", "kim ", "  X"))
        .await
        .unwrap();
    let board = services.boards.fetch_one(seq).await.unwrap();

    assert_eq!(board.title.as_deref(), Some(" JPA "));
    assert_eq!(board.writer.as_deref(), Some("kim "));
    assert_eq!(board.content.as_deref(), Some("  X"));
}

#[tokio::test]
async fn test_identities_are_assigned_in_order() {
    let (services, _) = setup().await;

    let first = create_board(&services, "A", "w", 0).await;
    let second = create_board(&services, "B", "w", 0).await;

    assert!(second > first);
}

#[tokio::test]
async fn test_partial_update_keeps_unset_fields() {
    let (services, _) = setup().await;
    let seq = services
        .boards
        .create(BoardDto::new("JPA", "이순신", "X"))
        .await
        .unwrap();

    let updated = services
        .boards
        .update(BoardDto {
            seq: Some(seq),
            title: Some("AWS".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated, seq);

    let board = services.boards.fetch_one(seq).await.unwrap();
    assert_eq!(board.title.as_deref(), Some("AWS"));
    assert_eq!(board.content.as_deref(), Some("X"));
    assert_eq!(board.writer.as_deref(), Some("이순신"));
}

#[tokio::test]
async fn test_update_can_change_several_fields() {
    let (services, _) = setup().await;
    let seq = create_board(&services, "JPA", "이순신", 1).await;

    services
        .boards
        .update(BoardDto {
            seq: Some(seq),
            content: Some("아마존 클라우드 서비스".to_string()),
            cnt: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();

    let board = services.boards.fetch_one(seq).await.unwrap();
    assert_eq!(board.title.as_deref(), Some("JPA"));
    assert_eq!(board.content.as_deref(), Some("아마존 클라우드 서비스"));
    assert_eq!(board.cnt, Some(9));
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let (services, _) = setup().await;
    let seq = create_board(&services, "JPA", "이순신", 0).await;

    services.boards.delete(seq).await.unwrap();

    assert!(matches!(
        services.boards.fetch_one(seq).await,
        Err(AppError::NotFound)
    ));
    assert!(services.boards.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_operations_on_missing_board_are_not_found() {
    let (services, _) = setup().await;
    create_board(&services, "JPA", "이순신", 0).await;

    let update = BoardDto {
        seq: Some(404),
        title: Some("AWS".to_string()),
        ..Default::default()
    };

    assert!(matches!(services.boards.update(update).await, Err(AppError::NotFound)));
    assert!(matches!(services.boards.delete(404).await, Err(AppError::NotFound)));
    assert!(matches!(services.boards.fetch_one(404).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_invalid_create_never_reaches_store() {
    let (services, _) = setup().await;

    let result = services
        .boards
        .create(BoardDto {
            title: Some("MVC".to_string()),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(services.boards.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_all_returns_every_board() {
    let (services, _) = setup().await;
    for title in ["JPA", "MVC", "Spring"] {
        create_board(&services, title, "홍길동", 0).await;
    }

    let titles: Vec<String> = services
        .boards
        .fetch_all()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|b| b.title)
        .collect();

    assert_eq!(titles, vec!["JPA", "MVC", "Spring"]);
}

#[tokio::test]
async fn test_pages_are_sorted_by_views_descending() {
    let (services, _) = setup().await;
    let counts = [3, 17, 0, 8, 8, 25, 1, 12, 5, 30, 2, 9];
    for (i, cnt) in counts.iter().enumerate() {
        create_board(&services, &format!("board {}", i), "writer", *cnt).await;
    }

    let first = services.boards.fetch_page(0, 5).await.unwrap();
    let second = services.boards.fetch_page(1, 5).await.unwrap();

    assert_eq!(first.data.len(), 5);
    assert_eq!(first.meta.total, 12);
    assert_eq!(first.meta.total_pages, 3);
    assert!(first.meta.has_next());

    let cnt = |b: &BoardDto| b.cnt.unwrap_or_default();
    let lowest_on_first = first.data.iter().map(cnt).min().unwrap();
    let highest_on_second = second.data.iter().map(cnt).max().unwrap();
    assert!(lowest_on_first >= highest_on_second);

    let views: Vec<i64> = first.data.iter().map(cnt).collect();
    assert_eq!(views, vec![30, 25, 17, 12, 9]);
}

#[tokio::test]
async fn test_last_page_is_partial() {
    let (services, _) = setup().await;
    for i in 0..7 {
        create_board(&services, &format!("board {}", i), "writer", i).await;
    }

    let last = services.boards.fetch_page(1, 5).await.unwrap();
    assert_eq!(last.data.len(), 2);
    assert!(!last.meta.has_next());

    let empty = services.boards.fetch_page(0, 0).await;
    assert!(matches!(empty, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_search_returns_newest_first() {
    let (services, _) = setup().await;
    let older = create_board(&services, "Spring Boot", "홍길동", 0).await;
    create_board(&services, "JPA", "이순신", 0).await;
    let newer = create_board(&services, "Spring Data", "강감찬", 0).await;

    let found = services.boards.search("Spring").await.unwrap();
    let seqs: Vec<i64> = found.iter().filter_map(|b| b.seq).collect();
    assert_eq!(seqs, vec![newer, older]);

    let summaries = services.boards.list_summaries("Spring").await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].seq, newer);
    assert_eq!(summaries[0].title, "Spring Data");
    assert_eq!(summaries[1].writer, "홍길동");
}

#[tokio::test]
async fn test_search_matches_case_and_wildcards_literally() {
    let (services, _) = setup().await;
    let percent = create_board(&services, "100% JPA", "홍길동", 0).await;
    create_board(&services, "Spring_Boot", "이순신", 0).await;
    create_board(&services, "jpa basics", "강감찬", 0).await;

    let found = services.boards.search("JPA").await.unwrap();
    let titles: Vec<_> = found.iter().filter_map(|b| b.title.as_deref()).collect();
    assert_eq!(titles, vec!["100% JPA"]);

    let found = services.boards.search("%").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].seq, Some(percent));

    let found = services.boards.search("_").await.unwrap();
    let titles: Vec<_> = found.iter().filter_map(|b| b.title.as_deref()).collect();
    assert_eq!(titles, vec!["Spring_Boot"]);

    assert!(services.boards.list_summaries("SPRING").await.unwrap().is_empty());
}
