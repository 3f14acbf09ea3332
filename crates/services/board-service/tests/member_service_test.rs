//! Member service integration tests: cascade on save and ON DELETE policies.

mod support;

use board_service_lib::config::BoardServiceConfig;
use common::AppError;
use domain::{BoardDto, ProfileDto, RegisterMember};

use support::{create_board, setup, setup_with};

fn registration() -> RegisterMember {
    RegisterMember {
        boards: vec![
            BoardDto::new("가입 인사", "user1", "안녕하세요"),
            BoardDto::new("질문", "user1", "JPA 연관관계"),
        ],
        ..RegisterMember::new("user1", "1111", "홍길동")
    }
}

fn profile() -> ProfileDto {
    ProfileDto {
        id: None,
        tel: "010-1234-5678".to_string(),
        address: "Seoul".to_string(),
    }
}

#[tokio::test]
async fn test_register_cascades_boards() {
    let (services, _) = setup().await;

    let id = services.members.register(registration()).await.unwrap();
    let boards = services.members.boards_of(&id).await.unwrap();

    assert_eq!(id, "user1");
    let titles: Vec<_> = boards.iter().filter_map(|b| b.title.as_deref()).collect();
    assert_eq!(titles, vec!["가입 인사", "질문"]);
}

#[tokio::test]
async fn test_register_without_cascade_keeps_only_member() {
    let config = BoardServiceConfig {
        cascade_member_boards: false,
        ..BoardServiceConfig::in_memory()
    };
    let (services, _) = setup_with(config).await;

    let id = services.members.register(registration()).await.unwrap();

    assert!(services.members.boards_of(&id).await.unwrap().is_empty());
    assert!(services.boards.fetch_all().await.unwrap().is_empty());
    assert_eq!(services.members.fetch_member(&id).await.unwrap().name, "홍길동");
}

#[tokio::test]
async fn test_register_duplicate_id_is_conflict() {
    let (services, _) = setup().await;
    services.members.register(registration()).await.unwrap();

    let result = services
        .members
        .register(RegisterMember::new("user1", "2222", "이순신"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(services.members.fetch_member("user1").await.unwrap().name, "홍길동");
}

#[tokio::test]
async fn test_invalid_board_rejects_whole_registration() {
    let (services, _) = setup().await;
    let request = RegisterMember {
        boards: vec![BoardDto {
            title: Some("no content".to_string()),
            writer: Some("user1".to_string()),
            ..Default::default()
        }],
        ..RegisterMember::new("user1", "1111", "홍길동")
    };

    let result = services.members.register(request).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(matches!(
        services.members.fetch_member("user1").await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_profile_is_fetched_with_member() {
    let (services, _) = setup().await;
    services.members.register(registration()).await.unwrap();

    let profile_id = services.members.attach_profile("user1", profile()).await.unwrap();
    let member = services.members.fetch_member("user1").await.unwrap();

    let attached = member.profile.unwrap();
    assert_eq!(attached.id, Some(profile_id));
    assert_eq!(attached.tel, "010-1234-5678");

    let second = services.members.attach_profile("user1", profile()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let orphan = services.members.attach_profile("ghost", profile()).await;
    assert!(matches!(orphan, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_withdraw_cascades_to_boards() {
    let (services, _) = setup().await;
    create_board(&services, "공지", "admin", 0).await;
    services.members.register(registration()).await.unwrap();
    assert_eq!(services.boards.fetch_all().await.unwrap().len(), 3);

    services.members.withdraw("user1").await.unwrap();

    assert!(matches!(
        services.members.fetch_member("user1").await,
        Err(AppError::NotFound)
    ));
    let remaining = services.boards.fetch_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title.as_deref(), Some("공지"));
}

#[tokio::test]
async fn test_withdraw_with_profile_fails_and_keeps_everything() {
    let (services, _) = setup().await;
    services.members.register(registration()).await.unwrap();
    services.members.attach_profile("user1", profile()).await.unwrap();

    let result = services.members.withdraw("user1").await;

    let err = result.unwrap_err();
    assert!(err.is_store_failure());
    let member = services.members.fetch_member("user1").await.unwrap();
    assert!(member.profile.is_some());
    assert_eq!(services.members.boards_of("user1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_member_is_not_found() {
    let (services, _) = setup().await;

    assert!(matches!(services.members.withdraw("ghost").await, Err(AppError::NotFound)));
    assert!(matches!(services.members.boards_of("ghost").await, Err(AppError::NotFound)));
}
