//! Board Service Library
//!
//! Boards, members with their profile, and products with their orders.
//! The services can be driven from the standalone binary or embedded in the
//! combined binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;
use domain::{BoardDto, OrderDto, ProductDto, ProfileDto, RegisterMember};
use persistence::Persistence;

use crate::config::BoardServiceConfig;
use crate::infra::Database;
use crate::repository::{BoardStore, MemberStore, OrderStore};
use crate::service::{
    BoardManager, BoardService, MemberManager, MemberService, OrderManager, OrderService,
};

/// The board service's use cases, wired over one connection pool.
#[derive(Clone)]
pub struct Services {
    pub boards: Arc<dyn BoardService>,
    pub members: Arc<dyn MemberService>,
    pub orders: Arc<dyn OrderService>,
}

impl Services {
    /// Build repositories and services. Fails if a repository finder does not compile.
    pub fn new(persistence: Persistence, config: &BoardServiceConfig) -> AppResult<Self> {
        let board_repo = Arc::new(BoardStore::new()?);
        let member_repo = Arc::new(MemberStore::new()?);
        let order_repo = Arc::new(OrderStore::new()?);

        Ok(Self {
            boards: Arc::new(BoardManager::new(persistence.clone(), board_repo.clone())),
            members: Arc::new(
                MemberManager::new(persistence.clone(), member_repo, board_repo)
                    .with_cascade(config.cascade_member_boards),
            ),
            orders: Arc::new(OrderManager::new(persistence, order_repo)),
        })
    }

    /// Connect, apply pending migrations and build the services.
    pub async fn connect(config: &BoardServiceConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::connect(&config.database).await?;
        let services = Self::new(Persistence::new(db.get_connection()), config)?;
        Ok(services)
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = BoardServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Insert demo boards, a member with a profile, and an order.
pub async fn seed() -> Result<(), Box<dyn std::error::Error>> {
    let config = BoardServiceConfig::from_env();
    let services = Services::connect(&config).await?;

    let samples = [
        ("JPA", "이순신", "자바 표준 ORM 스펙입니다."),
        ("MVC", "홍길동", "Model, View, Controller"),
        ("Spring", "홍길동", "DI와 AOP를 지원하는 프레임워크"),
        ("AWS", "강감찬", "아마존 클라우드 서비스"),
    ];
    for (title, writer, content) in samples {
        let seq = services.boards.create(BoardDto::new(title, writer, content)).await?;
        info!(seq, title, "Seeded board");
    }

    let member = RegisterMember {
        boards: vec![BoardDto::new("가입 인사", "user1", "안녕하세요")],
        ..RegisterMember::new("user1", "1111", "홍길동")
    };
    let member_id = services.members.register(member).await?;
    services
        .members
        .attach_profile(
            &member_id,
            ProfileDto {
                id: None,
                tel: "010-1234-5678".to_string(),
                address: "Seoul".to_string(),
            },
        )
        .await?;

    let mut product_ids = Vec::new();
    for name in ["Keyboard", "Mouse"] {
        product_ids.push(services.orders.register_product(ProductDto::new(name)).await?);
    }
    let order_id = services
        .orders
        .place_order(OrderDto::with_products(product_ids))
        .await?;

    info!(member = %member_id, order_id, "Seed data inserted");
    Ok(())
}

/// Print every stored board.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = BoardServiceConfig::from_env();
    let services = Services::connect(&config).await?;

    for board in services.boards.fetch_all().await? {
        println!(
            "#{} {} ({}) views={}",
            board.seq.unwrap_or_default(),
            board.title.unwrap_or_default(),
            board.writer.unwrap_or_default(),
            board.cnt.unwrap_or_default(),
        );
    }

    Ok(())
}
