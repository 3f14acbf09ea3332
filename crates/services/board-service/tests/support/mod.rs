//! Shared setup for the board service integration tests.

#![allow(dead_code)]

use board_service_lib::config::BoardServiceConfig;
use board_service_lib::infra::Database;
use board_service_lib::Services;
use domain::BoardDto;
use persistence::Persistence;

/// Fresh in-memory database with every migration applied.
pub async fn setup() -> (Services, Persistence) {
    setup_with(BoardServiceConfig::in_memory()).await
}

pub async fn setup_with(config: BoardServiceConfig) -> (Services, Persistence) {
    let db = Database::connect(&config.database).await.unwrap();
    let persistence = Persistence::new(db.get_connection());
    let services = Services::new(persistence.clone(), &config).unwrap();
    (services, persistence)
}

/// Create a board with the given view counter and return its seq.
pub async fn create_board(services: &Services, title: &str, writer: &str, cnt: i64) -> i64 {
    let dto = BoardDto {
        cnt: Some(cnt),
        ..BoardDto::new(title, writer, format!("{} content", title))
    };
    services.boards.create(dto).await.unwrap()
}
