//! Board repository: generic CRUD plus the board finders.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::entities::board::{self, ActiveModel, Entity as BoardEntity};
use common::{AppResult, Paginated};
use domain::{Board, BoardSummary, NewBoard};
use persistence::{
    text_match, Comparator, DerivedQuery, Direction, PageRequest, QueryArg, Repository, Sort,
    UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Board repository trait for dependency injection.
///
/// Every method runs inside the caller's unit of work. Updates and deletes
/// are staged and reach the store when the unit commits.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<Option<Board>>;

    async fn find_all(&self, uow: &mut UnitOfWork) -> AppResult<Vec<Board>>;

    /// Page of boards, most viewed first
    async fn find_page(&self, uow: &mut UnitOfWork, page: u64, size: u64)
        -> AppResult<Paginated<Board>>;

    async fn exists_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<bool>;

    async fn count(&self, uow: &mut UnitOfWork) -> AppResult<u64>;

    /// Insert a new board and return it with its assigned `seq`
    async fn insert(&self, uow: &mut UnitOfWork, board: NewBoard) -> AppResult<Board>;

    /// Replace every column of an existing board
    async fn save(&self, uow: &mut UnitOfWork, board: Board) -> AppResult<Board>;

    /// Stage the difference between a loaded board and its modified copy
    fn stage_update(&self, uow: &mut UnitOfWork, before: &Board, after: &Board) -> AppResult<()>;

    /// Stage the deletion of a loaded board
    fn stage_delete(&self, uow: &mut UnitOfWork, board: &Board) -> AppResult<()>;

    /// Delete right away; returns the number of rows removed
    async fn delete_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<u64>;

    async fn find_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<Vec<Board>>;

    async fn find_by_title_containing(
        &self,
        uow: &mut UnitOfWork,
        keyword: &str,
    ) -> AppResult<Vec<Board>>;

    async fn find_by_title_or_content(
        &self,
        uow: &mut UnitOfWork,
        title: &str,
        content: &str,
    ) -> AppResult<Vec<Board>>;

    async fn find_by_cnt_greater_than(&self, uow: &mut UnitOfWork, cnt: i64)
        -> AppResult<Vec<Board>>;

    async fn find_by_writer_in(
        &self,
        uow: &mut UnitOfWork,
        writers: Vec<String>,
    ) -> AppResult<Vec<Board>>;

    async fn find_by_writer_and_cnt_greater_than(
        &self,
        uow: &mut UnitOfWork,
        writer: &str,
        cnt: i64,
    ) -> AppResult<Vec<Board>>;

    async fn find_by_writer_order_by_cnt_desc(
        &self,
        uow: &mut UnitOfWork,
        writer: &str,
    ) -> AppResult<Vec<Board>>;

    async fn exists_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<bool>;

    async fn count_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<u64>;

    /// Delete every board of `writer` right away
    async fn delete_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<u64>;

    /// Boards owned by a member (inverse side of member -> boards)
    async fn find_by_member_id(&self, uow: &mut UnitOfWork, member_id: &str)
        -> AppResult<Vec<Board>>;

    /// Boards whose title contains `keyword`, newest first
    async fn search(&self, uow: &mut UnitOfWork, keyword: &str) -> AppResult<Vec<Board>>;

    /// Listing projection with the same filter and order as [`search`](Self::search)
    async fn summaries(&self, uow: &mut UnitOfWork, keyword: &str)
        -> AppResult<Vec<BoardSummary>>;
}

/// Concrete implementation of BoardRepository.
///
/// Finders are compiled once, in [`BoardStore::new`].
pub struct BoardStore {
    boards: Repository<ActiveModel>,
    by_writer: DerivedQuery<BoardEntity>,
    by_title_containing: DerivedQuery<BoardEntity>,
    by_title_or_content: DerivedQuery<BoardEntity>,
    by_cnt_greater_than: DerivedQuery<BoardEntity>,
    by_writer_in: DerivedQuery<BoardEntity>,
    by_writer_and_cnt_greater_than: DerivedQuery<BoardEntity>,
    by_writer_order_by_cnt_desc: DerivedQuery<BoardEntity>,
    exists_by_writer: DerivedQuery<BoardEntity>,
    count_by_writer: DerivedQuery<BoardEntity>,
    delete_by_writer: DerivedQuery<BoardEntity>,
    by_member_id: DerivedQuery<BoardEntity>,
}

impl BoardStore {
    /// Create new repository instance; fails if a finder does not compile.
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            boards: Repository::new(),
            by_writer: DerivedQuery::parse("findByWriter")?,
            by_title_containing: DerivedQuery::parse("findByTitleContaining")?,
            by_title_or_content: DerivedQuery::parse("findByTitleOrContent")?,
            by_cnt_greater_than: DerivedQuery::parse("findByCntGreaterThan")?,
            by_writer_in: DerivedQuery::parse("findByWriterIn")?,
            by_writer_and_cnt_greater_than: DerivedQuery::parse("findByWriterAndCntGreaterThan")?,
            by_writer_order_by_cnt_desc: DerivedQuery::parse("findByWriterOrderByCntDesc")?,
            exists_by_writer: DerivedQuery::parse("existsByWriter")?,
            count_by_writer: DerivedQuery::parse("countByWriter")?,
            delete_by_writer: DerivedQuery::parse("deleteByWriter")?,
            by_member_id: DerivedQuery::parse("findByMemberIdOrderBySeqAsc")?,
        })
    }

    async fn find_boards(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<BoardEntity>,
        args: &[QueryArg],
    ) -> AppResult<Vec<Board>> {
        let models = self.boards.find_by(uow, query, args).await?;
        Ok(models.into_iter().map(Board::from).collect())
    }

    fn keyword_select(keyword: &str) -> sea_orm::Select<BoardEntity> {
        BoardEntity::find()
            .filter(text_match(board::Column::Title, Comparator::Containing, keyword))
            .order_by_desc(board::Column::Seq)
    }
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    seq: i64,
    title: String,
    writer: String,
    created_at: chrono::DateTime<Utc>,
}

impl From<SummaryRow> for BoardSummary {
    fn from(row: SummaryRow) -> Self {
        BoardSummary {
            seq: row.seq,
            title: row.title,
            writer: row.writer,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BoardRepository for BoardStore {
    async fn find_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<Option<Board>> {
        let model = self.boards.find_by_id(uow, seq).await?;
        Ok(model.map(Board::from))
    }

    async fn find_all(&self, uow: &mut UnitOfWork) -> AppResult<Vec<Board>> {
        let sort = Sort::<BoardEntity>::asc(board::Column::Seq);
        let models = self.boards.find_all_sorted(uow, &sort).await?;
        Ok(models.into_iter().map(Board::from).collect())
    }

    async fn find_page(
        &self,
        uow: &mut UnitOfWork,
        page: u64,
        size: u64,
    ) -> AppResult<Paginated<Board>> {
        // seq breaks ties so equal counters never straddle pages inconsistently
        let sort = Sort::<BoardEntity>::desc(board::Column::Cnt).then(board::Column::Seq, Direction::Asc);
        let request = PageRequest::of_sorted(page, size, sort);
        let models = self.boards.find_page(uow, &request).await?;
        Ok(models.map(Board::from))
    }

    async fn exists_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<bool> {
        self.boards.exists_by_id(uow, seq).await
    }

    async fn count(&self, uow: &mut UnitOfWork) -> AppResult<u64> {
        self.boards.count(uow).await
    }

    async fn insert(&self, uow: &mut UnitOfWork, board: NewBoard) -> AppResult<Board> {
        let active_model = ActiveModel {
            seq: NotSet,
            title: Set(board.title),
            writer: Set(board.writer),
            content: Set(board.content),
            cnt: Set(board.cnt),
            created_at: Set(Utc::now()),
            member_id: Set(board.member_id),
        };

        let model = self.boards.insert(uow, active_model).await?;
        tracing::debug!(seq = model.seq, "Inserted board");
        Ok(Board::from(model))
    }

    async fn save(&self, uow: &mut UnitOfWork, board: Board) -> AppResult<Board> {
        let active_model = ActiveModel {
            seq: Set(board.seq),
            title: Set(board.title),
            writer: Set(board.writer),
            content: Set(board.content),
            cnt: Set(board.cnt),
            created_at: Set(board.created_at),
            member_id: Set(board.member_id),
        };

        let model = self.boards.save(uow, active_model).await?;
        Ok(Board::from(model))
    }

    fn stage_update(&self, uow: &mut UnitOfWork, before: &Board, after: &Board) -> AppResult<()> {
        self.boards
            .stage_update(uow, before.clone().into(), after.clone().into())
    }

    fn stage_delete(&self, uow: &mut UnitOfWork, board: &Board) -> AppResult<()> {
        self.boards.stage_delete(uow, board.clone().into())
    }

    async fn delete_by_id(&self, uow: &mut UnitOfWork, seq: i64) -> AppResult<u64> {
        self.boards.delete_by_id(uow, seq).await
    }

    async fn find_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_writer, &[QueryArg::value(writer)])
            .await
    }

    async fn find_by_title_containing(
        &self,
        uow: &mut UnitOfWork,
        keyword: &str,
    ) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_title_containing, &[QueryArg::value(keyword)])
            .await
    }

    async fn find_by_title_or_content(
        &self,
        uow: &mut UnitOfWork,
        title: &str,
        content: &str,
    ) -> AppResult<Vec<Board>> {
        let args = [QueryArg::value(title), QueryArg::value(content)];
        self.find_boards(uow, &self.by_title_or_content, &args).await
    }

    async fn find_by_cnt_greater_than(
        &self,
        uow: &mut UnitOfWork,
        cnt: i64,
    ) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_cnt_greater_than, &[QueryArg::value(cnt)])
            .await
    }

    async fn find_by_writer_in(
        &self,
        uow: &mut UnitOfWork,
        writers: Vec<String>,
    ) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_writer_in, &[QueryArg::list(writers)])
            .await
    }

    async fn find_by_writer_and_cnt_greater_than(
        &self,
        uow: &mut UnitOfWork,
        writer: &str,
        cnt: i64,
    ) -> AppResult<Vec<Board>> {
        let args = [QueryArg::value(writer), QueryArg::value(cnt)];
        self.find_boards(uow, &self.by_writer_and_cnt_greater_than, &args)
            .await
    }

    async fn find_by_writer_order_by_cnt_desc(
        &self,
        uow: &mut UnitOfWork,
        writer: &str,
    ) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_writer_order_by_cnt_desc, &[QueryArg::value(writer)])
            .await
    }

    async fn exists_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<bool> {
        self.boards
            .exists_by(uow, &self.exists_by_writer, &[QueryArg::value(writer)])
            .await
    }

    async fn count_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<u64> {
        self.boards
            .count_by(uow, &self.count_by_writer, &[QueryArg::value(writer)])
            .await
    }

    async fn delete_by_writer(&self, uow: &mut UnitOfWork, writer: &str) -> AppResult<u64> {
        self.boards
            .delete_by(uow, &self.delete_by_writer, &[QueryArg::value(writer)])
            .await
    }

    async fn find_by_member_id(
        &self,
        uow: &mut UnitOfWork,
        member_id: &str,
    ) -> AppResult<Vec<Board>> {
        self.find_boards(uow, &self.by_member_id, &[QueryArg::value(member_id)])
            .await
    }

    async fn search(&self, uow: &mut UnitOfWork, keyword: &str) -> AppResult<Vec<Board>> {
        let conn = uow.conn().await?;
        let models = Self::keyword_select(keyword).all(conn).await?;
        Ok(models.into_iter().map(Board::from).collect())
    }

    async fn summaries(
        &self,
        uow: &mut UnitOfWork,
        keyword: &str,
    ) -> AppResult<Vec<BoardSummary>> {
        let conn = uow.conn().await?;
        let rows = Self::keyword_select(keyword)
            .select_only()
            .columns([
                board::Column::Seq,
                board::Column::Title,
                board::Column::Writer,
                board::Column::CreatedAt,
            ])
            .into_model::<SummaryRow>()
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(BoardSummary::from).collect())
    }
}
