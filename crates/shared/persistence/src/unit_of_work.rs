//! Unit of Work pattern implementation.
//!
//! A [`UnitOfWork`] owns one database transaction for the length of a single
//! service call. Inserts run immediately because the caller needs the
//! generated identity. Updates and deletes are staged against the records
//! loaded in the same unit and are written, in staging order, when the unit
//! flushes: before every read through [`UnitOfWork::conn`] and at commit.
//!
//! [`Persistence`] opens units and guarantees that each one either commits
//! as a whole or rolls back as a whole.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityName, EntityTrait, IntoActiveModel,
    IsolationLevel, Iterable, TransactionTrait,
};

use common::{AppError, AppResult};

/// Future returned by a closure run inside a unit of work.
pub type UnitFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Opens units of work over a connection pool.
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying connection pool.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Begin a read/write unit of work (ReadCommitted).
    pub async fn begin(&self) -> AppResult<UnitOfWork> {
        self.begin_with(IsolationLevel::ReadCommitted, AccessMode::ReadWrite)
            .await
    }

    /// Begin a read-only unit of work. Staging writes on it is an error.
    pub async fn begin_read_only(&self) -> AppResult<UnitOfWork> {
        self.begin_with(IsolationLevel::ReadCommitted, AccessMode::ReadOnly)
            .await
    }

    async fn begin_with(
        &self,
        isolation: IsolationLevel,
        access: AccessMode,
    ) -> AppResult<UnitOfWork> {
        let read_only = matches!(access, AccessMode::ReadOnly);

        // SQLite has no per-transaction isolation level or access mode
        let txn = match self.db.get_database_backend() {
            DatabaseBackend::Sqlite => self.db.begin().await?,
            _ => {
                self.db
                    .begin_with_config(Some(isolation), Some(access))
                    .await?
            }
        };

        Ok(UnitOfWork::new(txn, read_only))
    }

    /// Execute a closure within a read/write unit of work.
    ///
    /// The unit is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation level by default for balanced consistency/performance.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a mut UnitOfWork) -> UnitFuture<'a, T> + Send,
        T: Send,
    {
        let uow = self.begin().await?;
        Self::execute(uow, f).await
    }

    /// Execute a closure within a unit of work with serializable isolation.
    ///
    /// Use this for operations requiring the strongest consistency guarantees.
    pub async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a mut UnitOfWork) -> UnitFuture<'a, T> + Send,
        T: Send,
    {
        let uow = self
            .begin_with(IsolationLevel::Serializable, AccessMode::ReadWrite)
            .await?;
        Self::execute(uow, f).await
    }

    /// Execute a closure within a read-only unit of work.
    pub async fn read_only<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a mut UnitOfWork) -> UnitFuture<'a, T> + Send,
        T: Send,
    {
        let uow = self.begin_read_only().await?;
        Self::execute(uow, f).await
    }

    async fn execute<F, T>(mut uow: UnitOfWork, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a mut UnitOfWork) -> UnitFuture<'a, T> + Send,
        T: Send,
    {
        match f(&mut uow).await {
            Ok(result) => {
                uow.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// One transaction plus the writes staged against it.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
    read_only: bool,
    staged: Vec<Staged>,
}

impl UnitOfWork {
    fn new(txn: DatabaseTransaction, read_only: bool) -> Self {
        Self {
            txn,
            read_only,
            staged: Vec::new(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Number of staged writes not yet flushed.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Flush staged writes and hand out the transaction for a statement.
    pub async fn conn(&mut self) -> AppResult<&DatabaseTransaction> {
        self.flush().await?;
        Ok(&self.txn)
    }

    /// Stage an update of an already-persisted record.
    ///
    /// Only columns marked `Set` are written. Staging the same record twice
    /// merges the changes; staging a record already staged for deletion
    /// fails with `NotFound`.
    pub fn stage_update<A>(&mut self, model: A) -> AppResult<()>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        self.ensure_writable()?;
        if !has_changes(&model) {
            return Ok(());
        }

        let key = StageKey::of(&model)?;
        match self.position(&key) {
            Some(index) => {
                let entry = &mut self.staged[index];
                if entry.write.is_delete() {
                    return Err(AppError::NotFound);
                }
                let existing = entry
                    .write
                    .as_any_mut()
                    .downcast_mut::<StagedUpdate<A>>()
                    .ok_or_else(|| AppError::internal(format!("staged write type mismatch for {}", key)))?;
                existing.merge(model);
                tracing::debug!("Merged staged update for {}", key);
            }
            None => {
                tracing::debug!("Staged update for {}", key);
                self.staged.push(Staged {
                    key,
                    write: Box::new(StagedUpdate { model }),
                });
            }
        }

        Ok(())
    }

    /// Stage the deletion of an already-persisted record.
    ///
    /// A pending update of the same record is discarded.
    pub fn stage_delete<A>(&mut self, model: A) -> AppResult<()>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        self.ensure_writable()?;

        let key = StageKey::of(&model)?;
        let write: Box<dyn StagedWrite> = Box::new(StagedDelete { model });
        match self.position(&key) {
            Some(index) if self.staged[index].write.is_delete() => {}
            Some(index) => {
                tracing::debug!("Staged delete supersedes update for {}", key);
                self.staged[index].write = write;
            }
            None => {
                tracing::debug!("Staged delete for {}", key);
                self.staged.push(Staged { key, write });
            }
        }

        Ok(())
    }

    /// Write every staged change in staging order.
    pub async fn flush(&mut self) -> AppResult<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let staged = std::mem::take(&mut self.staged);
        tracing::debug!("Flushing {} staged write(s)", staged.len());
        for entry in staged {
            entry.write.apply(&self.txn).await?;
        }

        Ok(())
    }

    /// Flush and commit. A failed flush rolls the whole unit back.
    pub async fn commit(mut self) -> AppResult<()> {
        if let Err(e) = self.flush().await {
            if let Err(rollback_err) = self.txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            return Err(e);
        }

        self.txn.commit().await?;
        Ok(())
    }

    /// Discard staged writes and roll back.
    pub async fn rollback(self) -> AppResult<()> {
        if !self.staged.is_empty() {
            tracing::debug!("Discarding {} staged write(s)", self.staged.len());
        }
        self.txn.rollback().await?;
        Ok(())
    }

    fn ensure_writable(&self) -> AppResult<()> {
        if self.read_only {
            return Err(AppError::internal("cannot stage writes in a read-only unit of work"));
        }
        Ok(())
    }

    fn position(&self, key: &StageKey) -> Option<usize> {
        self.staged.iter().position(|entry| &entry.key == key)
    }
}

fn has_changes<A: ActiveModelTrait>(model: &A) -> bool {
    <A::Entity as EntityTrait>::Column::iter().any(|col| model.get(col).is_set())
}

/// Identity of a staged record: table plus primary key value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StageKey {
    table: String,
    id: String,
}

impl StageKey {
    fn of<A: ActiveModelTrait>(model: &A) -> AppResult<Self> {
        let table = A::Entity::default().table_name().to_string();
        let id = model
            .get_primary_key_value()
            .ok_or_else(|| AppError::internal(format!("cannot stage a {} row without its primary key", table)))?;

        Ok(Self {
            table,
            id: format!("{:?}", id),
        })
    }
}

impl std::fmt::Display for StageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.table, self.id)
    }
}

struct Staged {
    key: StageKey,
    write: Box<dyn StagedWrite>,
}

#[async_trait]
trait StagedWrite: Send {
    fn is_delete(&self) -> bool;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> AppResult<()>;
}

struct StagedUpdate<A> {
    model: A,
}

impl<A: ActiveModelTrait> StagedUpdate<A> {
    fn merge(&mut self, incoming: A) {
        for col in <A::Entity as EntityTrait>::Column::iter() {
            let value = incoming.get(col);
            if value.is_set() {
                if let Some(value) = value.into_value() {
                    self.model.set(col, value);
                }
            }
        }
    }
}

#[async_trait]
impl<A> StagedWrite for StagedUpdate<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    fn is_delete(&self) -> bool {
        false
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> AppResult<()> {
        match self.model.update(txn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

struct StagedDelete<A> {
    model: A,
}

#[async_trait]
impl<A> StagedWrite for StagedDelete<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    fn is_delete(&self) -> bool {
        true
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> AppResult<()> {
        let result = self.model.delete(txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
