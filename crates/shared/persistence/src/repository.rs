//! Generic repository over a SeaORM active model.
//!
//! Every operation runs inside the caller's [`UnitOfWork`]. Reads flush the
//! unit's staged writes first, so a record updated earlier in the same unit
//! reads back with its new values.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbErr, EntityTrait, IdenStatic, IntoActiveModel,
    Iterable, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter,
};

use common::{AppError, AppResult, Paginated};

use crate::query::{DerivedQuery, QueryArg, Subject};
use crate::sort::{PageRequest, Sort};
use crate::unit_of_work::UnitOfWork;

/// Primary key value type of active model `A`.
pub type PrimaryKeyOf<A> = <<<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

type EntityOf<A> = <A as ActiveModelTrait>::Entity;
type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

/// CRUD and derived-query operations for one entity.
pub struct Repository<A> {
    _model: PhantomData<fn() -> A>,
}

impl<A> Default for Repository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Repository<A> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A> Repository<A> {
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<A> Repository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A> + Send + Sync,
    PrimaryKeyOf<A>: Send,
{
    /// Find entity by primary key
    pub async fn find_by_id(
        &self,
        uow: &mut UnitOfWork,
        id: PrimaryKeyOf<A>,
    ) -> AppResult<Option<ModelOf<A>>> {
        let conn = uow.conn().await?;
        Ok(A::Entity::find_by_id(id).one(conn).await?)
    }

    /// Find all entities
    pub async fn find_all(&self, uow: &mut UnitOfWork) -> AppResult<Vec<ModelOf<A>>> {
        let conn = uow.conn().await?;
        Ok(A::Entity::find().all(conn).await?)
    }

    pub async fn find_all_sorted(
        &self,
        uow: &mut UnitOfWork,
        sort: &Sort<EntityOf<A>>,
    ) -> AppResult<Vec<ModelOf<A>>> {
        let conn = uow.conn().await?;
        Ok(sort.apply(A::Entity::find()).all(conn).await?)
    }

    /// Find entities with pagination
    pub async fn find_page(
        &self,
        uow: &mut UnitOfWork,
        request: &PageRequest<EntityOf<A>>,
    ) -> AppResult<Paginated<ModelOf<A>>> {
        request.validate()?;
        let conn = uow.conn().await?;

        let paginator = request
            .sort
            .apply(A::Entity::find())
            .paginate(conn, request.size);
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(request.page).await?;

        Ok(Paginated::new(data, request.page, request.size, total))
    }

    /// Count all entities
    pub async fn count(&self, uow: &mut UnitOfWork) -> AppResult<u64> {
        let conn = uow.conn().await?;
        Ok(A::Entity::find().count(conn).await?)
    }

    pub async fn exists_by_id(&self, uow: &mut UnitOfWork, id: PrimaryKeyOf<A>) -> AppResult<bool> {
        Ok(self.find_by_id(uow, id).await?.is_some())
    }

    /// Insert or fully replace.
    ///
    /// A model without its primary key is inserted and comes back with the
    /// generated identity. A model with a primary key replaces every column
    /// of the existing row; a key with no row is `NotFound`.
    pub async fn save(&self, uow: &mut UnitOfWork, model: A) -> AppResult<ModelOf<A>> {
        if model.get_primary_key_value().is_none() {
            return self.insert(uow, model).await;
        }

        let mut model = model;
        for col in <EntityOf<A> as EntityTrait>::Column::iter() {
            if is_primary_key::<A>(col) {
                continue;
            }
            let value = model.get(col);
            if !value.is_set() {
                if let Some(value) = value.into_value() {
                    model.set(col, value);
                }
            }
        }

        let conn = uow.conn().await?;
        match model.update(conn).await {
            Ok(saved) => Ok(saved),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new row, including a caller-assigned primary key if set.
    pub async fn insert(&self, uow: &mut UnitOfWork, model: A) -> AppResult<ModelOf<A>> {
        let conn = uow.conn().await?;
        Ok(model.insert(conn).await?)
    }

    /// Delete by primary key right away; returns the number of rows removed.
    pub async fn delete_by_id(&self, uow: &mut UnitOfWork, id: PrimaryKeyOf<A>) -> AppResult<u64> {
        let conn = uow.conn().await?;
        let result = A::Entity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }

    /// Stage the columns that differ between `before` and `after`.
    ///
    /// Nothing is staged when the two are equal.
    pub fn stage_update(
        &self,
        uow: &mut UnitOfWork,
        before: ModelOf<A>,
        after: ModelOf<A>,
    ) -> AppResult<()> {
        let mut active: A = before.into_active_model();
        let after: A = after.into_active_model();

        for col in <EntityOf<A> as EntityTrait>::Column::iter() {
            let new = after.get(col).into_value();
            if is_primary_key::<A>(col) {
                if new != active.get(col).into_value() {
                    return Err(AppError::internal("primary key cannot be reassigned"));
                }
                continue;
            }
            if let Some(new) = new {
                if active.get(col).into_value().as_ref() != Some(&new) {
                    active.set(col, new);
                }
            }
        }

        uow.stage_update(active)
    }

    /// Stage the deletion of a loaded record.
    pub fn stage_delete(&self, uow: &mut UnitOfWork, model: ModelOf<A>) -> AppResult<()> {
        uow.stage_delete::<A>(model.into_active_model())
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    pub async fn find_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
    ) -> AppResult<Vec<ModelOf<A>>> {
        query.expect(Subject::Find)?;
        let select = query.select(args)?;
        let conn = uow.conn().await?;
        Ok(select.all(conn).await?)
    }

    /// First match of a find query.
    pub async fn find_one_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
    ) -> AppResult<Option<ModelOf<A>>> {
        query.expect(Subject::Find)?;
        let select = query.select(args)?;
        let conn = uow.conn().await?;
        Ok(select.one(conn).await?)
    }

    /// Find query with an extra sort appended after the name's `OrderBy`.
    pub async fn find_by_sorted(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
        sort: &Sort<EntityOf<A>>,
    ) -> AppResult<Vec<ModelOf<A>>> {
        query.expect(Subject::Find)?;
        let select = sort.apply(query.select(args)?);
        let conn = uow.conn().await?;
        Ok(select.all(conn).await?)
    }

    pub async fn find_page_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
        request: &PageRequest<EntityOf<A>>,
    ) -> AppResult<Paginated<ModelOf<A>>> {
        query.expect(Subject::Find)?;
        request.validate()?;
        let select = request.sort.apply(query.select(args)?);
        let conn = uow.conn().await?;

        let paginator = select.paginate(conn, request.size);
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(request.page).await?;

        Ok(Paginated::new(data, request.page, request.size, total))
    }

    pub async fn exists_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
    ) -> AppResult<bool> {
        query.expect(Subject::Exists)?;
        let select = query.select(args)?;
        let conn = uow.conn().await?;
        Ok(select.one(conn).await?.is_some())
    }

    pub async fn count_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
    ) -> AppResult<u64> {
        query.expect(Subject::Count)?;
        let select = query.select(args)?;
        let conn = uow.conn().await?;
        Ok(select.count(conn).await?)
    }

    /// Delete every match right away; returns the number of rows removed.
    pub async fn delete_by(
        &self,
        uow: &mut UnitOfWork,
        query: &DerivedQuery<EntityOf<A>>,
        args: &[QueryArg],
    ) -> AppResult<u64> {
        query.expect(Subject::Delete)?;
        let condition = query.condition(args)?;
        let conn = uow.conn().await?;
        let result = A::Entity::delete_many()
            .filter(condition)
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

fn is_primary_key<A: ActiveModelTrait>(col: <EntityOf<A> as EntityTrait>::Column) -> bool {
    <EntityOf<A> as EntityTrait>::PrimaryKey::iter().any(|key| key.into_column().as_str() == col.as_str())
}
