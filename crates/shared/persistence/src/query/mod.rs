//! Derived queries: finder methods declared by name.
//!
//! `DerivedQuery::<board::Entity>::parse("findByWriterAndCntGreaterThan")`
//! resolves every field against the entity's columns once, so an unknown
//! name fails when the repository is built. Arguments are bound in the
//! order the predicates appear in the name.
//!
//! Grammar:
//!
//! ```text
//! name      := subject [Words] [By predicates] [OrderBy order]
//! subject   := find | read | get | query | search | exists | count | delete | remove
//! predicates:= group (Or group)*          -- And binds tighter than Or
//! group     := predicate (And predicate)*
//! predicate := Field [comparator]         -- default comparator is equality
//! order     := (Field [Asc|Desc])+
//! ```

mod parser;

use convert_case::{Case, Casing};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, IdenStatic, Iterable, QueryFilter, Select, Value,
};
use thiserror::Error;

use common::AppError;

use crate::sort::Sort;

/// What a derived query does with the matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Find,
    Exists,
    Count,
    Delete,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Subject::Find => "find",
            Subject::Exists => "exists",
            Subject::Count => "count",
            Subject::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

/// Predicate comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    Not,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    In,
    NotIn,
    Containing,
    StartingWith,
    EndingWith,
    IsNull,
    IsNotNull,
}

impl Comparator {
    /// Number of arguments consumed.
    pub fn arity(self) -> usize {
        match self {
            Comparator::IsNull | Comparator::IsNotNull => 0,
            _ => 1,
        }
    }

    fn takes_list(self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

/// Derived query errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("`{0}` does not start with find, exists, count or delete")]
    UnknownSubject(String),

    #[error("`{name}` is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error("`{name}` refers to unknown field `{field}`")]
    UnknownField { name: String, field: String },

    #[error("`{name}` expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{name}` argument {index} must be {expected}")]
    ArgumentKind {
        name: String,
        index: usize,
        expected: &'static str,
    },

    #[error("`{name}` is a {actual} query, used as {expected}")]
    SubjectMismatch {
        name: String,
        expected: Subject,
        actual: Subject,
    },
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Query(err.to_string())
    }
}

/// Argument bound to a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Value(Value),
    List(Vec<Value>),
}

impl QueryArg {
    pub fn value(value: impl Into<Value>) -> Self {
        QueryArg::Value(value.into())
    }

    /// Argument for `In` / `NotIn`.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        QueryArg::List(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
struct Predicate<E: EntityTrait> {
    column: E::Column,
    comparator: Comparator,
}

/// A finder compiled against entity `E`.
#[derive(Debug, Clone)]
pub struct DerivedQuery<E: EntityTrait> {
    name: String,
    subject: Subject,
    groups: Vec<Vec<Predicate<E>>>,
    sort: Sort<E>,
}

impl<E: EntityTrait> DerivedQuery<E> {
    /// Parse `name` and resolve its fields against `E`'s columns.
    pub fn parse(name: &str) -> Result<Self, QueryError> {
        let parsed = parser::parse(name)?;

        let groups = parsed
            .groups
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|predicate| {
                        Ok(Predicate {
                            column: resolve::<E>(name, &predicate.field)?,
                            comparator: predicate.comparator,
                        })
                    })
                    .collect::<Result<Vec<_>, QueryError>>()
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        let mut sort = Sort::unsorted();
        for (field, direction) in parsed.order {
            sort = sort.then(resolve::<E>(name, &field)?, direction);
        }

        tracing::debug!(query = name, subject = %parsed.subject, "Compiled derived query");

        Ok(Self {
            name: name.to_string(),
            subject: parsed.subject,
            groups,
            sort,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Order declared by the name's `OrderBy` clause.
    pub fn sort(&self) -> &Sort<E> {
        &self.sort
    }

    /// Number of arguments the query binds.
    pub fn arity(&self) -> usize {
        self.groups
            .iter()
            .flatten()
            .map(|predicate| predicate.comparator.arity())
            .sum()
    }

    /// Fail unless this query has the given subject.
    pub fn expect(&self, subject: Subject) -> Result<(), QueryError> {
        if self.subject != subject {
            return Err(QueryError::SubjectMismatch {
                name: self.name.clone(),
                expected: subject,
                actual: self.subject,
            });
        }
        Ok(())
    }

    /// Bind `args` and build the WHERE condition.
    pub fn condition(&self, args: &[QueryArg]) -> Result<Condition, QueryError> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(QueryError::Arity {
                name: self.name.clone(),
                expected,
                found: args.len(),
            });
        }

        let mut args = args.iter().enumerate();
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let mut all = Condition::all();
            for predicate in group {
                all = all.add(self.expression(predicate, &mut args)?);
            }
            groups.push(all);
        }

        // A single group needs no OR wrapper; no groups means no filter
        if groups.len() <= 1 {
            return Ok(groups.pop().unwrap_or_else(Condition::all));
        }
        Ok(groups
            .into_iter()
            .fold(Condition::any(), |any, all| any.add(all)))
    }

    /// Filtered and ordered select.
    pub fn select(&self, args: &[QueryArg]) -> Result<Select<E>, QueryError> {
        let select = E::find().filter(self.condition(args)?);
        Ok(self.sort.apply(select))
    }

    fn expression<'a>(
        &self,
        predicate: &Predicate<E>,
        args: &mut impl Iterator<Item = (usize, &'a QueryArg)>,
    ) -> Result<SimpleExpr, QueryError> {
        let column = predicate.column;
        let comparator = predicate.comparator;

        if comparator.arity() == 0 {
            return Ok(match comparator {
                Comparator::IsNotNull => column.is_not_null(),
                _ => column.is_null(),
            });
        }

        let (index, arg) = args.next().ok_or_else(|| QueryError::Arity {
            name: self.name.clone(),
            expected: self.arity(),
            found: 0,
        })?;

        let expr = match (comparator, arg) {
            (Comparator::In, QueryArg::List(values)) => column.is_in(values.clone()),
            (Comparator::NotIn, QueryArg::List(values)) => column.is_not_in(values.clone()),
            (c, _) if c.takes_list() => return Err(self.kind_error(index, "a list")),
            (_, QueryArg::List(_)) => return Err(self.kind_error(index, "a single value")),
            (Comparator::Containing | Comparator::StartingWith | Comparator::EndingWith, QueryArg::Value(value)) => {
                text_match(column, comparator, &self.text(index, value)?)
            }
            (Comparator::Not, QueryArg::Value(value)) => column.ne(value.clone()),
            (Comparator::GreaterThan, QueryArg::Value(value)) => column.gt(value.clone()),
            (Comparator::GreaterThanEqual, QueryArg::Value(value)) => column.gte(value.clone()),
            (Comparator::LessThan, QueryArg::Value(value)) => column.lt(value.clone()),
            (Comparator::LessThanEqual, QueryArg::Value(value)) => column.lte(value.clone()),
            (_, QueryArg::Value(value)) => column.eq(value.clone()),
        };

        Ok(expr)
    }

    fn text(&self, index: usize, value: &Value) -> Result<String, QueryError> {
        match value {
            Value::String(Some(s)) => Ok(s.to_string()),
            _ => Err(self.kind_error(index, "a string")),
        }
    }

    fn kind_error(&self, index: usize, expected: &'static str) -> QueryError {
        QueryError::ArgumentKind {
            name: self.name.clone(),
            index,
            expected,
        }
    }
}

/// Case-sensitive match of `text` taken literally.
///
/// `LIKE` folds ASCII case on SQLite and reads `%` and `_` in the argument
/// as wildcards, so matching goes through `replace`, `substr` and `length`,
/// which PostgreSQL and SQLite both evaluate byte for byte.
pub fn text_match<C: ColumnTrait>(column: C, comparator: Comparator, text: &str) -> SimpleExpr {
    let col = || SimpleExpr::from(Expr::col((column.entity_name(), column)));
    let arg = || SimpleExpr::from(text.to_string());
    let length = |expr: SimpleExpr| SimpleExpr::from(Func::cust(Alias::new("length")).arg(expr));

    match comparator {
        Comparator::StartingWith => Expr::expr(
            Func::cust(Alias::new("substr"))
                .arg(col())
                .arg(1)
                .arg(length(arg())),
        )
        .eq(arg()),
        Comparator::EndingWith => {
            let start = Expr::expr(length(col())).sub(length(arg())).add(1);
            Expr::expr(Func::cust(Alias::new("substr")).arg(col()).arg(start)).eq(arg())
        }
        // Every non-null value contains the empty string
        _ if text.is_empty() => column.is_not_null(),
        _ => Expr::expr(
            Func::cust(Alias::new("replace"))
                .arg(col())
                .arg(arg())
                .arg(""),
        )
        .ne(col()),
    }
}

/// Resolve a PascalCase field (`MemberId`) to a column (`member_id`).
fn resolve<E: EntityTrait>(name: &str, field: &str) -> Result<E::Column, QueryError> {
    let column_name = field.to_case(Case::Snake);
    E::Column::iter()
        .find(|column| column.as_str() == column_name)
        .ok_or_else(|| QueryError::UnknownField {
            name: name.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    mod post {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "post")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub title: String,
            pub author_name: String,
            pub views: i64,
            pub editor: Option<String>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn sql(name: &str, args: &[QueryArg]) -> String {
        DerivedQuery::<post::Entity>::parse(name)
            .unwrap()
            .select(args)
            .unwrap()
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn resolves_multi_word_fields() {
        let query = DerivedQuery::<post::Entity>::parse("findByAuthorName").unwrap();
        assert_eq!(query.arity(), 1);
        assert!(sql("findByAuthorName", &[QueryArg::value("kim")]).contains(r#""post"."author_name" = 'kim'"#));
    }

    #[test]
    fn unknown_field_fails_at_parse() {
        let err = DerivedQuery::<post::Entity>::parse("findByAuthor").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownField {
                name: "findByAuthor".to_string(),
                field: "Author".to_string(),
            }
        );

        assert!(matches!(
            DerivedQuery::<post::Entity>::parse("findByTitleOrderByRank"),
            Err(QueryError::UnknownField { .. })
        ));
    }

    #[test]
    fn and_groups_are_or_ed() {
        let rendered = sql(
            "findByTitleOrAuthorNameAndViewsGreaterThan",
            &[QueryArg::value("a"), QueryArg::value("b"), QueryArg::value(3)],
        );
        assert!(rendered.contains(r#""post"."title" = 'a' OR"#));
        assert!(rendered.contains(r#"("post"."author_name" = 'b' AND "post"."views" > 3)"#));
    }

    #[test]
    fn in_takes_a_list() {
        let rendered = sql("findByViewsIn", &[QueryArg::list([1, 2])]);
        assert!(rendered.contains(r#""post"."views" IN (1, 2)"#));

        let query = DerivedQuery::<post::Entity>::parse("findByViewsIn").unwrap();
        assert!(matches!(
            query.condition(&[QueryArg::value(1)]),
            Err(QueryError::ArgumentKind { index: 0, .. })
        ));
    }

    #[test]
    fn containing_requires_text() {
        let rendered = sql("findByTitleContaining", &[QueryArg::value("rust")]);
        assert!(rendered.contains(r#"replace("post"."title", 'rust', '') <> "post"."title""#));
        assert!(!rendered.contains("LIKE"));

        let query = DerivedQuery::<post::Entity>::parse("findByTitleContaining").unwrap();
        assert!(matches!(
            query.condition(&[QueryArg::value(7)]),
            Err(QueryError::ArgumentKind { .. })
        ));
    }

    #[test]
    fn null_checks_take_no_arguments() {
        let query = DerivedQuery::<post::Entity>::parse("findByEditorIsNullAndViewsLessThan").unwrap();
        assert_eq!(query.arity(), 1);
        let rendered = sql("findByEditorIsNullAndViewsLessThan", &[QueryArg::value(10)]);
        assert!(rendered.contains(r#""post"."editor" IS NULL AND "post"."views" < 10"#));
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let query = DerivedQuery::<post::Entity>::parse("findByTitleAndViews").unwrap();
        assert_eq!(
            query.condition(&[QueryArg::value("x")]).unwrap_err(),
            QueryError::Arity {
                name: "findByTitleAndViews".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn order_by_clause_is_applied() {
        let rendered = sql("findByAuthorNameOrderByViewsDesc", &[QueryArg::value("kim")]);
        assert!(rendered.ends_with(r#"ORDER BY "post"."views" DESC"#));
    }

    #[test]
    fn no_predicates_means_no_filter() {
        let rendered = sql("findAllByOrderByIdDesc", &[]);
        assert!(!rendered.contains("WHERE"));
    }

    #[test]
    fn subject_mismatch() {
        let query = DerivedQuery::<post::Entity>::parse("countByTitle").unwrap();
        assert!(query.expect(Subject::Count).is_ok());
        assert!(matches!(
            query.expect(Subject::Find),
            Err(QueryError::SubjectMismatch { .. })
        ));
    }

    #[test]
    fn query_errors_become_app_errors() {
        let err: AppError = QueryError::UnknownSubject("fetchAll".to_string()).into();
        assert!(matches!(err, AppError::Query(_)));
    }
}
