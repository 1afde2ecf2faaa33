use std::error::Error;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entity::question::{self, Entity as QuestionEntity, Model as Question};
use crate::db::entity::quiz::{Column, Entity as QuizEntity, Model as Quiz};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Newest,
    Popular,
}

/// Discovery filter over public quizzes. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct DiscoverFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort: Sort,
    pub page: u64,
    pub per_page: u64,
}

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Quiz>, DbErr> {
        QuizEntity::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "error loading quiz");
        })
    }

    /// Questions of a quiz in display order.
    pub async fn questions<C: ConnectionTrait>(conn: &C, quiz_id: Uuid) -> Result<Vec<Question>, DbErr> {
        QuestionEntity::find()
            .filter(question::Column::QuizId.eq(quiz_id))
            .order_by_asc(question::Column::Position)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load questions");
            })
    }

    /// A question, only if it belongs to `quiz_id`.
    pub async fn find_question<C: ConnectionTrait>(
        conn: &C,
        quiz_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<Question>, DbErr> {
        QuestionEntity::find_by_id(question_id)
            .filter(question::Column::QuizId.eq(quiz_id))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load question");
            })
    }

    fn discover_query(filter: &DiscoverFilter) -> Select<QuizEntity> {
        let mut query = QuizEntity::find().filter(Column::IsPublic.eq(true));
        if let Some(category_id) = filter.category_id {
            query = query.filter(Column::CategoryId.eq(category_id));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(Column::Title.contains(search));
        }
        match filter.sort {
            Sort::Newest => query.order_by_desc(Column::CreatedAt),
            Sort::Popular => query
                .order_by_desc(Column::PlayCount)
                .order_by_desc(Column::CreatedAt),
        }
    }

    /// One page of public quizzes plus the total number of matches.
    pub async fn discover<C: ConnectionTrait>(conn: &C, filter: &DiscoverFilter) -> Result<(Vec<Quiz>, u64), DbErr> {
        let paginator = Self::discover_query(filter).paginate(conn, filter.per_page.max(1));
        let total = paginator.num_items().await?;
        let quizzes = paginator
            .fetch_page(filter.page.saturating_sub(1))
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to discover quizzes");
            })?;
        Ok((quizzes, total))
    }

    pub async fn by_owner<C: ConnectionTrait>(conn: &C, owner_id: Uuid) -> Result<Vec<Quiz>, DbErr> {
        QuizEntity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_desc(Column::UpdatedAt)
            .all(conn)
            .await
    }

    pub async fn find_many<C: ConnectionTrait>(conn: &C, ids: Vec<Uuid>) -> Result<Vec<Quiz>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        QuizEntity::find().filter(Column::Id.is_in(ids)).all(conn).await
    }

    pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
        QuizEntity::find().count(conn).await
    }

    pub async fn count_public<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
        QuizEntity::find().filter(Column::IsPublic.eq(true)).count(conn).await
    }
}
