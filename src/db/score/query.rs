use std::error::Error;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait};
use uuid::Uuid;

use crate::db::entity::quiz::{self, Entity as QuizEntity, Model as Quiz};
use crate::db::entity::score::{Column, Entity as ScoreEntity, Model as Score, Relation};

pub struct Query;

impl Query {
    /// A user's attempts, newest first, with the quiz each belongs to.
    pub async fn for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Vec<(Score, Option<Quiz>)>, DbErr> {
        ScoreEntity::find()
            .filter(Column::UserId.eq(user_id))
            .find_also_related(QuizEntity)
            .order_by_desc(Column::CreatedAt)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load scores");
            })
    }

    pub async fn for_quiz<C: ConnectionTrait>(conn: &C, quiz_id: Uuid) -> Result<Vec<Score>, DbErr> {
        ScoreEntity::find()
            .filter(Column::QuizId.eq(quiz_id))
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load quiz scores");
            })
    }

    /// Every attempt made on a public quiz.
    pub async fn for_public_quizzes<C: ConnectionTrait>(conn: &C) -> Result<Vec<Score>, DbErr> {
        ScoreEntity::find()
            .join(sea_orm::JoinType::InnerJoin, Relation::Quiz.def())
            .filter(quiz::Column::IsPublic.eq(true))
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load public scores");
            })
    }

    pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
        ScoreEntity::find().count(conn).await
    }
}
