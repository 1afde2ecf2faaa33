use std::error::Error;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::db::entity::question::{self, Model as Question};
use crate::db::entity::quiz::{self, Model as Quiz};
use crate::db::entity::score;

/// Quiz fields that can be set by its author.
#[derive(Debug, Clone)]
pub struct QuizMeta {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_public: bool,
    pub time_limit_secs: Option<i32>,
}

/// An already validated question. Position comes from its index in the list.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub content: String,
    pub options: Vec<String>,
    pub correct_indices: Vec<u32>,
    pub explanation: Option<String>,
    pub points: i32,
    pub multi_select: bool,
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, DbErr> {
    serde_json::to_string(value).map_err(|error| DbErr::Custom(format!("failed to encode column: {error}")))
}

pub struct Mutation;

impl Mutation {
    async fn insert_questions<C: ConnectionTrait>(
        conn: &C,
        quiz_id: Uuid,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>, DbErr> {
        let mut questions = Vec::with_capacity(drafts.len());
        for (position, draft) in drafts.into_iter().enumerate() {
            let mut correct = draft.correct_indices;
            correct.sort_unstable();
            correct.dedup();

            let model = question::ActiveModel {
                id: Set(Uuid::new_v4()),
                quiz_id: Set(quiz_id),
                content: Set(draft.content),
                options: Set(encode(&draft.options)?),
                correct_indices: Set(encode(&correct)?),
                explanation: Set(draft.explanation),
                points: Set(draft.points),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                multi_select: Set(draft.multi_select),
            };
            questions.push(model.insert(conn).await?);
        }
        Ok(questions)
    }

    pub async fn create<C: ConnectionTrait + TransactionTrait>(
        db: &C,
        owner_id: Uuid,
        meta: QuizMeta,
        questions: Vec<QuestionDraft>,
    ) -> Result<(Quiz, Vec<Question>), DbErr> {
        let txn = db.begin().await?;
        let now = Utc::now();

        let quiz = quiz::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(meta.title),
            description: Set(meta.description),
            category_id: Set(meta.category_id),
            owner_id: Set(owner_id),
            is_public: Set(meta.is_public),
            time_limit_secs: Set(meta.time_limit_secs),
            play_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create quiz");
        })?;
        let questions = Self::insert_questions(&txn, quiz.id, questions).await?;

        txn.commit().await?;
        Ok((quiz, questions))
    }

    /// Replace the metadata of a quiz. When `questions` is given the old
    /// question set is dropped and replaced in the same transaction.
    pub async fn update<C: ConnectionTrait + TransactionTrait>(
        db: &C,
        quiz_id: Uuid,
        meta: QuizMeta,
        questions: Option<Vec<QuestionDraft>>,
    ) -> Result<Quiz, DbErr> {
        let txn = db.begin().await?;

        let quiz = quiz::ActiveModel {
            id: Unchanged(quiz_id),
            title: Set(meta.title),
            description: Set(meta.description),
            category_id: Set(meta.category_id),
            is_public: Set(meta.is_public),
            time_limit_secs: Set(meta.time_limit_secs),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        if let Some(questions) = questions {
            question::Entity::delete_many()
                .filter(question::Column::QuizId.eq(quiz_id))
                .exec(&txn)
                .await?;
            Self::insert_questions(&txn, quiz_id, questions).await?;
        }

        txn.commit().await?;
        Ok(quiz)
    }

    pub async fn set_visibility<C: ConnectionTrait>(conn: &C, quiz_id: Uuid, is_public: bool) -> Result<Quiz, DbErr> {
        quiz::ActiveModel {
            id: Unchanged(quiz_id),
            is_public: Set(is_public),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(conn)
        .await
    }

    pub async fn increment_play_count<C: ConnectionTrait>(conn: &C, quiz_id: Uuid) -> Result<(), DbErr> {
        quiz::Entity::update_many()
            .col_expr(quiz::Column::PlayCount, Expr::col(quiz::Column::PlayCount).add(1))
            .filter(quiz::Column::Id.eq(quiz_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Delete a quiz with its questions and scores.
    pub async fn delete<C: ConnectionTrait + TransactionTrait>(db: &C, quiz_id: Uuid) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        score::Entity::delete_many()
            .filter(score::Column::QuizId.eq(quiz_id))
            .exec(&txn)
            .await?;
        question::Entity::delete_many()
            .filter(question::Column::QuizId.eq(quiz_id))
            .exec(&txn)
            .await?;
        let result = quiz::Entity::delete_by_id(quiz_id).exec(&txn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to delete quiz");
        })?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
