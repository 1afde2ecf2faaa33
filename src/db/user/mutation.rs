use std::error::Error;

use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::db::entity::{question, quiz, score, session};
use crate::db::entity::user::{ActiveModel, Entity, Model};

use super::Query;

/// Profile fields reported by an identity provider.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub provider: String,
    pub provider_account_id: String,
}

pub struct Mutation;

impl Mutation {
    /// Insert a user on first sign-in, otherwise refresh the profile fields.
    /// Users are keyed by email so one person signing in through two
    /// providers ends up with a single account.
    pub async fn upsert<C: ConnectionTrait>(conn: &C, profile: NewUser) -> Result<Model, DbErr> {
        match Query::find_by_email(conn, &profile.email).await? {
            Some(existing) => {
                let user = ActiveModel {
                    id: Unchanged(existing.id),
                    name: Set(profile.name.or(existing.name)),
                    image: Set(profile.image.or(existing.image)),
                    provider: Set(profile.provider),
                    provider_account_id: Set(profile.provider_account_id),
                    ..Default::default()
                };
                user.update(conn).await
            }
            None => {
                let user = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    email: Set(profile.email),
                    name: Set(profile.name),
                    image: Set(profile.image),
                    provider: Set(profile.provider),
                    provider_account_id: Set(profile.provider_account_id),
                    banned: Set(false),
                    created_at: Set(Utc::now()),
                };
                user.insert(conn).await.inspect_err(|error| {
                    tracing::error!(error = error as &dyn Error, "failed to create user");
                })
            }
        }
    }

    pub async fn set_banned<C: ConnectionTrait>(conn: &C, user_id: Uuid, banned: bool) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Unchanged(user_id),
            banned: Set(banned),
            ..Default::default()
        };
        user.update(conn).await
    }

    /// Delete a user together with their sessions, scores and quizzes.
    /// Returns false if the user did not exist.
    pub async fn delete<C: ConnectionTrait + TransactionTrait>(db: &C, user_id: Uuid) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        let owned: Vec<Uuid> = quiz::Entity::find()
            .filter(quiz::Column::OwnerId.eq(user_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|quiz| quiz.id)
            .collect();

        if !owned.is_empty() {
            score::Entity::delete_many()
                .filter(score::Column::QuizId.is_in(owned.clone()))
                .exec(&txn)
                .await?;
            question::Entity::delete_many()
                .filter(question::Column::QuizId.is_in(owned.clone()))
                .exec(&txn)
                .await?;
            quiz::Entity::delete_many()
                .filter(quiz::Column::Id.is_in(owned))
                .exec(&txn)
                .await?;
        }
        score::Entity::delete_many()
            .filter(score::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        session::Entity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let result = Entity::delete_by_id(user_id).exec(&txn).await;

        match result {
            Ok(result) => {
                txn.commit().await?;
                Ok(result.rows_affected > 0)
            }
            Err(error) => {
                tracing::error!(error = &error as &dyn Error, "failed to delete user");
                Err(error)
            }
        }
    }
}
