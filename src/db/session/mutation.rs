use std::error::Error;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::db::entity::session::{ActiveModel, Column, Entity, Model};

const TOKEN_LENGTH: usize = 48;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub struct Mutation;

impl Mutation {
    pub async fn create<C: ConnectionTrait>(conn: &C, user_id: Uuid, ttl_secs: u64) -> Result<Model, DbErr> {
        let now = Utc::now();
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let session = ActiveModel {
            token: Set(generate_token()),
            user_id: Set(user_id),
            expires_at: Set(now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)),
            created_at: Set(now),
        };
        session.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create session");
        })
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, token: &str) -> Result<(), DbErr> {
        Entity::delete_by_id(token.to_owned()).exec(conn).await?;
        Ok(())
    }

    /// Sign a user out everywhere.
    pub async fn delete_for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<u64, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
