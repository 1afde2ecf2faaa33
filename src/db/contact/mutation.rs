use std::error::Error;

use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use uuid::Uuid;

use crate::db::entity::contact::{ActiveModel, Entity, Model, Status};

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub ip: Option<String>,
}

pub struct Mutation;

impl Mutation {
    pub async fn create<C: ConnectionTrait>(conn: &C, contact: NewContact) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(contact.name),
            email: Set(contact.email),
            message: Set(contact.message),
            status: Set(Status::New),
            ip: Set(contact.ip),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await
        .inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to store contact message");
        })
    }

    /// Returns `None` if no message has this id.
    pub async fn set_status<C: ConnectionTrait>(conn: &C, id: Uuid, status: Status) -> Result<Option<Model>, DbErr> {
        if Entity::find_by_id(id).one(conn).await?.is_none() {
            return Ok(None);
        }
        let updated = ActiveModel {
            id: Unchanged(id),
            status: Set(status),
            ..Default::default()
        }
        .update(conn)
        .await?;
        Ok(Some(updated))
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<bool, DbErr> {
        let result = Entity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }
}
