use std::error::Error;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::db::entity::contact::{Column, Entity as ContactEntity, Model as Contact, Status};

pub struct Query;

impl Query {
    /// Messages newest first, optionally restricted to one status.
    pub async fn list<C: ConnectionTrait>(conn: &C, status: Option<Status>) -> Result<Vec<Contact>, DbErr> {
        let mut query = ContactEntity::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }
        query
            .order_by_desc(Column::CreatedAt)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to list contacts");
            })
    }

    pub async fn count_by_status<C: ConnectionTrait>(conn: &C, status: Status) -> Result<u64, DbErr> {
        ContactEntity::find()
            .filter(Column::Status.eq(status))
            .count(conn)
            .await
    }
}
