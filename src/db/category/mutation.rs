use std::error::Error;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use crate::db::entity::category::{ActiveModel, Entity, Model};
use crate::db::entity::quiz;

/// Lowercase ASCII slug: runs of anything non-alphanumeric become one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub struct Mutation;

impl Mutation {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<Model, DbErr> {
        let category = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            created_at: Set(Utc::now()),
        };
        category.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create category");
        })
    }

    /// Delete a category. Its quizzes stay, uncategorized.
    pub async fn delete<C: ConnectionTrait + TransactionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
        let txn = db.begin().await?;

        quiz::Entity::update_many()
            .col_expr(quiz::Column::CategoryId, Expr::value(Option::<Uuid>::None))
            .filter(quiz::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        let result = Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
