use std::error::Error;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::db::entity::category::{Column, Entity as CategoryEntity, Model as Category};
use crate::db::entity::quiz;

pub struct Query;

impl Query {
    pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<Category>, DbErr> {
        CategoryEntity::find()
            .order_by_asc(Column::Name)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error listing categories");
            })
    }

    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Category>, DbErr> {
        CategoryEntity::find_by_id(id).one(conn).await
    }

    pub async fn find_by_slug<C: ConnectionTrait>(conn: &C, slug: &str) -> Result<Option<Category>, DbErr> {
        CategoryEntity::find()
            .filter(Column::Slug.eq(slug))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error loading category by slug");
            })
    }

    /// A name or slug clash with an existing category.
    pub async fn find_conflict<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        slug: &str,
    ) -> Result<Option<Category>, DbErr> {
        CategoryEntity::find()
            .filter(Column::Name.eq(name).or(Column::Slug.eq(slug)))
            .one(conn)
            .await
    }

    pub async fn count_public_quizzes<C: ConnectionTrait>(conn: &C, category_id: Uuid) -> Result<u64, DbErr> {
        quiz::Entity::find()
            .filter(quiz::Column::CategoryId.eq(category_id))
            .filter(quiz::Column::IsPublic.eq(true))
            .count(conn)
            .await
    }
}
