//! Table creation from the entity definitions.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use super::entity::{category, contact, question, quiz, score, session, user};

async fn create_table<C, E>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    conn.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Create every table that does not exist yet. Referenced tables come first.
pub async fn create_schema<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let schema = Schema::new(conn.get_database_backend());

    create_table(conn, &schema, user::Entity).await?;
    create_table(conn, &schema, session::Entity).await?;
    create_table(conn, &schema, category::Entity).await?;
    create_table(conn, &schema, quiz::Entity).await?;
    create_table(conn, &schema, question::Entity).await?;
    create_table(conn, &schema, score::Entity).await?;
    create_table(conn, &schema, contact::Entity).await?;

    tracing::debug!("Schema ready");
    Ok(())
}
