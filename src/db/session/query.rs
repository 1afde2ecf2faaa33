use std::error::Error;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use crate::db::entity::session::{Entity as SessionEntity, Model as Session};
use crate::db::entity::user::{Entity as UserEntity, Model as User};

pub struct Query;

impl Query {
    /// Load a session and its user by token. Expiry is left to the caller.
    pub async fn find_with_user<C: ConnectionTrait>(
        conn: &C,
        token: &str,
    ) -> Result<Option<(Session, User)>, DbErr> {
        let found = SessionEntity::find_by_id(token.to_owned())
            .find_also_related(UserEntity)
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error loading session");
            })?;

        Ok(found.and_then(|(session, user)| user.map(|user| (session, user))))
    }
}
