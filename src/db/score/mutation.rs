use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::db::entity::score::{ActiveModel, Model};

#[derive(Debug, Clone)]
pub struct NewScore {
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub points: i32,
    pub max_points: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub time_taken_secs: Option<i32>,
}

pub struct Mutation;

impl Mutation {
    pub async fn record<C: ConnectionTrait>(conn: &C, score: NewScore) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            quiz_id: Set(score.quiz_id),
            user_id: Set(score.user_id),
            points: Set(score.points),
            max_points: Set(score.max_points),
            correct_count: Set(score.correct_count),
            total_questions: Set(score.total_questions),
            time_taken_secs: Set(score.time_taken_secs),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await
    }
}
