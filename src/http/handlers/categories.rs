use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::category::Query;
use crate::db::entity::category;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_quiz_count: Option<u64>,
}

impl From<category::Model> for CategoryView {
    fn from(category: category::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at,
            public_quiz_count: None,
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>, ApiError> {
    let categories = Query::list(&state.db).await?;
    Ok(Json(categories.into_iter().map(CategoryView::from).collect()))
}

pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<CategoryView>, ApiError> {
    let category = Query::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound("category"))?;
    let count = Query::count_public_quizzes(&state.db, category.id).await?;

    let mut view = CategoryView::from(category);
    view.public_quiz_count = Some(count);
    Ok(Json(view))
}
