//! Quiz authoring and discovery.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{CurrentUser, OptionalUser};
use crate::db::entity::{question, quiz};
use crate::db::quiz::{DiscoverFilter, Mutation, QuestionDraft, Query as QuizQuery, QuizMeta, Sort};
use crate::db::category;
use crate::http::error::{field_errors, ApiError, FieldError};
use crate::http::extract::ApiJson;
use crate::http::server::AppState;
use crate::quiz::validation::check_question;

pub const MAX_PER_PAGE: u64 = 50;
const DEFAULT_PER_PAGE: u64 = 12;
/// Highest page whose row offset still fits a signed 64-bit SQL integer.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PER_PAGE;
const MAX_QUESTIONS: usize = 100;

fn default_points() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub content: String,
    #[validate(length(min = 2, max = 10, message = "must have between 2 and 10 options"))]
    pub options: Vec<String>,
    pub correct_indices: Vec<i64>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub points: i32,
    #[serde(default)]
    pub multi_select: bool,
}

/// Body of `POST /api/quizzes` and `PUT /api/quizzes/{id}`. On update,
/// omitting `questions` keeps the existing ones.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizInput {
    pub title: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_public: bool,
    #[validate(range(min = 10, max = 7200, message = "must be between 10 and 7200 seconds"))]
    pub time_limit_secs: Option<i32>,
    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

impl QuizInput {
    /// Run every authoring rule and report all failures at once.
    async fn check(&self, state: &AppState, require_questions: bool) -> Result<(), ApiError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        let title_len = self.title.trim().chars().count();
        if !(3..=200).contains(&title_len) {
            errors.push(FieldError::new("title", "must be between 3 and 200 characters"));
        }

        match &self.questions {
            Some(questions) => {
                if questions.is_empty() || questions.len() > MAX_QUESTIONS {
                    errors.push(FieldError::new("questions", "must contain between 1 and 100 questions"));
                }
                for (index, q) in questions.iter().enumerate() {
                    errors.extend(check_question(index, &q.options, &q.correct_indices, q.multi_select));
                }
            }
            None if require_questions => errors.push(FieldError::new("questions", "is required")),
            None => {}
        }

        if let Some(category_id) = self.category_id {
            if category::Query::find_by_id(&state.db, category_id).await?.is_none() {
                errors.push(FieldError::new("categoryId", "unknown category"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    fn into_parts(self) -> (QuizMeta, Option<Vec<QuestionDraft>>) {
        let meta = QuizMeta {
            title: self.title.trim().to_owned(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            category_id: self.category_id,
            is_public: self.is_public,
            time_limit_secs: self.time_limit_secs,
        };
        let questions = self.questions.map(|questions| {
            questions
                .into_iter()
                .map(|q| QuestionDraft {
                    content: q.content,
                    options: q.options,
                    // Checked non-negative and in range by `check`.
                    correct_indices: q.correct_indices.into_iter().map(|i| i as u32).collect(),
                    explanation: q.explanation.filter(|e| !e.trim().is_empty()),
                    points: q.points,
                    multi_select: q.multi_select,
                })
                .collect()
        });
        (meta, questions)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub is_public: bool,
    pub time_limit_secs: Option<i32>,
    pub play_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<quiz::Model> for QuizSummary {
    fn from(quiz: quiz::Model) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            category_id: quiz.category_id,
            owner_id: quiz.owner_id,
            is_public: quiz.is_public,
            time_limit_secs: quiz.time_limit_secs,
            play_count: quiz.play_count,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

/// A question as shown to a client. Answers are only filled in for the
/// quiz owner and administrators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub content: String,
    pub options: Vec<String>,
    pub points: i32,
    pub position: i32,
    pub multi_select: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_indices: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionView {
    pub fn build(model: question::Model, with_answers: bool) -> Result<Self, ApiError> {
        let options = model.option_list()?;
        let correct_indices = if with_answers {
            Some(model.correct_index_list()?)
        } else {
            None
        };
        Ok(Self {
            id: model.id,
            content: model.content,
            options,
            points: model.points,
            position: model.position,
            multi_select: model.multi_select,
            correct_indices,
            explanation: if with_answers { model.explanation } else { None },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: QuizSummary,
    pub questions: Vec<QuestionView>,
}

pub fn question_views(questions: Vec<question::Model>, with_answers: bool) -> Result<Vec<QuestionView>, ApiError> {
    questions
        .into_iter()
        .map(|q| QuestionView::build(q, with_answers))
        .collect()
}

/// Load a quiz the caller may see. Private quizzes of other users are
/// reported as missing.
pub async fn load_visible(state: &AppState, id: Uuid, viewer: &OptionalUser) -> Result<quiz::Model, ApiError> {
    let quiz = QuizQuery::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    if quiz.is_visible_to(viewer.user_id()) || viewer.is_admin() {
        Ok(quiz)
    } else {
        Err(ApiError::NotFound("quiz"))
    }
}

/// Load a quiz the caller may modify.
async fn load_owned(state: &AppState, id: Uuid, user: &CurrentUser) -> Result<quiz::Model, ApiError> {
    let quiz = QuizQuery::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    if quiz.owner_id == user.user.id || user.is_admin {
        return Ok(quiz);
    }
    if quiz.is_public {
        Err(ApiError::Forbidden)
    } else {
        Err(ApiError::NotFound("quiz"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverParams {
    pub category: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub sort: Sort,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPage {
    pub quizzes: Vec<QuizSummary>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<QuizPage>, ApiError> {
    let page = params.page.unwrap_or(1).clamp(1, MAX_PAGE);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

    let category_id = match params.category.as_deref().filter(|c| !c.is_empty()) {
        Some(slug) => match category::Query::find_by_slug(&state.db, slug).await? {
            Some(category) => Some(category.id),
            None => {
                return Ok(Json(QuizPage {
                    quizzes: Vec::new(),
                    page,
                    per_page,
                    total: 0,
                    total_pages: 0,
                }))
            }
        },
        None => None,
    };

    let filter = DiscoverFilter {
        category_id,
        search: params.q.map(|q| q.trim().to_owned()),
        sort: params.sort,
        page,
        per_page,
    };
    let (quizzes, total) = QuizQuery::discover(&state.db, &filter).await?;

    Ok(Json(QuizPage {
        quizzes: quizzes.into_iter().map(QuizSummary::from).collect(),
        page,
        per_page,
        total,
        total_pages: total.div_ceil(per_page),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<QuizInput>,
) -> Result<(StatusCode, Json<QuizDetail>), ApiError> {
    input.check(&state, true).await?;
    let (meta, questions) = input.into_parts();

    let (quiz, questions) = Mutation::create(&state.db, user.user.id, meta, questions.unwrap_or_default()).await?;
    tracing::info!(quiz_id = %quiz.id, owner_id = %user.user.id, questions = questions.len(), "Quiz created");

    Ok((
        StatusCode::CREATED,
        Json(QuizDetail {
            quiz: quiz.into(),
            questions: question_views(questions, true)?,
        }),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizDetail>, ApiError> {
    let quiz = load_visible(&state, id, &viewer).await?;
    let with_answers = viewer.user_id() == Some(quiz.owner_id) || viewer.is_admin();
    let questions = QuizQuery::questions(&state.db, quiz.id).await?;

    Ok(Json(QuizDetail {
        quiz: quiz.into(),
        questions: question_views(questions, with_answers)?,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<QuizInput>,
) -> Result<Json<QuizDetail>, ApiError> {
    let quiz = load_owned(&state, id, &user).await?;
    input.check(&state, false).await?;
    let (meta, questions) = input.into_parts();

    let quiz = Mutation::update(&state.db, quiz.id, meta, questions).await?;
    tracing::info!(quiz_id = %quiz.id, user_id = %user.user.id, "Quiz updated");
    let questions = QuizQuery::questions(&state.db, quiz.id).await?;

    Ok(Json(QuizDetail {
        quiz: quiz.into(),
        questions: question_views(questions, true)?,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let quiz = load_owned(&state, id, &user).await?;
    Mutation::delete(&state.db, quiz.id).await?;
    tracing::info!(quiz_id = %quiz.id, user_id = %user.user.id, "Quiz deleted");
    Ok(StatusCode::NO_CONTENT)
}
