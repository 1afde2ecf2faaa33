use sea_orm::entity::prelude::*;

/// A quiz question.
///
/// `options` and `correct_indices` are JSON encoded lists so the same schema
/// works on every backend. Use [`Model::option_list`] and
/// [`Model::correct_index_list`] to decode them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quiz_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub options: String,
    pub correct_indices: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,
    pub points: i32,
    pub position: i32,
    pub multi_select: bool,
}

impl Model {
    pub fn option_list(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.options)
    }

    pub fn correct_index_list(&self) -> Result<Vec<u32>, serde_json::Error> {
        serde_json::from_str(&self.correct_indices)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz::Entity",
        from = "Column::QuizId",
        to = "super::quiz::Column::Id",
        on_delete = "Cascade"
    )]
    Quiz,
}

impl Related<super::quiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
