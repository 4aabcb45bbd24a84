//! Monthly budget goals.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, TransactionKind};

/// A min/max target for one category in one month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    /// `mm/yyyy`.
    pub month: String,
    pub category: String,
    pub category_id: String,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub min_goal: MoneyCents,
    pub max_goal: MoneyCents,
    pub created_at: DateTime<Utc>,
}

/// Input for [`Engine::create_goal`](crate::Engine::create_goal).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalNew {
    pub month: String,
    pub category: String,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub min_goal: MoneyCents,
    pub max_goal: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub month: String,
    pub category: String,
    pub category_id: String,
    pub kind: String,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub min_goal_minor: i64,
    pub max_goal_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            kind: TransactionKind::try_from(model.kind.as_str())?,
            id: model.id,
            user_id: model.user_id,
            month: model.month,
            category: model.category,
            category_id: model.category_id,
            description: model.description,
            photo_path: model.photo_path,
            min_goal: MoneyCents::new(model.min_goal_minor),
            max_goal: MoneyCents::new(model.max_goal_minor),
            created_at: model.created_at,
        })
    }
}
