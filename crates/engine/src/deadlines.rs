//! Calendar deadlines with a single reminder each.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{MoneyCents, dates};

pub const REMINDER_TITLE: &str = "Budget Reminder";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount: MoneyCents,
    pub category: String,
    pub notes: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub remind_time: NaiveTime,
    /// `end_date` at `remind_time`, UTC.
    pub remind_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Deadline {
    /// Every day covered by the deadline, both ends included.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        dates::days_between(self.start_date, self.end_date)
    }

    #[must_use]
    pub fn reminder_message(&self) -> String {
        format!("Deadline: {} is due today.", self.title)
    }
}

/// Input for [`Engine::create_deadline`](crate::Engine::create_deadline).
///
/// Dates use `dd/mm/yyyy` and the reminder time `HH:MM`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeadlineNew {
    pub title: String,
    pub amount: MoneyCents,
    pub category: String,
    pub notes: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub remind_time: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deadlines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub notes: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub remind_time: Time,
    pub remind_at: DateTimeUtc,
    pub notified_at: Option<DateTimeUtc>,
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

impl From<Model> for Deadline {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            notes: model.notes,
            start_date: model.start_date,
            end_date: model.end_date,
            remind_time: model.remind_time,
            remind_at: model.remind_at,
            notified_at: model.notified_at,
            created_at: model.created_at,
        }
    }
}
