//! Expense and income entries.
//!
//! Both kinds share the `expenses` table; `kind` tells them apart. The
//! amount is always stored positive, the sign comes from the kind.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, dates};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidName(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: MoneyCents,
    pub category: String,
    /// Id of the user category with the same name, or the name itself.
    pub category_id: String,
    pub kind: TransactionKind,
    /// `dd/mm/yyyy`, as entered.
    pub date: String,
    pub occurred_at: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Amount with the sign of its kind: income adds, expense subtracts.
    #[must_use]
    pub fn signed_amount(&self) -> MoneyCents {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The entry date, logging when it cannot be read.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        match dates::parse_entry_date(&self.date) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::warn!(expense_id = %self.id, date = %self.date, "skipping expense: {err}");
                None
            }
        }
    }
}

/// Input for [`Engine::create_expense`](crate::Engine::create_expense).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseNew {
    pub amount: MoneyCents,
    pub category: String,
    pub kind: TransactionKind,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub photo_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub category_id: String,
    pub kind: String,
    pub date: String,
    pub occurred_at: DateTimeUtc,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub photo_path: Option<String>,
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

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            kind: TransactionKind::try_from(model.kind.as_str())?,
            id: model.id,
            user_id: model.user_id,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            category_id: model.category_id,
            date: model.date,
            occurred_at: model.occurred_at,
            start_time: model.start_time,
            end_time: model.end_time,
            description: model.description,
            photo_path: model.photo_path,
            created_at: model.created_at,
        })
    }
}
