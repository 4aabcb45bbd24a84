use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Zar,
    Usd,
    Eur,
    Gbp,
    Jpy,
}

/// An amount rendered in the requested display currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountView {
    /// Currency actually used; ZAR when no rate was known for the request.
    pub currency: Currency,
    pub amount_minor: i64,
    /// Formatted, e.g. `$5.00` or `-R1,234.50`.
    pub display: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query string accepted by endpoints that render amounts.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CurrencyQuery {
    pub currency: Option<Currency>,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUp {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignIn {
        pub email: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub username: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionView {
        /// Send back as `Authorization: Bearer <token>`.
        pub token: String,
        pub user: UserView,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        /// Defaults merged with the user's own categories.
        pub names: Vec<String>,
        /// Only the categories the user created.
        pub custom: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        /// Income minus expenses.
        pub total: AmountView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalsResponse {
        pub totals: Vec<CategoryTotalView>,
        pub balance: AmountView,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        #[default]
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Must be > 0, in ZAR cents. The kind defines the sign.
        pub amount_minor: i64,
        pub category: String,
        #[serde(default)]
        pub kind: TransactionKind,
        /// `dd/mm/yyyy`.
        pub date: String,
        /// `HH:MM`.
        pub start_time: String,
        /// `HH:MM`.
        pub end_time: String,
        pub description: Option<String>,
        /// Opaque reference to a photo stored elsewhere.
        pub photo_path: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        /// Inclusive lower bound on the entry date.
        pub from: Option<NaiveDate>,
        /// Inclusive upper bound on the entry date.
        pub to: Option<NaiveDate>,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub kind: TransactionKind,
        pub amount: AmountView,
        pub category: String,
        pub category_id: String,
        pub date: String,
        pub occurred_at: DateTime<Utc>,
        pub start_time: String,
        pub end_time: String,
        pub description: Option<String>,
        pub photo_path: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

pub mod goal {
    use super::*;
    use crate::transaction::TransactionKind;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        /// `mm/yyyy`.
        pub month: String,
        pub category: String,
        #[serde(default)]
        pub kind: TransactionKind,
        pub description: Option<String>,
        pub photo_path: Option<String>,
        pub min_goal_minor: i64,
        pub max_goal_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: String,
        pub month: String,
        pub category: String,
        pub category_id: String,
        pub kind: TransactionKind,
        pub description: Option<String>,
        pub photo_path: Option<String>,
        pub min_goal: AmountView,
        pub max_goal: AmountView,
        pub total_spent: AmountView,
        /// `Over Goal`, `Within Goal` or `Below Goal`.
        pub status: String,
        /// 0..=100
        pub progress_percent: u8,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalsResponse {
        pub goals: Vec<GoalView>,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Period {
        #[default]
        Week,
        Month,
        Custom,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub period: Option<Period>,
        /// Required with `custom`.
        pub from: Option<NaiveDate>,
        /// Required with `custom`.
        pub to: Option<NaiveDate>,
        pub currency: Option<Currency>,
    }

    /// Chart series; every vector is aligned with `labels`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub from: NaiveDate,
        pub to: NaiveDate,
        pub currency: Currency,
        pub labels: Vec<String>,
        pub expenses: Vec<AmountView>,
        pub incomes: Vec<AmountView>,
        /// `mm/yyyy` of the goals shown.
        pub target_month: String,
        pub min_goals: Vec<Option<AmountView>>,
        pub max_goals: Vec<Option<AmountView>>,
    }
}

pub mod deadline {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeadlineNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub notes: Option<String>,
        /// `dd/mm/yyyy`.
        pub start_date: String,
        /// `dd/mm/yyyy`.
        pub end_date: String,
        /// `HH:MM`, on the end date.
        pub remind_time: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeadlineView {
        pub id: String,
        pub title: String,
        pub amount: AmountView,
        pub category: String,
        pub notes: Option<String>,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub remind_at: DateTime<Utc>,
        pub notified: bool,
        /// Every day of the range, for calendar highlighting.
        pub days: Vec<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeadlinesResponse {
        pub deadlines: Vec<DeadlineView>,
    }
}

pub mod rates {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateView {
        pub currency: Currency,
        pub symbol: String,
        /// Multiplier from ZAR.
        pub rate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesResponse {
        pub base: Currency,
        pub rates: Vec<RateView>,
    }
}
