//! Cashify engine: domain types, persistence and budget aggregation.
//!
//! All state lives in the database behind [`Engine`]. Pure computations
//! (goal progress, category totals, period reports) are in [`reports`] and
//! can be used without a database.

pub use categories::{Category, DEFAULT_CATEGORIES};
pub use currency::{Currency, DisplayAmount, ExchangeRates};
pub use dates::BudgetMonth;
pub use deadlines::{Deadline, DeadlineNew, REMINDER_TITLE};
pub use error::EngineError;
pub use goals::{Goal, GoalNew};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, ExpenseFilter};
pub use reports::{CategoryTotal, GoalItem, GoalStatus, PeriodReport, ReportPeriod};
pub use transactions::{Expense, ExpenseNew, TransactionKind};
pub use users::{Session, User};

mod categories;
mod currency;
pub mod dates;
mod deadlines;
mod error;
mod goals;
mod money;
mod ops;
mod password;
pub mod reports;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
