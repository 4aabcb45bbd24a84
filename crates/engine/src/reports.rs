//! Budget aggregation.
//!
//! Everything here is pure: functions take already loaded goals and
//! expenses and never touch the database. The `Engine` methods in
//! `ops::reports` load the rows and delegate here.
//!
//! Entry dates and goal months that cannot be parsed never abort an
//! aggregation. They are logged and the row is left out.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    BudgetMonth, Currency, DisplayAmount, EngineError, ExchangeRates, Expense, Goal, MoneyCents,
    ResultEngine, TransactionKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    OverGoal,
    WithinGoal,
    BelowGoal,
}

impl GoalStatus {
    /// Classifies `total` against the goal thresholds.
    ///
    /// Income goals are never "over": earning more than the maximum still
    /// counts as within.
    #[must_use]
    pub fn evaluate(
        kind: TransactionKind,
        total: MoneyCents,
        min: MoneyCents,
        max: MoneyCents,
    ) -> Self {
        match kind {
            TransactionKind::Expense if total > max => Self::OverGoal,
            TransactionKind::Expense | TransactionKind::Income if total >= min => Self::WithinGoal,
            _ => Self::BelowGoal,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OverGoal => "Over Goal",
            Self::WithinGoal => "Within Goal",
            Self::BelowGoal => "Below Goal",
        }
    }
}

/// A goal paired with what was actually spent (or earned) against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalItem {
    pub goal: Goal,
    pub total_spent: MoneyCents,
}

impl GoalItem {
    #[must_use]
    pub fn status(&self) -> GoalStatus {
        GoalStatus::evaluate(
            self.goal.kind,
            self.total_spent,
            self.goal.min_goal,
            self.goal.max_goal,
        )
    }

    /// Share of the maximum reached, in `0.0..=1.0`.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        let max = self.goal.max_goal;
        if !max.is_positive() {
            return 0.0;
        }
        let clamped = self.total_spent.clamp(MoneyCents::ZERO, max);
        clamped.ratio(max)
    }

    /// [`Self::progress_fraction`] as a whole percentage, truncated.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        (self.progress_fraction() * 100.0).floor().clamp(0.0, 100.0) as u8
    }
}

/// Sum of the entries matching the goal's category, kind and month.
pub fn goal_total_spent(goal: &Goal, expenses: &[Expense]) -> ResultEngine<MoneyCents> {
    let month = match BudgetMonth::parse(&goal.month) {
        Ok(month) => month,
        Err(err) => {
            tracing::warn!(goal_id = %goal.id, month = %goal.month, "goal month unreadable: {err}");
            return Ok(MoneyCents::ZERO);
        }
    };

    MoneyCents::checked_sum(
        expenses
            .iter()
            .filter(|e| e.category == goal.category && e.kind == goal.kind)
            .filter(|e| e.parsed_date().is_some_and(|date| month.contains(date)))
            .map(|e| e.amount),
    )
}

/// One [`GoalItem`] per goal, in the order the goals were given.
pub fn goal_items(goals: &[Goal], expenses: &[Expense]) -> ResultEngine<Vec<GoalItem>> {
    goals
        .iter()
        .map(|goal| {
            Ok(GoalItem {
                total_spent: goal_total_spent(goal, expenses)?,
                goal: goal.clone(),
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Income minus expenses.
    pub total: MoneyCents,
}

/// Adds `amount` to the running total of `key`.
fn accumulate<'a>(
    totals: &mut BTreeMap<&'a str, MoneyCents>,
    key: &'a str,
    amount: MoneyCents,
) -> ResultEngine<()> {
    let total = totals.entry(key).or_default();
    *total = MoneyCents::checked_sum([*total, amount])?;
    Ok(())
}

/// Signed total per category, ordered by category name.
pub fn category_totals(expenses: &[Expense]) -> ResultEngine<Vec<CategoryTotal>> {
    let mut totals: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    for expense in expenses {
        accumulate(&mut totals, &expense.category, expense.signed_amount())?;
    }
    Ok(totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect())
}

/// Income minus expenses over every entry.
pub fn balance(expenses: &[Expense]) -> ResultEngine<MoneyCents> {
    MoneyCents::checked_sum(expenses.iter().map(Expense::signed_amount))
}

/// Date range of a report, relative to `today` except for `Custom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Week,
    Month,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl ReportPeriod {
    /// Inclusive `(from, to)` dates.
    pub fn range(self, today: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
        let invalid = || EngineError::InvalidDate("report range out of bounds".to_string());
        match self {
            Self::Week => {
                let from = today.checked_sub_days(Days::new(7)).ok_or_else(invalid)?;
                Ok((from, today))
            }
            Self::Month => {
                let from = today.checked_sub_months(Months::new(1)).ok_or_else(invalid)?;
                Ok((from, today))
            }
            Self::Custom { from, to } if from > to => Err(EngineError::InvalidDate(format!(
                "report range starts after it ends: {from} > {to}"
            ))),
            Self::Custom { from, to } => Ok((from, to)),
        }
    }
}

/// Chart-ready series for one period.
///
/// Every vector is aligned with `labels`. `currency` is the one amounts
/// were rendered in, which falls back to ZAR without a rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub currency: Currency,
    pub labels: Vec<String>,
    pub expenses: Vec<DisplayAmount>,
    pub incomes: Vec<DisplayAmount>,
    /// Goals are taken from the month the range ends in.
    pub target_month: BudgetMonth,
    pub min_goals: Vec<Option<DisplayAmount>>,
    pub max_goals: Vec<Option<DisplayAmount>>,
}

pub fn period_report(
    period: ReportPeriod,
    today: NaiveDate,
    expenses: &[Expense],
    goals: &[Goal],
    rates: &ExchangeRates,
    currency: Currency,
) -> ResultEngine<PeriodReport> {
    let (from, to) = period.range(today)?;

    let mut spent: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    let mut earned: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    for expense in expenses {
        let Some(date) = expense.parsed_date() else {
            continue;
        };
        if date < from || date > to {
            continue;
        }
        let bucket = match expense.kind {
            TransactionKind::Expense => &mut spent,
            TransactionKind::Income => &mut earned,
        };
        accumulate(bucket, &expense.category, expense.amount)?;
    }

    let labels: BTreeSet<&str> = spent.keys().chain(earned.keys()).copied().collect();
    let target_month = BudgetMonth::of(to);

    let mut min_by_category: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    let mut max_by_category: BTreeMap<&str, MoneyCents> = BTreeMap::new();
    for goal in goals {
        match BudgetMonth::parse(&goal.month) {
            Ok(month) if month == target_month => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(goal_id = %goal.id, "skipping goal: {err}");
                continue;
            }
        }
        if !labels.contains(goal.category.as_str()) {
            continue;
        }
        min_by_category.insert(goal.category.as_str(), goal.min_goal);
        max_by_category.insert(goal.category.as_str(), goal.max_goal);
    }

    let amount_for = |map: &BTreeMap<&str, MoneyCents>, label: &str| {
        rates.convert(map.get(label).copied().unwrap_or_default(), currency)
    };
    let goal_for = |map: &BTreeMap<&str, MoneyCents>, label: &str| {
        map.get(label).map(|amount| rates.convert(*amount, currency))
    };

    Ok(PeriodReport {
        from,
        to,
        currency: rates.display_currency(currency),
        expenses: labels.iter().map(|l| amount_for(&spent, l)).collect(),
        incomes: labels.iter().map(|l| amount_for(&earned, l)).collect(),
        min_goals: labels.iter().map(|l| goal_for(&min_by_category, l)).collect(),
        max_goals: labels.iter().map(|l| goal_for(&max_by_category, l)).collect(),
        labels: labels.into_iter().map(ToString::to_string).collect(),
        target_month,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn zar(amount: i64) -> MoneyCents {
        MoneyCents::new(amount * 100)
    }

    fn entry(category: &str, kind: TransactionKind, amount: i64, date: &str) -> Expense {
        let created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        Expense {
            id: format!("{category}-{date}-{amount}"),
            user_id: "u1".to_string(),
            amount: zar(amount),
            category: category.to_string(),
            category_id: category.to_string(),
            kind,
            date: date.to_string(),
            occurred_at: created_at,
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            description: None,
            photo_path: None,
            created_at,
        }
    }

    fn goal(category: &str, kind: TransactionKind, month: &str, min: i64, max: i64) -> Goal {
        Goal {
            id: format!("{category}-{month}"),
            user_id: "u1".to_string(),
            month: month.to_string(),
            category: category.to_string(),
            category_id: category.to_string(),
            kind,
            description: None,
            photo_path: None,
            min_goal: zar(min),
            max_goal: zar(max),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expense_goal_status_follows_thresholds() {
        let kind = TransactionKind::Expense;
        let (min, max) = (zar(100), zar(500));
        assert_eq!(GoalStatus::evaluate(kind, zar(600), min, max), GoalStatus::OverGoal);
        assert_eq!(GoalStatus::evaluate(kind, zar(300), min, max), GoalStatus::WithinGoal);
        assert_eq!(GoalStatus::evaluate(kind, zar(50), min, max), GoalStatus::BelowGoal);
        assert_eq!(GoalStatus::evaluate(kind, zar(500), min, max), GoalStatus::WithinGoal);
        assert_eq!(GoalStatus::OverGoal.label(), "Over Goal");
    }

    #[test]
    fn income_goal_is_never_over() {
        let kind = TransactionKind::Income;
        let (min, max) = (zar(100), zar(500));
        assert_eq!(GoalStatus::evaluate(kind, zar(900), min, max), GoalStatus::WithinGoal);
        assert_eq!(GoalStatus::evaluate(kind, zar(99), min, max), GoalStatus::BelowGoal);
    }

    #[test]
    fn goal_month_bounds_are_respected() {
        let g = goal("Food", TransactionKind::Expense, "06/2025", 100, 500);
        let expenses = vec![
            entry("Food", TransactionKind::Expense, 40, "15/06/2025"),
            entry("Food", TransactionKind::Expense, 70, "01/07/2025"),
            entry("Food", TransactionKind::Expense, 5, "31/05/2025"),
        ];
        assert_eq!(goal_total_spent(&g, &expenses).unwrap(), zar(40));
    }

    #[test]
    fn goal_total_matches_category_and_kind_only() {
        let g = goal("Food", TransactionKind::Expense, "06/2025", 100, 500);
        let expenses = vec![
            entry("Food", TransactionKind::Expense, 40, "02/06/2025"),
            entry("Food", TransactionKind::Income, 1000, "03/06/2025"),
            entry("Bills", TransactionKind::Expense, 300, "04/06/2025"),
            entry("Food", TransactionKind::Expense, 60, "05/06/2025"),
        ];
        assert_eq!(goal_total_spent(&g, &expenses).unwrap(), zar(100));
    }

    #[test]
    fn unreadable_dates_are_skipped() {
        let bad_goal = goal("Food", TransactionKind::Expense, "June", 100, 500);
        let expenses = vec![
            entry("Food", TransactionKind::Expense, 40, "02/06/2025"),
            entry("Food", TransactionKind::Expense, 60, "2025-06-05"),
        ];
        assert_eq!(goal_total_spent(&bad_goal, &expenses).unwrap(), MoneyCents::ZERO);

        let good = goal("Food", TransactionKind::Expense, "06/2025", 100, 500);
        assert_eq!(goal_total_spent(&good, &expenses).unwrap(), zar(40));
    }

    #[test]
    fn progress_is_zero_without_max() {
        let item = GoalItem {
            goal: goal("Food", TransactionKind::Expense, "06/2025", 0, 0),
            total_spent: zar(10),
        };
        assert_eq!(item.progress_fraction(), 0.0);
        assert_eq!(item.progress_percent(), 0);
    }

    #[test]
    fn progress_is_clamped_and_truncated() {
        let mut item = GoalItem {
            goal: goal("Food", TransactionKind::Expense, "06/2025", 100, 300),
            total_spent: zar(100),
        };
        assert_eq!(item.progress_percent(), 33);
        item.total_spent = zar(900);
        assert_eq!(item.progress_fraction(), 1.0);
        assert_eq!(item.progress_percent(), 100);
        item.total_spent = zar(-50);
        assert_eq!(item.progress_percent(), 0);
    }

    #[test]
    fn goal_items_keep_goal_order() {
        let goals = vec![
            goal("Food", TransactionKind::Expense, "06/2025", 100, 500),
            goal("Salary", TransactionKind::Income, "06/2025", 1000, 2000),
        ];
        let expenses = vec![
            entry("Salary", TransactionKind::Income, 1500, "25/06/2025"),
            entry("Food", TransactionKind::Expense, 600, "10/06/2025"),
        ];
        let items = goal_items(&goals, &expenses).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].goal.category, "Food");
        assert_eq!(items[0].status(), GoalStatus::OverGoal);
        assert_eq!(items[1].total_spent, zar(1500));
        assert_eq!(items[1].status(), GoalStatus::WithinGoal);
    }

    #[test]
    fn category_totals_are_signed() {
        let expenses = vec![
            entry("Food", TransactionKind::Expense, 50, "01/06/2025"),
            entry("Food", TransactionKind::Income, 20, "02/06/2025"),
            entry("Bills", TransactionKind::Expense, 10, "03/06/2025"),
        ];
        let totals = category_totals(&expenses).unwrap();
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Bills".to_string(),
                    total: zar(-10)
                },
                CategoryTotal {
                    category: "Food".to_string(),
                    total: zar(-30)
                },
            ]
        );
        assert_eq!(balance(&expenses).unwrap(), zar(-40));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let huge = |kind| {
            let mut e = entry("Food", kind, 0, "01/06/2025");
            e.amount = MoneyCents::new(i64::MAX / 2 + 10);
            e
        };
        let incomes = vec![
            huge(TransactionKind::Income),
            huge(TransactionKind::Income),
        ];
        assert!(matches!(
            category_totals(&incomes),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(balance(&incomes), Err(EngineError::InvalidAmount(_))));

        let g = goal("Food", TransactionKind::Income, "06/2025", 1, 2);
        assert!(goal_total_spent(&g, &incomes).is_err());
    }

    #[test]
    fn report_ranges_are_relative_to_today() {
        let today = date(2025, 3, 31);
        assert_eq!(ReportPeriod::Week.range(today).unwrap(), (date(2025, 3, 24), today));
        assert_eq!(ReportPeriod::Month.range(today).unwrap(), (date(2025, 2, 28), today));
        let reversed = ReportPeriod::Custom {
            from: date(2025, 3, 2),
            to: date(2025, 3, 1),
        };
        assert!(reversed.range(today).is_err());
    }

    #[test]
    fn period_report_splits_and_converts() {
        let expenses = vec![
            entry("Food", TransactionKind::Expense, 100, "10/06/2025"),
            entry("Food", TransactionKind::Expense, 50, "30/06/2025"),
            entry("Salary", TransactionKind::Income, 1000, "01/06/2025"),
            entry("Bills", TransactionKind::Expense, 999, "31/05/2025"),
            entry("Bills", TransactionKind::Expense, 1, "not a date"),
        ];
        let goals = vec![
            goal("Food", TransactionKind::Expense, "06/2025", 10, 20),
            goal("Food", TransactionKind::Expense, "06/2025", 50, 200),
            goal("Food", TransactionKind::Expense, "05/2025", 1, 2),
            goal("Transport", TransactionKind::Expense, "06/2025", 1, 2),
        ];
        let rates = ExchangeRates::from_codes([("USD", 0.05)]);
        let period = ReportPeriod::Custom {
            from: date(2025, 6, 1),
            to: date(2025, 6, 30),
        };

        let report = period_report(
            period,
            date(2025, 7, 15),
            &expenses,
            &goals,
            &rates,
            Currency::Usd,
        )
        .unwrap();

        assert_eq!(report.labels, vec!["Food", "Salary"]);
        assert_eq!(report.target_month, BudgetMonth::new(2025, 6).unwrap());
        let dollars = |cents| DisplayAmount {
            currency: Currency::Usd,
            amount: MoneyCents::new(cents),
        };
        assert_eq!(report.expenses, vec![dollars(750), dollars(0)]);
        assert_eq!(report.incomes, vec![dollars(0), dollars(5000)]);
        assert_eq!(report.min_goals, vec![Some(dollars(250)), None]);
        assert_eq!(report.max_goals, vec![Some(dollars(1000)), None]);
        assert_eq!(report.currency, Currency::Usd);
    }

    #[test]
    fn period_report_names_base_currency_without_rate() {
        let expenses = vec![entry("Food", TransactionKind::Expense, 100, "10/06/2025")];
        let rates = ExchangeRates::from_codes([("USD", 0.05)]);

        let report = period_report(
            ReportPeriod::Week,
            date(2025, 6, 12),
            &expenses,
            &[],
            &rates,
            Currency::Eur,
        )
        .unwrap();

        assert_eq!(report.currency, Currency::Zar);
        assert_eq!(report.expenses[0].currency, Currency::Zar);
        assert_eq!(report.expenses[0].amount, zar(100));
    }
}
