mod common;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement};

use engine::{
    Currency, EngineError, ExchangeRates, ExpenseFilter, GoalNew, GoalStatus, MoneyCents,
    ReportPeriod, TransactionKind,
};

use common::{engine_with_db, engine_with_user, entry};

fn food_goal(month: &str, min: &str, max: &str) -> GoalNew {
    GoalNew {
        month: month.to_string(),
        category: "Food".to_string(),
        kind: TransactionKind::Expense,
        min_goal: min.parse().unwrap(),
        max_goal: max.parse().unwrap(),
        ..GoalNew::default()
    }
}

#[tokio::test]
async fn goal_requires_min_below_max() {
    let (engine, user) = engine_with_user().await;
    assert!(matches!(
        engine.create_goal(&user.id, food_goal("06/2025", "500", "500")).await,
        Err(EngineError::InvalidGoal(_))
    ));
    assert!(matches!(
        engine.create_goal(&user.id, food_goal("06/2025", "600", "500")).await,
        Err(EngineError::InvalidGoal(_))
    ));
    assert!(matches!(
        engine.create_goal(&user.id, food_goal("2025-06", "1", "2")).await,
        Err(EngineError::InvalidDate(_))
    ));
    assert!(matches!(
        engine.create_goal(&user.id, food_goal("", "1", "2")).await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn goal_month_is_normalized() {
    let (engine, user) = engine_with_user().await;
    let goal = engine
        .create_goal(&user.id, food_goal("6/2025", "100", "500"))
        .await
        .unwrap();
    assert_eq!(goal.month, "06/2025");
    assert_eq!(goal.category_id, "Food");
    assert_eq!(engine.list_goals(&user.id).await.unwrap(), vec![goal]);
}

#[tokio::test]
async fn goal_items_track_monthly_spending() {
    let (engine, user) = engine_with_user().await;
    engine
        .create_goal(&user.id, food_goal("06/2025", "100", "500"))
        .await
        .unwrap();
    for (amount, date) in [("350", "03/06/2025"), ("250", "20/06/2025"), ("999", "01/07/2025")] {
        engine
            .create_expense(&user.id, entry("Food", TransactionKind::Expense, amount, date))
            .await
            .unwrap();
    }

    let items = engine.goal_items(&user.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].total_spent, MoneyCents::new(60_000));
    assert_eq!(items[0].status(), GoalStatus::OverGoal);
    assert_eq!(items[0].progress_percent(), 100);
}

#[tokio::test]
async fn category_totals_and_balance_are_signed() {
    let (engine, user) = engine_with_user().await;
    engine
        .create_expense(&user.id, entry("Food", TransactionKind::Expense, "50", "01/06/2025"))
        .await
        .unwrap();
    engine
        .create_expense(&user.id, entry("Food", TransactionKind::Income, "20", "02/06/2025"))
        .await
        .unwrap();

    let totals = engine
        .category_totals(&user.id, &ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].category, "Food");
    assert_eq!(totals[0].total, MoneyCents::new(-3000));
    assert_eq!(engine.balance(&user.id).await.unwrap(), MoneyCents::new(-3000));
}

#[tokio::test]
async fn period_report_uses_goals_of_the_last_month() {
    let (engine, user) = engine_with_user().await;
    engine
        .create_goal(&user.id, food_goal("06/2025", "100", "500"))
        .await
        .unwrap();
    engine
        .create_expense(&user.id, entry("Food", TransactionKind::Expense, "100", "28/06/2025"))
        .await
        .unwrap();
    engine
        .create_expense(&user.id, entry("Food", TransactionKind::Expense, "100", "01/06/2025"))
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let rates = ExchangeRates::from_codes([("USD", 0.05)]);
    let report = engine
        .period_report(&user.id, ReportPeriod::Week, today, &rates, Currency::Usd)
        .await
        .unwrap();

    assert_eq!(report.labels, vec!["Food"]);
    assert_eq!(report.expenses[0].amount, MoneyCents::new(500));
    assert_eq!(report.expenses[0].to_string(), "$5.00");
    assert_eq!(report.max_goals[0].map(|g| g.amount), Some(MoneyCents::new(2500)));
}

#[tokio::test]
async fn goal_and_entries_share_normalized_category() {
    let (engine, user) = engine_with_user().await;
    let mut goal = food_goal("06/2025", "100", "500");
    goal.category = " Eating  Out".to_string();
    let goal = engine.create_goal(&user.id, goal).await.unwrap();
    assert_eq!(goal.category, "Eating Out");

    for (category, amount) in [("Eating Out", "100"), ("Eating   Out ", "50")] {
        let expense = engine
            .create_expense(&user.id, entry(category, TransactionKind::Expense, amount, "03/06/2025"))
            .await
            .unwrap();
        assert_eq!(expense.category, "Eating Out");
    }

    let items = engine.goal_items(&user.id).await.unwrap();
    assert_eq!(items[0].total_spent, MoneyCents::new(15_000));
    assert_eq!(items[0].status(), GoalStatus::WithinGoal);
}

#[tokio::test]
async fn oversized_amounts_never_reach_totals() {
    let (engine, db) = engine_with_db().await;
    let user = engine
        .sign_up("alice", "alice@example.com", "password")
        .await
        .unwrap();
    let huge = i64::MAX / 2 + 10;

    let mut income = entry("Food", TransactionKind::Income, "1", "01/06/2025");
    income.amount = MoneyCents::new(huge);
    assert!(matches!(
        engine.create_expense(&user.id, income).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let mut goal = food_goal("06/2025", "1", "2");
    goal.max_goal = MoneyCents::new(huge);
    assert!(matches!(
        engine.create_goal(&user.id, goal).await,
        Err(EngineError::InvalidAmount(_))
    ));

    // Rows stored without the entry bound still sum safely.
    for _ in 0..2 {
        let expense = engine
            .create_expense(&user.id, entry("Food", TransactionKind::Income, "1", "01/06/2025"))
            .await
            .unwrap();
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "UPDATE expenses SET amount_minor = ? WHERE id = ?",
            vec![huge.into(), expense.id.into()],
        ))
        .await
        .unwrap();
    }

    assert!(matches!(
        engine
            .category_totals(&user.id, &ExpenseFilter::default())
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.balance(&user.id).await,
        Err(EngineError::InvalidAmount(_))
    ));
}
