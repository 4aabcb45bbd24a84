use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BudgetMonth, EngineError, Goal, GoalItem, GoalNew, ResultEngine, goals, reports,
    util::{
        normalize_category_display, normalize_optional_text, normalize_required_name,
        require_at_most_entry,
    },
};

use super::{Engine, ExpenseFilter, categories::lookup_category_id, new_id, with_tx};

impl Engine {
    /// Sets a monthly budget goal.
    ///
    /// The month must read as `mm/yyyy` and `min_goal` must be strictly below
    /// `max_goal`.
    pub async fn create_goal(&self, user_id: &str, new: GoalNew) -> ResultEngine<Goal> {
        let month = normalize_required_name(&new.month, "month")?;
        let month = BudgetMonth::parse(&month)?;
        let category = normalize_category_display(&new.category)?;
        if new.min_goal.is_negative() {
            return Err(EngineError::InvalidAmount(
                "min goal must be >= 0".to_string(),
            ));
        }
        require_at_most_entry(new.max_goal, "max goal")?;
        if new.min_goal >= new.max_goal {
            return Err(EngineError::InvalidGoal(format!(
                "min goal ({}) must be less than max goal ({})",
                new.min_goal, new.max_goal
            )));
        }

        with_tx!(self, |db_tx| {
            let category_id = lookup_category_id(&db_tx, user_id, &category).await?;
            let model = goals::ActiveModel {
                id: ActiveValue::Set(new_id()),
                user_id: ActiveValue::Set(user_id.to_string()),
                month: ActiveValue::Set(month.to_string()),
                category: ActiveValue::Set(category),
                category_id: ActiveValue::Set(category_id),
                kind: ActiveValue::Set(new.kind.as_str().to_string()),
                description: ActiveValue::Set(normalize_optional_text(new.description.as_deref())),
                photo_path: ActiveValue::Set(normalize_optional_text(new.photo_path.as_deref())),
                min_goal_minor: ActiveValue::Set(new.min_goal.cents()),
                max_goal_minor: ActiveValue::Set(new.max_goal.cents()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(goal_id = %model.id, month = %model.month, "goal created");
            Goal::try_from(model)
        })
    }

    /// Goals of `user_id` in creation order.
    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<Goal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::CreatedAt)
            .order_by_asc(goals::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Goal::try_from).collect()
    }

    /// Every goal with its progress over all of the user's entries.
    pub async fn goal_items(&self, user_id: &str) -> ResultEngine<Vec<GoalItem>> {
        let goals = self.list_goals(user_id).await?;
        let expenses = self
            .list_expenses(user_id, &ExpenseFilter::default())
            .await?;
        reports::goal_items(&goals, &expenses)
    }
}
