use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Deadline, DeadlineNew, EngineError, ResultEngine, dates, deadlines,
    util::{
        normalize_category_display, normalize_optional_text, normalize_required_name,
        require_positive,
    },
};

use super::{Engine, new_id, with_tx};

impl Engine {
    /// Creates a deadline and schedules its reminder at the end date.
    ///
    /// A range given backwards is swapped.
    pub async fn create_deadline(
        &self,
        user_id: &str,
        new: DeadlineNew,
    ) -> ResultEngine<Deadline> {
        let title = normalize_required_name(&new.title, "title")?;
        let category = normalize_category_display(&new.category)?;
        require_positive(new.amount, "amount")?;
        let mut start_date = dates::parse_entry_date(&new.start_date)?;
        let mut end_date = dates::parse_entry_date(&new.end_date)?;
        if start_date > end_date {
            std::mem::swap(&mut start_date, &mut end_date);
        }
        let remind_time = dates::parse_time(&new.remind_time)?;
        let remind_at = end_date.and_time(remind_time).and_utc();

        with_tx!(self, |db_tx| {
            let model = deadlines::ActiveModel {
                id: ActiveValue::Set(new_id()),
                user_id: ActiveValue::Set(user_id.to_string()),
                title: ActiveValue::Set(title),
                amount_minor: ActiveValue::Set(new.amount.cents()),
                category: ActiveValue::Set(category),
                notes: ActiveValue::Set(normalize_optional_text(new.notes.as_deref())),
                start_date: ActiveValue::Set(start_date),
                end_date: ActiveValue::Set(end_date),
                remind_time: ActiveValue::Set(remind_time),
                remind_at: ActiveValue::Set(remind_at),
                notified_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(deadline_id = %model.id, %remind_at, "deadline scheduled");
            Ok(Deadline::from(model))
        })
    }

    /// Deadlines of `user_id`, soonest first.
    pub async fn list_deadlines(&self, user_id: &str) -> ResultEngine<Vec<Deadline>> {
        let models = deadlines::Entity::find()
            .filter(deadlines::Column::UserId.eq(user_id))
            .order_by_asc(deadlines::Column::StartDate)
            .order_by_asc(deadlines::Column::RemindAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Deadline::from).collect())
    }

    /// Deadlines of every user whose reminder is due and not yet delivered.
    pub async fn due_deadlines(&self, now: DateTime<Utc>) -> ResultEngine<Vec<Deadline>> {
        let models = deadlines::Entity::find()
            .filter(deadlines::Column::NotifiedAt.is_null())
            .filter(deadlines::Column::RemindAt.lte(now))
            .order_by_asc(deadlines::Column::RemindAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Deadline::from).collect())
    }

    /// Records that the reminder of `deadline_id` went out.
    pub async fn mark_notified(&self, deadline_id: &str, at: DateTime<Utc>) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = deadlines::Entity::find_by_id(deadline_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(deadline_id.to_string()))?;
            let mut active: deadlines::ActiveModel = model.into();
            active.notified_at = ActiveValue::Set(Some(at));
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
