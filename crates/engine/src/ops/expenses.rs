use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Expense, ExpenseNew, ResultEngine, TransactionKind, dates, transactions,
    util::{
        normalize_category_display, normalize_optional_text, normalize_required_name,
        require_positive,
    },
};

use super::{Engine, categories::lookup_category_id, new_id, with_tx};

/// Filters for listing expenses.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC and
/// compared against `occurred_at`.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ExpenseFilter {
    fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from >= to
        {
            return Err(EngineError::InvalidDate(
                "invalid range: from must be < to".to_string(),
            ));
        }
        Ok(())
    }
}

trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_expense_filters(self, user_id: &str, filter: &ExpenseFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_expense_filters(mut self, user_id: &str, filter: &ExpenseFilter) -> Self {
        self = self.filter(transactions::Column::UserId.eq(user_id));
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category) = &filter.category {
            self = self.filter(transactions::Column::Category.eq(category.trim()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ExpensesCursor {
    occurred_at: DateTime<Utc>,
    expense_id: String,
}

impl ExpensesCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))
    }
}

impl Engine {
    /// Records an income or expense entry.
    ///
    /// `date` is kept as entered. When it is not a valid `dd/mm/yyyy` the
    /// entry is still saved and dated at today's midnight.
    pub async fn create_expense(&self, user_id: &str, new: ExpenseNew) -> ResultEngine<Expense> {
        require_positive(new.amount, "amount")?;
        let category = normalize_category_display(&new.category)?;
        let date = normalize_required_name(&new.date, "date")?;
        let start_time = dates::parse_time(&new.start_time)?;
        let end_time = dates::parse_time(&new.end_time)?;

        let now = Utc::now();
        let occurred_at = match dates::parse_entry_date(&date) {
            Ok(day) => dates::midnight_utc(day),
            Err(err) => {
                tracing::warn!(user_id, date = %date, "storing expense with today's date: {err}");
                dates::midnight_utc(now.date_naive())
            }
        };

        with_tx!(self, |db_tx| {
            let category_id = lookup_category_id(&db_tx, user_id, &category).await?;
            let model = transactions::ActiveModel {
                id: ActiveValue::Set(new_id()),
                user_id: ActiveValue::Set(user_id.to_string()),
                amount_minor: ActiveValue::Set(new.amount.cents()),
                category: ActiveValue::Set(category),
                category_id: ActiveValue::Set(category_id),
                kind: ActiveValue::Set(new.kind.as_str().to_string()),
                date: ActiveValue::Set(date),
                occurred_at: ActiveValue::Set(occurred_at),
                start_time: ActiveValue::Set(start_time.format(dates::TIME_FORMAT).to_string()),
                end_time: ActiveValue::Set(end_time.format(dates::TIME_FORMAT).to_string()),
                description: ActiveValue::Set(normalize_optional_text(new.description.as_deref())),
                photo_path: ActiveValue::Set(normalize_optional_text(new.photo_path.as_deref())),
                created_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(expense_id = %model.id, kind = %model.kind, "expense recorded");
            Expense::try_from(model)
        })
    }

    /// Every entry of `user_id` matching `filter`, newest first.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        filter: &ExpenseFilter,
    ) -> ResultEngine<Vec<Expense>> {
        filter.validate()?;
        let models = transactions::Entity::find()
            .apply_expense_filters(user_id, filter)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Lists entries with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(occurred_at DESC, id DESC)`. The
    /// returned cursor is `None` on the last page.
    pub async fn list_expenses_page(
        &self,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &ExpenseFilter,
    ) -> ResultEngine<(Vec<Expense>, Option<String>)> {
        filter.validate()?;

        let limit_plus_one = limit.saturating_add(1);
        let mut query = transactions::Entity::find()
            .apply_expense_filters(user_id, filter)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit_plus_one);

        if let Some(cursor) = cursor {
            let cursor = ExpensesCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                            .add(transactions::Column::Id.lt(cursor.expense_id)),
                    ),
            );
        }

        let rows = query.all(&self.database).await?;
        let has_more = rows.len() > limit as usize;

        let out = rows
            .into_iter()
            .take(limit as usize)
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let next_cursor = if has_more {
            out.last()
                .map(|e| {
                    ExpensesCursor {
                        occurred_at: e.occurred_at,
                        expense_id: e.id.clone(),
                    }
                    .encode()
                })
                .transpose()?
        } else {
            None
        };

        Ok((out, next_cursor))
    }

    /// Category names used by the user's entries, sorted.
    pub async fn distinct_categories(&self, user_id: &str) -> ResultEngine<Vec<String>> {
        let names: Vec<String> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Category)
            .distinct()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(names)
    }

    /// Recomputes `occurred_at` from the stored `date` string.
    ///
    /// Rows whose date does not parse are left alone. Returns how many rows
    /// changed.
    pub async fn backfill_timestamps(&self, user_id: &str) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?;

            let mut updated = 0u64;
            for model in models {
                let Ok(day) = dates::parse_entry_date(&model.date) else {
                    continue;
                };
                let expected = dates::midnight_utc(day);
                if model.occurred_at == expected {
                    continue;
                }
                let mut active: transactions::ActiveModel = model.into();
                active.occurred_at = ActiveValue::Set(expected);
                active.update(&db_tx).await?;
                updated += 1;
            }
            tracing::info!(user_id, updated, "expense timestamps backfilled");
            Ok(updated)
        })
    }
}
