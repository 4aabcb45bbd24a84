use std::collections::BTreeMap;

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, ResultEngine,
    categories::{self, DEFAULT_CATEGORIES},
    util::{normalize_category_display, normalize_category_key},
};

use super::{Engine, new_id, with_tx};

impl Engine {
    /// Adds a category for `user_id`.
    ///
    /// Names are compared on their normalized key, so `" food "` and `"FOOD"`
    /// collide.
    pub async fn create_category(&self, user_id: &str, name: &str) -> ResultEngine<Category> {
        let display = normalize_category_display(name)?;
        let name_norm = normalize_category_key(&display)?;

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(display));
            }

            let model = categories::ActiveModel {
                id: ActiveValue::Set(new_id()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(display),
                name_norm: ActiveValue::Set(name_norm),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    /// Categories created by `user_id`, by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Default categories merged with the user's own, sorted and without
    /// duplicates. A default keeps its spelling over a user category with
    /// the same key.
    pub async fn category_names(&self, user_id: &str) -> ResultEngine<Vec<String>> {
        let mut names: BTreeMap<String, String> = BTreeMap::new();
        for name in DEFAULT_CATEGORIES {
            names.insert(normalize_category_key(name)?, name.to_string());
        }
        for category in self.list_categories(user_id).await? {
            let key = normalize_category_key(&category.name)?;
            names.entry(key).or_insert(category.name);
        }
        Ok(names.into_values().collect())
    }

    /// Id of the user's category called `name`, or the trimmed name itself
    /// when there is none.
    pub async fn resolve_category_id(&self, user_id: &str, name: &str) -> ResultEngine<String> {
        lookup_category_id(&self.database, user_id, name).await
    }
}

pub(super) async fn lookup_category_id<C>(db: &C, user_id: &str, name: &str) -> ResultEngine<String>
where
    C: ConnectionTrait,
{
    let name_norm = normalize_category_key(name)?;
    let found = categories::Entity::find()
        .filter(categories::Column::UserId.eq(user_id))
        .filter(categories::Column::NameNorm.eq(name_norm))
        .one(db)
        .await?;
    Ok(match found {
        Some(model) => model.id,
        None => name.trim().to_string(),
    })
}
