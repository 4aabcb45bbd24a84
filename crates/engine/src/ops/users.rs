use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Session, User,
    password::{hash_password, verify_password},
    users::{self, sessions},
    util::{normalize_email, normalize_required_name},
};

use super::{Engine, new_id, with_tx};

impl Engine {
    /// Registers a new user.
    ///
    /// Username and email must both be unused. The email is stored lowercased.
    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_name(username, "username")?;
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash = hash_password(password)?;

        with_tx!(self, |db_tx| {
            if users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }
            if users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(email));
            }

            let model = users::ActiveModel {
                id: ActiveValue::Set(new_id()),
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(user_id = %model.id, "user signed up");
            Ok(User::from(model))
        })
    }

    /// Checks the credentials and opens a new session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ResultEngine<Session> {
        let email = normalize_email(email).map_err(|_| EngineError::InvalidCredentials)?;

        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(&db_tx)
                .await?
                .ok_or(EngineError::InvalidCredentials)?;
            if !verify_password(password, &model.password_hash)? {
                return Err(EngineError::InvalidCredentials);
            }

            let token = new_id();
            sessions::ActiveModel {
                token: ActiveValue::Set(token.clone()),
                user_id: ActiveValue::Set(model.id.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id = %model.id, "session opened");

            Ok(Session {
                token,
                user: User::from(model),
            })
        })
    }

    /// Closes a session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// The user owning `token`.
    pub async fn current_user(&self, token: &str) -> ResultEngine<User> {
        let found = sessions::Entity::find_by_id(token.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?;
        match found {
            Some((_, Some(user))) => Ok(User::from(user)),
            _ => Err(EngineError::Unauthorized("invalid session".to_string())),
        }
    }

    /// Looks a user up by email, for administrative tools.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or(EngineError::KeyNotFound(email))
    }
}
