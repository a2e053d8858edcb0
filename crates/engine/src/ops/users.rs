use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, SqlErr, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, User,
    auth::MIN_PASSWORD_LEN,
    users,
    util::{normalize_email, normalize_required},
};

use super::{Engine, with_tx};

/// Input for [`Engine::register`].
#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub name: String,
    pub email: String,
    pub password: String,
    pub monthly_budget: Option<MoneyCents>,
}

/// A freshly issued token and the user it belongs to.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

fn validate_budget(budget: MoneyCents) -> ResultEngine<MoneyCents> {
    if budget.is_negative() {
        return Err(EngineError::InvalidAmount(
            "budget cannot be negative".to_string(),
        ));
    }
    Ok(budget)
}

impl Engine {
    /// Create an account and sign the user in.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<AuthSession> {
        let name = normalize_required(&cmd.name, "name")?;
        let email = normalize_email(&cmd.email)?;
        if cmd.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        if cmd.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EngineError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        let monthly_budget = validate_budget(cmd.monthly_budget.unwrap_or_default())?;
        let password_hash = self.credentials.hash_password(&cmd.password)?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            name,
            monthly_budget,
            created_at: Utc::now(),
        };

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(user.email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(user.email.clone()));
            }

            users::ActiveModel::new_user(&user, password_hash)
                .insert(&db_tx)
                .await
                .map_err(|err| match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        EngineError::ExistingKey(user.email.clone())
                    }
                    _ => EngineError::Database(err),
                })?;
            Ok::<(), EngineError>(())
        })?;

        let token = self.credentials.issue_token(user.id)?;
        Ok(AuthSession { token, user })
    }

    /// Check an email/password pair and issue a token.
    ///
    /// Unknown email and wrong password fail with the same
    /// [`EngineError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<AuthSession> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let Some(model) = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::InvalidCredentials);
        };

        if !self
            .credentials
            .verify_password(password, &model.password_hash)?
        {
            return Err(EngineError::InvalidCredentials);
        }

        let user = User::try_from(model)?;
        let token = self.credentials.issue_token(user.id)?;
        Ok(AuthSession { token, user })
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        User::try_from(model)
    }

    /// Return a user by email (case-insensitive).
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        User::try_from(model)
    }

    /// Set the user's monthly budget. Negative budgets are rejected.
    pub async fn update_budget(&self, user_id: Uuid, budget: MoneyCents) -> ResultEngine<User> {
        let budget = validate_budget(budget)?;
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut active: users::ActiveModel = model.into();
            active.monthly_budget_minor = ActiveValue::Set(budget.cents());
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }
}
