use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, Expense, MoneyCents, PaymentMethod, ResultEngine, expenses,
    util::{normalize_description, normalize_title},
};

use super::{Engine, with_tx};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;
/// Largest accepted expense amount, in cents.
pub const MAX_EXPENSE_AMOUNT: MoneyCents = MoneyCents::new(100_000_000_000);

/// Input for [`Engine::create_expense`].
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub user_id: Uuid,
    pub title: String,
    pub amount: MoneyCents,
    pub category: Category,
    /// Defaults to the creation time.
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    /// Defaults to [`PaymentMethod::CreditCard`].
    pub payment_method: Option<PaymentMethod>,
}

/// Input for [`Engine::update_expense`]. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateExpenseCmd {
    pub user_id: Uuid,
    pub expense_id: Uuid,
    pub title: Option<String>,
    pub amount: Option<MoneyCents>,
    pub category: Option<Category>,
    pub date: Option<DateTime<Utc>>,
    /// A blank description clears the stored one.
    pub description: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// Filters for listing expenses.
///
/// `from` is inclusive and `until` is exclusive (`[from, until)`), both in
/// UTC. `page` is 1-indexed.
#[derive(Clone, Debug)]
pub struct ExpenseListFilter {
    /// `None` lists every category.
    pub category: Option<Category>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: u64,
    pub page: u64,
}

impl Default for ExpenseListFilter {
    fn default() -> Self {
        Self {
            category: None,
            from: None,
            until: None,
            limit: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// One page of expenses plus totals over the whole filtered set.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub total_count: u64,
    pub total_amount: MoneyCents,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Check the filter and return the row offset of the requested page.
fn validate_list_filter(filter: &ExpenseListFilter) -> ResultEngine<u64> {
    if let (Some(from), Some(until)) = (filter.from, filter.until)
        && from >= until
    {
        return Err(EngineError::InvalidInput(
            "invalid range: start must be before end".to_string(),
        ));
    }
    if filter.limit == 0 || filter.limit > MAX_PAGE_SIZE {
        return Err(EngineError::InvalidInput(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    if filter.page == 0 {
        return Err(EngineError::InvalidInput(
            "page must be at least 1".to_string(),
        ));
    }
    // The offset is bound as a signed 64-bit integer.
    (filter.page - 1)
        .checked_mul(filter.limit)
        .filter(|offset| i64::try_from(*offset).is_ok())
        .ok_or_else(|| EngineError::InvalidInput("page out of range".to_string()))
}

fn validate_amount(amount: MoneyCents) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be greater than 0".to_string(),
        ));
    }
    if amount > MAX_EXPENSE_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {MAX_EXPENSE_AMOUNT}"
        )));
    }
    Ok(amount)
}

trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_expense_filters(self, user_id: Uuid, filter: &ExpenseListFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_expense_filters(mut self, user_id: Uuid, filter: &ExpenseListFilter) -> Self {
        self = self.filter(expenses::Column::UserId.eq(user_id.to_string()));
        if let Some(category) = filter.category {
            self = self.filter(expenses::Column::Category.eq(category.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(expenses::Column::Date.gte(from));
        }
        if let Some(until) = filter.until {
            self = self.filter(expenses::Column::Date.lt(until));
        }
        self
    }
}

impl Engine {
    /// Record a new expense for `cmd.user_id`.
    pub async fn create_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let title = normalize_title(&cmd.title)?;
        let amount = validate_amount(cmd.amount)?;
        let description = normalize_description(cmd.description.as_deref())?;
        let now = Utc::now();

        let expense = Expense::new(
            cmd.user_id,
            title,
            amount,
            cmd.category,
            cmd.date.unwrap_or(now),
            description,
            cmd.payment_method.unwrap_or_default(),
            now,
        )?;

        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    /// Return one expense, only if `user_id` owns it.
    pub async fn expense(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .filter(expenses::Column::UserId.eq(user_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        Expense::try_from(model)
    }

    /// Overwrite the supplied fields of an expense owned by `cmd.user_id`.
    ///
    /// Ownership is checked before any field is validated.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(cmd.expense_id.to_string())
                .filter(expenses::Column::UserId.eq(cmd.user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

            let mut active: expenses::ActiveModel = model.into();
            if let Some(title) = cmd.title.as_deref() {
                active.title = ActiveValue::Set(normalize_title(title)?);
            }
            if let Some(amount) = cmd.amount {
                active.amount_minor = ActiveValue::Set(validate_amount(amount)?.cents());
            }
            if let Some(category) = cmd.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_description(Some(description))?);
            }
            if let Some(method) = cmd.payment_method {
                active.payment_method = ActiveValue::Set(method.as_str().to_string());
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Expense::try_from(model)
        })
    }

    /// Delete an expense owned by `user_id`.
    pub async fn delete_expense(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(expense_id.to_string()))
            .filter(expenses::Column::UserId.eq(user_id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(())
    }

    /// List a user's expenses, newest first.
    ///
    /// Ordering is `(date DESC, created_at DESC, id DESC)`. `total_count` and
    /// `total_amount` cover every matching expense, not only the page.
    pub async fn list_expenses(
        &self,
        user_id: Uuid,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<ExpensePage> {
        let offset = validate_list_filter(filter)?;

        with_tx!(self, |db_tx| {
            let total_count = expenses::Entity::find()
                .apply_expense_filters(user_id, filter)
                .count(&db_tx)
                .await?;

            let total_amount = expenses::Entity::find()
                .apply_expense_filters(user_id, filter)
                .select_only()
                .column_as(Expr::col(expenses::Column::AmountMinor).sum(), "total")
                .into_tuple::<Option<i64>>()
                .one(&db_tx)
                .await?
                .flatten()
                .unwrap_or(0);

            let models = expenses::Entity::find()
                .apply_expense_filters(user_id, filter)
                .order_by_desc(expenses::Column::Date)
                .order_by_desc(expenses::Column::CreatedAt)
                .order_by_desc(expenses::Column::Id)
                .offset(offset)
                .limit(filter.limit)
                .all(&db_tx)
                .await?;

            let expenses = models
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(ExpensePage {
                expenses,
                total_count,
                total_amount: MoneyCents::new(total_amount),
                page: filter.page,
                limit: filter.limit,
                total_pages: total_count.div_ceil(filter.limit),
            })
        })
    }
}
