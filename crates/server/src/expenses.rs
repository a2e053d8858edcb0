//! Expenses API endpoints

use api_types::{
    Category as ApiCategory, PaymentMethod as ApiPaymentMethod,
    expense::{
        ExpenseDeleted, ExpenseListQuery, ExpenseListResponse, ExpenseNew, ExpenseUpdate,
        ExpenseView,
    },
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use engine::{Expense, ExpenseListFilter, MoneyCents, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_category(category: engine::Category) -> ApiCategory {
    match category {
        engine::Category::FoodDining => ApiCategory::FoodDining,
        engine::Category::Transportation => ApiCategory::Transportation,
        engine::Category::Shopping => ApiCategory::Shopping,
        engine::Category::Entertainment => ApiCategory::Entertainment,
        engine::Category::BillsUtilities => ApiCategory::BillsUtilities,
        engine::Category::Healthcare => ApiCategory::Healthcare,
        engine::Category::Education => ApiCategory::Education,
        engine::Category::Travel => ApiCategory::Travel,
        engine::Category::Other => ApiCategory::Other,
    }
}

fn engine_category(category: ApiCategory) -> engine::Category {
    match category {
        ApiCategory::FoodDining => engine::Category::FoodDining,
        ApiCategory::Transportation => engine::Category::Transportation,
        ApiCategory::Shopping => engine::Category::Shopping,
        ApiCategory::Entertainment => engine::Category::Entertainment,
        ApiCategory::BillsUtilities => engine::Category::BillsUtilities,
        ApiCategory::Healthcare => engine::Category::Healthcare,
        ApiCategory::Education => engine::Category::Education,
        ApiCategory::Travel => engine::Category::Travel,
        ApiCategory::Other => engine::Category::Other,
    }
}

fn map_payment_method(method: engine::PaymentMethod) -> ApiPaymentMethod {
    match method {
        engine::PaymentMethod::Cash => ApiPaymentMethod::Cash,
        engine::PaymentMethod::CreditCard => ApiPaymentMethod::CreditCard,
        engine::PaymentMethod::DebitCard => ApiPaymentMethod::DebitCard,
        engine::PaymentMethod::DigitalWallet => ApiPaymentMethod::DigitalWallet,
        engine::PaymentMethod::BankTransfer => ApiPaymentMethod::BankTransfer,
    }
}

fn engine_payment_method(method: ApiPaymentMethod) -> engine::PaymentMethod {
    match method {
        ApiPaymentMethod::Cash => engine::PaymentMethod::Cash,
        ApiPaymentMethod::CreditCard => engine::PaymentMethod::CreditCard,
        ApiPaymentMethod::DebitCard => engine::PaymentMethod::DebitCard,
        ApiPaymentMethod::DigitalWallet => engine::PaymentMethod::DigitalWallet,
        ApiPaymentMethod::BankTransfer => engine::PaymentMethod::BankTransfer,
    }
}

fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount_minor: expense.amount.cents(),
        category: map_category(expense.category),
        date: expense.date.fixed_offset(),
        description: expense.description,
        payment_method: map_payment_method(expense.payment_method),
        created_at: expense.created_at.fixed_offset(),
        updated_at: expense.updated_at.fixed_offset(),
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Translate the query string into an engine filter.
///
/// `end_date` covers its whole day, so the exclusive bound is the following
/// midnight.
fn list_filter(query: ExpenseListQuery) -> Result<ExpenseListFilter, ServerError> {
    let defaults = ExpenseListFilter::default();

    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(label) => Some(engine::Category::try_from(label)?),
    };
    let until = match query.end_date {
        Some(end) => {
            let next = end
                .succ_opt()
                .ok_or_else(|| ServerError::Generic("end_date out of range".to_string()))?;
            Some(midnight(next))
        }
        None => None,
    };

    Ok(ExpenseListFilter {
        category,
        from: query.start_date.map(midnight),
        until,
        limit: query.limit.unwrap_or(defaults.limit),
        page: query.page.unwrap_or(defaults.page),
    })
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let Query(query) = query?;
    let filter = list_filter(query)?;

    let page = state.engine.list_expenses(user.id, &filter).await?;

    Ok(Json(ExpenseListResponse {
        expenses: page.expenses.into_iter().map(expense_view).collect(),
        total_expenses: page.total_count,
        total_amount_minor: page.total_amount.cents(),
        current_page: page.page,
        total_pages: page.total_pages,
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload?;

    let expense = state
        .engine
        .create_expense(engine::ExpenseCmd {
            user_id: user.id,
            title: payload.title,
            amount: MoneyCents::new(payload.amount_minor),
            category: engine_category(payload.category),
            date: payload.date.map(|dt| dt.with_timezone(&Utc)),
            description: payload.description,
            payment_method: payload.payment_method.map(engine_payment_method),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = path?;
    let expense = state.engine.expense(user.id, id).await?;

    Ok(Json(expense_view(expense)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = path?;
    let Json(payload) = payload?;

    let expense = state
        .engine
        .update_expense(engine::UpdateExpenseCmd {
            user_id: user.id,
            expense_id: id,
            title: payload.title,
            amount: payload.amount_minor.map(MoneyCents::new),
            category: payload.category.map(engine_category),
            date: payload.date.map(|dt| dt.with_timezone(&Utc)),
            description: payload.description,
            payment_method: payload.payment_method.map(engine_payment_method),
        })
        .await?;

    Ok(Json(expense_view(expense)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    let Path(id) = path?;
    state.engine.delete_expense(user.id, id).await?;
    tracing::debug!("user {} deleted expense {id}", user.id);

    Ok(Json(ExpenseDeleted { deleted: id }))
}
