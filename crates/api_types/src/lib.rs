use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Expense categories accepted by the API.
///
/// Serialized with their display label (e.g. `"Food & Dining"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    Transportation,
    Shopping,
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    Healthcare,
    Education,
    Travel,
    Other,
}

/// How an expense was paid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[default]
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Digital Wallet")]
    DigitalWallet,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
        pub monthly_budget_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// Public view of a user. Never carries the password hash.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub monthly_budget_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        /// Bearer token, valid for 7 days.
        pub token: String,
        pub user: UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub monthly_budget_minor: i64,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: Category,
        /// Defaults to the creation time when absent.
        pub date: Option<DateTime<FixedOffset>>,
        pub description: Option<String>,
        pub payment_method: Option<PaymentMethod>,
    }

    /// Partial update: only the fields present are overwritten.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub title: Option<String>,
        pub amount_minor: Option<i64>,
        pub category: Option<Category>,
        pub date: Option<DateTime<FixedOffset>>,
        pub description: Option<String>,
        pub payment_method: Option<PaymentMethod>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: Category,
        pub date: DateTime<FixedOffset>,
        pub description: Option<String>,
        pub payment_method: PaymentMethod,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    /// Query string for `GET /expenses`.
    ///
    /// `category` is either a category label or `"all"`. Dates are UTC
    /// calendar days and both ends are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub category: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub limit: Option<u64>,
        pub page: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        /// Number of expenses matching the filter (all pages).
        pub total_expenses: u64,
        /// Sum of the matching expenses (all pages).
        pub total_amount_minor: i64,
        pub current_page: u64,
        pub total_pages: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub deleted: Uuid,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: Category,
        pub total_minor: i64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsResponse {
        pub month_start: DateTime<FixedOffset>,
        pub month_end: DateTime<FixedOffset>,
        pub monthly_total_minor: i64,
        pub monthly_budget_minor: i64,
        /// Sorted by total descending, then by category label.
        pub category_breakdown: Vec<CategoryTotal>,
        pub budget_remaining_minor: i64,
        pub over_budget_minor: i64,
        /// `None` when no budget is set.
        pub budget_used_percent: Option<f64>,
    }
}
