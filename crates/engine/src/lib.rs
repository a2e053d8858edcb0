//! Domain and persistence for Outlay.
//!
//! Every operation lives on [`Engine`] and takes the id of the user it acts
//! for; expense reads and writes are always filtered by that owner.

pub use auth::{Credentials, MIN_PASSWORD_LEN, TOKEN_TTL};
pub use error::EngineError;
pub use expenses::{Category, Expense, PaymentMethod};
pub use money::MoneyCents;
pub use ops::{
    AuthSession, Engine, EngineBuilder, ExpenseCmd, ExpenseListFilter, ExpensePage,
    MAX_EXPENSE_AMOUNT, RegisterCmd, UpdateExpenseCmd,
};
pub use stats::{CategoryTotal, MonthWindow, StatsSnapshot, monthly_snapshot};
pub use users::User;

/// Argon2 cost parameters, for callers building [`Credentials`].
pub use argon2::Params as HashParams;

mod auth;
mod error;
mod expenses;
mod money;
mod ops;
mod stats;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
