use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, prelude::*};

use crate::{
    Expense, ResultEngine, User, expenses,
    stats::{MonthWindow, StatsSnapshot, monthly_snapshot},
};

use super::Engine;

impl Engine {
    /// Statistics for the UTC calendar month containing `now`.
    pub async fn monthly_stats(&self, user: &User, now: DateTime<Utc>) -> ResultEngine<StatsSnapshot> {
        let window = MonthWindow::containing(now)?;

        let expenses = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user.id.to_string()))
            .filter(expenses::Column::Date.gte(window.start))
            .filter(expenses::Column::Date.lt(window.end))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        monthly_snapshot(&expenses, user.monthly_budget, window)
    }
}
