//! Monthly statistics.
//!
//! Everything here is pure: the engine loads a user's expenses and hands them
//! to [`monthly_snapshot`] together with the budget and the month window.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

use crate::{Category, EngineError, Expense, MoneyCents, ResultEngine};

/// A calendar month in UTC, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// The month containing `now`.
    pub fn containing(now: DateTime<Utc>) -> ResultEngine<Self> {
        let (year, month) = (now.year(), now.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Ok(Self {
            start: first_of_month(year, month)?,
            end: first_of_month(next_year, next_month)?,
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn first_of_month(year: i32, month: u32) -> ResultEngine<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid month {year}-{month:02}")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: MoneyCents,
    pub count: u64,
}

/// Derived figures for one user and one month. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub window: MonthWindow,
    pub monthly_total: MoneyCents,
    pub monthly_budget: MoneyCents,
    /// Sorted by total descending, ties by category label ascending.
    pub category_breakdown: Vec<CategoryTotal>,
    /// `max(0, budget - total)`.
    pub budget_remaining: MoneyCents,
    /// `max(0, total - budget)`.
    pub over_budget: MoneyCents,
    /// `None` when no budget is set.
    pub budget_used_percent: Option<f64>,
}

/// Compute the snapshot for `window` from `expenses`.
///
/// Expenses dated outside the window are ignored.
pub fn monthly_snapshot(
    expenses: &[Expense],
    monthly_budget: MoneyCents,
    window: MonthWindow,
) -> ResultEngine<StatsSnapshot> {
    let overflow = || EngineError::InvalidAmount("monthly total overflow".to_string());

    let mut monthly_total = MoneyCents::ZERO;
    let mut groups: HashMap<Category, CategoryTotal> = HashMap::new();

    for expense in expenses.iter().filter(|e| window.contains(e.date)) {
        monthly_total = monthly_total
            .checked_add(expense.amount)
            .ok_or_else(overflow)?;

        let group = groups.entry(expense.category).or_insert(CategoryTotal {
            category: expense.category,
            total: MoneyCents::ZERO,
            count: 0,
        });
        group.total = group.total.checked_add(expense.amount).ok_or_else(overflow)?;
        group.count += 1;
    }

    let mut category_breakdown: Vec<CategoryTotal> = groups.into_values().collect();
    category_breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    let budget_used_percent = monthly_budget
        .is_positive()
        .then(|| monthly_total.cents() as f64 / monthly_budget.cents() as f64 * 100.0);

    Ok(StatsSnapshot {
        window,
        monthly_total,
        monthly_budget,
        category_breakdown,
        budget_remaining: monthly_budget.shortfall(monthly_total),
        over_budget: monthly_total.shortfall(monthly_budget),
        budget_used_percent,
    })
}
