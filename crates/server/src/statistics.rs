//! Statistics API endpoints

use api_types::stats::{CategoryTotal, StatsResponse};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::User;

use crate::{ServerError, expenses::map_category, server::ServerState};

/// Handle requests for the current month's statistics
pub async fn get_stats(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<StatsResponse>, ServerError> {
    let snapshot = state.engine.monthly_stats(&user, Utc::now()).await?;

    let category_breakdown = snapshot
        .category_breakdown
        .iter()
        .map(|group| CategoryTotal {
            category: map_category(group.category),
            total_minor: group.total.cents(),
            count: group.count,
        })
        .collect();

    Ok(Json(StatsResponse {
        month_start: snapshot.window.start.fixed_offset(),
        month_end: snapshot.window.end.fixed_offset(),
        monthly_total_minor: snapshot.monthly_total.cents(),
        monthly_budget_minor: snapshot.monthly_budget.cents(),
        category_breakdown,
        budget_remaining_minor: snapshot.budget_remaining.cents(),
        over_budget_minor: snapshot.over_budget.cents(),
        budget_used_percent: snapshot.budget_used_percent,
    }))
}
