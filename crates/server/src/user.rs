//! Account endpoints: registration, login, profile and budget.

use api_types::auth::{AuthResponse, BudgetUpdate, Login, Register, UserView};
use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use engine::{AuthSession, MoneyCents, User};

use crate::{ServerError, server::ServerState};

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        monthly_budget_minor: user.monthly_budget.cents(),
    }
}

fn auth_response(session: AuthSession) -> AuthResponse {
    AuthResponse {
        user: user_view(&session.user),
        token: session.token,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Register>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let Json(payload) = payload?;

    let session = state
        .engine
        .register(engine::RegisterCmd {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            monthly_budget: payload.monthly_budget_minor.map(MoneyCents::new),
        })
        .await?;
    tracing::info!("registered user {}", session.user.id);

    Ok((StatusCode::CREATED, Json(auth_response(session))))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<AuthResponse>, ServerError> {
    let Json(payload) = payload?;

    let session = state.engine.login(&payload.email, &payload.password).await?;

    Ok(Json(auth_response(session)))
}

/// The profile of whoever presented the token.
pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(user_view(&user))
}

pub async fn update_budget(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetUpdate>, JsonRejection>,
) -> Result<Json<UserView>, ServerError> {
    let Json(payload) = payload?;

    let user = state
        .engine
        .update_budget(user.id, MoneyCents::new(payload.monthly_budget_minor))
        .await?;

    Ok(Json(user_view(&user)))
}
