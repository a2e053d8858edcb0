use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use tower_http::cors::{Any, CorsLayer};

use std::sync::Arc;

use crate::{ServerError, expenses, statistics, user};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolve the bearer token into a [`engine::User`] and attach it to the
/// request.
///
/// A missing header and a header that is not a bearer credential are both
/// answered with 401.
async fn auth(
    State(state): State<ServerState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let bearer = match bearer {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) => {
            let reason = if rejection.is_missing() {
                "missing credentials"
            } else {
                "invalid token"
            };
            tracing::debug!("rejected request to {}: {reason}", request.uri().path());
            return Err(EngineError::Unauthorized(reason.to_string()).into());
        }
    };

    let user = state.engine.authenticate(bearer.token()).await.map_err(|err| {
        tracing::debug!("rejected request to {}: {err}", request.uri().path());
        err
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn health() -> &'static str {
    "ok"
}

fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(user::me))
        .route("/auth/budget", put(user::update_budget))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/stats", get(statistics::get_stats))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let public = Router::new()
        .route("/auth/register", post(user::register))
        .route("/auth/login", post(user::login));

    Router::new()
        .nest("/api", protected.merge(public))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Build the full application router around `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
