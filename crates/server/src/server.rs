use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tokio::sync::RwLock;

use std::sync::Arc;

use crate::{ServerError, auth, categories, deadlines, expenses, goals, rates, reports};
use engine::{Engine, EngineError, ExchangeRates};

/// Exchange rates shared with the refresh task.
pub type SharedRates = Arc<RwLock<ExchangeRates>>;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub rates: SharedRates,
}

/// Bearer token of the current request, set by [`authenticate`].
#[derive(Clone, Debug)]
pub(crate) struct SessionToken(pub(crate) String);

/// Resolves `Authorization: Bearer <token>` into the signed in user.
///
/// The user and its token are stored in the request extensions.
async fn authenticate(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(EngineError::Unauthorized("missing bearer token".to_string()).into());
    };

    let token = bearer.token().to_string();
    let user = state.engine.current_user(&token).await?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/me", get(auth::me))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/totals", get(categories::totals))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/reports", get(reports::get))
        .route("/deadlines", get(deadlines::list).post(deadlines::create))
        .route("/rates", get(rates::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Arc<Engine>, rates: SharedRates, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, rates, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    rates: SharedRates,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState { engine, rates };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Arc<Engine>,
    rates: SharedRates,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, rates, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
