//! Sign up, sign in and session endpoints.

use api_types::auth::{SessionView, SignIn, SignUp, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::User;

use crate::{
    ServerError,
    server::{ServerState, SessionToken},
};

fn map_user(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
    }
}

pub async fn sign_up(
    State(state): State<ServerState>,
    Json(payload): Json<SignUp>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .sign_up(&payload.username, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn sign_in(
    State(state): State<ServerState>,
    Json(payload): Json<SignIn>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state
        .engine
        .sign_in(&payload.email, &payload.password)
        .await?;
    Ok(Json(SessionView {
        token: session.token,
        user: map_user(session.user),
    }))
}

pub async fn sign_out(
    Extension(token): Extension<SessionToken>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.sign_out(&token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(map_user(user))
}
