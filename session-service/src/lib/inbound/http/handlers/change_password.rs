use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use crate::domain::session::models::ChangePasswordCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::clear_refresh_cookie;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Replace the password and end every session, this one included.
pub async fn change_password<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let command = ChangePasswordCommand::new(body.current_password, body.new_password)?;

    state
        .session_service
        .change_password(&user.claims, command)
        .await?;

    Ok((
        StatusCode::NO_CONTENT,
        clear_refresh_cookie(jar, state.cookie_secure),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}
