use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::refresh_cookie;
use crate::inbound::http::cookies::refresh_secret;
use crate::inbound::http::router::AppState;

/// Rotate the refresh secret carried by the cookie.
pub async fn refresh_tokens<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    let secret = refresh_secret(&jar)
        .ok_or_else(|| ApiError::BadRequest("Missing refresh token".to_string()))?;

    let pair = state.session_service.refresh_tokens(&secret).await?;

    Ok((
        jar.add(refresh_cookie(pair.refresh_token, state.cookie_secure)),
        ApiSuccess::new(
            StatusCode::OK,
            AccessTokenData {
                access_token: pair.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessTokenData {
    pub access_token: String,
}
