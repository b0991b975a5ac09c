use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::clear_refresh_cookie;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn log_out<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<LogOutResponseData>), ApiError> {
    state.session_service.log_out(&user.claims).await?;

    Ok((
        clear_refresh_cookie(jar, state.cookie_secure),
        ApiSuccess::new(
            StatusCode::OK,
            LogOutResponseData {
                message: "Logged out successfully".to_string(),
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogOutResponseData {
    pub message: String,
}
