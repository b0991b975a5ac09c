use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::refresh_tokens::AccessTokenData;
use crate::domain::session::models::SignUpCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::client_info::RequestClient;
use crate::inbound::http::cookies::refresh_cookie;
use crate::inbound::http::router::AppState;

/// Register an account. The refresh secret only travels in the cookie.
pub async fn sign_up<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    RequestClient(client): RequestClient,
    jar: CookieJar,
    Json(body): Json<SignUpRequest>,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    let command = SignUpCommand::new(
        body.first_name,
        body.last_name,
        body.email,
        body.password,
        client,
    )?;

    let pair = state.session_service.sign_up(command).await?;

    Ok((
        jar.add(refresh_cookie(pair.refresh_token, state.cookie_secure)),
        ApiSuccess::new(
            StatusCode::CREATED,
            AccessTokenData {
                access_token: pair.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}
