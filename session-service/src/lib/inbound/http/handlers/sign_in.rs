use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::SignInCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::client_info::RequestClient;
use crate::inbound::http::cookies::refresh_cookie;
use crate::inbound::http::router::AppState;

pub async fn sign_in<S: SessionServicePort>(
    State(state): State<AppState<S>>,
    RequestClient(client): RequestClient,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<(CookieJar, ApiSuccess<SignInResponseData>), ApiError> {
    let command = SignInCommand::new(body.email, body.password, client)?;

    let pair = state.session_service.sign_in(command).await?;

    let jar = jar.add(refresh_cookie(
        pair.refresh_token.clone(),
        state.cookie_secure,
    ));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            SignInResponseData {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
