use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
pub const REFRESH_COOKIE_PATH: &str = "/api/auth";
pub const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Build the cookie that carries a refresh secret back to the browser.
///
/// # Arguments
/// * `secret` - Opaque refresh secret
/// * `secure` - Whether to set the `Secure` attribute (HTTPS deployments)
pub fn refresh_cookie(secret: String, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, secret))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(REFRESH_COOKIE_MAX_AGE_SECS))
        .build()
}

/// Expire the refresh cookie on the client.
///
/// Always emits a `Set-Cookie` header, whether or not the request carried
/// the cookie.
pub fn clear_refresh_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let mut cookie = refresh_cookie(String::new(), secure);
    cookie.make_removal();
    jar.add(cookie)
}

/// Read the refresh secret from the request cookies.
pub fn refresh_secret(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
