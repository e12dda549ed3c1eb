use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use sha2::{Digest, Sha512};
use time::Duration;
use tracing::warn;

pub const SESSION_COOKIE: &str = "copydesk_session";
pub const FLASH_COOKIE: &str = "copydesk_flash";

/// Cookie key derived from the configured secret, or a throwaway one.
///
/// Without a secret every restart invalidates all sessions.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret.filter(|s| !s.is_empty()) {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            warn!("SECRET_KEY not set; generated an ephemeral session key");
            Key::generate()
        }
    }
}

/// Account id of the logged-in user, if the session cookie is present and intact.
pub fn account_id(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)?.value().parse().ok()
}

pub fn login(jar: PrivateCookieJar, account_id: i64, secure: bool) -> PrivateCookieJar {
    jar.add(build_cookie(
        SESSION_COOKIE,
        account_id.to_string(),
        Duration::days(7),
        secure,
    ))
}

pub fn logout(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

/// Queue a one-shot message for the next rendered page.
pub fn set_flash(jar: PrivateCookieJar, message: impl Into<String>, secure: bool) -> PrivateCookieJar {
    jar.add(build_cookie(
        FLASH_COOKIE,
        message.into(),
        Duration::minutes(5),
        secure,
    ))
}

/// Read and clear the pending flash message.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    let Some(message) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    (jar.remove(clear_cookie(FLASH_COOKIE)), Some(message))
}

fn build_cookie(name: &str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
