use crate::middleware::auth::CurrentAccount;
use crate::middleware::session;
use crate::service::password::{hash_password, verify_password};
use crate::views;
use crate::{CopydeskError, router::CopydeskState};
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

pub const MSG_DUPLICATE_USERNAME: &str = "Benutzername existiert bereits!";
pub const MSG_REGISTERED: &str = "Registrierung erfolgreich! Bitte einloggen.";
pub const MSG_LOGIN_FAILED: &str = "Login fehlgeschlagen!";
pub const MSG_EMPTY_FIELDS: &str = "Benutzername und Passwort dürfen nicht leer sein.";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET /register
pub async fn register_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    (jar, views::register_page(flash.as_deref()))
}

/// POST /register -> new account with the starting balance, then off to the login page.
pub async fn register(
    State(state): State<CopydeskState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, CopydeskError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(views::register_page(Some(MSG_EMPTY_FIELDS)).into_response());
    }

    let password_hash = hash_password(&form.password)?;
    match state.accounts.create(username, &password_hash).await {
        Ok(account) => {
            info!(account_id = account.id, username, "account registered");
            let jar = session::set_flash(jar, MSG_REGISTERED, state.secure_cookies);
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(CopydeskError::DuplicateUsername) => {
            Ok(views::register_page(Some(MSG_DUPLICATE_USERNAME)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    (jar, views::login_page(flash.as_deref()))
}

/// POST /login -> session cookie when the username exists and the password verifies.
pub async fn login(
    State(state): State<CopydeskState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, CopydeskError> {
    let username = form.username.trim();
    let Some(account) = state.accounts.get_by_username(username).await? else {
        return Ok(views::login_page(Some(MSG_LOGIN_FAILED)).into_response());
    };
    if !verify_password(&form.password, &account.password_hash)? {
        return Ok(views::login_page(Some(MSG_LOGIN_FAILED)).into_response());
    }

    info!(account_id = account.id, "login");
    let jar = session::login(jar, account.id, state.secure_cookies);
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /logout
pub async fn logout(CurrentAccount(account): CurrentAccount, jar: PrivateCookieJar) -> impl IntoResponse {
    info!(account_id = account.id, "logout");
    (session::logout(jar), Redirect::to("/login"))
}
