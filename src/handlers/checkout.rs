use crate::middleware::auth::CurrentAccount;
use crate::middleware::session;
use crate::service::CheckoutStart;
use crate::{CopydeskError, router::CopydeskState};
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::warn;

pub const MSG_PACKAGE_NOT_FOUND: &str = "Das gewählte Credit-Paket wurde nicht gefunden.";

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub lookup_key: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentSuccessQuery {
    pub credits: u32,
}

/// POST /create_checkout_session -> 303 to the Stripe-hosted payment page.
pub async fn create_checkout_session(
    State(state): State<CopydeskState>,
    CurrentAccount(account): CurrentAccount,
    jar: PrivateCookieJar,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, CopydeskError> {
    match state
        .checkout
        .start_checkout(&account, form.lookup_key.trim())
        .await?
    {
        CheckoutStart::Redirect(url) => Ok(Redirect::to(&url).into_response()),
        CheckoutStart::NotFound => {
            let jar = session::set_flash(jar, MSG_PACKAGE_NOT_FOUND, state.secure_cookies);
            Ok((jar, Redirect::to("/")).into_response())
        }
    }
}

/// GET /payment_success?credits=N -> credit the account and return to the generator.
///
/// `credits` is taken from the return URL as-is; nothing here checks that a
/// payment for that amount actually happened.
pub async fn payment_success(
    State(state): State<CopydeskState>,
    CurrentAccount(account): CurrentAccount,
    jar: PrivateCookieJar,
    Query(query): Query<PaymentSuccessQuery>,
) -> Result<Response, CopydeskError> {
    let balance = state.checkout.confirm(account.id, query.credits).await?;
    warn!(
        account_id = account.id,
        credits = query.credits,
        balance,
        "credited from unverified checkout redirect"
    );
    let message = format!(
        "Zahlung erfolgreich! {} Credits wurden gutgeschrieben.",
        query.credits
    );
    let jar = session::set_flash(jar, message, state.secure_cookies);
    Ok((jar, Redirect::to("/")).into_response())
}
