use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use tracing::debug;

use crate::db::DbAccount;
use crate::middleware::session;
use crate::router::CopydeskState;

/// The logged-in account, loaded fresh from storage for this request.
/// Anonymous visitors are redirected to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub DbAccount);

impl FromRequestParts<CopydeskState> for CurrentAccount {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CopydeskState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_headers(&parts.headers, Key::from_ref(state));

        let Some(id) = session::account_id(&jar) else {
            return Err(Redirect::to("/login").into_response());
        };

        match state.accounts.get_by_id(id).await {
            Ok(Some(account)) => Ok(Self(account)),
            Ok(None) => {
                debug!(account_id = id, "session refers to a missing account");
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
