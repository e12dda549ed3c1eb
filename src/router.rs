use crate::config::Config;
use crate::db::AccountRepository;
use crate::error::CopydeskError;
use crate::handlers::{account, checkout, generator};
use crate::middleware::session;
use crate::service::{CheckoutBridge, ContentGenerator, CreditLedger};
use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use std::time::Duration;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct CopydeskState {
    pub accounts: Arc<dyn AccountRepository>,
    pub ledger: CreditLedger,
    pub generator: ContentGenerator,
    pub checkout: CheckoutBridge,
    pub cookie_key: Key,
    pub secure_cookies: bool,
}

impl CopydeskState {
    pub fn new(cfg: &Config, accounts: Arc<dyn AccountRepository>) -> Result<Self, CopydeskError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("copydesk/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let ledger = CreditLedger::new(accounts.clone());
        let generator = ContentGenerator::from_config(client.clone(), cfg);
        let checkout = CheckoutBridge::from_config(client, ledger.clone(), cfg);

        Ok(Self {
            accounts,
            ledger,
            generator,
            checkout,
            cookie_key: session::cookie_key(cfg.secret_key.as_deref()),
            secure_cookies: !cfg.insecure_cookie,
        })
    }
}

impl FromRef<CopydeskState> for Key {
    fn from_ref(state: &CopydeskState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn copydesk_router(state: CopydeskState) -> Router {
    Router::new()
        .route("/", get(generator::index).post(generator::generate))
        .route(
            "/register",
            get(account::register_form).post(account::register),
        )
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route(
            "/create_checkout_session",
            post(checkout::create_checkout_session),
        )
        .route("/payment_success", get(checkout::payment_success))
        .with_state(state)
}
