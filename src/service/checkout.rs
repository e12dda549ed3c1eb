//! Credit packages sold through Stripe Checkout, and crediting on return.
//!
//! Packages are Stripe prices whose lookup key follows `credits_<N>`; `N` is
//! the number of credits the price buys. The catalog is fetched live on every
//! call.

use crate::api::{CheckoutSessionParams, StripeApi};
use crate::config::Config;
use crate::db::DbAccount;
use crate::error::CopydeskError;
use crate::service::ledger::CreditLedger;
use crate::types::stripe::Price;
use serde::Serialize;
use tracing::info;
use url::Url;

pub const CREDITS_PREFIX: &str = "credits_";
pub const CATALOG_LIMIT: u32 = 20;

/// Currencies Stripe charges in whole units; `unit_amount` has no minor part.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditPackage {
    pub lookup_key: String,
    pub credits: u32,
    pub price_id: String,
    /// Minor currency units.
    pub unit_amount: i64,
    pub currency: String,
    pub product_name: Option<String>,
}

impl CreditPackage {
    fn from_price(price: Price) -> Option<Self> {
        let lookup_key = price.lookup_key.clone()?;
        if !lookup_key.starts_with(CREDITS_PREFIX) {
            return None;
        }
        Some(Self {
            credits: parse_credits(&lookup_key),
            product_name: price.product_name().map(str::to_string),
            lookup_key,
            price_id: price.id,
            unit_amount: price.unit_amount.unwrap_or(0),
            currency: price.currency,
        })
    }

    /// `12.50 EUR`, or `500 JPY` for zero-decimal currencies.
    pub fn amount_display(&self) -> String {
        let currency = self.currency.to_uppercase();
        if ZERO_DECIMAL_CURRENCIES.contains(&self.currency.to_ascii_lowercase().as_str()) {
            return format!("{} {currency}", self.unit_amount);
        }
        format!(
            "{}.{:02} {currency}",
            self.unit_amount / 100,
            (self.unit_amount % 100).abs(),
        )
    }
}

/// Credit count encoded after the first `_` of a lookup key; 0 when unparsable.
pub fn parse_credits(lookup_key: &str) -> u32 {
    lookup_key
        .split_once('_')
        .and_then(|(_, n)| n.parse().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStart {
    /// Hosted payment page to send the browser to.
    Redirect(String),
    NotFound,
}

#[derive(Clone)]
pub struct CheckoutBridge {
    stripe: Option<StripeApi>,
    ledger: CreditLedger,
    public_base: Url,
}

impl CheckoutBridge {
    pub fn new(stripe: Option<StripeApi>, ledger: CreditLedger, public_base: Url) -> Self {
        Self {
            stripe,
            ledger,
            public_base,
        }
    }

    pub fn from_config(client: reqwest::Client, ledger: CreditLedger, cfg: &Config) -> Self {
        let stripe = cfg
            .stripe_key()
            .map(|key| StripeApi::new(client, cfg.stripe_api_base.clone(), key));
        Self::new(stripe, ledger, cfg.public_base_url.clone())
    }

    fn stripe(&self) -> Result<&StripeApi, CopydeskError> {
        self.stripe
            .as_ref()
            .ok_or(CopydeskError::PaymentsNotConfigured)
    }

    /// Purchasable packages, cheapest credit count first.
    pub async fn list_packages(&self) -> Result<Vec<CreditPackage>, CopydeskError> {
        let prices = self.stripe()?.list_active_prices(CATALOG_LIMIT).await?;
        let mut packages: Vec<CreditPackage> = prices
            .data
            .into_iter()
            .filter_map(CreditPackage::from_price)
            .collect();
        packages.sort_by_key(|p| p.credits);
        Ok(packages)
    }

    /// Create a Checkout session for the price behind `lookup_key`.
    pub async fn start_checkout(
        &self,
        account: &DbAccount,
        lookup_key: &str,
    ) -> Result<CheckoutStart, CopydeskError> {
        let stripe = self.stripe()?;
        let prices = stripe.prices_by_lookup_key(lookup_key).await?;
        let Some(price) = prices
            .data
            .into_iter()
            .find(|p| p.lookup_key.as_deref() == Some(lookup_key))
        else {
            info!(account_id = account.id, lookup_key, "no price for lookup key");
            return Ok(CheckoutStart::NotFound);
        };

        let credits = parse_credits(lookup_key);
        let mut success_url = self.public_base.join("payment_success")?;
        success_url
            .query_pairs_mut()
            .append_pair("credits", &credits.to_string());

        let params = CheckoutSessionParams {
            price_id: price.id,
            client_reference_id: account.id.to_string(),
            success_url: success_url.to_string(),
            cancel_url: self.public_base.to_string(),
        };
        let session = stripe.create_checkout_session(&params).await?;
        info!(
            account_id = account.id,
            lookup_key,
            credits,
            session_id = %session.id,
            "checkout session started"
        );

        session.url.map(CheckoutStart::Redirect).ok_or_else(|| {
            CopydeskError::MalformedResponse("checkout session without url".to_string())
        })
    }

    /// Credit the account on return from a successful checkout.
    ///
    /// The amount comes from the success redirect and is not checked against
    /// Stripe.
    pub async fn confirm(&self, account_id: i64, credits: u32) -> Result<i64, CopydeskError> {
        self.ledger.credit(account_id, credits).await
    }
}
