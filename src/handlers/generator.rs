use crate::db::models::DebitOutcome;
use crate::middleware::auth::CurrentAccount;
use crate::middleware::session;
use crate::service::CreditPackage;
use crate::views::{self, GeneratedView, IndexView};
use crate::{CopydeskError, router::CopydeskState};
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const DEFAULT_TOPIC: &str = "Dein Thema";
pub const MSG_NO_CREDITS: &str = "Du hast keine Credits mehr. Bitte lade dein Konto auf.";

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub topic: Option<String>,
}

/// Catalog for the top-up buttons; a failing provider only hides them.
async fn packages_or_empty(state: &CopydeskState) -> Vec<CreditPackage> {
    match state.checkout.list_packages().await {
        Ok(packages) => packages,
        Err(CopydeskError::PaymentsNotConfigured) => {
            debug!("payments not configured; no packages shown");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "failed to list credit packages");
            Vec::new()
        }
    }
}

/// GET / -> generator form with balance and top-up options.
pub async fn index(
    State(state): State<CopydeskState>,
    CurrentAccount(account): CurrentAccount,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    let packages = packages_or_empty(&state).await;
    let page = views::index_page(&IndexView {
        username: &account.username,
        credits: account.credits,
        flash: flash.as_deref(),
        packages: &packages,
        generated: None,
    });
    (jar, page)
}

/// POST / -> spend one credit on an article about `topic`.
pub async fn generate(
    State(state): State<CopydeskState>,
    CurrentAccount(account): CurrentAccount,
    jar: PrivateCookieJar,
    Form(form): Form<GenerateForm>,
) -> Result<Response, CopydeskError> {
    let (jar, pending_flash) = session::take_flash(jar);
    let topic = form
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TOPIC)
        .to_string();

    // Pay first: the debit is atomic, generation cannot fail.
    let (credits, flash, content) = match state.ledger.debit(account.id).await? {
        DebitOutcome::InsufficientBalance => {
            info!(account_id = account.id, "generation refused: no credits");
            (account.credits, Some(MSG_NO_CREDITS.to_string()), None)
        }
        DebitOutcome::Debited { remaining } => {
            let body = state.generator.generate(&topic).await;
            (remaining, pending_flash, Some(body))
        }
    };

    let title = format!("AI-generierter Content zu: {topic}");
    let packages = packages_or_empty(&state).await;
    let page = views::index_page(&IndexView {
        username: &account.username,
        credits,
        flash: flash.as_deref(),
        packages: &packages,
        generated: content.as_deref().map(|body| GeneratedView {
            title: &title,
            body,
        }),
    });
    Ok((jar, page).into_response())
}
