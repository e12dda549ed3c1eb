use crate::error::{CopydeskError, GeminiError};
use crate::types::gemini::{GenerateContentRequest, GeminiResponse};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Stateless wrapper over the Gemini `generateContent` endpoint.
pub struct GeminiApi;

impl GeminiApi {
    /// One POST, no retries. The API key travels as the `key` query parameter.
    pub async fn generate_content(
        client: &reqwest::Client,
        url: &Url,
        api_key: impl AsRef<str>,
        timeout: Duration,
        body: &GenerateContentRequest,
    ) -> Result<GeminiResponse, CopydeskError> {
        let resp = client
            .post(url.clone())
            .query(&[("key", api_key.as_ref())])
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            error!(%status, "Gemini generateContent failed");
            return Err(match serde_json::from_slice::<GeminiError>(&bytes) {
                Ok(gemini_err) => CopydeskError::GeminiServerError(gemini_err),
                Err(_) => CopydeskError::UpstreamStatus(status),
            });
        }

        let parsed: GeminiResponse = serde_json::from_slice(&bytes)?;
        debug!(
            candidates = parsed.candidates.len(),
            model = parsed.modelVersion.as_deref().unwrap_or("-"),
            "Gemini generateContent succeeded"
        );
        Ok(parsed)
    }
}
