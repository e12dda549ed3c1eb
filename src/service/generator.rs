use crate::api::GeminiApi;
use crate::config::Config;
use crate::error::CopydeskError;
use crate::types::gemini::GenerateContentRequest;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 800;

/// Placeholder article used when Gemini is not configured or fails.
pub fn offline_text(topic: &str) -> String {
    format!(
        "{topic} ist ein spannendes Thema. In diesem Artikel erfährst du alles Wichtige darüber und wie du es für dich nutzen kannst."
    )
}

pub fn prompt_for(topic: &str) -> String {
    format!(
        "Schreibe einen hochwertigen, informativen und motivierenden Blogartikel über das Thema '{topic}'. Sprich den Leser direkt an, gib Tipps und Beispiele."
    )
}

/// Gateway to the generative-text provider.
///
/// `generate` always yields text: failures are folded into the returned
/// string together with the offline placeholder.
#[derive(Clone)]
pub struct ContentGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    url: Url,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key,
            url,
            timeout,
        }
    }

    pub fn from_config(client: reqwest::Client, cfg: &Config) -> Self {
        Self::new(
            client,
            cfg.gemini_key().map(str::to_string),
            cfg.gemini_api_url.clone(),
            cfg.gemini_timeout(),
        )
    }

    pub async fn generate(&self, topic: &str) -> String {
        let Some(key) = self.api_key.as_deref() else {
            return offline_text(topic);
        };

        match self.try_generate(key, topic).await {
            Ok(text) => {
                info!(topic, chars = text.len(), "content generated");
                text
            }
            Err(e) => {
                warn!(topic, error = %e, "content generation failed; using fallback");
                format!(
                    "Fehler bei der KI-Generierung: {e} (Fallback: {})",
                    offline_text(topic)
                )
            }
        }
    }

    async fn try_generate(&self, key: &str, topic: &str) -> Result<String, CopydeskError> {
        let body =
            GenerateContentRequest::single_prompt(prompt_for(topic), TEMPERATURE, MAX_OUTPUT_TOKENS);
        let resp =
            GeminiApi::generate_content(&self.client, &self.url, key, self.timeout, &body).await?;
        let finish_reason = resp.candidates.first().and_then(|c| c.finishReason.as_deref());
        debug!(?finish_reason, model = ?resp.modelVersion, "gemini response received");
        resp.first_text()
            .map(str::to_string)
            .ok_or_else(|| CopydeskError::MalformedResponse("no candidate text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn generator_for(server: &MockServer, key: Option<&str>, timeout: Duration) -> ContentGenerator {
        let url = Url::parse(&format!("{}{}", server.uri(), GENERATE_PATH)).unwrap();
        ContentGenerator::new(
            reqwest::Client::new(),
            key.map(str::to_string),
            url,
            timeout,
        )
    }

    #[tokio::test]
    async fn offline_fallback_embeds_topic_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let generator = generator_for(&server, None, Duration::from_secs(30));
        let text = generator.generate("Affiliate Marketing").await;
        assert_eq!(text, offline_text("Affiliate Marketing"));
        assert!(text.contains("Affiliate Marketing"));
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "# Fitness\nLos geht's"}]},
                                "finishReason": "STOP"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("secret"), Duration::from_secs(30));
        assert_eq!(generator.generate("Fitness").await, "# Fitness\nLos geht's");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            Value::String(prompt_for("Fitness"))
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 800);
    }

    #[tokio::test]
    async fn provider_error_is_folded_into_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("bad"), Duration::from_secs(30));
        let text = generator.generate("Reisen").await;
        assert!(text.starts_with("Fehler bei der KI-Generierung:"));
        assert!(text.contains("API key not valid"));
        assert!(text.contains(&offline_text("Reisen")));
    }

    #[tokio::test]
    async fn malformed_response_is_folded_into_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("secret"), Duration::from_secs(30));
        let text = generator.generate("Kochen").await;
        assert!(text.starts_with("Fehler bei der KI-Generierung:"));
        assert!(text.contains(&offline_text("Kochen")));
    }

    #[tokio::test]
    async fn timeout_is_folded_into_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("secret"), Duration::from_millis(50));
        let text = generator.generate("Garten").await;
        assert!(text.starts_with("Fehler bei der KI-Generierung:"));
        assert!(text.contains("Garten"));
    }
}
