use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Chat content payload for requests and candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub maxOutputTokens: u32,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[allow(non_snake_case)]
pub struct GenerateContentRequest {
    pub contents: Vec<Chat>,
    pub generationConfig: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single user turn carrying `prompt`.
    pub fn single_prompt(prompt: String, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Chat {
                role: None,
                parts: vec![Part { text: Some(prompt) }],
            }],
            generationConfig: GenerationConfig {
                temperature,
                maxOutputTokens: max_output_tokens,
            },
        }
    }
}

/// Gemini candidate wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Candidate {
    pub content: Chat,
    #[serde(default)]
    pub finishReason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usageMetadata: Option<Value>,
    #[serde(default)]
    pub modelVersion: Option<String>,
    #[serde(default)]
    pub promptFeedback: Option<Value>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_gemini_field_names() {
        let req = GenerateContentRequest::single_prompt("hallo".to_string(), 0.7, 800);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"], json!([{"parts": [{"text": "hallo"}]}]));
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 800);
        let temperature = v["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn first_text_reads_first_candidate_part() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Artikel"}, {"text": "Rest"}]},
                 "finishReason": "STOP"},
                {"content": {"role": "model", "parts": [{"text": "zweiter"}]}}
            ],
            "modelVersion": "gemini-2.5-pro"
        }))
        .unwrap();
        assert_eq!(resp.first_text(), Some("Artikel"));
        assert_eq!(resp.candidates[0].finishReason.as_deref(), Some("STOP"));
    }

    #[test]
    fn missing_candidates_yield_no_text() {
        let resp: GeminiResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(resp.first_text(), None);
    }
}
