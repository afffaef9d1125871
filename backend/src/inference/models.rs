//! Wire types for the Vertex AI `streamGenerateContent` call.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::rating::prompt::{PromptPart, PromptPayload, SafetySetting};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub generation_config: GenerationConfig,
    pub safety_settings: &'a [SafetySetting],
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob<'a> {
    pub mime_type: &'a str,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub seed: i32,
    pub max_output_tokens: u32,
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_prompt(prompt: &'a PromptPayload<'a>) -> Self {
        let parts = prompt
            .parts
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => Part::Text { text: *text },
                PromptPart::Image { mime_type, data } => Part::InlineData {
                    inline_data: Blob {
                        mime_type: *mime_type,
                        data: STANDARD.encode(*data),
                    },
                },
            })
            .collect();

        let settings = &prompt.settings;
        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                top_p: settings.top_p,
                seed: settings.seed,
                max_output_tokens: settings.max_output_tokens,
                thinking_config: ThinkingConfig {
                    thinking_budget: settings.thinking_budget,
                },
            },
            safety_settings: &settings.safety_settings,
        }
    }
}

/// One streamed chunk. The service may also stream a bare error object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CandidateContent {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponsePart {
    pub text: Option<String>,
    pub thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Answer text of the first candidate, thought summaries excluded.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.status) {
            (Some(code), Some(status)) => write!(f, "{} ({}): {}", code, status, self.message),
            (Some(code), None) => write!(f, "{}: {}", code, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::prompt::GenerationSettings;
    use serde_json::json;

    #[test]
    fn request_uses_vertex_field_names() {
        let prompt = PromptPayload {
            parts: vec![
                PromptPart::Text("rate this"),
                PromptPart::Image {
                    mime_type: "image/jpeg",
                    data: b"abc",
                },
            ],
            settings: GenerationSettings::default(),
        };

        let value = serde_json::to_value(GenerateContentRequest::from_prompt(&prompt)).unwrap();
        assert_eq!(
            value["contents"],
            json!([{
                "role": "user",
                "parts": [
                    {"text": "rate this"},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "YWJj"}}
                ]
            }])
        );
        assert_eq!(
            value["generationConfig"],
            json!({
                "temperature": 1.0,
                "topP": 1.0,
                "seed": 0,
                "maxOutputTokens": 65535,
                "thinkingConfig": {"thinkingBudget": -1}
            })
        );
        assert_eq!(value["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn response_text_skips_thoughts() {
        let chunk: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "weighing the roof...", "thought": true},
                        {"text": "Rating: 5/10\n"},
                        {"text": "Reason: tidy"}
                    ]
                }
            }],
            "usageMetadata": {"promptTokenCount": 10}
        }))
        .unwrap();
        assert_eq!(chunk.text(), "Rating: 5/10\nReason: tidy");
        assert!(chunk.error.is_none());
    }

    #[test]
    fn chunk_without_content_has_no_text() {
        let chunk: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "STOP"}]})).unwrap();
        assert_eq!(chunk.text(), "");
        assert_eq!(chunk.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn streamed_error_object_is_decoded() {
        let chunk: GenerateContentResponse = serde_json::from_value(json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        }))
        .unwrap();
        let error = chunk.error.unwrap();
        assert_eq!(error.to_string(), "429 (RESOURCE_EXHAUSTED): Quota exceeded");
    }
}
