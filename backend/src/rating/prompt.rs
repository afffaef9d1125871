use serde::Serialize;

use super::exemplars::{EXEMPLAR_TEXTS, INSTRUCTION};
use super::references::{REFERENCE_COUNT, REFERENCE_MIME_TYPE, ReferenceImage};

/// Number of parts in an assembled prompt: instruction, ten image/text pairs, test image.
pub const PROMPT_PART_COUNT: usize = 2 + 2 * REFERENCE_COUNT;

#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart<'a> {
    Text(&'a str),
    Image { mime_type: &'a str, data: &'a [u8] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub seed: i32,
    pub max_output_tokens: u32,
    /// -1 leaves the reasoning budget to the model.
    pub thinking_budget: i32,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let safety_settings = [
            HarmCategory::HateSpeech,
            HarmCategory::DangerousContent,
            HarmCategory::SexuallyExplicit,
            HarmCategory::Harassment,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::Off,
        })
        .collect();

        Self {
            temperature: 1.0,
            top_p: 1.0,
            seed: 0,
            max_output_tokens: 65535,
            thinking_budget: -1,
            safety_settings,
        }
    }
}

/// A single user turn plus the generation settings to send it with.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload<'a> {
    pub parts: Vec<PromptPart<'a>>,
    pub settings: GenerationSettings,
}

/// Interleaves the reference images with their exemplar texts and appends the test image.
pub fn build_prompt<'a>(
    references: &'a [ReferenceImage; REFERENCE_COUNT],
    test_image: &'a [u8],
) -> PromptPayload<'a> {
    let mut parts = Vec::with_capacity(PROMPT_PART_COUNT);
    parts.push(PromptPart::Text(INSTRUCTION));

    for (reference, text) in references.iter().zip(EXEMPLAR_TEXTS) {
        parts.push(PromptPart::Image {
            mime_type: reference.mime_type,
            data: &reference.data,
        });
        parts.push(PromptPart::Text(text));
    }

    parts.push(PromptPart::Image {
        mime_type: REFERENCE_MIME_TYPE,
        data: test_image,
    });

    PromptPayload {
        parts,
        settings: GenerationSettings::default(),
    }
}
