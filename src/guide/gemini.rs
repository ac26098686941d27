/// Gemini API client
///
/// Sends one `generateContent` request per guide question and extracts the
/// reply text. Single-turn: only the composed prompt and the system
/// instruction go out.
///
/// API documentation: https://ai.google.dev/api/generate-content

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GuideConfig;
use crate::guide::{GuideBackend, GuideRequest};
use crate::logging::{self, Component};
use crate::model::GuideError;

// ============================================================================
// Request Structures
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// ============================================================================
// Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    config: GuideConfig,
}

impl GeminiClient {
    pub fn new(config: GuideConfig) -> Result<Self, GuideError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn endpoint_url(&self) -> String {
        endpoint_url(&self.config)
    }
}

/// `{base_url}/{model}:generateContent`
pub fn endpoint_url(config: &GuideConfig) -> String {
    format!(
        "{}/{}:generateContent",
        config.base_url.trim_end_matches('/'),
        config.model
    )
}

/// JSON body for one request.
pub fn build_request_body(
    config: &GuideConfig,
    request: &GuideRequest,
) -> Result<serde_json::Value, GuideError> {
    let body = GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: &request.prompt }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part { text: &request.system_instruction }],
        },
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    };
    Ok(serde_json::to_value(body)?)
}

/// Extracts the reply text: every text part of the first candidate, joined.
pub fn parse_reply(body: &str) -> Result<String, GuideError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GuideError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate.finish_reason {
            logging::debug(Component::Guide, None, &format!("empty candidate, finishReason={}", reason));
        }
        return Err(GuideError::EmptyResponse);
    }

    Ok(text)
}

impl GuideBackend for GeminiClient {
    fn generate(&self, request: &GuideRequest) -> Result<String, GuideError> {
        let url = self.endpoint_url();
        let body = build_request_body(&self.config, request)?;

        logging::debug(
            Component::Guide,
            request.context.as_deref(),
            &format!("POST {} ({} prompt chars)", url, request.prompt.chars().count()),
        );

        let mut call = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .json(&body);
        if let Some(key) = &self.config.api_key {
            call = call.header("x-goog-api-key", key);
        }

        let response = call.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(GuideError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_reply(&text)
    }
}

// ============================================================================
// Tests
// ============================================================================
