use crate::models::GeneratedContent;
use crate::utils::{find_char_boundary, image_base64};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-1.5-flash";

/// eBay rejects titles longer than this.
const MAX_TITLE_CHARS: usize = 80;

/// Appended after the user prompt so the model answers in a parseable shape.
const FORMAT_INSTRUCTION: &str = "\
Respond with ONLY a JSON object containing exactly two string fields: \
\"title\" (a concise product title, 80 characters maximum) and \
\"description\" (a detailed product description suitable for a marketplace \
listing). Do not include any text outside the JSON object.";

// Cached regex — models often wrap JSON in a markdown code fence
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*(?:json)?\s*([\s\S]*?)\s*```").unwrap());

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: String,
    prompt: String,
    base_url: String,
    http: reqwest::Client,
}

// ── Request / Response types (Gemini REST format) ───────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Shape the format instruction asks the model to produce.
#[derive(Deserialize)]
struct ContentJson {
    title: String,
    description: String,
}

impl GeminiClient {
    pub fn new(api_key: String, prompt: String) -> Self {
        Self {
            api_key,
            prompt,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at a different API base URL. Used by tests to
    /// target a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send the prompt plus the photos to Gemini and parse the generated
    /// title and description out of the reply.
    pub async fn generate_listing_content(
        &self,
        photo_paths: &[PathBuf],
    ) -> Result<GeneratedContent> {
        let mut parts = vec![Part {
            text: Some(format!("{}\n\n{}", self.prompt, FORMAT_INSTRUCTION)),
            inline_data: None,
        }];

        for path in photo_paths {
            let (data, mime_type) = image_base64(path)?;
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.to_string(),
                    data,
                }),
            });
        }

        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, MODEL);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .with_context(|| format!("Gemini request to {url} failed"))?;

        let status = resp.status();
        let text_body = resp
            .text()
            .await
            .context("Failed to read Gemini response")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Gemini request failed with status {}: {}",
                status.as_u16(),
                text_body
            ));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text_body).with_context(|| {
                format!(
                    "Failed to parse Gemini JSON response. Raw body:\n{}",
                    &text_body[..find_char_boundary(&text_body, 500)]
                )
            })?;

        let generated_text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        parse_generated_content(&generated_text)
    }
}

/// Parse the model's reply into title + description.
///
/// Tries JSON first (fenced or raw); models don't reliably honor format
/// instructions, so a plain-text reply falls back to first line = title,
/// remainder = description.
fn parse_generated_content(text: &str) -> Result<GeneratedContent> {
    let text = text.trim();
    if text.is_empty() {
        return Err(anyhow!("Gemini returned no content"));
    }

    let candidate = JSON_FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    if let Ok(json) = serde_json::from_str::<ContentJson>(candidate) {
        if !json.title.trim().is_empty() {
            return Ok(GeneratedContent {
                title: clamp_title(json.title.trim()),
                description: json.description.trim().to_string(),
            });
        }
    }

    // Plain-text fallback
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let title = lines
        .next()
        .map(|l| l.trim())
        .ok_or_else(|| anyhow!("Gemini returned no content"))?;
    let description: String = lines.collect::<Vec<_>>().join("\n");
    let description = if description.is_empty() {
        title.to_string()
    } else {
        description
    };

    Ok(GeneratedContent {
        title: clamp_title(title),
        description,
    })
}

fn clamp_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    title.chars().take(MAX_TITLE_CHARS).collect()
}
