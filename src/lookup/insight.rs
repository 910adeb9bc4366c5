use serde::{Deserialize, Serialize};

use crate::application::reporting;
use crate::domain::{format_cents, AppState};

use super::LookupError;

/// Shown in place of the commentary whenever generation fails. The caller
/// prints this string; it never propagates the error further.
pub const INSIGHT_FALLBACK: &str =
    "The analysis could not be generated right now. Check your connection and API key permissions.";

/// Free-text business commentary over the full state. Treated as an opaque
/// request/response capability with a failure fallback.
#[allow(async_fn_in_trait)]
pub trait InsightProvider {
    async fn summarize(&self, state: &AppState) -> Result<String, LookupError>;
}

/// Gemini generateContent client. The API key comes from the
/// GEMINI_API_KEY environment variable.
pub struct GeminiInsights {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiInsights {
    pub const MODEL: &'static str = "gemini-1.5-flash";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url("https://generativelanguage.googleapis.com/v1beta", api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// None when no API key is configured; the caller shows a
    /// human-readable hint instead of calling out.
    pub fn from_env() -> Option<Self> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }

    fn build_prompt(state: &AppState) -> String {
        let revenue = reporting::total_revenue(state);
        let materials = serde_json::to_string(&state.materials).unwrap_or_default();
        let services = serde_json::to_string(&state.services).unwrap_or_default();

        format!(
            "As a business consultant, analyze the following data from a small \
             electrical-services company.\n\n\
             Total revenue so far: {}\n\
             Materials in stock: {}\n\
             Service records: {}\n\n\
             Provide an executive summary covering: total revenue, estimated gross \
             profit (selling price minus purchase price of materials, plus labor), \
             average margin, and practical suggestions (low-margin materials, \
             recurring customers, pricing). Keep a professional, direct and \
             encouraging tone.",
            format_cents(revenue),
            materials,
            services
        )
    }
}

impl InsightProvider for GeminiInsights {
    async fn summarize(&self, state: &AppState) -> Result<String, LookupError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            Self::MODEL,
            self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(state),
                }],
            }],
        };

        let response: GenerateResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LookupError::Malformed("empty completion".to_string()))?;

        Ok(text)
    }
}
