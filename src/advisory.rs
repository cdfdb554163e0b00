use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use tracing::{info, warn};
use url::Url;

use crate::errors::AdvisoryError;
use crate::TARGET_ADVISORY;

/// Environment variable holding the advisory service API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// At most this many missing skills are sent per advisory request.
pub const MAX_ADVISORY_SKILLS: usize = 3;

// Models tried in order until one answers
const MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
];

const ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One learning recommendation from the advisory service. The service
/// returns {skill, resource_name, project}; `link` is synthesized locally
/// as a search URL for the named resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub skill: String,
    pub resource_name: String,
    pub project: String,
    #[serde(default)]
    pub link: String,
}

/// Client for the external learning-recommendation service.
///
/// Strictly a collaborator: its availability never affects the match score,
/// keyword gap, or hero sentences, which are finalized before any call here.
pub struct AdvisoryClient {
    http: Client,
    api_key: String,
}

impl AdvisoryClient {
    pub fn new(api_key: String) -> Result<Self, AdvisoryError> {
        if api_key.trim().is_empty() {
            return Err(AdvisoryError::MissingApiKey);
        }
        Ok(Self {
            http: Client::new(),
            api_key,
        })
    }

    pub fn from_env() -> Result<Self, AdvisoryError> {
        Self::new(env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Requests learning recommendations for the first
    /// [`MAX_ADVISORY_SKILLS`] missing keywords. An empty skill list short-
    /// circuits to an empty response without a network call.
    pub async fn recommendations(
        &self,
        missing_skills: &[String],
    ) -> Result<Vec<Recommendation>, AdvisoryError> {
        if missing_skills.is_empty() {
            return Ok(Vec::new());
        }

        let skills = missing_skills
            .iter()
            .take(MAX_ADVISORY_SKILLS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let payload = request_payload(&skills);

        let mut last_error = String::new();
        for model in MODELS {
            let url = format!("{}/{}:generateContent?key={}", ENDPOINT_BASE, model, self.api_key);
            let response = match self.http.post(&url).json(&payload).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(target: TARGET_ADVISORY, "Advisory request to {} failed: {}", model, e);
                    last_error = e.to_string();
                    continue;
                }
            };

            if !response.status().is_success() {
                last_error = format!("{}: {}", model, response.status());
                continue;
            }

            let body: Value = match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            match parse_recommendations(&body) {
                Ok(recommendations) => {
                    info!(target: TARGET_ADVISORY,
                        "Received {} recommendation(s) from {}",
                        recommendations.len(),
                        model
                    );
                    return Ok(recommendations);
                }
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            }
        }

        Err(AdvisoryError::UnexpectedResponse(last_error))
    }
}

fn request_payload(skills: &str) -> Value {
    let prompt = format!(
        "You are a career coach. A candidate is missing: {}.\n\
         For each skill, provide:\n\
         1. A specific resource name (e.g. \"Coursera: Python for Everybody\").\n\
         2. A project idea.\n\n\
         Return strictly JSON.\n\
         Format: [{{\"skill\": \"...\", \"resource_name\": \"...\", \"project\": \"...\"}}]",
        skills
    );

    json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": 0.7,
            "responseMimeType": "application/json"
        }
    })
}

fn parse_recommendations(body: &Value) -> Result<Vec<Recommendation>, AdvisoryError> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| AdvisoryError::UnexpectedResponse("no candidates in response".to_string()))?;

    let mut recommendations: Vec<Recommendation> = serde_json::from_str(text)
        .map_err(|e| AdvisoryError::UnexpectedResponse(e.to_string()))?;

    for recommendation in &mut recommendations {
        recommendation.link = search_link(&recommendation.resource_name);
    }

    Ok(recommendations)
}

fn search_link(resource_name: &str) -> String {
    Url::parse_with_params("https://www.google.com/search", &[("q", resource_name)])
        .map(|url| url.to_string())
        .unwrap_or_default()
}
