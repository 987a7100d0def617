//! Best-effort AI content enhancement.
//!
//! The single point of contact with the text-completion API. Enhancement is
//! strictly an enrichment step: it runs before the build stage on an owned
//! copy of the résumé, and **every** failure path — no API key, timeout,
//! rate limiting, malformed response — falls back to the original text with
//! a warning. A network outage can never block artifact generation.
//!
//! Calls are bounded by the client-level timeout from
//! [`crate::config::EnhanceConfig`] and retried with exponential backoff on
//! 429 and 5xx responses.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EnhanceConfig;
use crate::model::{Achievement, ResumeData};

pub mod prompts;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Environment variable holding the API key. Enhancement is silently
/// skipped when it is unset.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("model returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Blocking client for the Messages API.
pub struct EnhanceClient {
    client: Client,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl EnhanceClient {
    /// Build a client from config and the `ANTHROPIC_API_KEY` environment
    /// variable. `None` when the key is unset or the HTTP client cannot be
    /// constructed — both mean "skip enhancement", not "fail the build".
    pub fn from_env(config: &EnhanceConfig) -> Option<Self> {
        let api_key = std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty())?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| warn!("enhancement disabled: {e}"))
            .ok()?;
        Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    /// One completion call, retrying on 429/5xx with exponential backoff.
    /// Returns the first text block.
    pub fn call(&self, prompt: &str, system: &str) -> Result<String, EnhanceError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<EnhanceError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // 1s, 2s, 4s, ...
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "enhancement call attempt {attempt} failed, retrying in {}ms",
                    delay.as_millis()
                );
                std::thread::sleep(delay);
            }

            let response = match self
                .client
                .post(API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .header("content-type", "application/json")
                .json(&request)
                .send()
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EnhanceError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().unwrap_or_default();
                last_error = Some(EnhanceError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(EnhanceError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ApiResponse = response.json()?;
            let text = parsed
                .content
                .iter()
                .find(|b| b.block_type == "text")
                .and_then(|b| b.text.as_deref())
                .ok_or(EnhanceError::EmptyContent)?;
            debug!("enhancement call succeeded ({} chars)", text.len());
            return Ok(text.trim().to_string());
        }

        Err(last_error.unwrap_or(EnhanceError::RateLimited {
            retries: self.max_retries,
        }))
    }

    /// Call expecting a JSON payload; strips markdown code fences first.
    fn call_json<T: serde::de::DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, EnhanceError> {
        let text = self.call(prompt, system)?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }
}

/// Run the enhancement pass over an owned copy of the résumé.
///
/// Enhances the professional overview and each position's achievement
/// bullets. Every piece falls back to its original text independently, so a
/// partial outage degrades gracefully instead of all-or-nothing.
pub fn enhance_resume(client: &EnhanceClient, resume: &ResumeData) -> ResumeData {
    let mut enhanced = resume.clone();

    match client.call(
        &prompts::overview_prompt(&resume.professional_summary.overview),
        prompts::SYSTEM,
    ) {
        Ok(text) if !text.is_empty() => enhanced.professional_summary.overview = text,
        Ok(_) => warn!("overview enhancement returned nothing; keeping original"),
        Err(e) => warn!("overview enhancement failed ({e}); keeping original"),
    }

    for exp in &mut enhanced.experience {
        let bullets: Vec<&str> = exp
            .achievements
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        match client.call_json::<Vec<String>>(
            &prompts::achievements_prompt(&exp.role, &exp.company, &bullets),
            prompts::JSON_SYSTEM,
        ) {
            Ok(rewritten) => {
                exp.achievements = merged_achievements(&exp.achievements, rewritten);
            }
            Err(e) => {
                warn!(
                    "achievement enhancement for {} failed ({e}); keeping original",
                    exp.company
                );
            }
        }
    }

    enhanced
}

/// Merge rewritten bullet text back into the achievements, keeping metrics
/// and technologies. The rewrite is dropped entirely when the count doesn't
/// match — a model that merged or split bullets can't be mapped back safely.
fn merged_achievements(original: &[Achievement], rewritten: Vec<String>) -> Vec<Achievement> {
    if rewritten.len() != original.len() {
        warn!(
            "enhancement returned {} bullets for {}; keeping originals",
            rewritten.len(),
            original.len()
        );
        return original.to_vec();
    }
    original
        .iter()
        .zip(rewritten)
        .map(|(ach, text)| {
            let mut merged = ach.clone();
            if !text.trim().is_empty() {
                merged.description = text.trim().to_string();
            }
            merged
        })
        .collect()
}

/// Strip ```json ... ``` or ``` ... ``` fences a model may wrap JSON in.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(prefix) {
            return stripped
                .trim_start()
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or_else(|| stripped.trim());
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_resume;

    #[test]
    fn strip_fences_with_json_tag() {
        assert_eq!(
            strip_json_fences("```json\n[\"a\"]\n```"),
            "[\"a\"]"
        );
    }

    #[test]
    fn strip_fences_plain() {
        assert_eq!(strip_json_fences("```\n[\"a\"]\n```"), "[\"a\"]");
    }

    #[test]
    fn strip_fences_noop_without_fences() {
        assert_eq!(strip_json_fences("[\"a\"]"), "[\"a\"]");
    }

    #[test]
    fn merge_replaces_descriptions_in_order() {
        let original = sample_resume().experience[0].achievements.clone();
        let merged = merged_achievements(&original, vec!["Slashed deploy time".to_string()]);
        assert_eq!(merged[0].description, "Slashed deploy time");
        // Metrics survive the rewrite.
        assert!(merged[0].metrics.is_some());
    }

    #[test]
    fn merge_keeps_originals_on_count_mismatch() {
        let original = sample_resume().experience[0].achievements.clone();
        let merged = merged_achievements(
            &original,
            vec!["one".to_string(), "two".to_string()],
        );
        assert_eq!(merged[0].description, original[0].description);
    }

    #[test]
    fn merge_ignores_empty_rewrites() {
        let original = sample_resume().experience[0].achievements.clone();
        let merged = merged_achievements(&original, vec!["  ".to_string()]);
        assert_eq!(merged[0].description, original[0].description);
    }

    #[test]
    fn client_requires_api_key() {
        // Serialize access to the env var with a dedicated name so this
        // cannot race other tests.
        unsafe { std::env::remove_var(API_KEY_VAR) };
        assert!(EnhanceClient::from_env(&crate::config::EnhanceConfig::default()).is_none());
    }
}
