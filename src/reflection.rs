//! Boundary to the hosted language model that turns a doodle summary into a
//! short emotional reflection.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::error::JournalResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const SYSTEM_PROMPT: &str = r#"You are a gentle journaling companion.
You receive a technical summary of a doodle (colors, strokes, shapes, energy, etc.).
You must return JSON with two fields:

{
  "reflection": "...",   // 3–6 sentences, soft emotional reflection
  "encouragement": "..." // 1 short supportive sentence, friendly but not cheesy
}

Do not add any other keys. Do not add explanation outside JSON."#;

/// What the model is expected to hand back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub reflection: String,
    pub encouragement: String,
}

impl Reflection {
    pub fn is_empty(&self) -> bool {
        self.reflection.trim().is_empty()
    }
}

/// The two prompts sent for one summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl ReflectionRequest {
    pub fn new(summary: &str) -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: format!(
                "Here is the doodle summary:\n\n{summary}\n\nReturn only JSON as described above."
            ),
        }
    }
}

/// Reads the model's message content. JSON objects supply the two fields
/// (missing ones become empty); any other JSON value yields an empty
/// reflection; non-JSON text becomes the reflection verbatim.
pub fn parse_reflection(content: &str) -> Reflection {
    let content = content.trim();
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Reflection {
                reflection: field("reflection"),
                encouragement: field("encouragement"),
            }
        }
        Ok(_) => Reflection::default(),
        Err(_) => {
            tracing::warn!("reflection was not JSON, using raw content");
            Reflection {
                reflection: content.to_string(),
                encouragement: String::new(),
            }
        }
    }
}

/// `choices[0].message.content` of a chat-completions response, trimmed.
pub fn extract_message_content(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Something that can turn a summary into a reflection. `Ok(None)` means the
/// service gave no usable answer; callers keep the summary either way.
pub trait Reflector {
    fn reflect(&self, summary: &str) -> JournalResult<Option<Reflection>>;
}

/// Chat-completions client over blocking reqwest.
#[derive(Debug)]
pub struct ChatCompletionsReflector {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    temperature: f64,
    api_key: Option<String>,
}

impl ChatCompletionsReflector {
    /// Builds a client from config, reading the key from the configured env var.
    pub fn from_config(config: &Config) -> JournalResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn request_body(&self, request: &ReflectionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": self.temperature,
        })
    }
}

impl Reflector for ChatCompletionsReflector {
    fn reflect(&self, summary: &str) -> JournalResult<Option<Reflection>> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("no API key set, skipping reflection");
            return Ok(None);
        };

        let request = ReflectionRequest::new(summary);
        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(&request))
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, "reflection request not sent: {e}");
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%status, body = %body, "reflection request failed");
            return Ok(None);
        }

        let body: Value = match response.json() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("reflection response unreadable: {e}");
                return Ok(None);
            }
        };
        let reflection = parse_reflection(&extract_message_content(&body));
        if reflection.is_empty() {
            tracing::warn!("reflection service returned no text");
            return Ok(None);
        }
        tracing::info!(model = %self.model, "reflection received");
        Ok(Some(reflection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_wraps_summary() {
        let req = ReflectionRequest::new("Stroke count: 3");
        assert!(req.user_prompt.starts_with("Here is the doodle summary:\n\nStroke count: 3"));
        assert!(req.user_prompt.ends_with("Return only JSON as described above."));
        assert!(req.system_prompt.starts_with("You are a gentle journaling companion."));
    }

    #[test]
    fn parses_json_fields() {
        let r = parse_reflection(r#" {"reflection":"Soft loops.","encouragement":"Keep going."} "#);
        assert_eq!(r.reflection, "Soft loops.");
        assert_eq!(r.encouragement, "Keep going.");
    }

    #[test]
    fn missing_fields_become_empty() {
        let r = parse_reflection(r#"{"reflection":"Only this."}"#);
        assert_eq!(r.reflection, "Only this.");
        assert_eq!(r.encouragement, "");
    }

    #[test]
    fn plain_text_becomes_reflection() {
        let r = parse_reflection("  Your doodle feels calm.  ");
        assert_eq!(r.reflection, "Your doodle feels calm.");
        assert_eq!(r.encouragement, "");
    }

    #[test]
    fn non_object_json_is_empty() {
        assert!(parse_reflection("42").is_empty());
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = json!({"choices": [{"message": {"content": "  hi  "}}]});
        assert_eq!(extract_message_content(&body), "hi");
        assert_eq!(extract_message_content(&json!({})), "");
    }

    #[test]
    fn request_body_shape() {
        let reflector = ChatCompletionsReflector::from_config(&Config::default())
            .unwrap()
            .with_api_key("test");
        let body = reflector.request_body(&ReflectionRequest::new("x"));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn no_key_means_no_reflection() {
        let mut config = Config::default();
        config.api_key_env = "DOODLE_JOURNAL_TEST_UNSET_KEY".into();
        let reflector = ChatCompletionsReflector::from_config(&config).unwrap();
        assert_eq!(reflector.reflect("Stroke count: 1").unwrap(), None);
    }

    #[test]
    fn unreachable_endpoint_means_no_reflection() {
        let config = Config {
            // nothing listens on the discard port
            endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
            ..Config::default()
        };
        let reflector = ChatCompletionsReflector::from_config(&config)
            .unwrap()
            .with_api_key("test");
        assert_eq!(reflector.reflect("Stroke count: 1").unwrap(), None);
    }
}
