mod api_client;
pub mod context_manager;

use crate::error::{Result, SnapshellError};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use api_client::APIClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message. Conversation turns are messages with the `User` or
/// `Assistant` role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Call boundary to the hosted chat-completion service. Implementations send
/// the messages in order and return the raw content of the single reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn chat(&self, messages: &[Message]) -> Result<String>;
}

/// A JSON object shape the model is required to answer with.
pub trait OutputShape: DeserializeOwned {
    /// Checks that go beyond field presence, e.g. non-empty strings.
    fn validate(&self) -> std::result::Result<(), String>;

    fn parse(body: &str) -> Result<Self> {
        let object = json_object(body)?;
        let value: Self = serde_json::from_value(object).map_err(|e| schema_mismatch(e, body))?;
        value.validate().map_err(SnapshellError::SchemaMismatch)?;
        Ok(value)
    }
}

/// Send `messages` and parse the reply into `T`.
pub async fn complete<T: OutputShape>(
    client: &dyn CompletionClient,
    messages: &[Message],
) -> Result<T> {
    let body = client.chat(messages).await?;
    T::parse(&body)
}

lazy_static! {
    static ref CODE_BLOCK_RE: Regex = Regex::new(r"(?s)```(?:json)?\s*(.+?)\s*```").unwrap();
}

/// JSON mode normally returns a bare object; some models still wrap it in a
/// fenced block. The bare body wins, so a fence inside a string value is left
/// alone. Arrays and scalars are rejected even though serde would map an
/// array onto a struct.
fn json_object(output: &str) -> Result<Value> {
    let value = match serde_json::from_str::<Value>(output.trim()) {
        Ok(value) => value,
        Err(bare_err) => match CODE_BLOCK_RE.captures(output).and_then(|c| c.get(1)) {
            Some(fenced) => {
                serde_json::from_str(fenced.as_str()).map_err(|e| schema_mismatch(e, output))?
            }
            None => return Err(schema_mismatch(bare_err, output)),
        },
    };

    if !value.is_object() {
        return Err(schema_mismatch("expected a JSON object", output));
    }
    Ok(value)
}

fn schema_mismatch(err: impl std::fmt::Display, body: &str) -> SnapshellError {
    SnapshellError::SchemaMismatch(format!("{}: {}", err, truncate(body, 120)))
}

fn truncate(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    impl OutputShape for Named {
        fn validate(&self) -> std::result::Result<(), String> {
            if self.name.is_empty() {
                return Err("name is empty".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_string(&Message::assistant("ls")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ls"}"#);
    }

    #[test]
    fn test_parse_accepts_bare_and_fenced_json() {
        assert_eq!(Named::parse(r#"{"name":"a"}"#).unwrap().name, "a");
        let fenced = "Here you go:\n```json\n{\"name\": \"b\"}\n```";
        assert_eq!(Named::parse(fenced).unwrap().name, "b");
    }

    #[test]
    fn test_parse_rejects_non_json_and_wrong_shape() {
        assert!(matches!(
            Named::parse("sure! try ls -la"),
            Err(SnapshellError::SchemaMismatch(_))
        ));
        assert!(matches!(
            Named::parse(r#"{"other":"x"}"#),
            Err(SnapshellError::SchemaMismatch(_))
        ));
        assert!(matches!(
            Named::parse(r#"{"name":""}"#),
            Err(SnapshellError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_parse_rejects_arrays_and_scalars() {
        for body in [r#"["a"]"#, "\"a\"", "42", "null", "```json\n[\"a\"]\n```"] {
            assert!(
                matches!(Named::parse(body), Err(SnapshellError::SchemaMismatch(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn test_parse_keeps_fences_inside_string_values() {
        let body = "{\"name\":\"Extracts it. Example:\\n```bash\\ntar -xzf a.tgz\\n```\"}";
        let parsed = Named::parse(body).unwrap();
        assert!(parsed.name.contains("```bash"));
        assert!(parsed.name.ends_with("```"));
    }
}
