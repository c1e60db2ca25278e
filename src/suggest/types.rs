use crate::llm::OutputShape;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SELECT_SHAPE_RE: Regex = Regex::new(r"(?is)^\s*(select|with)\b").unwrap();
}

/// Final answer shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSuggestion {
    pub command: String,
    pub explanation: String,
}

impl OutputShape for CommandSuggestion {
    fn validate(&self) -> Result<(), String> {
        if self.command.trim().is_empty() {
            return Err("suggestion has an empty command".to_string());
        }
        Ok(())
    }
}

/// Inventory query proposed by the model in the first stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub query: String,
}

impl OutputShape for CandidateQuery {
    fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query is empty".to_string());
        }
        if !SELECT_SHAPE_RE.is_match(&self.query) {
            return Err(format!("not a SELECT query: {}", self.query));
        }
        Ok(())
    }
}
