//! The suggestion pipeline.
//!
//! A turn asks the model for an inventory query, runs it against the local
//! package store and, when that yields rows, grounds the final request in
//! those packages. When no usable query comes back, or the query matches
//! nothing, the final request is sent with a short note explaining why
//! instead. There is exactly one such fallback; a failed final request is
//! returned to the caller.

pub mod formulator;
pub mod prompts;
pub mod types;

use crate::config::Config;
use crate::error::{Result, SnapshellError};
use crate::inventory::{InventoryStore, PackageRecord};
use crate::llm::{self, CompletionClient, Message};
use log::{debug, info, warn};
use std::fmt;

pub use types::{CandidateQuery, CommandSuggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The first stage did not return a usable query object.
    NoQuery,
    /// The query ran but matched no packages (or failed to run).
    NoPackages,
}

impl FallbackReason {
    fn prompt_note(&self) -> &'static str {
        match self {
            FallbackReason::NoQuery => {
                "Could not formulate a query against the installed packages. Interpreting the query directly."
            }
            FallbackReason::NoPackages => "No relevant packages found in the database.",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoQuery => f.write_str("could not formulate query"),
            FallbackReason::NoPackages => f.write_str("no relevant packages found"),
        }
    }
}

/// What the final request was grounded on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Basis {
    Packages(Vec<PackageRecord>),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub suggestion: CommandSuggestion,
    pub basis: Basis,
}

pub struct SuggestionEngine<C: CompletionClient> {
    client: C,
    store: InventoryStore,
    package_manager: String,
    credential_configured: bool,
}

impl<C: CompletionClient> SuggestionEngine<C> {
    pub fn new(
        config: &Config,
        client: C,
        store: InventoryStore,
        package_manager: impl Into<String>,
    ) -> Self {
        SuggestionEngine {
            client,
            store,
            package_manager: package_manager.into(),
            credential_configured: config.has_api_key(),
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub async fn suggest(&self, user_input: &str, history: &[Message]) -> Result<CommandSuggestion> {
        Ok(self.resolve(user_input, history).await?.suggestion)
    }

    /// Run the full pipeline for one user turn.
    pub async fn resolve(&self, user_input: &str, history: &[Message]) -> Result<Resolution> {
        if !self.credential_configured {
            return Err(SnapshellError::CredentialMissing);
        }

        let basis = match formulator::formulate(&self.client, user_input).await? {
            None => Basis::Fallback(FallbackReason::NoQuery),
            Some(candidate) => {
                let packages = self.store.lookup(&candidate.query);
                if packages.is_empty() {
                    Basis::Fallback(FallbackReason::NoPackages)
                } else {
                    Basis::Packages(packages)
                }
            }
        };

        let system_prompt = match &basis {
            Basis::Packages(packages) => {
                info!("Grounding suggestion on {} installed packages", packages.len());
                prompts::grounded_prompt(packages, &self.package_manager)
            }
            Basis::Fallback(reason) => {
                info!("Falling back to direct interpretation: {}", reason);
                prompts::fallback_prompt(reason.prompt_note(), &self.package_manager)
            }
        };

        let messages = build_messages(system_prompt, history, user_input);
        let suggestion: CommandSuggestion = llm::complete(&self.client, &messages).await?;
        debug!("Suggested command: {}", suggestion.command);

        if let Err(e) =
            self.store
                .record_suggestion(user_input, &suggestion.command, &suggestion.explanation)
        {
            warn!("Failed to save suggestion to history: {}", e);
        }

        Ok(Resolution { suggestion, basis })
    }
}

fn build_messages(system_prompt: String, history: &[Message], user_input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(Message::user(user_input));
    messages
}
