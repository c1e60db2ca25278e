use crate::error::{Result, SnapshellError};
use crate::llm::{self, CompletionClient, Message};
use crate::suggest::prompts::FORMULATION_PROMPT;
use crate::suggest::types::CandidateQuery;
use log::debug;

/// Ask the model for an inventory query.
///
/// Returns `Ok(None)` when the reply is not a usable query object; the caller
/// then answers without package context. Transport failures are returned as
/// errors since the final call would fail the same way.
pub async fn formulate(
    client: &dyn CompletionClient,
    user_input: &str,
) -> Result<Option<CandidateQuery>> {
    // No conversation history here: the query only depends on this input.
    let messages = [Message::system(FORMULATION_PROMPT), Message::user(user_input)];

    match llm::complete::<CandidateQuery>(client, &messages).await {
        Ok(candidate) => {
            debug!("Formulated inventory query: {}", candidate.query);
            Ok(Some(candidate))
        }
        Err(SnapshellError::SchemaMismatch(reason)) => {
            debug!("Discarding formulated query: {}", reason);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
