use crate::error::Result;
use crate::llm::context_manager::ContextManager;
use crate::llm::{CompletionClient, Message};
use crate::suggest::{Resolution, SuggestionEngine};

/// One interactive session: the engine plus the conversation carried
/// between turns.
pub struct Session<C: CompletionClient> {
    engine: SuggestionEngine<C>,
    context_manager: ContextManager,
}

impl<C: CompletionClient> Session<C> {
    pub fn new(engine: SuggestionEngine<C>, max_context_turns: usize) -> Self {
        Session {
            engine,
            context_manager: ContextManager::new(max_context_turns),
        }
    }

    /// Resolve one query. Only successful turns are added to the context.
    pub async fn turn(&mut self, user_input: &str) -> Result<Resolution> {
        let history = self.context_manager.history();
        let resolution = self.engine.resolve(user_input, &history).await?;
        self.context_manager
            .add_exchange(user_input, &resolution.suggestion.command);
        Ok(resolution)
    }

    pub fn history(&self) -> Vec<Message> {
        self.context_manager.history()
    }

    pub fn reset(&mut self) {
        self.context_manager.clear();
    }

    pub fn engine(&self) -> &SuggestionEngine<C> {
        &self.engine
    }
}
