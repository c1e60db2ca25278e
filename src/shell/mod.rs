mod session;

use crate::llm::CompletionClient;
use crate::suggest::SuggestionEngine;
use crate::terminal::{self, Terminal};
use anyhow::Result;
use colored::*;
use log::debug;

pub use session::Session;

/// Where the loop reads queries from. `None` ends the session.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl LineSource for Terminal {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.read_line()
    }
}

/// The interactive read-suggest-print loop.
pub struct Shell<C: CompletionClient, L: LineSource = Terminal> {
    input: L,
    session: Session<C>,
}

impl<C: CompletionClient, L: LineSource> Shell<C, L> {
    pub fn new(input: L, engine: SuggestionEngine<C>, max_context_turns: usize) -> Self {
        Shell {
            input,
            session: Session::new(engine, max_context_turns),
        }
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub async fn run(&mut self) -> Result<()> {
        terminal::print_welcome();

        while let Some(input) = self.input.next_line()? {
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            if input.eq_ignore_ascii_case("exit") {
                break;
            }

            if self.handle_builtin_command(input) {
                continue;
            }

            self.process_input(input).await;
            terminal::print_rule();
        }

        terminal::print_goodbye();
        Ok(())
    }

    /// Returns `true` when `input` was a built-in and has been handled.
    fn handle_builtin_command(&mut self, input: &str) -> bool {
        match input.to_ascii_lowercase().as_str() {
            "help" => terminal::print_help(),
            "history" => match self.session.engine().store().history() {
                Ok(records) => terminal::print_history(&records),
                Err(e) => terminal::print_error(&e.to_string()),
            },
            "reset" => {
                self.session.reset();
                println!("{}", "Conversation context cleared.".green());
            }
            _ => return false,
        }
        true
    }

    /// A failed turn is reported and the loop carries on.
    async fn process_input(&mut self, input: &str) {
        println!("{}", "Fetching command suggestion...".cyan());
        match self.session.turn(input).await {
            Ok(resolution) => terminal::print_resolution(&resolution),
            Err(e) => {
                debug!("Turn failed for {:?}: {:?}", input, e);
                terminal::print_error(&e.to_string());
            }
        }
    }
}
