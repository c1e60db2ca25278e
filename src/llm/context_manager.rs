use crate::llm::{Message, Role};
use std::collections::VecDeque;

/// Bounded conversation context carried between turns of one session.
#[derive(Clone, Debug)]
pub struct ContextManager {
    turns: VecDeque<Message>,
    max_turns: usize,
}

impl ContextManager {
    pub fn new(max_turns: usize) -> Self {
        ContextManager {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Record a completed exchange: the user's text and the suggested
    /// command. Oldest turns are dropped once the cap is exceeded.
    pub fn add_exchange(&mut self, user_input: &str, command: &str) {
        self.push(Message::user(user_input));
        self.push(Message::assistant(command));
    }

    fn push(&mut self, message: Message) {
        debug_assert!(message.role != Role::System);
        self.turns.push_back(message);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    pub fn history(&self) -> Vec<Message> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_never_exceeds_cap() {
        let mut context = ContextManager::new(16);
        for i in 0..50 {
            context.add_exchange(&format!("question {i}"), &format!("cmd {i}"));
            assert!(context.len() <= 16);
        }
        assert_eq!(context.len(), 16);
    }

    #[test]
    fn test_oldest_exchange_dropped_first() {
        let mut context = ContextManager::new(4);
        context.add_exchange("q0", "c0");
        context.add_exchange("q1", "c1");
        context.add_exchange("q2", "c2");

        let history = context.history();
        assert_eq!(
            history,
            vec![
                Message::user("q1"),
                Message::assistant("c1"),
                Message::user("q2"),
                Message::assistant("c2"),
            ]
        );
    }

    #[test]
    fn test_clear_empties_context() {
        let mut context = ContextManager::new(16);
        context.add_exchange("q", "c");
        context.clear();
        assert!(context.is_empty());
    }
}
