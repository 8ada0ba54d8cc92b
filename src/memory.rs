//! Conversation Memory - bounded window of prior turns folded into prompts

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many recent turns are folded into the next prompt.
pub const MEMORY_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One conversation turn. Appended in chronological order, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Session-scoped, append-only conversation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the most recent [`MEMORY_WINDOW`] turns, oldest first, one
    /// `role: content` line per turn.
    pub fn window(&self) -> String {
        let start = self.turns.len().saturating_sub(MEMORY_WINDOW);
        self.turns[start..]
            .iter()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_bounded_and_order_preserving() {
        let mut memory = ConversationMemory::new();
        for i in 0..8 {
            if i % 2 == 0 {
                memory.push_user(format!("question {}", i));
            } else {
                memory.push_assistant(format!("answer {}", i));
            }
        }

        let window = memory.window();
        let lines: Vec<&str> = window.lines().collect();
        assert_eq!(lines.len(), MEMORY_WINDOW);
        assert_eq!(lines[0], "assistant: answer 3");
        assert_eq!(lines[4], "assistant: answer 7");
        // Full history is retained even though the window is bounded.
        assert_eq!(memory.len(), 8);
    }

    #[test]
    fn window_with_few_turns_renders_all() {
        let mut memory = ConversationMemory::new();
        memory.push_user("hello");
        assert_eq!(memory.window(), "user: hello");
    }
}
