use crate::llm::{ConversationTurn, Role};

/// Ordered, append-only turn history for one session.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn add_user(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::user(content));
    }

    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::assistant(content));
    }

    pub fn add_system(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::system(content));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Non-system turn contents, oldest first, one per line.
    pub fn flatten(&self) -> String {
        self.turns
            .iter()
            .filter(|t| t.role != Role::System)
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_skips_system_turns() {
        let mut store = ConversationStore::new();
        store.add_system("conversation started");
        store.add_user("A bakery site");
        store.add_assistant("Sure, what colors?");
        store.add_user("Warm browns");

        assert_eq!(store.len(), 4);
        assert_eq!(store.flatten(), "A bakery site\nSure, what colors?\nWarm browns");
    }

    #[test]
    fn test_clear() {
        let mut store = ConversationStore::new();
        store.add_user("hi");
        store.clear();
        assert!(store.is_empty());
        assert!(store.last_turn().is_none());
        assert_eq!(store.flatten(), "");
    }
}
