mod types;

pub use types::*;

use tracing::debug;
use uuid::Uuid;

/// Ordered chat turns for one session. Owned by whoever drives the
/// conversation; nothing here is shared or global.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    session_id: Uuid,
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::with_session_id(Uuid::new_v4())
    }

    pub fn with_session_id(session_id: Uuid) -> Self {
        Self {
            session_id,
            turns: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn push(&mut self, turn: Turn) {
        debug!(
            "Session {}: recording {} turn #{}",
            self.session_id,
            turn.role,
            self.turns.len() + 1
        );
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Turn::user(content.into()));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Turn::assistant(content.into()));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
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

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
