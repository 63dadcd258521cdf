//! Conversation context windowing.
//!
//! Decides how much of a session's transcript is replayed to the model.

use biograph_core::{Speaker, Turn};

/// Sliding window over a transcript, always applied before each model call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Maximum number of turns kept. `0` keeps none.
    pub max_turns: usize,
}

impl HistoryWindow {
    pub fn new(max_turns: usize) -> Self {
        Self { max_turns }
    }

    /// Keep the most recent `max_turns` turns, in original order.
    ///
    /// When the cut would leave an assistant turn first, it is dropped too so
    /// the window never opens on a reply without its question. After whole
    /// exchanges this means odd sizes send one turn fewer, and `1` sends none.
    pub fn apply(&self, turns: &[Turn]) -> Vec<Turn> {
        if self.max_turns == 0 {
            return Vec::new();
        }
        let mut start = turns.len().saturating_sub(self.max_turns);
        if start > 0 && turns[start].speaker == Speaker::Assistant {
            start += 1;
        }
        turns[start..].to_vec()
    }
}

// =============================================================================
// Tests
// =============================================================================
