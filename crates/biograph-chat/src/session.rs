//! In-memory session registry.
//!
//! Maps an opaque session id to its ordered transcript. Sessions are created
//! lazily, deleted explicitly, and evicted least-recently-active first once
//! the registry reaches capacity. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use biograph_core::Turn;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of one conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            turns: Vec::new(),
            created_at: now,
            last_active_at: now,
        }
    }
}

/// Listing entry for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub turn_count: usize,
}

/// Exchange lock of one session entry.
///
/// A new entry gets a new gate, so pointer identity also tells whether the
/// entry a caller started on is still the one registered under its id.
pub type ExchangeGate = Arc<tokio::sync::Mutex<()>>;

struct Entry {
    session: Session,
    /// Serializes whole chat exchanges on this session.
    gate: ExchangeGate,
}

/// Shared keyed registry of sessions.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    capacity: usize,
}

impl SessionStore {
    /// Create a store holding at most `capacity` sessions (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Return the session for `id`, registering an empty one if unseen.
    pub fn get_or_create(&self, id: &str) -> Session {
        let mut sessions = self.registry();
        self.entry(&mut sessions, id).session.clone()
    }

    /// Append a turn. Unknown ids are ignored.
    pub fn append(&self, id: &str, turn: Turn) {
        let mut sessions = self.registry();
        match sessions.get_mut(id) {
            Some(entry) => {
                entry.session.turns.push(turn);
                entry.session.last_active_at = Utc::now();
            }
            None => {
                tracing::debug!(session_id = %id, "Append to unknown session ignored");
            }
        }
    }

    /// Append a turn only while `gate` still belongs to the entry for `id`.
    ///
    /// Returns `false` and records nothing once the entry has been deleted or
    /// evicted, even if a new session has since taken the same id.
    pub fn append_if(&self, id: &str, gate: &ExchangeGate, turn: Turn) -> bool {
        let mut sessions = self.registry();
        match sessions.get_mut(id) {
            Some(entry) if Arc::ptr_eq(&entry.gate, gate) => {
                entry.session.turns.push(turn);
                entry.session.last_active_at = Utc::now();
                true
            }
            _ => {
                tracing::debug!(session_id = %id, "Append to replaced session ignored");
                false
            }
        }
    }

    /// Whether `gate` belongs to the entry currently registered under `id`.
    pub fn is_current(&self, id: &str, gate: &ExchangeGate) -> bool {
        self.registry()
            .get(id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.gate, gate))
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.registry().remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session deleted");
        }
        removed
    }

    /// Ordered turns for `id`; empty if unknown.
    pub fn history(&self, id: &str) -> Vec<Turn> {
        self.registry()
            .get(id)
            .map(|entry| entry.session.turns.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summaries of all sessions, most recently active first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .registry()
            .values()
            .map(|entry| SessionSummary {
                id: entry.session.id.clone(),
                created_at: entry.session.created_at,
                last_active_at: entry.session.last_active_at,
                turn_count: entry.session.turns.len(),
            })
            .collect();
        summaries.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));
        summaries
    }

    /// Per-session exchange gate, registering the session if unseen.
    ///
    /// Holding the returned lock serializes exchanges on one id without
    /// blocking other ids.
    pub fn gate(&self, id: &str) -> ExchangeGate {
        let mut sessions = self.registry();
        Arc::clone(&self.entry(&mut sessions, id).gate)
    }

    // -- Private helpers --

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Session registry lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn entry<'a>(&self, sessions: &'a mut HashMap<String, Entry>, id: &str) -> &'a mut Entry {
        if !sessions.contains_key(id) {
            if sessions.len() >= self.capacity {
                evict_least_recent(sessions);
            }
            tracing::debug!(session_id = %id, "Session created");
        }
        sessions.entry(id.to_string()).or_insert_with(|| Entry {
            session: Session::new(id),
            gate: Arc::new(tokio::sync::Mutex::new(())),
        })
    }
}

fn evict_least_recent(sessions: &mut HashMap<String, Entry>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, entry)| entry.session.last_active_at)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::debug!(session_id = %id, "Session evicted at capacity");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use biograph_core::Speaker;

    fn store() -> SessionStore {
        SessionStore::new(100)
    }

    // ---- get_or_create ----

    #[test]
    fn test_new_session_has_empty_history() {
        let store = store();
        let session = store.get_or_create("s1");
        assert_eq!(session.id, "s1");
        assert!(session.turns.is_empty());
        assert!(store.history("s1").is_empty());
        assert!(store.contains("s1"));
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = store();
        let first = store.get_or_create("s1");
        store.append("s1", Turn::human("hi"));
        let second = store.get_or_create("s1");
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.turns, vec![Turn::human("hi")]);
        assert_eq!(store.len(), 1);
    }

    // ---- append ----

    #[test]
    fn test_append_preserves_order() {
        let store = store();
        store.get_or_create("s1");
        store.append("s1", Turn::human("q"));
        store.append("s1", Turn::assistant("a"));
        let speakers: Vec<Speaker> = store.history("s1").iter().map(|t| t.speaker).collect();
        assert_eq!(speakers, vec![Speaker::Human, Speaker::Assistant]);
    }

    #[test]
    fn test_append_unknown_id_is_noop() {
        let store = store();
        store.append("ghost", Turn::human("hello"));
        assert!(!store.contains("ghost"));
        assert!(store.history("ghost").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = store();
        store.get_or_create("a");
        store.get_or_create("b");
        store.append("a", Turn::human("for a"));
        assert_eq!(store.history("a").len(), 1);
        assert!(store.history("b").is_empty());
    }

    // ---- delete ----

    #[test]
    fn test_delete_twice_true_then_false() {
        let store = store();
        store.get_or_create("s1");
        assert!(store.delete("s1"));
        assert!(!store.delete("s1"));
    }

    #[test]
    fn test_delete_then_recreate_is_fresh() {
        let store = store();
        store.get_or_create("s1");
        store.append("s1", Turn::human("old"));
        assert!(store.delete("s1"));

        let session = store.get_or_create("s1");
        assert!(session.turns.is_empty());
        assert!(store.history("s1").is_empty());
    }

    #[test]
    fn test_delete_unknown_is_false() {
        assert!(!store().delete("never"));
    }

    // ---- capacity ----

    #[test]
    fn test_capacity_evicts_least_recently_active() {
        let store = SessionStore::new(2);
        store.get_or_create("old");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.get_or_create("busy");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.append("old", Turn::human("still here"));
        std::thread::sleep(std::time::Duration::from_millis(5));

        store.get_or_create("new");
        assert_eq!(store.len(), 2);
        assert!(store.contains("old"));
        assert!(store.contains("new"));
        assert!(!store.contains("busy"));
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let store = SessionStore::new(0);
        store.get_or_create("a");
        store.get_or_create("b");
        assert_eq!(store.len(), 1);
        assert!(store.contains("b"));
    }

    // ---- list / gate ----

    #[test]
    fn test_list_most_recent_first() {
        let store = store();
        store.get_or_create("first");
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.get_or_create("second");
        store.append("second", Turn::human("x"));

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "second");
        assert_eq!(list[0].turn_count, 1);
        assert_eq!(list[1].id, "first");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let store = store();
        store.get_or_create("s1");
        let json = serde_json::to_value(&store.list()[0]).unwrap();
        assert!(json.get("turnCount").is_some());
        assert!(json.get("lastActiveAt").is_some());
    }

    #[test]
    fn test_gate_registers_and_is_shared() {
        let store = store();
        let a = store.gate("s1");
        let b = store.gate("s1");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(store.contains("s1"));
    }

    #[test]
    fn test_gate_replaced_after_delete() {
        let store = store();
        let before = store.gate("s1");
        store.delete("s1");
        let after = store.gate("s1");
        assert!(!Arc::ptr_eq(&before, &after));
    }

    // ---- append_if ----

    #[test]
    fn test_append_if_records_on_current_entry() {
        let store = store();
        let gate = store.gate("s1");
        assert!(store.is_current("s1", &gate));
        assert!(store.append_if("s1", &gate, Turn::human("q")));
        assert_eq!(store.history("s1"), vec![Turn::human("q")]);
    }

    #[test]
    fn test_append_if_ignores_recreated_session() {
        let store = store();
        let stale = store.gate("s1");
        store.delete("s1");
        store.get_or_create("s1");

        assert!(!store.is_current("s1", &stale));
        assert!(!store.append_if("s1", &stale, Turn::assistant("late reply")));
        assert!(store.history("s1").is_empty());
    }

    #[test]
    fn test_append_if_ignores_evicted_session() {
        let store = SessionStore::new(1);
        let stale = store.gate("old");
        store.get_or_create("other");
        assert!(!store.contains("old"));

        assert!(!store.append_if("old", &stale, Turn::human("lost")));
        assert!(!store.contains("old"));
        assert!(store.history("other").is_empty());
    }
}
