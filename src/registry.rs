// ABOUTME: The three global collections the server's coarse lock protects together
// ABOUTME: Name -> session map, the symmetric active-chat-pair set, and pending requests

use crate::session::Session;
use std::collections::{HashMap, HashSet};

/// The client registry, active session set, and pending-response set from
/// the data model. Always reached through `ServerState`'s single lock;
/// this type has no locking of its own, by design (see invariant 5).
#[derive(Default)]
pub struct Registry {
    clients: HashMap<String, Session>,
    active: HashSet<(String, String)>,
    /// Names with an outstanding `REQ_CHAT_FROM` awaiting `ACCEPT_CHAT` or
    /// `DENY_CHAT`. A name present here refuses a second `REQ_CHAT` (the
    /// "one pending request at a time" reading of the pending-response
    /// set; see the SET_NAME/pending-set open questions in DESIGN.md).
    pending: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn get(&self, name: &str) -> Option<&Session> {
        self.clients.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// All registered names, in unspecified order (§4.5.3: "order is
    /// unspecified").
    pub fn names(&self) -> Vec<String> {
        self.clients.keys().cloned().collect()
    }

    pub fn insert(&mut self, name: String, session: Session) {
        self.clients.insert(name, session);
    }

    /// Removes `name` only if it still maps to `session` (invariant 6:
    /// guards against a name re-registration race where a new session
    /// claimed the name between this session's disconnect starting and
    /// the lock being acquired).
    pub fn remove_if_owned_by(&mut self, name: &str, session: &Session) {
        if let Some(current) = self.clients.get(name) {
            if current.name() == session.name() && current.addr() == session.addr() {
                self.clients.remove(name);
            }
        }
    }

    pub fn has_pending(&self, name: &str) -> bool {
        self.pending.contains(name)
    }

    pub fn mark_pending(&mut self, name: String) {
        self.pending.insert(name);
    }

    pub fn clear_pending(&mut self, name: &str) {
        self.pending.remove(name);
    }

    pub fn is_active(&self, a: &str, b: &str) -> bool {
        self.active.contains(&(a.to_string(), b.to_string()))
    }

    /// Adds both ordered pairs, preserving pair symmetry (invariant 3).
    pub fn activate_pair(&mut self, a: &str, b: &str) {
        self.active.insert((a.to_string(), b.to_string()));
        self.active.insert((b.to_string(), a.to_string()));
    }

    /// Removes both ordered pairs.
    pub fn deactivate_pair(&mut self, a: &str, b: &str) {
        self.active.remove(&(a.to_string(), b.to_string()));
        self.active.remove(&(b.to_string(), a.to_string()));
    }

    /// Removes every active-set pair mentioning `name`, in either
    /// position, used during disconnect cleanup.
    pub fn purge_name_from_active(&mut self, name: &str) {
        self.active.retain(|(a, b)| a != name && b != name);
    }
}
