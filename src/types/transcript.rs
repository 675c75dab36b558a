use std::collections::VecDeque;

use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub role: Role,
    pub content: String,
}

impl Entry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Entry { role, content: content.into() }
    }
}

/// Conversation log sent to the model on every round-trip.
///
/// The system directive is pinned in front of everything else and is never
/// evicted. Other entries are retained up to `limit`; once the limit is hit
/// the oldest entry goes first.
#[derive(Debug, Clone)]
pub struct Transcript {
    system: Entry,
    entries: VecDeque<Entry>,
    limit: usize,
}

impl Transcript {
    pub fn new(system_directive: impl Into<String>, limit: usize) -> Self {
        Transcript {
            system: Entry::new(Role::System, system_directive),
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Entry::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Entry::new(Role::Assistant, content));
    }

    /// Feed a capability result back to the model as a user-role observe turn.
    pub fn push_observation(&mut self, output: &str) {
        let content = json!({ "step": "observe", "output": output }).to_string();
        self.push(Entry::new(Role::User, content));
    }

    fn push(&mut self, entry: Entry) {
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All entries in send order, system directive first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        std::iter::once(&self.system).chain(self.entries.iter())
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.back()
    }

    /// Number of entries including the system directive.
    pub fn len(&self) -> usize {
        self.entries.len() + 1
    }
}
