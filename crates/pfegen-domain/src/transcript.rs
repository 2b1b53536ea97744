//! Transcript module - chat history shown to the user
//!
//! The transcript is for display only. The model keeps its own context
//! inside the conversation session; nothing here is replayed to it.

use std::fmt;
use std::time::SystemTime;

/// Unique identifier for a transcript entry, based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Generate a new time-ordered id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Raw 128-bit value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the drafting assistant
    Assistant,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in the chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Unique id
    pub id: EntryId,
    /// Who wrote it
    pub role: Role,
    /// Message text
    pub text: String,
    /// When it was created
    pub created_at: SystemTime,
}

impl TranscriptEntry {
    /// Create an entry stamped with the current time
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self::at(role, text, SystemTime::now())
    }

    /// Create an entry with an explicit timestamp
    pub fn at(role: Role, text: impl Into<String>, created_at: SystemTime) -> Self {
        Self {
            id: EntryId::new(),
            role,
            text: text.into(),
            created_at,
        }
    }
}

/// Append-only sequence of entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Drop every entry. Only a fresh generation does this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }
}
