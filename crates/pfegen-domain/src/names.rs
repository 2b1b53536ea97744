//! Bounded name lists used for supervisors and jury members

use std::fmt;

/// Maximum number of supervisors on a report
pub const SUPERVISOR_CAPACITY: usize = 2;

/// Maximum number of jury members on a report
pub const JURY_CAPACITY: usize = 5;

/// Errors raised when mutating a [`NameList`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Index does not point at an existing entry
    OutOfRange {
        /// Requested index
        index: usize,
        /// Current list length
        len: usize,
    },

    /// Removing the entry would leave the list empty
    LastEntry,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::OutOfRange { index, len } => {
                write!(f, "index {} out of range (list has {} entries)", index, len)
            }
            ListError::LastEntry => write!(f, "cannot remove the last remaining entry"),
        }
    }
}

impl std::error::Error for ListError {}

/// Ordered list of names with a fixed upper bound and a lower bound of one.
///
/// Entries may be blank while the user is still filling the form; blank
/// entries are skipped when the list is rendered into a prompt.
///
/// # Examples
///
/// ```
/// use pfegen_domain::NameList;
///
/// let mut supervisors = NameList::new(2);
/// assert!(supervisors.push("Dr. Amrani"));
/// assert_eq!(supervisors.len(), 2);
///
/// // At capacity: no-op
/// assert!(!supervisors.push("Dr. Berrada"));
/// assert_eq!(supervisors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameList {
    names: Vec<String>,
    capacity: usize,
}

impl NameList {
    /// Create a list holding a single blank entry
    pub fn new(capacity: usize) -> Self {
        Self {
            names: vec![String::new()],
            capacity: capacity.max(1),
        }
    }

    /// Build a list from existing names.
    ///
    /// Extra names beyond `capacity` are dropped, and an empty input yields
    /// a single blank entry so the list never starts empty.
    pub fn from_names<I, S>(names: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let capacity = capacity.max(1);
        let mut names: Vec<String> = names.into_iter().take(capacity).map(Into::into).collect();
        if names.is_empty() {
            names.push(String::new());
        }
        Self { names, capacity }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries (blank entries included)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether another entry can be added
    pub fn is_full(&self) -> bool {
        self.names.len() >= self.capacity
    }

    /// Whether the remove action is available (more than one entry)
    pub fn can_remove(&self) -> bool {
        self.names.len() > 1
    }

    /// Append a name. Returns `false` and leaves the list untouched when full.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        self.names.push(name.into());
        true
    }

    /// Append a blank entry for the user to fill
    pub fn push_empty(&mut self) -> bool {
        self.push(String::new())
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> Result<String, ListError> {
        if index >= self.names.len() {
            return Err(ListError::OutOfRange {
                index,
                len: self.names.len(),
            });
        }
        if !self.can_remove() {
            return Err(ListError::LastEntry);
        }
        Ok(self.names.remove(index))
    }

    /// Replace the entry at `index`
    pub fn set(&mut self, index: usize, name: impl Into<String>) -> Result<(), ListError> {
        let len = self.names.len();
        let slot = self
            .names
            .get_mut(index)
            .ok_or(ListError::OutOfRange { index, len })?;
        *slot = name.into();
        Ok(())
    }

    /// All entries in order, blank ones included
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Non-blank entries, trimmed, in order
    pub fn filled(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    /// Non-blank entries joined as a readable list
    pub fn joined(&self) -> String {
        self.filled().collect::<Vec<_>>().join(", ")
    }
}
