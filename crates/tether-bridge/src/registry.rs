//! Token-keyed table of pending dispatches and bound functions.
//!
//! Tokens are handed to the native engine as opaque routing keys; when the
//! engine calls back with a token, the bridge looks the entry up here.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::marshal::BoundFunction;

/// Opaque identifier of one live registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(u64);

impl Token {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Work posted to the engine thread.
pub type DispatchFn = Box<dyn FnOnce() + Send + 'static>;

/// A registered host callback.
pub enum Entry {
    /// One-shot work, removed when it runs.
    Dispatch(DispatchFn),
    /// A page-callable function, never removed.
    Binding(Arc<BoundFunction>),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Dispatch(_) => f.write_str("Dispatch(..)"),
            Entry::Binding(function) => f.debug_tuple("Binding").field(function).finish(),
        }
    }
}

struct Table {
    entries: HashMap<Token, Entry>,
    /// Next candidate for allocation. Probing starts here, not at zero.
    cursor: u64,
}

/// Mutex-guarded token table shared by the binder and the dispatch queue.
///
/// The lock covers table reads and writes only. Callbacks are always
/// handed out (cloned or removed) and run after the guard is dropped, so a
/// callback may itself allocate entries.
pub struct CallRegistry {
    table: Mutex<Table>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                entries: HashMap::new(),
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `entry` under the first free token at or above the cursor.
    pub fn allocate(&self, entry: Entry) -> Token {
        let mut table = self.lock();
        let mut candidate = table.cursor;
        while table.entries.contains_key(&Token(candidate)) {
            candidate = candidate.wrapping_add(1);
        }
        table.entries.insert(Token(candidate), entry);
        table.cursor = candidate.wrapping_add(1);
        Token(candidate)
    }

    /// Look up a bound function. The returned handle outlives the lock.
    pub fn binding(&self, token: Token) -> Option<Arc<BoundFunction>> {
        match self.lock().entries.get(&token) {
            Some(Entry::Binding(function)) => Some(Arc::clone(function)),
            _ => None,
        }
    }

    /// Look up and remove a dispatch entry in one critical section, so a
    /// token can yield its work at most once.
    pub fn take_dispatch(&self, token: Token) -> Option<DispatchFn> {
        let mut table = self.lock();
        if !matches!(table.entries.get(&token), Some(Entry::Dispatch(_))) {
            return None;
        }
        match table.entries.remove(&token) {
            Some(Entry::Dispatch(work)) => Some(work),
            _ => None,
        }
    }

    pub fn remove(&self, token: Token) -> Option<Entry> {
        self.lock().entries.remove(&token)
    }

    pub fn contains(&self, token: Token) -> bool {
        self.lock().entries.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
