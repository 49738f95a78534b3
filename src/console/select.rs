//! Picking one id from the entities currently on display.

use std::collections::BTreeSet;

use crate::error::EmptyCandidates;
use crate::types::{Id, Listed};

use super::signal::Prompted;
use super::terminal::Console;

/// The ids a user may select right now. Never empty.
///
/// Rebuilt whenever the displayed list changes; a typed id is only
/// accepted if it is in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    ids: BTreeSet<Id>,
}

impl CandidateSet {
    /// # Errors
    /// [`EmptyCandidates`] if `ids` yields nothing. Callers must check for an
    /// empty listing before asking the user to pick from it.
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Result<Self, EmptyCandidates> {
        let ids: BTreeSet<Id> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(EmptyCandidates);
        }
        Ok(CandidateSet { ids })
    }

    pub fn from_records<T: Listed>(records: &[T]) -> Result<Self, EmptyCandidates> {
        CandidateSet::new(records.iter().map(Listed::id))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.ids.iter().copied()
    }
}

impl Console {
    /// Read an id until it is one of `candidates`.
    ///
    /// Non-numeric input and unknown ids re-prompt; a cancel token
    /// passes through as the signal.
    pub fn read_id_from_candidates(&mut self, prompt: &str, candidates: &CandidateSet) -> Prompted<Id> {
        loop {
            let id = self.read_int(prompt)?;
            if candidates.contains(id) {
                return Ok(id);
            }
            self.warn(format!("No item with id {} in this list.", id));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
