use crate::entities::{AddressQuery, CoordinateOutcome};
use parking_lot::{Mutex, MutexGuard};
use std::{collections::HashMap, sync::Arc};

/// A slot holds the outcome of a single query.
///
/// An empty slot is either pending (locked by the thread that
/// is currently asking the provider) or its last lookup was
/// not cacheable.
#[derive(Debug, Clone, Default)]
pub struct CacheSlot(Arc<Mutex<Option<CoordinateOutcome>>>);

impl CacheSlot {
    /// Blocks while another thread holds the slot.
    pub fn lock(&self) -> MutexGuard<'_, Option<CoordinateOutcome>> {
        self.0.lock()
    }

    fn peek(&self) -> Option<CoordinateOutcome> {
        // Pending slots are not visible yet.
        self.0.try_lock().and_then(|outcome| *outcome)
    }
}

/// Outcomes of already resolved queries.
///
/// The cache lives as long as a single batch run and is never
/// persisted. Entries are never evicted.
#[derive(Debug, Default)]
pub struct CoordinateCache {
    slots: Mutex<HashMap<AddressQuery, CacheSlot>>,
}

impl CoordinateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, query: &str) -> Option<CoordinateOutcome> {
        let slot = self.slots.lock().get(query).cloned()?;
        slot.peek()
    }

    /// Last write wins.
    pub fn insert(&self, query: AddressQuery, outcome: CoordinateOutcome) {
        let slot = self.slots.lock().entry(query).or_default().clone();
        *slot.lock() = Some(outcome);
    }

    /// Returns the slot of the query, creating an empty one on first use.
    ///
    /// Locking the returned slot is the claim step: concurrent
    /// requests for the same query wait until the claiming thread
    /// has filled (or given up) the slot.
    pub fn slot(&self, query: &AddressQuery) -> CacheSlot {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(query.as_str()) {
            return slot.clone();
        }
        let slot = CacheSlot::default();
        slots.insert(query.clone(), slot.clone());
        slot
    }

    /// Number of stored outcomes.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.peek().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
