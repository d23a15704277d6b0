use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::reading::Reading;

// A thread-safe store of the latest reading per plant, using RwLock for
// concurrent access. Allows multiple readers or one writer at a time.
// Every critical section is a single map operation, so a poisoned lock
// still guards a consistent map and is recovered instead of propagated.
#[derive(Clone, Default)]
pub struct ReadingStore {
    readings: Arc<RwLock<HashMap<i64, Reading>>>,
}

impl ReadingStore {
    // Create a new ReadingStore with an empty HashMap
    pub fn new() -> Self {
        Self::default()
    }

    // Insert the reading, replacing any earlier one for the same plant
    pub fn upsert(&self, reading: Reading) {
        // Acquire a write lock to safely modify the map
        let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
        readings.insert(reading.plant_id, reading);
    }

    // Snapshot of every current reading, ordered by plant id
    pub fn list_all(&self) -> Vec<Reading> {
        let mut snapshot: Vec<Reading> = {
            let readings = self.readings.read().unwrap_or_else(PoisonError::into_inner);
            readings.values().cloned().collect()
        };
        snapshot.sort_by_key(|r| r.plant_id);
        snapshot
    }

    pub fn get(&self, plant_id: i64) -> Option<Reading> {
        let readings = self.readings.read().unwrap_or_else(PoisonError::into_inner);
        readings.get(&plant_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.readings.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
