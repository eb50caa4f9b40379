//! Shared test store.

#![allow(dead_code)]

use std::sync::Mutex;

use canopy::{ContentStore, CountQuery, ItemQuery, QueryResult};

/// In-memory store that records every query it receives.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub total: u64,
    pub counts: Mutex<Vec<CountQuery>>,
    pub fetches: Mutex<Vec<ItemQuery>>,
}

impl RecordingStore {
    pub fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn count_calls(&self) -> usize {
        self.counts.lock().unwrap().len()
    }

    pub fn fetches(&self) -> Vec<ItemQuery> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn last_fetch(&self) -> ItemQuery {
        self.fetches().pop().expect("no fetch recorded")
    }
}

impl ContentStore for RecordingStore {
    type Item = u64;

    fn count(&self, query: &CountQuery) -> QueryResult<u64> {
        self.counts.lock().unwrap().push(query.clone());
        Ok(self.total)
    }

    fn fetch(&self, query: &ItemQuery) -> QueryResult<Option<Vec<u64>>> {
        self.fetches.lock().unwrap().push(query.clone());
        let end = (query.offset + query.limit).min(self.total);
        Ok(Some((query.offset..end).collect()))
    }
}
