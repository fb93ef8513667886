//! Sliding one-day window of search requests, counting those that found
//! nothing.
//!
//! Time comes from an injected [`Clock`] measured in minutes. [`TickClock`]
//! advances one minute on every reading, so each request lands in its own
//! minute.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::index::SearchIndex;
use crate::ranking::DocumentPredicate;
use crate::ExecutionMode;

pub const MINUTES_IN_DAY: u64 = 1440;

pub trait Clock {
    /// Current time in minutes.
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Clock that advances by one minute each time it is read.
#[derive(Debug, Default)]
pub struct TickClock {
    minutes: AtomicU64,
}

impl Clock for TickClock {
    fn now(&self) -> u64 {
        self.minutes.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    minutes: AtomicU64,
}

impl ManualClock {
    pub fn set(&self, minutes: u64) {
        self.minutes.store(minutes, Ordering::Relaxed);
    }

    pub fn advance(&self, minutes: u64) {
        self.minutes.fetch_add(minutes, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.minutes.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    timestamp: u64,
    results: usize,
}

pub struct RequestQueue<'a, C = TickClock> {
    index: &'a SearchIndex,
    clock: C,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a, TickClock> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self::with_clock(index, TickClock::default())
    }
}

impl<'a, C: Clock> RequestQueue<'a, C> {
    pub fn with_clock(index: &'a SearchIndex, clock: C) -> Self {
        Self { index, clock, requests: VecDeque::new(), no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_with(raw_query, &DocumentPredicate::default())
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_with(raw_query, &status.into())
    }

    /// Rank the query and record how many hits it produced. Rejected queries
    /// are not recorded.
    pub fn add_find_request_with(
        &mut self,
        raw_query: &str,
        predicate: &DocumentPredicate,
    ) -> Result<Vec<Document>> {
        let hits = self.index.find_top_documents_with(ExecutionMode::Sequential, raw_query, predicate)?;
        self.record(hits.len());
        Ok(hits)
    }

    /// Requests inside the current window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Requests inside the current window.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn record(&mut self, results: usize) {
        let now = self.clock.now();
        while let Some(oldest) = self.requests.front() {
            let expired = now.saturating_sub(oldest.timestamp) >= MINUTES_IN_DAY;
            if !expired && self.requests.len() < MINUTES_IN_DAY as usize {
                break;
            }
            if oldest.results == 0 {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        if results == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult { timestamp: now, results });
    }
}
