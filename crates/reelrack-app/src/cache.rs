// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord<P> {
    pub status: DetailStatus,
    pub payload: Option<P>,
    seq: u64,
}

/// Proof that a fetch was started. Completions carry it back so the cache
/// can discard results from superseded fetch generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket<K> {
    pub id: K,
    seq: u64,
}

/// Lazy per-id cache for expensive detail records. Each id holds at most
/// one record; a fetch is issued only when no record exists or the prior
/// attempt errored, and the synchronous idle-to-loading transition is the
/// guard against duplicate in-flight fetches.
#[derive(Debug, Clone)]
pub struct DetailCache<K, P> {
    entries: HashMap<K, DetailRecord<P>>,
    next_seq: u64,
}

impl<K: Copy + Eq + Hash, P> Default for DetailCache<K, P> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq + Hash, P> DetailCache<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: K) -> DetailStatus {
        self.entries
            .get(&id)
            .map_or(DetailStatus::Idle, |record| record.status)
    }

    pub fn get(&self, id: K) -> Option<&DetailRecord<P>> {
        self.entries.get(&id)
    }

    pub fn payload(&self, id: K) -> Option<&P> {
        self.entries
            .get(&id)
            .filter(|record| record.status == DetailStatus::Success)
            .and_then(|record| record.payload.as_ref())
    }

    /// Marks the id loading and hands out a ticket, or None when a record
    /// already exists with status Success or Loading. Error records are
    /// always eligible for another attempt.
    pub fn begin_fetch(&mut self, id: K) -> Option<FetchTicket<K>> {
        if matches!(
            self.status(id),
            DetailStatus::Success | DetailStatus::Loading
        ) {
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.entries.insert(
            id,
            DetailRecord {
                status: DetailStatus::Loading,
                payload: None,
                seq,
            },
        );
        Some(FetchTicket { id, seq })
    }

    /// Starts a new fetch for an id that may already hold a Success
    /// payload. The cached payload stays in the record while the fetch is
    /// in flight, so a failed completion falls back to it instead of
    /// wiping the entry. Ids without a usable payload take the plain
    /// `begin_fetch` path.
    pub fn begin_refresh(&mut self, id: K) -> Option<FetchTicket<K>> {
        match self.entries.get_mut(&id) {
            Some(record) if record.status == DetailStatus::Loading => None,
            Some(record) if record.status == DetailStatus::Success => {
                self.next_seq += 1;
                record.seq = self.next_seq;
                record.status = DetailStatus::Loading;
                Some(FetchTicket {
                    id,
                    seq: self.next_seq,
                })
            }
            _ => self.begin_fetch(id),
        }
    }

    /// Resolves a fetch. None records an error (covers both transport
    /// failures and empty results), except when the record still carries a
    /// payload from before a refresh, which is then restored as Success.
    /// Completions whose ticket no longer matches the entry's fetch
    /// generation are discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket<K>, payload: Option<P>) -> bool {
        let Some(record) = self.entries.get_mut(&ticket.id) else {
            return false;
        };
        if record.seq != ticket.seq || record.status != DetailStatus::Loading {
            return false;
        }

        match payload {
            Some(value) => {
                record.status = DetailStatus::Success;
                record.payload = Some(value);
            }
            None if record.payload.is_some() => {
                record.status = DetailStatus::Success;
            }
            None => {
                record.status = DetailStatus::Error;
            }
        }
        true
    }

    /// Replaces an id's record with a fresh Success payload, bumping the
    /// fetch generation so any in-flight completion for it is discarded.
    pub fn overwrite(&mut self, id: K, payload: P) {
        self.next_seq += 1;
        self.entries.insert(
            id,
            DetailRecord {
                status: DetailStatus::Success,
                payload: Some(payload),
                seq: self.next_seq,
            },
        );
    }

    /// Mutates a Success payload in place; no-op otherwise.
    pub fn patch(&mut self, id: K, apply: impl FnOnce(&mut P)) -> bool {
        match self.entries.get_mut(&id) {
            Some(record) if record.status == DetailStatus::Success => {
                if let Some(payload) = record.payload.as_mut() {
                    apply(payload);
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    pub fn invalidate(&mut self, id: K) {
        self.entries.remove(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
