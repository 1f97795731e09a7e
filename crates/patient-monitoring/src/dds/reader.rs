// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::Result;
use crate::plugin::{EndpointData, TopicType, TypePlugin};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-process reader for a [`Topic`](super::Topic).
///
/// Payloads are decoded into samples taken from the endpoint pool. Give
/// samples back with [`return_sample`](Self::return_sample) to reuse them.
pub struct DataReader<T: TopicType> {
    plugin: Arc<TypePlugin<T>>,
    endpoint: Arc<EndpointData<T>>,
    rx: Receiver<Arc<[u8]>>,
    dropped: AtomicU64,
}

impl<T: TopicType> DataReader<T> {
    pub(crate) fn new(
        plugin: Arc<TypePlugin<T>>,
        endpoint: Arc<EndpointData<T>>,
        rx: Receiver<Arc<[u8]>>,
    ) -> Self {
        Self {
            plugin,
            endpoint,
            rx,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.endpoint.info().topic_name
    }

    pub fn endpoint(&self) -> &EndpointData<T> {
        &self.endpoint
    }

    /// Payloads queued and not yet taken.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Payloads skipped because their encapsulation cannot carry `T`.
    pub fn samples_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Take the next sample without blocking.
    ///
    /// Payloads flagged for dropping are skipped. A payload that fails to
    /// decode is consumed and its error returned.
    pub fn try_take(&self) -> Result<Option<T>> {
        while let Ok(payload) = self.rx.try_recv() {
            if let Some(sample) = self.decode(&payload)? {
                return Ok(Some(sample));
            }
        }
        Ok(None)
    }

    /// Wait up to `timeout` for the next sample.
    pub fn take_timeout(&self, timeout: Duration) -> Result<Option<T>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(payload) => {
                    if let Some(sample) = self.decode(&payload)? {
                        return Ok(Some(sample));
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return Ok(None)
                }
            }
        }
    }

    /// Drain every queued sample. Stops at the first decode error.
    pub fn take_all(&self) -> Result<Vec<T>> {
        let mut samples = Vec::with_capacity(self.rx.len());
        while let Some(sample) = self.try_take()? {
            samples.push(sample);
        }
        Ok(samples)
    }

    /// Give a taken sample back to the pool.
    pub fn return_sample(&self, sample: T) {
        self.plugin.return_sample(&self.endpoint, sample);
    }

    fn decode(&self, payload: &[u8]) -> Result<Option<T>> {
        let mut sample = self.endpoint.get_sample();
        match self.plugin.deserialize(&mut sample, payload, true) {
            Ok(outcome) if outcome.drop_sample => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::debug!(
                    "[topic] '{}' skipped payload encapsulated as {}",
                    self.topic_name(),
                    outcome.encapsulation
                );
                self.endpoint.return_sample(sample);
                Ok(None)
            }
            Ok(_) => Ok(Some(sample)),
            Err(e) => {
                log::debug!("[topic] '{}' decode failed: {}", self.topic_name(), e);
                self.endpoint.return_sample(sample);
                Err(e)
            }
        }
    }
}

impl<T: TopicType> Drop for DataReader<T> {
    fn drop(&mut self) {
        self.plugin.on_endpoint_detached(Arc::clone(&self.endpoint));
    }
}

impl<T: TopicType> std::fmt::Debug for DataReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataReader")
            .field("topic", &self.topic_name())
            .field("pending", &self.pending())
            .field("dropped", &self.samples_dropped())
            .finish()
    }
}
