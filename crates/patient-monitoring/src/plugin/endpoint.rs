// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-participant and per-endpoint state created by plugin callbacks.
//!
//! Each attached endpoint owns two bounded lock-free pools: decoded samples
//! (reset before they go back) and serialization buffers sized for the
//! largest payload of the type. Returns into a full pool are dropped.

use super::{AllocationParams, TopicType};
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// State created by `on_participant_attached`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantData {
    pub domain_id: u32,
    pub participant_name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Writer,
    Reader,
}

/// Endpoint description passed to `on_endpoint_attached`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub kind: EndpointKind,
    pub topic_name: String,
    /// Overrides the plugin's configured pool sizes when set.
    pub sample_pool_size: Option<usize>,
    pub buffer_pool_size: Option<usize>,
}

impl EndpointInfo {
    pub fn new(kind: EndpointKind, topic_name: impl Into<String>) -> Self {
        Self {
            kind,
            topic_name: topic_name.into(),
            sample_pool_size: None,
            buffer_pool_size: None,
        }
    }
}

/// Pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub samples_created: u64,
    pub samples_reused: u64,
    pub samples_dropped: u64,
    pub buffers_created: u64,
    pub buffers_reused: u64,
    pub buffers_dropped: u64,
}

/// State created by `on_endpoint_attached`.
pub struct EndpointData<T: TopicType> {
    participant: Arc<ParticipantData>,
    info: EndpointInfo,
    samples: ArrayQueue<T>,
    buffers: ArrayQueue<Vec<u8>>,
    buffer_size: usize,
    samples_created: AtomicU64,
    samples_reused: AtomicU64,
    samples_dropped: AtomicU64,
    buffers_created: AtomicU64,
    buffers_reused: AtomicU64,
    buffers_dropped: AtomicU64,
}

impl<T: TopicType> EndpointData<T> {
    pub(crate) fn new(
        participant: Arc<ParticipantData>,
        info: EndpointInfo,
        sample_pool_size: usize,
        buffer_pool_size: usize,
        buffer_size: usize,
    ) -> Self {
        Self {
            participant,
            info,
            // ArrayQueue rejects a zero capacity
            samples: ArrayQueue::new(sample_pool_size.max(1)),
            buffers: ArrayQueue::new(buffer_pool_size.max(1)),
            buffer_size,
            samples_created: AtomicU64::new(0),
            samples_reused: AtomicU64::new(0),
            samples_dropped: AtomicU64::new(0),
            buffers_created: AtomicU64::new(0),
            buffers_reused: AtomicU64::new(0),
            buffers_dropped: AtomicU64::new(0),
        }
    }

    pub fn participant(&self) -> &ParticipantData {
        &self.participant
    }

    pub fn info(&self) -> &EndpointInfo {
        &self.info
    }

    /// Size of every pooled buffer: the largest encapsulated payload.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Take a sample from the pool, or create one with bound-sized capacity.
    pub fn get_sample(&self) -> T {
        if let Some(sample) = self.samples.pop() {
            self.samples_reused.fetch_add(1, Ordering::Relaxed);
            return sample;
        }
        self.samples_created.fetch_add(1, Ordering::Relaxed);
        let mut sample = T::default();
        sample.allocate(&AllocationParams::default());
        sample
    }

    /// Reset `sample` and keep it for reuse.
    pub fn return_sample(&self, mut sample: T) {
        sample.reset();
        if self.samples.push(sample).is_err() {
            self.samples_dropped.fetch_add(1, Ordering::Relaxed);
            log::trace!(
                "[plugin] sample pool full on '{}', dropping sample",
                self.info.topic_name
            );
        }
    }

    /// Take a zeroed buffer of `buffer_size()` bytes.
    pub fn get_buffer(&self) -> Vec<u8> {
        if let Some(mut buffer) = self.buffers.pop() {
            self.buffers_reused.fetch_add(1, Ordering::Relaxed);
            buffer.clear();
            buffer.resize(self.buffer_size, 0);
            return buffer;
        }
        self.buffers_created.fetch_add(1, Ordering::Relaxed);
        vec![0u8; self.buffer_size]
    }

    pub fn return_buffer(&self, buffer: Vec<u8>) {
        if buffer.capacity() < self.buffer_size || self.buffers.push(buffer).is_err() {
            self.buffers_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn pooled_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn pooled_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            samples_created: self.samples_created.load(Ordering::Relaxed),
            samples_reused: self.samples_reused.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            buffers_created: self.buffers_created.load(Ordering::Relaxed),
            buffers_reused: self.buffers_reused.load(Ordering::Relaxed),
            buffers_dropped: self.buffers_dropped.load(Ordering::Relaxed),
        }
    }
}

impl<T: TopicType> std::fmt::Debug for EndpointData<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointData")
            .field("participant", &self.participant.participant_name)
            .field("info", &self.info)
            .field("buffer_size", &self.buffer_size)
            .field("stats", &self.stats())
            .finish()
    }
}
