// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::topic::TopicBus;
use super::Result;
use crate::plugin::{EndpointData, TopicType, TypePlugin};
use crate::protocol::DataRepresentation;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-process writer for a [`Topic`](super::Topic).
///
/// Samples are serialized into a pooled buffer with the writer's data
/// representation, then handed to every reader on the topic.
pub struct DataWriter<T: TopicType> {
    plugin: Arc<TypePlugin<T>>,
    endpoint: Arc<EndpointData<T>>,
    bus: Arc<TopicBus>,
    representation: DataRepresentation,
    written: AtomicU64,
}

impl<T: TopicType> DataWriter<T> {
    pub(crate) fn new(
        plugin: Arc<TypePlugin<T>>,
        endpoint: Arc<EndpointData<T>>,
        bus: Arc<TopicBus>,
    ) -> Self {
        let representation = plugin.config().default_representation;
        Self {
            plugin,
            endpoint,
            bus,
            representation,
            written: AtomicU64::new(0),
        }
    }

    /// Switch the representation used by later writes.
    pub fn set_representation(&mut self, representation: DataRepresentation) -> Result<()> {
        self.plugin.encapsulation_for(representation)?;
        self.representation = representation;
        Ok(())
    }

    pub fn representation(&self) -> DataRepresentation {
        self.representation
    }

    pub fn topic_name(&self) -> &str {
        &self.endpoint.info().topic_name
    }

    pub fn endpoint(&self) -> &EndpointData<T> {
        &self.endpoint
    }

    /// Samples published so far.
    pub fn samples_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Serialize `sample` and deliver it. Returns the number of readers reached.
    pub fn write(&self, sample: &T) -> Result<usize> {
        let mut buffer = self.endpoint.get_buffer();
        let written = match self
            .plugin
            .serialize_to_cdr_buffer(Some(&mut buffer), sample, self.representation)
        {
            Ok(n) => n,
            Err(e) => {
                self.endpoint.return_buffer(buffer);
                log::debug!("[topic] write on '{}' failed: {}", self.topic_name(), e);
                return Err(e);
            }
        };
        let payload: Arc<[u8]> = Arc::from(&buffer[..written]);
        self.endpoint.return_buffer(buffer);
        Ok(self.publish(payload))
    }

    /// Deliver an already encapsulated payload as-is.
    pub fn write_serialized(&self, payload: &[u8]) -> usize {
        self.publish(Arc::from(payload))
    }

    fn publish(&self, payload: Arc<[u8]>) -> usize {
        let len = payload.len();
        let delivered = self.bus.publish(payload);
        self.written.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "[topic] '{}' wrote {} bytes to {} reader(s)",
            self.topic_name(),
            len,
            delivered
        );
        delivered
    }
}

impl<T: TopicType> Drop for DataWriter<T> {
    fn drop(&mut self) {
        self.plugin.on_endpoint_detached(Arc::clone(&self.endpoint));
    }
}

impl<T: TopicType> std::fmt::Debug for DataWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataWriter")
            .field("topic", &self.topic_name())
            .field("representation", &self.representation)
            .field("written", &self.samples_written())
            .finish()
    }
}
