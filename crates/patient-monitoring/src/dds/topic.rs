// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Topic
//!
//! A [`Topic`] binds a topic name to a registered type. Writers and readers
//! created from topics of the same name on one participant share a
//! delivery list: every write is delivered to each reader alive at that time.

use super::reader::DataReader;
use super::writer::DataWriter;
use super::Result;
use crate::plugin::{EndpointInfo, EndpointKind, ParticipantData, TopicType, TypePlugin};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Delivery list for one topic name.
pub(crate) struct TopicBus {
    type_name: String,
    rust_type: &'static str,
    subscribers: RwLock<Vec<Sender<Arc<[u8]>>>>,
}

impl TopicBus {
    pub(crate) fn new(type_name: &str, rust_type: &'static str) -> Self {
        Self {
            type_name: type_name.to_string(),
            rust_type,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    pub(crate) fn subscribe(&self) -> Receiver<Arc<[u8]>> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.write().push(tx);
        rx
    }

    /// Deliver `payload` to every live subscriber; returns how many got it.
    ///
    /// Subscribers whose receiver is gone are pruned.
    pub(crate) fn publish(&self, payload: Arc<[u8]>) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();
        for tx in self.subscribers.read().iter() {
            if tx.send(Arc::clone(&payload)).is_ok() {
                delivered += 1;
            } else {
                stale.push(tx.clone());
            }
        }
        if !stale.is_empty() {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|tx| !stale.iter().any(|s| s.same_channel(tx)));
            log::trace!("[topic] pruned readers, {} remaining", subscribers.len());
        }
        delivered
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

/// A typed topic on a [`Participant`](super::Participant).
pub struct Topic<T: TopicType> {
    name: String,
    type_name: String,
    plugin: Arc<TypePlugin<T>>,
    participant: Arc<ParticipantData>,
    bus: Arc<TopicBus>,
}

impl<T: TopicType> Topic<T> {
    pub(crate) fn new(
        name: &str,
        type_name: &str,
        plugin: Arc<TypePlugin<T>>,
        participant: Arc<ParticipantData>,
        bus: Arc<TopicBus>,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            plugin,
            participant,
            bus,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn plugin(&self) -> &Arc<TypePlugin<T>> {
        &self.plugin
    }

    /// Readers subscribed to this topic name as of the last write.
    pub fn reader_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Create a writer with the plugin's default pool sizes.
    pub fn writer(&self) -> Result<DataWriter<T>> {
        self.writer_with(EndpointInfo::new(EndpointKind::Writer, self.name.clone()))
    }

    pub fn writer_with(&self, info: EndpointInfo) -> Result<DataWriter<T>> {
        let info = EndpointInfo {
            kind: EndpointKind::Writer,
            ..info
        };
        let endpoint = self.plugin.on_endpoint_attached(&self.participant, info);
        log::debug!("[topic] writer created on '{}'", self.name);
        Ok(DataWriter::new(
            Arc::clone(&self.plugin),
            endpoint,
            Arc::clone(&self.bus),
        ))
    }

    /// Create a reader. It receives only samples written after this call.
    pub fn reader(&self) -> Result<DataReader<T>> {
        self.reader_with(EndpointInfo::new(EndpointKind::Reader, self.name.clone()))
    }

    pub fn reader_with(&self, info: EndpointInfo) -> Result<DataReader<T>> {
        let info = EndpointInfo {
            kind: EndpointKind::Reader,
            ..info
        };
        let endpoint = self.plugin.on_endpoint_attached(&self.participant, info);
        let rx = self.bus.subscribe();
        log::debug!("[topic] reader created on '{}'", self.name);
        Ok(DataReader::new(Arc::clone(&self.plugin), endpoint, rx))
    }
}

impl<T: TopicType> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            plugin: Arc::clone(&self.plugin),
            participant: Arc::clone(&self.participant),
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<T: TopicType> std::fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("readers", &self.reader_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_delivers_to_live_subscribers_only() {
        let bus = TopicBus::new("PatientMonitoring", "pm");
        let first = bus.subscribe();
        let second = bus.subscribe();
        assert_eq!(bus.publish(Arc::from(&[1u8][..])), 2);

        drop(second);
        assert_eq!(bus.publish(Arc::from(&[2u8][..])), 1);
        assert_eq!(bus.subscriber_count(), 1);

        let got: Vec<Arc<[u8]>> = first.try_iter().collect();
        assert_eq!(got.len(), 2);
        assert_eq!(&got[1][..], &[2u8]);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_payloads() {
        let bus = TopicBus::new("PatientMonitoring", "pm");
        assert_eq!(bus.publish(Arc::from(&[1u8][..])), 0);
        let late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }
}
