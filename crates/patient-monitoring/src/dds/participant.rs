// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant and its topic type registry.

use super::topic::{Topic, TopicBus};
use super::{Error, Result};
use crate::config::{PluginConfig, RuntimeConfig};
use crate::plugin::{ParticipantData, TopicType, TypePlugin};
use crate::xtypes::TypeObject;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// Type-erased view of a `TypePlugin<T>` kept by the registry.
trait PluginHandle: Send + Sync {
    fn detach_participant(&self, participant: Arc<ParticipantData>);
    fn attached_endpoints(&self) -> usize;
}

impl<T: TopicType> PluginHandle for TypePlugin<T> {
    fn detach_participant(&self, participant: Arc<ParticipantData>) {
        self.on_participant_detached(participant);
    }

    fn attached_endpoints(&self) -> usize {
        TypePlugin::attached_endpoints(self)
    }
}

/// Registry entry for one type name.
#[derive(Clone)]
pub struct RegisteredType {
    type_name: String,
    rust_type: &'static str,
    type_object: TypeObject,
    participant_data: Arc<ParticipantData>,
    plugin: Arc<dyn Any + Send + Sync>,
    handle: Arc<dyn PluginHandle>,
}

impl RegisteredType {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rust type bound to the name.
    pub fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    pub fn type_object(&self) -> &TypeObject {
        &self.type_object
    }

    pub fn participant_data(&self) -> &Arc<ParticipantData> {
        &self.participant_data
    }

    /// Endpoints currently attached to this registration's plugin.
    pub fn attached_endpoints(&self) -> usize {
        self.handle.attached_endpoints()
    }

    fn plugin<T: TopicType>(&self) -> Option<Arc<TypePlugin<T>>> {
        Arc::clone(&self.plugin).downcast::<TypePlugin<T>>().ok()
    }
}

impl std::fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredType")
            .field("type_name", &self.type_name)
            .field("rust_type", &self.rust_type)
            .field("participant", &self.participant_data.participant_name)
            .finish()
    }
}

/// Domain participant owning the type registry and local topics.
///
/// Registration is keyed by type name; the same Rust type may be registered
/// under several names.
pub struct Participant {
    domain_id: u32,
    name: String,
    config: Arc<PluginConfig>,
    types: DashMap<String, RegisteredType>,
    topics: DashMap<String, Arc<TopicBus>>,
}

impl Participant {
    /// Create a participant using the process-wide runtime configuration.
    pub fn new(domain_id: u32, name: impl Into<String>) -> Self {
        Self::with_config(domain_id, name, RuntimeConfig::global().load())
    }

    pub fn with_config(
        domain_id: u32,
        name: impl Into<String>,
        config: Arc<PluginConfig>,
    ) -> Self {
        let name = name.into();
        log::debug!(
            "[registry] participant '{}' created (domain {})",
            name,
            domain_id
        );
        Self {
            domain_id,
            name,
            config,
            types: DashMap::new(),
            topics: DashMap::new(),
        }
    }

    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Register `T` under `type_name`.
    ///
    /// Registering the same type again is a no-op; a different Rust type under
    /// an existing name fails with [`Error::AlreadyRegistered`].
    pub fn register_type<T: TopicType>(&self, type_name: &str) -> Result<()> {
        let rust_type = std::any::type_name::<T>();
        match self.types.entry(type_name.to_string()) {
            Entry::Occupied(existing) => {
                if existing.get().rust_type == rust_type {
                    log::debug!("[registry] '{}' already registered", type_name);
                    Ok(())
                } else {
                    log::warn!(
                        "[registry] '{}' is bound to {}, refusing {}",
                        type_name,
                        existing.get().rust_type,
                        rust_type
                    );
                    Err(Error::AlreadyRegistered(type_name.to_string()))
                }
            }
            Entry::Vacant(slot) => {
                let plugin = Arc::new(TypePlugin::<T>::with_config(Arc::clone(&self.config)));
                let participant_data = plugin.on_participant_attached(self.domain_id, &self.name);
                let handle: Arc<dyn PluginHandle> = plugin.clone();
                slot.insert(RegisteredType {
                    type_name: type_name.to_string(),
                    rust_type,
                    type_object: plugin.type_object(),
                    participant_data,
                    plugin,
                    handle,
                });
                log::debug!("[registry] registered '{}' as {}", type_name, rust_type);
                Ok(())
            }
        }
    }

    /// Remove a registration. Existing topics keep working until dropped.
    pub fn unregister_type(&self, type_name: &str) -> Result<()> {
        let (_, entry) = self
            .types
            .remove(type_name)
            .ok_or_else(|| Error::TypeNotRegistered(type_name.to_string()))?;
        if entry.attached_endpoints() > 0 {
            log::debug!(
                "[registry] unregistering '{}' with {} endpoint(s) still attached",
                type_name,
                entry.attached_endpoints()
            );
        }
        entry
            .handle
            .detach_participant(Arc::clone(&entry.participant_data));
        log::debug!("[registry] unregistered '{}'", type_name);
        Ok(())
    }

    pub fn is_type_registered(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Registered names, sorted.
    pub fn registered_type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn registered_type(&self, type_name: &str) -> Option<RegisteredType> {
        self.types.get(type_name).map(|e| e.value().clone())
    }

    /// TypeObject announced for `type_name`.
    pub fn type_object(&self, type_name: &str) -> Result<TypeObject> {
        self.types
            .get(type_name)
            .map(|e| e.type_object.clone())
            .ok_or_else(|| Error::TypeNotRegistered(type_name.to_string()))
    }

    /// Plugin registered for `type_name`, checked against `T`.
    pub fn type_plugin<T: TopicType>(&self, type_name: &str) -> Result<Arc<TypePlugin<T>>> {
        let entry = self
            .types
            .get(type_name)
            .ok_or_else(|| Error::TypeNotRegistered(type_name.to_string()))?;
        entry.plugin::<T>().ok_or_else(|| Error::TypeMismatch {
            type_name: type_name.to_string(),
            registered: entry.rust_type,
            requested: std::any::type_name::<T>(),
        })
    }

    /// Open `topic_name` carrying the type registered as `type_name`.
    ///
    /// Topics with the same name share one delivery list; a topic name
    /// opened with another type name fails with [`Error::TypeMismatch`].
    pub fn topic<T: TopicType>(&self, topic_name: &str, type_name: &str) -> Result<Topic<T>> {
        let entry = self
            .types
            .get(type_name)
            .map(|e| e.value().clone())
            .ok_or_else(|| Error::TypeNotRegistered(type_name.to_string()))?;
        let plugin = entry.plugin::<T>().ok_or_else(|| Error::TypeMismatch {
            type_name: type_name.to_string(),
            registered: entry.rust_type,
            requested: std::any::type_name::<T>(),
        })?;

        let bus = Arc::clone(
            self.topics
                .entry(topic_name.to_string())
                .or_insert_with(|| Arc::new(TopicBus::new(type_name, entry.rust_type)))
                .value(),
        );
        if bus.type_name() != type_name {
            return Err(Error::TypeMismatch {
                type_name: topic_name.to_string(),
                registered: bus.rust_type(),
                requested: entry.rust_type,
            });
        }

        log::debug!("[registry] topic '{}' opened as '{}'", topic_name, type_name);
        Ok(Topic::new(
            topic_name,
            type_name,
            plugin,
            Arc::clone(&entry.participant_data),
            bus,
        ))
    }
}

impl Drop for Participant {
    fn drop(&mut self) {
        for entry in self.types.iter() {
            entry
                .handle
                .detach_participant(Arc::clone(&entry.participant_data));
        }
        log::debug!("[registry] participant '{}' dropped", self.name);
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("domain_id", &self.domain_id)
            .field("name", &self.name)
            .field("types", &self.registered_type_names())
            .finish()
    }
}
