// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type plugin: the hooks a DDS runtime calls to manage samples of a topic type.
//!
//! A topic type implements [`TopicType`] (body codec, sizes, lifecycle, key
//! description). [`TypePlugin`] wraps it with encapsulation handling, sample
//! and buffer pools, participant/endpoint attachment and key hashing.

mod endpoint;
mod type_plugin;

pub use endpoint::{EndpointData, EndpointInfo, EndpointKind, ParticipantData, PoolStats};
pub use type_plugin::{plugin_delete, plugin_new, Deserialized, TypePlugin};

use crate::dds::Result;
use crate::protocol::{CdrDecoder, CdrEncoder, CdrVersion, DataRepresentationMask};
use crate::xtypes::{CompleteTypeObject, Extensibility};
use std::fmt;

/// Whether instances of a type are distinguished by key members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Every sample belongs to the single instance of the topic.
    NoKey,
    /// Instances are identified by the members marked `@key`.
    UserKey,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::NoKey => write!(f, "NO_KEY"),
            KeyKind::UserKey => write!(f, "USER_KEY"),
        }
    }
}

/// Capacity to reserve when a sample is created or allocated.
///
/// `None` reserves the IDL bound of each bounded member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationParams {
    pub max_string_length: Option<usize>,
}

impl AllocationParams {
    pub const fn with_max_string_length(max: usize) -> Self {
        Self {
            max_string_length: Some(max),
        }
    }
}

/// Contract between a topic data type and its [`TypePlugin`].
///
/// Body methods see the stream positioned after the encapsulation header;
/// alignment is relative to that point.
pub trait TopicType: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Name the type is announced under.
    const TYPE_NAME: &'static str;

    fn extensibility() -> Extensibility;

    /// Representations writers may use for this type.
    fn allowed_representations() -> DataRepresentationMask;

    /// Complete XTypes description.
    fn type_object() -> CompleteTypeObject;

    /// Reject values that cannot be serialized (bounds). Construction never checks.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn serialize_body(&self, enc: &mut CdrEncoder<'_>) -> Result<()>;

    /// Decode into `self`, replacing its contents.
    fn deserialize_body(&mut self, dec: &mut CdrDecoder<'_>) -> Result<()>;

    /// Exact body size of this sample starting `current_alignment` bytes past the origin.
    fn serialized_body_size(&self, version: CdrVersion, current_alignment: usize) -> usize;

    fn max_serialized_body_size(version: CdrVersion, current_alignment: usize) -> usize;

    fn min_serialized_body_size(version: CdrVersion, current_alignment: usize) -> usize;

    /// Restore the default state, keeping allocated capacity.
    fn reset(&mut self);

    /// Reserve capacity per `params`.
    fn allocate(&mut self, params: &AllocationParams);

    fn key_kind() -> KeyKind {
        KeyKind::NoKey
    }

    /// Encode the key members only.
    fn serialize_key_body(&self, _enc: &mut CdrEncoder<'_>) -> Result<()> {
        Ok(())
    }

    /// Decode the key members only, leaving other members untouched.
    fn deserialize_key_body(&mut self, _dec: &mut CdrDecoder<'_>) -> Result<()> {
        Ok(())
    }

    fn max_serialized_key_body_size(_version: CdrVersion, _current_alignment: usize) -> usize {
        0
    }

    /// Multi-line rendering used by `print_data`.
    fn print(&self, desc: Option<&str>, indent: usize) -> String;
}
