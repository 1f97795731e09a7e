// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `TypePlugin<T>`: encapsulation, sizing, pooling and key handling for a topic type.
//!
//! # Serialized layout
//!
//! ```text
//! [encapsulation id:2 BE][options:2 BE][body ...][0..3 padding]
//! ```
//!
//! `options & 0x3` holds the padding count when `pad_to_four` is enabled.
//! Sizes "with encapsulation" include header and padding; body alignment
//! restarts at zero after the header.

use super::endpoint::{EndpointData, EndpointInfo, ParticipantData};
use super::{AllocationParams, KeyKind, TopicType};
use crate::config::{PluginConfig, RuntimeConfig, KEY_HASH_LENGTH};
use crate::dds::{Error, Result};
use crate::protocol::{
    pad_to_align, CdrDecoder, CdrEncoder, DataRepresentation, EncapsulationHeader, EncapsulationId,
    ENCAPSULATION_HEADER_SIZE,
};
use crate::xtypes::{md5_digest, CompleteTypeObject, TypeObject};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of a successful `deserialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deserialized {
    /// Bytes consumed, trailing padding included.
    pub consumed: usize,
    /// The payload's encapsulation cannot carry this type; the sample was
    /// reset and should not be delivered.
    pub drop_sample: bool,
    pub encapsulation: EncapsulationId,
}

/// Type support for one registered topic type.
pub struct TypePlugin<T: TopicType> {
    config: Arc<PluginConfig>,
    participants: AtomicUsize,
    endpoints: AtomicUsize,
    _type: PhantomData<fn() -> T>,
}

/// Create a plugin using the process-wide runtime configuration.
pub fn plugin_new<T: TopicType>() -> TypePlugin<T> {
    TypePlugin::with_config(RuntimeConfig::global().load())
}

/// Release a plugin. Attached participants or endpoints are reported.
pub fn plugin_delete<T: TopicType>(plugin: TypePlugin<T>) {
    let participants = plugin.attached_participants();
    let endpoints = plugin.attached_endpoints();
    if participants > 0 || endpoints > 0 {
        log::warn!(
            "[plugin] deleting {} plugin with {} participant(s) and {} endpoint(s) attached",
            T::TYPE_NAME,
            participants,
            endpoints
        );
    } else {
        log::debug!("[plugin] deleted {} plugin", T::TYPE_NAME);
    }
}

impl<T: TopicType> TypePlugin<T> {
    pub fn with_config(config: Arc<PluginConfig>) -> Self {
        log::debug!(
            "[plugin] created {} plugin (representation={}, {})",
            T::TYPE_NAME,
            config.default_representation,
            config.endianness
        );
        Self {
            config,
            participants: AtomicUsize::new(0),
            endpoints: AtomicUsize::new(0),
            _type: PhantomData,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    pub fn type_object(&self) -> TypeObject {
        TypeObject::Complete(T::type_object())
    }

    pub fn complete_type_object(&self) -> CompleteTypeObject {
        T::type_object()
    }

    pub fn attached_participants(&self) -> usize {
        self.participants.load(Ordering::Acquire)
    }

    pub fn attached_endpoints(&self) -> usize {
        self.endpoints.load(Ordering::Acquire)
    }

    // ========================================================================
    // Support functions
    // ========================================================================

    /// New sample with bound-sized capacity.
    pub fn create_data(&self) -> T {
        self.create_data_with_params(&AllocationParams::default())
    }

    pub fn create_data_with_params(&self, params: &AllocationParams) -> T {
        let mut sample = T::default();
        sample.allocate(params);
        sample
    }

    /// Deep copy reusing `dst` allocations.
    pub fn copy_data(&self, dst: &mut T, src: &T) {
        dst.clone_from(src);
    }

    pub fn destroy_data(&self, sample: T) {
        drop(sample);
    }

    pub fn print_data(&self, sample: &T, desc: Option<&str>, indent: usize) -> String {
        sample.print(desc, indent)
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    pub fn on_participant_attached(
        &self,
        domain_id: u32,
        participant_name: &str,
    ) -> Arc<ParticipantData> {
        self.participants.fetch_add(1, Ordering::AcqRel);
        log::debug!(
            "[plugin] {} attached to participant '{}' (domain {})",
            T::TYPE_NAME,
            participant_name,
            domain_id
        );
        Arc::new(ParticipantData {
            domain_id,
            participant_name: participant_name.to_string(),
            type_name: T::TYPE_NAME.to_string(),
        })
    }

    pub fn on_participant_detached(&self, participant: Arc<ParticipantData>) {
        if self
            .participants
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
        {
            log::warn!(
                "[plugin] {} detached from '{}' with no participant attached",
                T::TYPE_NAME,
                participant.participant_name
            );
            return;
        }
        log::debug!(
            "[plugin] {} detached from participant '{}'",
            T::TYPE_NAME,
            participant.participant_name
        );
    }

    /// Create endpoint pools. Buffers fit the largest payload of any allowed representation.
    pub fn on_endpoint_attached(
        &self,
        participant: &Arc<ParticipantData>,
        info: EndpointInfo,
    ) -> Arc<EndpointData<T>> {
        let buffer_size = [DataRepresentation::Xcdr, DataRepresentation::Xcdr2]
            .into_iter()
            .filter_map(|repr| self.encapsulation_for(repr).ok())
            .map(|id| self.get_serialized_sample_max_size(true, id, 0))
            .max()
            .unwrap_or(0);
        let sample_pool_size = info.sample_pool_size.unwrap_or(self.config.sample_pool_size);
        let buffer_pool_size = info.buffer_pool_size.unwrap_or(self.config.buffer_pool_size);
        self.endpoints.fetch_add(1, Ordering::AcqRel);
        log::debug!(
            "[plugin] {:?} endpoint attached on '{}' (samples={}, buffers={}x{}B)",
            info.kind,
            info.topic_name,
            sample_pool_size,
            buffer_pool_size,
            buffer_size
        );
        Arc::new(EndpointData::new(
            Arc::clone(participant),
            info,
            sample_pool_size,
            buffer_pool_size,
            buffer_size,
        ))
    }

    pub fn on_endpoint_detached(&self, endpoint: Arc<EndpointData<T>>) {
        if self
            .endpoints
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
        {
            log::warn!(
                "[plugin] endpoint on '{}' detached with no endpoint attached",
                endpoint.info().topic_name
            );
            return;
        }
        log::debug!(
            "[plugin] endpoint detached from '{}' ({:?})",
            endpoint.info().topic_name,
            endpoint.stats()
        );
    }

    pub fn return_sample(&self, endpoint: &EndpointData<T>, sample: T) {
        endpoint.return_sample(sample);
    }

    pub fn copy_sample(&self, _endpoint: &EndpointData<T>, dst: &mut T, src: &T) {
        self.copy_data(dst, src);
    }

    // ========================================================================
    // Encapsulation
    // ========================================================================

    /// Encapsulation a writer uses for `representation` with this plugin's byte order.
    pub fn encapsulation_for(&self, representation: DataRepresentation) -> Result<EncapsulationId> {
        if !T::allowed_representations().contains(representation) {
            return Err(Error::UnsupportedRepresentation(representation.id()));
        }
        EncapsulationId::select(representation, T::extensibility(), self.config.endianness)
            .ok_or(Error::UnsupportedRepresentation(representation.id()))
    }

    /// Encapsulation this type expects for a payload encapsulated as `found`.
    fn expected_encapsulation(&self, found: EncapsulationId) -> Option<EncapsulationId> {
        let representation = found.representation();
        if !T::allowed_representations().contains(representation) {
            return None;
        }
        EncapsulationId::select(representation, T::extensibility(), found.endianness())
    }

    fn check_encapsulation(&self, id: EncapsulationId) -> Result<()> {
        match self.expected_encapsulation(id) {
            Some(expected) if expected == id => Ok(()),
            Some(expected) => Err(Error::EncapsulationMismatch {
                expected,
                found: id,
            }),
            None => Err(Error::UnsupportedRepresentation(id.representation().id())),
        }
    }

    fn encapsulated_size(&self, body: usize) -> usize {
        let body = if self.config.pad_to_four {
            pad_to_align(body, 4)
        } else {
            body
        };
        ENCAPSULATION_HEADER_SIZE + body
    }

    // ========================================================================
    // (De)serialization
    // ========================================================================

    /// Serialize with an encapsulation header.
    ///
    /// With `buffer == None` only the required length is computed.
    pub fn serialize_to_cdr_buffer(
        &self,
        buffer: Option<&mut [u8]>,
        sample: &T,
        representation: DataRepresentation,
    ) -> Result<usize> {
        let id = self.encapsulation_for(representation)?;
        match buffer {
            None => Ok(self.get_serialized_sample_size(true, id, 0, sample)),
            Some(buf) => self.serialize(sample, id, true, buf),
        }
    }

    /// Serialize `sample` into `buf`, returning bytes written.
    ///
    /// Without `serialize_encapsulation` only the body is written, using the
    /// version and byte order of `encapsulation_id`.
    pub fn serialize(
        &self,
        sample: &T,
        encapsulation_id: EncapsulationId,
        serialize_encapsulation: bool,
        buf: &mut [u8],
    ) -> Result<usize> {
        sample.validate()?;
        self.check_encapsulation(encapsulation_id)?;
        let needed =
            self.get_serialized_sample_size(serialize_encapsulation, encapsulation_id, 0, sample);
        if buf.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        let written = if serialize_encapsulation {
            let mut enc = CdrEncoder::with_encapsulation(buf, encapsulation_id)?;
            sample.serialize_body(&mut enc)?;
            enc.finish(self.config.pad_to_four)?
        } else {
            let mut enc = CdrEncoder::new(
                buf,
                encapsulation_id.version(),
                encapsulation_id.endianness(),
            );
            sample.serialize_body(&mut enc)?;
            enc.finish(false)?
        };
        log::trace!(
            "[plugin] serialized {} ({} bytes, {})",
            T::TYPE_NAME,
            written,
            encapsulation_id
        );
        Ok(written)
    }

    /// Deserialize into `sample`.
    ///
    /// Without `deserialize_encapsulation` the body is read with the
    /// plugin's default representation and byte order.
    pub fn deserialize(
        &self,
        sample: &mut T,
        src: &[u8],
        deserialize_encapsulation: bool,
    ) -> Result<Deserialized> {
        if !deserialize_encapsulation {
            let id = self.encapsulation_for(self.config.default_representation)?;
            let mut dec = CdrDecoder::new(src, id.version(), id.endianness());
            return match sample.deserialize_body(&mut dec) {
                Ok(()) => Ok(Deserialized {
                    consumed: dec.offset(),
                    drop_sample: false,
                    encapsulation: id,
                }),
                Err(e) => {
                    sample.reset();
                    Err(e)
                }
            };
        }

        let header = parse_header(src)?;
        if self.expected_encapsulation(header.id) != Some(header.id) {
            log::debug!(
                "[plugin] dropping {} sample encapsulated as {}",
                T::TYPE_NAME,
                header.id
            );
            sample.reset();
            return Ok(Deserialized {
                consumed: 0,
                drop_sample: true,
                encapsulation: header.id,
            });
        }

        let (mut dec, _) = CdrDecoder::with_encapsulation(src)?;
        if let Err(e) = sample.deserialize_body(&mut dec) {
            log::debug!("[plugin] failed to deserialize {}: {}", T::TYPE_NAME, e);
            sample.reset();
            return Err(e);
        }
        Ok(Deserialized {
            consumed: (dec.offset() + header.padding()).min(src.len()),
            drop_sample: false,
            encapsulation: header.id,
        })
    }

    /// Deserialize an encapsulated payload; a dropped sample is an error here.
    pub fn deserialize_from_cdr_buffer(&self, sample: &mut T, src: &[u8]) -> Result<()> {
        let outcome = self.deserialize(sample, src, true)?;
        if outcome.drop_sample {
            return self.check_encapsulation(outcome.encapsulation);
        }
        Ok(())
    }

    // ========================================================================
    // Sizes
    // ========================================================================

    pub fn get_serialized_sample_size(
        &self,
        include_encapsulation: bool,
        encapsulation_id: EncapsulationId,
        current_alignment: usize,
        sample: &T,
    ) -> usize {
        let version = encapsulation_id.version();
        if include_encapsulation {
            self.encapsulated_size(sample.serialized_body_size(version, 0))
        } else {
            sample.serialized_body_size(version, current_alignment)
        }
    }

    pub fn get_serialized_sample_max_size(
        &self,
        include_encapsulation: bool,
        encapsulation_id: EncapsulationId,
        current_alignment: usize,
    ) -> usize {
        let version = encapsulation_id.version();
        if include_encapsulation {
            self.encapsulated_size(T::max_serialized_body_size(version, 0))
        } else {
            T::max_serialized_body_size(version, current_alignment)
        }
    }

    pub fn get_serialized_sample_min_size(
        &self,
        include_encapsulation: bool,
        encapsulation_id: EncapsulationId,
        current_alignment: usize,
    ) -> usize {
        let version = encapsulation_id.version();
        if include_encapsulation {
            self.encapsulated_size(T::min_serialized_body_size(version, 0))
        } else {
            T::min_serialized_body_size(version, current_alignment)
        }
    }

    // ========================================================================
    // Key management
    // ========================================================================

    pub fn get_key_kind(&self) -> KeyKind {
        T::key_kind()
    }

    pub fn get_serialized_key_max_size(
        &self,
        include_encapsulation: bool,
        encapsulation_id: EncapsulationId,
        current_alignment: usize,
    ) -> usize {
        let version = encapsulation_id.version();
        if include_encapsulation {
            self.encapsulated_size(T::max_serialized_key_body_size(version, 0))
        } else {
            T::max_serialized_key_body_size(version, current_alignment)
        }
    }

    /// Key size as laid out for key hashing (body only).
    pub fn get_serialized_key_max_size_for_keyhash(
        &self,
        encapsulation_id: EncapsulationId,
        current_alignment: usize,
    ) -> usize {
        T::max_serialized_key_body_size(encapsulation_id.version(), current_alignment)
    }

    /// Serialize the key members of `sample`.
    pub fn serialize_key(
        &self,
        sample: &T,
        encapsulation_id: EncapsulationId,
        serialize_encapsulation: bool,
        buf: &mut [u8],
    ) -> Result<usize> {
        let needed = self.get_serialized_key_max_size(serialize_encapsulation, encapsulation_id, 0);
        if buf.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        if serialize_encapsulation {
            let mut enc = CdrEncoder::with_encapsulation(buf, encapsulation_id)?;
            sample.serialize_key_body(&mut enc)?;
            Ok(enc.finish(self.config.pad_to_four)?)
        } else {
            let mut enc = CdrEncoder::new(
                buf,
                encapsulation_id.version(),
                encapsulation_id.endianness(),
            );
            sample.serialize_key_body(&mut enc)?;
            Ok(enc.finish(false)?)
        }
    }

    /// Deserialize key members into `sample`, leaving other members untouched.
    pub fn deserialize_key(
        &self,
        sample: &mut T,
        src: &[u8],
        deserialize_encapsulation: bool,
    ) -> Result<Deserialized> {
        let (mut dec, id, padding) = if deserialize_encapsulation {
            let header = parse_header(src)?;
            if self.expected_encapsulation(header.id) != Some(header.id) {
                return Ok(Deserialized {
                    consumed: 0,
                    drop_sample: true,
                    encapsulation: header.id,
                });
            }
            let (dec, _) = CdrDecoder::with_encapsulation(src)?;
            (dec, header.id, header.padding())
        } else {
            let id = self.encapsulation_for(self.config.default_representation)?;
            (CdrDecoder::new(src, id.version(), id.endianness()), id, 0)
        };
        sample.deserialize_key_body(&mut dec)?;
        Ok(Deserialized {
            consumed: (dec.offset() + padding).min(src.len()),
            drop_sample: false,
            encapsulation: id,
        })
    }

    /// 16-byte key hash of `sample`.
    ///
    /// Unkeyed types hash to zeroes. Otherwise the key members are encoded as
    /// big-endian XCDR2; the result is zero-padded when the key can never
    /// exceed 16 bytes and MD5-hashed otherwise.
    pub fn instance_to_keyhash(&self, sample: &T) -> Result<[u8; KEY_HASH_LENGTH]> {
        let mut hash = [0u8; KEY_HASH_LENGTH];
        if T::key_kind() == KeyKind::NoKey {
            return Ok(hash);
        }
        let max = self.get_serialized_key_max_size_for_keyhash(EncapsulationId::CDR2_BE, 0);
        let mut buf = vec![0u8; max.max(KEY_HASH_LENGTH)];
        let written = {
            let mut enc = CdrEncoder::new(
                &mut buf,
                EncapsulationId::CDR2_BE.version(),
                EncapsulationId::CDR2_BE.endianness(),
            );
            sample.serialize_key_body(&mut enc)?;
            enc.offset()
        };
        if max > KEY_HASH_LENGTH {
            hash = md5_digest(&buf[..written]);
        } else {
            hash[..written].copy_from_slice(&buf[..written]);
        }
        Ok(hash)
    }
}

impl<T: TopicType> Default for TypePlugin<T> {
    fn default() -> Self {
        Self::with_config(Arc::new(PluginConfig::default()))
    }
}

impl<T: TopicType> std::fmt::Debug for TypePlugin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypePlugin")
            .field("type_name", &T::TYPE_NAME)
            .field("config", &self.config)
            .field("participants", &self.attached_participants())
            .field("endpoints", &self.attached_endpoints())
            .finish()
    }
}

/// Parse the encapsulation header, reporting unknown ids distinctly.
fn parse_header(src: &[u8]) -> Result<EncapsulationHeader> {
    if src.len() >= 2 {
        let raw = u16::from_be_bytes([src[0], src[1]]);
        if EncapsulationId::from_u16(raw).is_none() {
            return Err(Error::UnknownEncapsulation(raw));
        }
    }
    Ok(EncapsulationHeader::parse(src)?)
}
