// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # PatientMonitoring topic type
//!
//! Type support for the `PatientMonitoring` DDS topic: a single bounded
//! string member, `patient_condition` (IDL `string<128>`), with the hooks a
//! DDS runtime needs to serialize, pool, hash and announce it.
//!
//! ## Quick Start
//!
//! ```rust
//! use patient_monitoring::protocol::DataRepresentation;
//! use patient_monitoring::{type_support, PatientMonitoring};
//!
//! let sample = PatientMonitoring::with_condition("ok");
//! let mut buffer = Vec::new();
//! type_support::to_cdr_buffer(&mut buffer, &sample, DataRepresentation::Xcdr)?;
//! assert_eq!(buffer, [0x00, 0x01, 0x00, 0x01, 3, 0, 0, 0, b'o', b'k', 0, 0]);
//!
//! let mut decoded = PatientMonitoring::new();
//! type_support::from_cdr_buffer(&mut decoded, &buffer)?;
//! assert_eq!(decoded.to_string(), "[patient_condition: ok]");
//! # Ok::<(), patient_monitoring::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  dds: Participant (type registry) -> Topic -> Writer/Reader |
//! +-------------------------------------------------------------+
//! |  plugin: TypePlugin<T> (encapsulation, pools, key hash)     |
//! |  type_support: to/from CDR buffer helpers                   |
//! +-------------------------------------------------------------+
//! |  types: PatientMonitoring (TopicType)                       |
//! |  xtypes: TypeObject / TypeIdentifier   dynamic: DynamicData |
//! +-------------------------------------------------------------+
//! |  protocol::cdr: XCDR1/XCDR2 codec     core::ser: cursors    |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `xtypes` (default): MD5 type and key hashing via `md-5`.
//! - `config-file`: YAML plugin configuration via `serde_yaml`.

/// Configuration constants, plugin settings and the runtime config.
pub mod config;
/// Byte cursors and XTypes serialization traits.
pub mod core;
/// Type registry, return codes and the in-process loopback.
pub mod dds;
/// Runtime member access through the type's TypeObject.
pub mod dynamic;
/// Type plugin hooks: pooling, (de)serialization, key management.
pub mod plugin;
/// CDR encapsulation and body codec.
pub mod protocol;
/// One-call serialization helpers.
pub mod type_support;
/// Topic data types.
pub mod types;
/// XTypes v1.3 type representation.
pub mod xtypes;

pub use config::{PluginConfig, RuntimeConfig, PATIENT_CONDITION_MAX_LENGTH, TYPE_NAME};
pub use dds::{
    check_return_code, DataReader, DataWriter, Error, Participant, Result, ReturnCode, Topic,
};
pub use plugin::{plugin_delete, plugin_new, KeyKind, TopicType, TypePlugin};
pub use protocol::{DataRepresentation, EncapsulationId};
pub use types::PatientMonitoring;
