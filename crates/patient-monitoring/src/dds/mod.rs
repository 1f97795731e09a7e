// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Type registry and in-process loopback
//!
//! A [`Participant`] owns the registry of topic types. Registering a type
//! creates its [`TypePlugin`](crate::plugin::TypePlugin) and attaches the
//! participant to it. Topics are only created for registered names.
//!
//! ## Example
//!
//! ```rust
//! use patient_monitoring::{Participant, PatientMonitoring};
//!
//! let participant = Participant::new(0, "monitor");
//! participant.register_type::<PatientMonitoring>("PatientMonitoring")?;
//! let topic = participant.topic::<PatientMonitoring>("ward/7", "PatientMonitoring")?;
//!
//! let reader = topic.reader()?;
//! let writer = topic.writer()?;
//! writer.write(&PatientMonitoring::with_condition("stable"))?;
//! let sample = reader.try_take()?.expect("delivered");
//! assert_eq!(sample.patient_condition(), "stable");
//! # Ok::<(), patient_monitoring::Error>(())
//! ```
//!
//! ## Entity Hierarchy
//!
//! ```text
//! Participant (type registry)
//! +-- Topic<T>
//!     +-- DataWriter<T>  --serialize-->  bytes  --fan-out-->  DataReader<T>
//! ```

mod participant;
mod reader;
mod return_code;
mod topic;
mod writer;

pub use participant::{Participant, RegisteredType};
pub use reader::DataReader;
pub use return_code::{check_return_code, ReturnCode};
pub use topic::Topic;
pub use writer::DataWriter;

use crate::core::ser::SerError;
use crate::dynamic::DynamicDataError;
use crate::protocol::EncapsulationId;

/// Errors returned by type support and registry operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Data Errors
    // ========================================================================
    /// A bounded member holds more bytes than its IDL bound allows.
    BoundExceeded {
        member: &'static str,
        length: usize,
        bound: usize,
    },
    /// Caller-provided buffer cannot hold the serialized sample.
    BufferTooSmall { needed: usize, available: usize },
    /// CDR encoding or decoding failed.
    Serialization(SerError),
    /// Data representation id not allowed for the type.
    UnsupportedRepresentation(i16),
    /// Encapsulation identifier not recognized.
    UnknownEncapsulation(u16),
    /// Payload encapsulation cannot carry the type's extensibility.
    EncapsulationMismatch {
        expected: EncapsulationId,
        found: EncapsulationId,
    },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// No type registered under the name.
    TypeNotRegistered(String),
    /// Name registered with a different Rust type.
    TypeMismatch {
        type_name: String,
        registered: &'static str,
        requested: &'static str,
    },
    /// Name already registered with a different Rust type.
    AlreadyRegistered(String),

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// A non-OK return code surfaced through `check_return_code`.
    ReturnCode { code: ReturnCode, context: String },
    /// Invalid configuration value.
    Config(String),
    /// Dynamic data access failed.
    Dynamic(DynamicDataError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BoundExceeded {
                member,
                length,
                bound,
            } => write!(
                f,
                "Member '{}' length {} exceeds bound {}",
                member, length, bound
            ),
            Error::BufferTooSmall { needed, available } => write!(
                f,
                "Buffer too small: need {} bytes, have {}",
                needed, available
            ),
            Error::Serialization(e) => write!(f, "CDR serialization failed: {}", e),
            Error::UnsupportedRepresentation(id) => {
                write!(f, "Unsupported data representation: {}", id)
            }
            Error::UnknownEncapsulation(id) => write!(f, "Unknown encapsulation id: {:#06x}", id),
            Error::EncapsulationMismatch { expected, found } => write!(
                f,
                "Encapsulation mismatch: expected {}, found {}",
                expected, found
            ),
            Error::TypeNotRegistered(name) => write!(f, "Type not registered: {}", name),
            Error::TypeMismatch {
                type_name,
                registered,
                requested,
            } => write!(
                f,
                "Type mismatch for '{}': registered {}, requested {}",
                type_name, registered, requested
            ),
            Error::AlreadyRegistered(name) => {
                write!(f, "Type name already registered with another type: {}", name)
            }
            Error::ReturnCode { code, context } => write!(f, "{} ({})", context, code),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Dynamic(e) => write!(f, "Dynamic data error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization(e) => Some(e),
            Error::Dynamic(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DynamicDataError> for Error {
    fn from(err: DynamicDataError) -> Self {
        Error::Dynamic(err)
    }
}

impl Error {
    /// Return code equivalent of this error.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            Error::ReturnCode { code, .. } => *code,
            Error::BoundExceeded { .. } | Error::Config(_) | Error::Dynamic(_) => {
                ReturnCode::BadParameter
            }
            Error::BufferTooSmall { .. } => ReturnCode::OutOfResources,
            Error::UnsupportedRepresentation(_) => ReturnCode::Unsupported,
            Error::TypeNotRegistered(_) | Error::TypeMismatch { .. } => {
                ReturnCode::PreconditionNotMet
            }
            Error::AlreadyRegistered(_) => ReturnCode::PreconditionNotMet,
            Error::Serialization(_)
            | Error::UnknownEncapsulation(_)
            | Error::EncapsulationMismatch { .. } => ReturnCode::Error,
        }
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_bound_exceeded() {
        let err = Error::BoundExceeded {
            member: "patient_condition",
            length: 129,
            bound: 128,
        };
        assert_eq!(
            err.to_string(),
            "Member 'patient_condition' length 129 exceeds bound 128"
        );
        assert_eq!(err.return_code(), ReturnCode::BadParameter);
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = Error::Serialization(SerError::ReadFailed {
            offset: 2,
            reason: "unexpected end of buffer".into(),
        });
        assert!(err.source().is_some());
        assert!(Error::TypeNotRegistered("x".into()).source().is_none());
    }

    #[test]
    fn test_return_code_mapping() {
        assert_eq!(
            Error::BufferTooSmall {
                needed: 12,
                available: 4
            }
            .return_code(),
            ReturnCode::OutOfResources
        );
        assert_eq!(
            Error::UnsupportedRepresentation(1).return_code(),
            ReturnCode::Unsupported
        );
        assert_eq!(
            Error::ReturnCode {
                code: ReturnCode::Timeout,
                context: "wait".into()
            }
            .return_code(),
            ReturnCode::Timeout
        );
    }
}
