// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XTypes v1.3 type representation for registered topic types.
//!
//! Provides what a participant announces during discovery:
//!
//! - **TypeIdentifier**: direct (primitives, bounded strings) or hash-based
//! - **TypeObject**: Complete and Minimal struct descriptions
//! - **EquivalenceHash**: MD5 over the XCDR2 little-endian TypeObject
//! - **TypeDescriptor**: flat summary with the allowed representations
//!
//! ```ignore
//! use patient_monitoring::xtypes::TypeObject;
//!
//! let object = PatientMonitoring::type_object();
//! let id = object.type_identifier()?; // TypeIdentifier::Complete(hash)
//! let minimal = object.to_minimal().type_identifier()?;
//! ```
//!
//! Hashing requires the `xtypes` feature (on by default). Without it,
//! hashes are all zeroes.
//!
//! # Specification References
//!
//! - **OMG DDS-XTypes v1.3**: <https://www.omg.org/spec/DDS-XTypes/1.3/>

mod descriptor;
mod equivalence;
mod type_id;
mod type_kind;
mod type_object;

pub use descriptor::{MemberDescriptor, TypeDescriptor};
pub use equivalence::{EquivalenceHash, NameHash};
pub(crate) use equivalence::md5_digest;
pub use type_id::{
    EquivalenceKind, TypeIdentifier, EK_COMPLETE, EK_MINIMAL, TI_STRING8_LARGE, TI_STRING8_SMALL,
};
pub use type_kind::TypeKind;
pub use type_object::{
    CommonStructMember, CompleteMemberDetail, CompleteStructHeader, CompleteStructMember,
    CompleteStructType, CompleteTypeDetail, CompleteTypeObject, Extensibility, MemberFlag,
    MinimalMemberDetail, MinimalStructHeader, MinimalStructMember, MinimalStructType,
    MinimalTypeObject, StructTypeFlag, TypeObject, MEMBER_NAME_MAX_LENGTH, TYPE_NAME_MAX_LENGTH,
};
