// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct TypeObjects per OMG DDS-XTypes v1.3 (section 7.3.4).
//!
//! Only the structure kind is modelled. Complete objects carry names,
//! minimal objects carry member name hashes. Both serialize as XCDR2
//! little-endian bodies, which is also the input of the equivalence hash.
//!
//! Layout (XCDR2, `D` = DHEADER of an appendable aggregate):
//!
//! ```text
//! TypeObject        D | octet EK_* | CompleteTypeObject / MinimalTypeObject
//! *TypeObject         octet TK_STRUCTURE | *StructType
//! *StructType         u16 struct_flags | *StructHeader | D | u32 n | n x *StructMember
//! CompleteStructHeader D | TypeIdentifier base | bool | bool | string type_name
//! MinimalStructHeader  D | TypeIdentifier base
//! CompleteStructMember D | CommonStructMember | string name | bool | bool
//! MinimalStructMember  D | CommonStructMember | octet[4] name_hash
//! CommonStructMember   u32 id | u16 flags | TypeIdentifier
//! ```

use super::{EquivalenceHash, NameHash, TypeIdentifier, TypeKind, EK_COMPLETE, EK_MINIMAL};
use crate::core::ser::{Cdr2Decode, Cdr2Encode, CdrError, Endianness, SerError, SerResult};
use crate::protocol::{CdrDecoder, CdrEncoder, CdrVersion};
use std::fmt;

/// Longest qualified type name accepted in a TypeObject.
pub const TYPE_NAME_MAX_LENGTH: usize = 256;
/// Longest member name accepted in a TypeObject.
pub const MEMBER_NAME_MAX_LENGTH: usize = 256;

// ============================================================================
// Flags
// ============================================================================

/// StructTypeFlag - Struct extensibility and properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct StructTypeFlag(pub u16);

impl StructTypeFlag {
    /// @final - No changes allowed
    pub const IS_FINAL: Self = Self(0x0001);

    /// @appendable - Can add members at end
    pub const IS_APPENDABLE: Self = Self(0x0002);

    /// @mutable - Can add/remove members anywhere
    pub const IS_MUTABLE: Self = Self(0x0004);

    /// Struct is nested (used within another struct)
    pub const IS_NESTED: Self = Self(0x0008);

    /// Use hash-based member IDs (@autoid(HASH))
    pub const IS_AUTOID_HASH: Self = Self(0x0010);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// MemberFlag - Member properties (@key, @optional, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MemberFlag(pub u16);

impl MemberFlag {
    /// Discard the sample when the member cannot be constructed
    pub const TRY_CONSTRUCT1: Self = Self(0x0001);

    /// Construct with the default value
    pub const TRY_CONSTRUCT2: Self = Self(0x0002);

    /// @external
    pub const IS_EXTERNAL: Self = Self(0x0004);

    /// @optional
    pub const IS_OPTIONAL: Self = Self(0x0008);

    /// @must_understand
    pub const IS_MUST_UNDERSTAND: Self = Self(0x0010);

    /// @key
    pub const IS_KEY: Self = Self(0x0020);

    /// Has @default value
    pub const IS_DEFAULT: Self = Self(0x0040);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }
}

/// Type extensibility kind (@final, @appendable, @mutable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Extensibility {
    Final,
    #[default]
    Appendable,
    Mutable,
}

impl Extensibility {
    pub const fn to_struct_flag(self) -> StructTypeFlag {
        match self {
            Extensibility::Final => StructTypeFlag::IS_FINAL,
            Extensibility::Appendable => StructTypeFlag::IS_APPENDABLE,
            Extensibility::Mutable => StructTypeFlag::IS_MUTABLE,
        }
    }

    /// Mutable wins over appendable; no flag means final.
    pub const fn from_struct_flags(flags: StructTypeFlag) -> Self {
        if flags.contains(StructTypeFlag::IS_MUTABLE) {
            Extensibility::Mutable
        } else if flags.contains(StructTypeFlag::IS_APPENDABLE) {
            Extensibility::Appendable
        } else {
            Extensibility::Final
        }
    }
}

impl fmt::Display for Extensibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extensibility::Final => write!(f, "FINAL"),
            Extensibility::Appendable => write!(f, "APPENDABLE"),
            Extensibility::Mutable => write!(f, "MUTABLE"),
        }
    }
}

// ============================================================================
// Details
// ============================================================================

/// CompleteTypeDetail - Complete type metadata (annotations are not carried)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTypeDetail {
    /// Type name (fully qualified)
    pub type_name: String,
}

/// CompleteMemberDetail - Complete member metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteMemberDetail {
    pub name: String,
}

/// MinimalMemberDetail - Minimal member metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimalMemberDetail {
    pub name_hash: NameHash,
}

// ============================================================================
// Struct Types
// ============================================================================

/// CommonStructMember - Info shared between Complete and Minimal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonStructMember {
    /// Sequential for appendable/final structs
    pub member_id: u32,
    pub member_flags: MemberFlag,
    pub member_type_id: TypeIdentifier,
}

/// CompleteStructMember - Complete representation of a struct member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteStructMember {
    pub common: CommonStructMember,
    pub detail: CompleteMemberDetail,
}

/// MinimalStructMember - Minimal representation of a struct member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalStructMember {
    pub common: CommonStructMember,
    pub detail: MinimalMemberDetail,
}

/// CompleteStructHeader - Complete struct metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteStructHeader {
    /// Base type (for inheritance), None if no base
    pub base_type: Option<TypeIdentifier>,
    pub detail: CompleteTypeDetail,
}

/// MinimalStructHeader - Minimal struct metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalStructHeader {
    pub base_type: Option<TypeIdentifier>,
}

/// CompleteStructType - Complete representation of a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteStructType {
    pub struct_flags: StructTypeFlag,
    pub header: CompleteStructHeader,
    pub member_seq: Vec<CompleteStructMember>,
}

/// MinimalStructType - Minimal representation of a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalStructType {
    pub struct_flags: StructTypeFlag,
    pub header: MinimalStructHeader,
    pub member_seq: Vec<MinimalStructMember>,
}

impl CompleteStructType {
    pub fn extensibility(&self) -> Extensibility {
        Extensibility::from_struct_flags(self.struct_flags)
    }

    pub fn type_name(&self) -> &str {
        &self.header.detail.type_name
    }

    /// Derive the minimal form: same flags and member types, names hashed.
    pub fn to_minimal(&self) -> MinimalStructType {
        MinimalStructType {
            struct_flags: self.struct_flags,
            header: MinimalStructHeader {
                base_type: self.header.base_type.clone(),
            },
            member_seq: self
                .member_seq
                .iter()
                .map(|member| MinimalStructMember {
                    common: member.common.clone(),
                    detail: MinimalMemberDetail {
                        name_hash: NameHash::from_name(&member.detail.name),
                    },
                })
                .collect(),
        }
    }
}

impl MinimalStructType {
    pub fn extensibility(&self) -> Extensibility {
        Extensibility::from_struct_flags(self.struct_flags)
    }
}

// ============================================================================
// TypeObject
// ============================================================================

/// CompleteTypeObject - types with full metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteTypeObject {
    Struct(CompleteStructType),
}

/// MinimalTypeObject - assignability information only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimalTypeObject {
    Struct(MinimalStructType),
}

/// TypeObject - Runtime representation of a DDS type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeObject {
    Complete(CompleteTypeObject),
    Minimal(MinimalTypeObject),
}

impl TypeObject {
    /// Minimal counterpart of this object (identity for minimal objects).
    pub fn to_minimal(&self) -> TypeObject {
        match self {
            TypeObject::Complete(CompleteTypeObject::Struct(s)) => {
                TypeObject::Minimal(MinimalTypeObject::Struct(s.to_minimal()))
            }
            TypeObject::Minimal(_) => self.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TypeObject::Complete(_))
    }

    /// Hash-based identifier: MD5 of the XCDR2 LE serialization.
    pub fn type_identifier(&self) -> Result<TypeIdentifier, CdrError> {
        let bytes = self.to_cdr2_vec()?;
        let hash = EquivalenceHash::compute(&bytes);
        Ok(match self {
            TypeObject::Complete(_) => TypeIdentifier::Complete(hash),
            TypeObject::Minimal(_) => TypeIdentifier::Minimal(hash),
        })
    }

    fn encode(&self, enc: &mut CdrEncoder<'_>) -> SerResult<()> {
        let slot = enc.begin_aggregate(Extensibility::Appendable)?;
        match self {
            TypeObject::Complete(CompleteTypeObject::Struct(s)) => {
                enc.write_u8(EK_COMPLETE)?;
                enc.write_u8(TypeKind::TK_STRUCTURE.to_u8())?;
                encode_complete_struct(enc, s)?;
            }
            TypeObject::Minimal(MinimalTypeObject::Struct(s)) => {
                enc.write_u8(EK_MINIMAL)?;
                enc.write_u8(TypeKind::TK_STRUCTURE.to_u8())?;
                encode_minimal_struct(enc, s)?;
            }
        }
        enc.end_aggregate(slot)
    }

    fn decode(dec: &mut CdrDecoder<'_>) -> SerResult<Self> {
        let end = dec.begin_aggregate(Extensibility::Appendable)?;
        let at = dec.offset();
        let kind = dec.read_u8()?;
        let tk = dec.read_u8()?;
        if tk != TypeKind::TK_STRUCTURE.to_u8() {
            return Err(SerError::InvalidData {
                offset: at + 1,
                reason: format!("unsupported TypeObject kind {:#04x}", tk),
            });
        }
        let object = match kind {
            EK_COMPLETE => TypeObject::Complete(CompleteTypeObject::Struct(
                decode_complete_struct(dec)?,
            )),
            EK_MINIMAL => {
                TypeObject::Minimal(MinimalTypeObject::Struct(decode_minimal_struct(dec)?))
            }
            other => {
                return Err(SerError::InvalidData {
                    offset: at,
                    reason: format!("unknown equivalence kind {:#04x}", other),
                })
            }
        };
        dec.end_aggregate(end)?;
        Ok(object)
    }

    fn size_bound(&self) -> usize {
        // Fixed parts: DHEADERs, discriminators, flags, identifiers, padding.
        const FIXED: usize = 64;
        const PER_MEMBER: usize = 64;
        match self {
            TypeObject::Complete(CompleteTypeObject::Struct(s)) => {
                FIXED
                    + s.type_name().len()
                    + s.member_seq
                        .iter()
                        .map(|m| PER_MEMBER + m.detail.name.len())
                        .sum::<usize>()
            }
            TypeObject::Minimal(MinimalTypeObject::Struct(s)) => {
                FIXED + s.member_seq.len() * PER_MEMBER
            }
        }
    }
}

fn encode_base_type(enc: &mut CdrEncoder<'_>, base: &Option<TypeIdentifier>) -> SerResult<()> {
    base.as_ref().unwrap_or(&TypeIdentifier::None).encode(enc)
}

fn decode_base_type(dec: &mut CdrDecoder<'_>) -> SerResult<Option<TypeIdentifier>> {
    match TypeIdentifier::decode(dec)? {
        TypeIdentifier::None => Ok(None),
        other => Ok(Some(other)),
    }
}

/// Annotations are never emitted; a present one cannot be represented.
fn decode_absent_annotation(dec: &mut CdrDecoder<'_>) -> SerResult<()> {
    let at = dec.offset();
    if dec.read_bool()? {
        return Err(SerError::InvalidData {
            offset: at,
            reason: "type annotations are not supported".into(),
        });
    }
    Ok(())
}

// Final aggregate: no DHEADER.
fn encode_common_member(enc: &mut CdrEncoder<'_>, common: &CommonStructMember) -> SerResult<()> {
    enc.write_u32(common.member_id)?;
    enc.write_u16(common.member_flags.0)?;
    common.member_type_id.encode(enc)
}

fn decode_common_member(dec: &mut CdrDecoder<'_>) -> SerResult<CommonStructMember> {
    let member_id = dec.read_u32()?;
    let member_flags = MemberFlag(dec.read_u16()?);
    let member_type_id = TypeIdentifier::decode(dec)?;
    Ok(CommonStructMember {
        member_id,
        member_flags,
        member_type_id,
    })
}

fn encode_member_count(enc: &mut CdrEncoder<'_>, count: usize) -> SerResult<()> {
    let count = u32::try_from(count).map_err(|_| SerError::InvalidData {
        offset: enc.offset(),
        reason: "too many members".into(),
    })?;
    enc.write_u32(count)
}

fn decode_member_count(dec: &mut CdrDecoder<'_>) -> SerResult<usize> {
    let at = dec.offset();
    let count = dec.read_u32()? as usize;
    // Each member needs at least a DHEADER.
    if count > dec.remaining() / 4 {
        return Err(SerError::InvalidData {
            offset: at,
            reason: format!("member count {} exceeds remaining data", count),
        });
    }
    Ok(count)
}

fn encode_complete_struct(enc: &mut CdrEncoder<'_>, s: &CompleteStructType) -> SerResult<()> {
    enc.write_u16(s.struct_flags.0)?;

    let header = enc.begin_aggregate(Extensibility::Appendable)?;
    encode_base_type(enc, &s.header.base_type)?;
    enc.write_bool(false)?; // ann_builtin
    enc.write_bool(false)?; // ann_custom
    enc.write_string(&s.header.detail.type_name)?;
    enc.end_aggregate(header)?;

    let seq = enc.begin_aggregate(Extensibility::Appendable)?;
    encode_member_count(enc, s.member_seq.len())?;
    for member in &s.member_seq {
        let slot = enc.begin_aggregate(Extensibility::Appendable)?;
        encode_common_member(enc, &member.common)?;
        enc.write_string(&member.detail.name)?;
        enc.write_bool(false)?;
        enc.write_bool(false)?;
        enc.end_aggregate(slot)?;
    }
    enc.end_aggregate(seq)
}

fn decode_complete_struct(dec: &mut CdrDecoder<'_>) -> SerResult<CompleteStructType> {
    let struct_flags = StructTypeFlag(dec.read_u16()?);

    let end = dec.begin_aggregate(Extensibility::Appendable)?;
    let base_type = decode_base_type(dec)?;
    decode_absent_annotation(dec)?;
    decode_absent_annotation(dec)?;
    let type_name = dec.read_string(Some(TYPE_NAME_MAX_LENGTH))?;
    dec.end_aggregate(end)?;

    let seq_end = dec.begin_aggregate(Extensibility::Appendable)?;
    let count = decode_member_count(dec)?;
    let mut member_seq = Vec::with_capacity(count);
    for _ in 0..count {
        let end = dec.begin_aggregate(Extensibility::Appendable)?;
        let common = decode_common_member(dec)?;
        let name = dec.read_string(Some(MEMBER_NAME_MAX_LENGTH))?;
        decode_absent_annotation(dec)?;
        decode_absent_annotation(dec)?;
        dec.end_aggregate(end)?;
        member_seq.push(CompleteStructMember {
            common,
            detail: CompleteMemberDetail { name },
        });
    }
    dec.end_aggregate(seq_end)?;

    Ok(CompleteStructType {
        struct_flags,
        header: CompleteStructHeader {
            base_type,
            detail: CompleteTypeDetail { type_name },
        },
        member_seq,
    })
}

fn encode_minimal_struct(enc: &mut CdrEncoder<'_>, s: &MinimalStructType) -> SerResult<()> {
    enc.write_u16(s.struct_flags.0)?;

    let header = enc.begin_aggregate(Extensibility::Appendable)?;
    encode_base_type(enc, &s.header.base_type)?;
    enc.end_aggregate(header)?;

    let seq = enc.begin_aggregate(Extensibility::Appendable)?;
    encode_member_count(enc, s.member_seq.len())?;
    for member in &s.member_seq {
        let slot = enc.begin_aggregate(Extensibility::Appendable)?;
        encode_common_member(enc, &member.common)?;
        enc.write_bytes(&member.detail.name_hash.0)?;
        enc.end_aggregate(slot)?;
    }
    enc.end_aggregate(seq)
}

fn decode_minimal_struct(dec: &mut CdrDecoder<'_>) -> SerResult<MinimalStructType> {
    let struct_flags = StructTypeFlag(dec.read_u16()?);

    let end = dec.begin_aggregate(Extensibility::Appendable)?;
    let base_type = decode_base_type(dec)?;
    dec.end_aggregate(end)?;

    let seq_end = dec.begin_aggregate(Extensibility::Appendable)?;
    let count = decode_member_count(dec)?;
    let mut member_seq = Vec::with_capacity(count);
    for _ in 0..count {
        let end = dec.begin_aggregate(Extensibility::Appendable)?;
        let common = decode_common_member(dec)?;
        let mut hash = [0u8; 4];
        hash.copy_from_slice(dec.read_bytes(4)?);
        dec.end_aggregate(end)?;
        member_seq.push(MinimalStructMember {
            common,
            detail: MinimalMemberDetail {
                name_hash: NameHash(hash),
            },
        });
    }
    dec.end_aggregate(seq_end)?;

    Ok(MinimalStructType {
        struct_flags,
        header: MinimalStructHeader { base_type },
        member_seq,
    })
}

impl Cdr2Encode for TypeObject {
    fn encode_cdr2_le(&self, buf: &mut [u8]) -> Result<usize, CdrError> {
        let mut enc = CdrEncoder::new(buf, CdrVersion::Xcdr2, Endianness::Little);
        self.encode(&mut enc)?;
        Ok(enc.offset())
    }

    fn max_cdr2_size(&self) -> usize {
        self.size_bound()
    }
}

impl Cdr2Decode for TypeObject {
    fn decode_cdr2_le(src: &[u8]) -> Result<(Self, usize), CdrError> {
        let mut dec = CdrDecoder::new(src, CdrVersion::Xcdr2, Endianness::Little);
        let object = Self::decode(&mut dec)?;
        Ok((object, dec.offset()))
    }
}
