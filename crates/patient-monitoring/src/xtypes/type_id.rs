// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeIdentifier per OMG DDS-XTypes v1.3 specification
//!
//! Section 7.3.4.2: a TypeIdentifier either names a type directly
//! (primitives, bounded strings) or through the hash of its TypeObject.

use super::{EquivalenceHash, TypeKind};
use crate::core::ser::{Cdr2Decode, Cdr2Encode, CdrError, Endianness, SerError, SerResult};
use crate::protocol::{CdrDecoder, CdrEncoder, CdrVersion};
use std::fmt;

/// Discriminator of a string<N> identifier with N <= 255.
pub const TI_STRING8_SMALL: u8 = 0x70;
/// Discriminator of a string<N> identifier with N > 255.
pub const TI_STRING8_LARGE: u8 = 0x71;
/// Discriminator of a minimal hash identifier.
pub const EK_MINIMAL: u8 = 0xF1;
/// Discriminator of a complete hash identifier.
pub const EK_COMPLETE: u8 = 0xF2;

/// Which equivalence relation a hashed identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EquivalenceKind {
    Minimal = EK_MINIMAL,
    Complete = EK_COMPLETE,
}

impl EquivalenceKind {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// TypeIdentifier - uniquely identifies a DDS type
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeIdentifier {
    /// No type (used for an absent base type)
    None,
    /// Primitive types (boolean, integers, floats, chars)
    Primitive(TypeKind),
    /// `string<bound>` with 0 < bound <= 255 (0 = unbounded)
    StringSmall { bound: u8 },
    /// `string<bound>` with bound > 255
    StringLarge { bound: u32 },
    /// Hash of the MinimalTypeObject
    Minimal(EquivalenceHash),
    /// Hash of the CompleteTypeObject
    Complete(EquivalenceHash),
}

impl TypeIdentifier {
    /// Identifier of a bounded 8-bit string.
    pub fn string(bound: u32) -> Self {
        match u8::try_from(bound) {
            Ok(small) => TypeIdentifier::StringSmall { bound: small },
            Err(_) => TypeIdentifier::StringLarge { bound },
        }
    }

    pub const fn is_string(&self) -> bool {
        matches!(
            self,
            TypeIdentifier::StringSmall { .. } | TypeIdentifier::StringLarge { .. }
        )
    }

    pub const fn is_hash_based(&self) -> bool {
        matches!(self, TypeIdentifier::Minimal(_) | TypeIdentifier::Complete(_))
    }

    pub const fn equivalence_kind(&self) -> Option<EquivalenceKind> {
        match self {
            TypeIdentifier::Minimal(_) => Some(EquivalenceKind::Minimal),
            TypeIdentifier::Complete(_) => Some(EquivalenceKind::Complete),
            _ => None,
        }
    }

    /// Bound of a string identifier (0 means unbounded).
    pub const fn string_bound(&self) -> Option<u32> {
        match self {
            TypeIdentifier::StringSmall { bound } => Some(*bound as u32),
            TypeIdentifier::StringLarge { bound } => Some(*bound),
            _ => None,
        }
    }

    pub const fn discriminator(&self) -> u8 {
        match self {
            TypeIdentifier::None => TypeKind::TK_NONE.to_u8(),
            TypeIdentifier::Primitive(kind) => kind.to_u8(),
            TypeIdentifier::StringSmall { .. } => TI_STRING8_SMALL,
            TypeIdentifier::StringLarge { .. } => TI_STRING8_LARGE,
            TypeIdentifier::Minimal(_) => EK_MINIMAL,
            TypeIdentifier::Complete(_) => EK_COMPLETE,
        }
    }

    pub(crate) fn encode(&self, enc: &mut CdrEncoder<'_>) -> SerResult<()> {
        enc.write_u8(self.discriminator())?;
        match self {
            TypeIdentifier::None | TypeIdentifier::Primitive(_) => Ok(()),
            TypeIdentifier::StringSmall { bound } => enc.write_u8(*bound),
            TypeIdentifier::StringLarge { bound } => enc.write_u32(*bound),
            TypeIdentifier::Minimal(hash) | TypeIdentifier::Complete(hash) => {
                enc.write_bytes(hash.as_bytes())
            }
        }
    }

    pub(crate) fn decode(dec: &mut CdrDecoder<'_>) -> SerResult<Self> {
        let at = dec.offset();
        let disc = dec.read_u8()?;
        match disc {
            TI_STRING8_SMALL => Ok(TypeIdentifier::StringSmall {
                bound: dec.read_u8()?,
            }),
            TI_STRING8_LARGE => Ok(TypeIdentifier::StringLarge {
                bound: dec.read_u32()?,
            }),
            EK_MINIMAL | EK_COMPLETE => {
                let mut bytes = [0u8; 14];
                bytes.copy_from_slice(dec.read_bytes(14)?);
                let hash = EquivalenceHash::from_bytes(bytes);
                Ok(if disc == EK_MINIMAL {
                    TypeIdentifier::Minimal(hash)
                } else {
                    TypeIdentifier::Complete(hash)
                })
            }
            _ => match TypeKind::from_u8(disc) {
                Some(TypeKind::TK_NONE) => Ok(TypeIdentifier::None),
                Some(kind) if kind.is_primitive() => Ok(TypeIdentifier::Primitive(kind)),
                _ => Err(SerError::InvalidData {
                    offset: at,
                    reason: format!("unsupported TypeIdentifier discriminator {:#04x}", disc),
                }),
            },
        }
    }
}

impl fmt::Debug for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeIdentifier::None => write!(f, "TK_NONE"),
            TypeIdentifier::Primitive(kind) => write!(f, "{:?}", kind),
            TypeIdentifier::StringSmall { bound } => write!(f, "string<{}>", bound),
            TypeIdentifier::StringLarge { bound } => write!(f, "string<{}>", bound),
            TypeIdentifier::Minimal(hash) => write!(f, "Minimal({})", hash),
            TypeIdentifier::Complete(hash) => write!(f, "Complete({})", hash),
        }
    }
}

impl Cdr2Encode for TypeIdentifier {
    fn encode_cdr2_le(&self, buf: &mut [u8]) -> Result<usize, CdrError> {
        let mut enc = CdrEncoder::new(buf, CdrVersion::Xcdr2, Endianness::Little);
        self.encode(&mut enc)?;
        Ok(enc.offset())
    }

    fn max_cdr2_size(&self) -> usize {
        // discriminator + (padding + u32) or 14-byte hash
        1 + 14
    }
}

impl Cdr2Decode for TypeIdentifier {
    fn decode_cdr2_le(src: &[u8]) -> Result<(Self, usize), CdrError> {
        let mut dec = CdrDecoder::new(src, CdrVersion::Xcdr2, Endianness::Little);
        let value = Self::decode(&mut dec)?;
        Ok((value, dec.offset()))
    }
}
