// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeKind constants per OMG DDS-XTypes v1.3 (section 7.3.4.1).

/// TypeKind identifies primitive and constructed types.
///
/// Values are the octets used on the wire as TypeIdentifier and
/// TypeObject union discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum TypeKind {
    TK_NONE = 0x00,
    TK_BOOLEAN = 0x01,
    TK_BYTE = 0x02,
    TK_INT16 = 0x03,
    TK_INT32 = 0x04,
    TK_INT64 = 0x05,
    TK_UINT16 = 0x06,
    TK_UINT32 = 0x07,
    TK_UINT64 = 0x08,
    TK_FLOAT32 = 0x09,
    TK_FLOAT64 = 0x0A,
    TK_FLOAT128 = 0x0B,
    TK_INT8 = 0x0C,
    TK_UINT8 = 0x0D,
    TK_CHAR8 = 0x10,
    TK_CHAR16 = 0x11,

    TK_STRING8 = 0x20,
    TK_STRING16 = 0x21,

    TK_ALIAS = 0x30,

    TK_ENUM = 0x40,
    TK_BITMASK = 0x41,

    TK_ANNOTATION = 0x50,
    TK_STRUCTURE = 0x51,
    TK_UNION = 0x52,
    TK_BITSET = 0x53,

    TK_SEQUENCE = 0x60,
    TK_ARRAY = 0x61,
    TK_MAP = 0x62,
}

impl TypeKind {
    /// Primitive kinds are encoded directly in a TypeIdentifier.
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeKind::TK_BOOLEAN
                | TypeKind::TK_BYTE
                | TypeKind::TK_INT16
                | TypeKind::TK_INT32
                | TypeKind::TK_INT64
                | TypeKind::TK_UINT16
                | TypeKind::TK_UINT32
                | TypeKind::TK_UINT64
                | TypeKind::TK_FLOAT32
                | TypeKind::TK_FLOAT64
                | TypeKind::TK_FLOAT128
                | TypeKind::TK_INT8
                | TypeKind::TK_UINT8
                | TypeKind::TK_CHAR8
                | TypeKind::TK_CHAR16
        )
    }

    pub const fn is_string(self) -> bool {
        matches!(self, TypeKind::TK_STRING8 | TypeKind::TK_STRING16)
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => TypeKind::TK_NONE,
            0x01 => TypeKind::TK_BOOLEAN,
            0x02 => TypeKind::TK_BYTE,
            0x03 => TypeKind::TK_INT16,
            0x04 => TypeKind::TK_INT32,
            0x05 => TypeKind::TK_INT64,
            0x06 => TypeKind::TK_UINT16,
            0x07 => TypeKind::TK_UINT32,
            0x08 => TypeKind::TK_UINT64,
            0x09 => TypeKind::TK_FLOAT32,
            0x0A => TypeKind::TK_FLOAT64,
            0x0B => TypeKind::TK_FLOAT128,
            0x0C => TypeKind::TK_INT8,
            0x0D => TypeKind::TK_UINT8,
            0x10 => TypeKind::TK_CHAR8,
            0x11 => TypeKind::TK_CHAR16,
            0x20 => TypeKind::TK_STRING8,
            0x21 => TypeKind::TK_STRING16,
            0x30 => TypeKind::TK_ALIAS,
            0x40 => TypeKind::TK_ENUM,
            0x41 => TypeKind::TK_BITMASK,
            0x50 => TypeKind::TK_ANNOTATION,
            0x51 => TypeKind::TK_STRUCTURE,
            0x52 => TypeKind::TK_UNION,
            0x53 => TypeKind::TK_BITSET,
            0x60 => TypeKind::TK_SEQUENCE,
            0x61 => TypeKind::TK_ARRAY,
            0x62 => TypeKind::TK_MAP,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_known_kinds() {
        for kind in [
            TypeKind::TK_NONE,
            TypeKind::TK_INT32,
            TypeKind::TK_CHAR16,
            TypeKind::TK_STRING8,
            TypeKind::TK_STRUCTURE,
            TypeKind::TK_MAP,
        ] {
            assert_eq!(TypeKind::from_u8(kind.to_u8()), Some(kind));
        }
        assert_eq!(TypeKind::from_u8(0x70), None);
    }

    #[test]
    fn test_classification() {
        assert!(TypeKind::TK_UINT8.is_primitive());
        assert!(!TypeKind::TK_STRING8.is_primitive());
        assert!(TypeKind::TK_STRING16.is_string());
        assert!(!TypeKind::TK_STRUCTURE.is_string());
    }
}
