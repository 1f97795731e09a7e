// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! EquivalenceHash and NameHash per OMG DDS-XTypes v1.3 (section 7.3.4.8).

use std::fmt;

/// 14-byte MD5 prefix of the XCDR2 serialization of a TypeObject.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquivalenceHash([u8; 14]);

impl EquivalenceHash {
    pub const fn from_bytes(bytes: [u8; 14]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 14] {
        &self.0
    }

    pub const fn zero() -> Self {
        Self([0u8; 14])
    }

    /// Compute the hash from the XCDR2 little-endian TypeObject bytes.
    #[cfg(feature = "xtypes")]
    pub fn compute(cdr2_data: &[u8]) -> Self {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(cdr2_data);
        let result = hasher.finalize();

        let mut bytes = [0u8; 14];
        bytes.copy_from_slice(&result[..14]);
        Self(bytes)
    }

    /// Without the `xtypes` feature no digest is available.
    #[cfg(not(feature = "xtypes"))]
    pub fn compute(_cdr2_data: &[u8]) -> Self {
        Self::zero()
    }
}

impl fmt::Debug for EquivalenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EquivalenceHash({})", self)
    }
}

impl fmt::Display for EquivalenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for EquivalenceHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// First four bytes of the MD5 of a member name (MinimalMemberDetail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameHash(pub [u8; 4]);

impl NameHash {
    #[cfg(feature = "xtypes")]
    pub fn from_name(name: &str) -> Self {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(name.as_bytes());
        let result = hasher.finalize();
        Self([result[0], result[1], result[2], result[3]])
    }

    #[cfg(not(feature = "xtypes"))]
    pub fn from_name(_name: &str) -> Self {
        Self([0u8; 4])
    }
}

/// Full 16-byte MD5 digest (key hashes longer than 16 bytes).
#[cfg(feature = "xtypes")]
pub(crate) fn md5_digest(data: &[u8]) -> [u8; 16] {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(data);
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

#[cfg(not(feature = "xtypes"))]
pub(crate) fn md5_digest(_data: &[u8]) -> [u8; 16] {
    [0u8; 16]
}
