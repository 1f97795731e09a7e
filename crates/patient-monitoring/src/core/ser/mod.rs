// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-level serialization helpers shared by the CDR codec and XTypes.

pub mod cursor;
pub mod traits;

pub use cursor::{Cursor, CursorMut};
pub use traits::{Cdr2Decode, Cdr2Encode, CdrError};

use std::fmt;

/// Byte order of a CDR stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    pub const fn is_little(self) -> bool {
        matches!(self, Endianness::Little)
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}

impl std::str::FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "le" | "little" | "little-endian" => Ok(Endianness::Little),
            "be" | "big" | "big-endian" => Ok(Endianness::Big),
            "native" => Ok(Endianness::native()),
            other => Err(format!("unknown endianness: {}", other)),
        }
    }
}

/// Serialization error used within core::ser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
    InvalidData { offset: usize, reason: String },
}

impl SerError {
    /// Offset in the stream where the failure happened.
    pub fn offset(&self) -> usize {
        match self {
            SerError::WriteFailed { offset, .. }
            | SerError::ReadFailed { offset, .. }
            | SerError::InvalidData { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            SerError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            SerError::InvalidData { offset, reason } => {
                write!(f, "invalid data at offset {}: {}", offset, reason)
            }
        }
    }
}

impl std::error::Error for SerError {}

impl From<SerError> for crate::dds::Error {
    fn from(err: SerError) -> Self {
        crate::dds::Error::Serialization(err)
    }
}

impl From<SerError> for CdrError {
    fn from(err: SerError) -> Self {
        match err {
            SerError::WriteFailed { .. } => CdrError::BufferTooSmall,
            SerError::ReadFailed { .. } => CdrError::UnexpectedEof,
            SerError::InvalidData { reason, .. } => CdrError::InvalidData(reason),
        }
    }
}

pub type SerResult<T> = core::result::Result<T, SerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ser_error_display_variants() {
        let err = SerError::WriteFailed {
            offset: 12,
            reason: "buffer too small".into(),
        };
        assert_eq!(err.to_string(), "write failed at offset 12: buffer too small");

        let err = SerError::ReadFailed {
            offset: 4,
            reason: "unexpected end of buffer".into(),
        };
        assert_eq!(err.to_string(), "read failed at offset 4: unexpected end of buffer");

        let err = SerError::InvalidData {
            offset: 9,
            reason: "missing NUL terminator".into(),
        };
        assert_eq!(err.to_string(), "invalid data at offset 9: missing NUL terminator");
        assert_eq!(err.offset(), 9);
    }

    #[test]
    fn test_ser_error_into_api_error() {
        let api_err: crate::dds::Error = SerError::ReadFailed {
            offset: 3,
            reason: "bad payload".into(),
        }
        .into();
        assert!(matches!(api_err, crate::dds::Error::Serialization(_)));
    }

    #[test]
    fn test_endianness_parse() {
        assert_eq!("LE".parse::<Endianness>(), Ok(Endianness::Little));
        assert_eq!("big-endian".parse::<Endianness>(), Ok(Endianness::Big));
        assert!("middle".parse::<Endianness>().is_err());
    }
}
