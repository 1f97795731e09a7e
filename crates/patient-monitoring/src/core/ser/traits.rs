// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR2 serialization traits
//!
//! Encoding/decoding contract for XTypes objects (TypeIdentifier, TypeObject).
//! Buffers hold a bare XCDR2 little-endian body without encapsulation header.

use std::fmt;

/// Errors raised by `Cdr2Encode`/`Cdr2Decode` implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdrError {
    BufferTooSmall,
    UnexpectedEof,
    InvalidEncoding,
    InvalidData(String),
    TypeMismatch,
    Other(String),
}

impl fmt::Display for CdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrError::BufferTooSmall => write!(f, "buffer too small"),
            CdrError::UnexpectedEof => write!(f, "unexpected end of buffer"),
            CdrError::InvalidEncoding => write!(f, "invalid encoding"),
            CdrError::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            CdrError::TypeMismatch => write!(f, "type mismatch"),
            CdrError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CdrError {}

/// CDR2 encoding trait
pub trait Cdr2Encode {
    /// Encode into `buf`, returning the number of bytes written.
    fn encode_cdr2_le(&self, buf: &mut [u8]) -> Result<usize, CdrError>;

    /// Upper bound of the encoded size, used to size buffers before encoding.
    fn max_cdr2_size(&self) -> usize;

    /// Encode into a freshly allocated, exactly-sized vector.
    fn to_cdr2_vec(&self) -> Result<Vec<u8>, CdrError> {
        let mut buf = vec![0u8; self.max_cdr2_size()];
        let used = self.encode_cdr2_le(&mut buf)?;
        buf.truncate(used);
        Ok(buf)
    }
}

/// CDR2 decoding trait
pub trait Cdr2Decode: Sized {
    /// Decode a value, returning it together with the bytes consumed.
    fn decode_cdr2_le(src: &[u8]) -> Result<(Self, usize), CdrError>;
}
