// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for CDR buffer manipulation.
//!
//! Both cursors carry a byte order and an alignment origin. CDR aligns
//! primitives relative to the start of the serialized body, which is not
//! the start of the buffer once an encapsulation header has been written.

use super::{Endianness, SerError, SerResult};

/// Generate write methods for primitive types.
///
/// Each generated method converts the value using the cursor byte order
/// and forwards to `write_bytes` (which performs the bounds check).
macro_rules! impl_write {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> SerResult<()> {
            match self.endianness {
                Endianness::Little => self.write_bytes(&value.to_le_bytes()),
                Endianness::Big => self.write_bytes(&value.to_be_bytes()),
            }
        }
    };
}

/// Generate read methods for primitive types.
macro_rules! impl_read {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(match self.endianness {
                Endianness::Little => <$type>::from_le_bytes(bytes),
                Endianness::Big => <$type>::from_be_bytes(bytes),
            })
        }
    };
}

/// Generate common cursor methods (offset, remaining, origin, endianness).
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }

        pub fn endianness(&self) -> Endianness {
            self.endianness
        }

        pub fn set_endianness(&mut self, endianness: Endianness) {
            self.endianness = endianness;
        }

        /// Reset the alignment origin to the current offset.
        pub fn set_origin_here(&mut self) {
            self.origin = self.offset;
        }

        /// Offset relative to the alignment origin.
        pub fn relative_offset(&self) -> usize {
            self.offset - self.origin
        }

        fn padding_for(&self, alignment: usize) -> usize {
            if alignment <= 1 {
                return 0;
            }
            let rel = self.offset - self.origin;
            let mask = alignment - 1;
            ((rel + mask) & !mask) - rel
        }
    };
}

/// Mutable cursor for writing (bounds-checked, zero-copy)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
    origin: usize,
    endianness: Endianness,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_endianness(buffer, Endianness::Little)
    }

    pub fn with_endianness(buffer: &'a mut [u8], endianness: Endianness) -> Self {
        Self {
            buffer,
            offset: 0,
            origin: 0,
            endianness,
        }
    }

    pub fn write_u8(&mut self, value: u8) -> SerResult<()> {
        self.write_bytes(&[value])
    }

    impl_write!(write_u16, u16);
    impl_write!(write_u32, u32);
    impl_write!(write_u64, u64);
    impl_write!(write_i32, i32);

    pub fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(SerError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Overwrite bytes at an absolute offset that was already written.
    pub fn patch_bytes(&mut self, at: usize, data: &[u8]) -> SerResult<()> {
        if at + data.len() > self.offset {
            return Err(SerError::WriteFailed {
                offset: at,
                reason: "patch outside written region".into(),
            });
        }
        self.buffer[at..at + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Overwrite a u32 at an absolute offset (DHEADER back-patching).
    pub fn patch_u32(&mut self, at: usize, value: u32) -> SerResult<()> {
        match self.endianness {
            Endianness::Little => self.patch_bytes(at, &value.to_le_bytes()),
            Endianness::Big => self.patch_bytes(at, &value.to_be_bytes()),
        }
    }

    /// Advance to the next multiple of `alignment` (relative to the origin), zero-filling.
    pub fn align(&mut self, alignment: usize) -> SerResult<()> {
        let padding = self.padding_for(alignment);
        if self.offset + padding > self.buffer.len() {
            return Err(SerError::WriteFailed {
                offset: self.offset + padding,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + padding].fill(0);
        self.offset += padding;
        Ok(())
    }

    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    origin: usize,
    endianness: Endianness,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_endianness(buffer, Endianness::Little)
    }

    pub fn with_endianness(buffer: &'a [u8], endianness: Endianness) -> Self {
        Self {
            buffer,
            offset: 0,
            origin: 0,
            endianness,
        }
    }

    pub fn read_u8(&mut self) -> SerResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    impl_read!(read_u16, u16, 2);
    impl_read!(read_u32, u32, 4);
    impl_read!(read_u64, u64, 8);
    impl_read!(read_i32, i32, 4);

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        if self.offset + len > self.buffer.len() {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Skip forward to an absolute offset.
    pub fn seek(&mut self, to: usize) -> SerResult<()> {
        if to > self.buffer.len() || to < self.offset {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                reason: "seek outside buffer".into(),
            });
        }
        self.offset = to;
        Ok(())
    }

    pub fn align(&mut self, alignment: usize) -> SerResult<()> {
        let padding = self.padding_for(alignment);
        if self.offset + padding > self.buffer.len() {
            return Err(SerError::ReadFailed {
                offset: self.offset + padding,
                reason: "unexpected end of buffer".into(),
            });
        }
        self.offset += padding;
        Ok(())
    }

    impl_cursor_common!();

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
