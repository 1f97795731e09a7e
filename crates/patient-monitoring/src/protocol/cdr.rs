// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR / XCDR encapsulation and body codec.
//!
//! A serialized sample is a 4-byte encapsulation header followed by the body:
//!
//! ```text
//! +--------+--------+--------+--------+
//! | encapsulation id| options         |   id and options are big-endian
//! +--------+--------+--------+--------+
//! | body (aligned relative to here)   |
//! +-----------------------------------+
//! ```
//!
//! The two low bits of `options` carry the number of padding bytes appended
//! to round the body up to a multiple of four.

use crate::core::ser::{Cursor, CursorMut, Endianness, SerError, SerResult};
use crate::xtypes::Extensibility;
use std::fmt;

/// Size of the encapsulation header preceding every serialized body.
pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// Mask of the options bits that carry trailing padding length.
const OPTIONS_PADDING_MASK: u16 = 0x0003;

/// RTPS encapsulation identifier (first two bytes of a serialized payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncapsulationId(u16);

impl EncapsulationId {
    pub const CDR_BE: Self = Self(0x0000);
    pub const CDR_LE: Self = Self(0x0001);
    pub const PL_CDR_BE: Self = Self(0x0002);
    pub const PL_CDR_LE: Self = Self(0x0003);
    pub const CDR2_BE: Self = Self(0x0006);
    pub const CDR2_LE: Self = Self(0x0007);
    pub const D_CDR2_BE: Self = Self(0x0008);
    pub const D_CDR2_LE: Self = Self(0x0009);
    pub const PL_CDR2_BE: Self = Self(0x000a);
    pub const PL_CDR2_LE: Self = Self(0x000b);

    /// Map a raw identifier to a known encapsulation.
    pub const fn from_u16(raw: u16) -> Option<Self> {
        match raw {
            0x0000..=0x0003 | 0x0006..=0x000b => Some(Self(raw)),
            _ => None,
        }
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Odd identifiers are little-endian.
    pub const fn endianness(self) -> Endianness {
        if self.0 & 0x0001 != 0 {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub const fn version(self) -> CdrVersion {
        if self.0 <= 0x0003 {
            CdrVersion::Xcdr1
        } else {
            CdrVersion::Xcdr2
        }
    }

    pub const fn representation(self) -> DataRepresentation {
        match self.version() {
            CdrVersion::Xcdr1 => DataRepresentation::Xcdr,
            CdrVersion::Xcdr2 => DataRepresentation::Xcdr2,
        }
    }

    pub const fn is_parameter_list(self) -> bool {
        matches!(self.0, 0x0002 | 0x0003 | 0x000a | 0x000b)
    }

    /// Pick the encapsulation for a representation, type extensibility and byte order.
    pub fn select(
        representation: DataRepresentation,
        extensibility: Extensibility,
        endianness: Endianness,
    ) -> Option<Self> {
        let big = match (representation, extensibility) {
            (DataRepresentation::Xml, _) => return None,
            (DataRepresentation::Xcdr, Extensibility::Mutable) => Self::PL_CDR_BE,
            (DataRepresentation::Xcdr, _) => Self::CDR_BE,
            (DataRepresentation::Xcdr2, Extensibility::Final) => Self::CDR2_BE,
            (DataRepresentation::Xcdr2, Extensibility::Appendable) => Self::D_CDR2_BE,
            (DataRepresentation::Xcdr2, Extensibility::Mutable) => Self::PL_CDR2_BE,
        };
        Some(match endianness {
            Endianness::Big => big,
            Endianness::Little => Self(big.0 | 0x0001),
        })
    }

    pub const fn name(self) -> &'static str {
        match self.0 {
            0x0000 => "CDR_BE",
            0x0001 => "CDR_LE",
            0x0002 => "PL_CDR_BE",
            0x0003 => "PL_CDR_LE",
            0x0006 => "CDR2_BE",
            0x0007 => "CDR2_LE",
            0x0008 => "D_CDR2_BE",
            0x0009 => "D_CDR2_LE",
            0x000a => "PL_CDR2_BE",
            _ => "PL_CDR2_LE",
        }
    }
}

impl fmt::Display for EncapsulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.0)
    }
}

/// Data representation identifier (DataRepresentationQosPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i16)]
pub enum DataRepresentation {
    #[default]
    Xcdr = 0,
    Xml = 1,
    Xcdr2 = 2,
}

impl DataRepresentation {
    pub const fn id(self) -> i16 {
        self as i16
    }

    pub const fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Xcdr),
            1 => Some(Self::Xml),
            2 => Some(Self::Xcdr2),
            _ => None,
        }
    }
}

impl fmt::Display for DataRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataRepresentation::Xcdr => write!(f, "XCDR"),
            DataRepresentation::Xml => write!(f, "XML"),
            DataRepresentation::Xcdr2 => write!(f, "XCDR2"),
        }
    }
}

impl std::str::FromStr for DataRepresentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xcdr" | "xcdr1" | "cdr" => Ok(DataRepresentation::Xcdr),
            "xml" => Ok(DataRepresentation::Xml),
            "xcdr2" | "cdr2" => Ok(DataRepresentation::Xcdr2),
            other => Err(format!("unknown data representation: {}", other)),
        }
    }
}

/// Set of data representations, one bit per representation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRepresentationMask(pub u32);

impl DataRepresentationMask {
    pub const XCDR: Self = Self(1 << 0);
    pub const XML: Self = Self(1 << 1);
    pub const XCDR2: Self = Self(1 << 2);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, representation: DataRepresentation) -> bool {
        self.0 & (1 << representation as u32) != 0
    }
}

/// CDR encoding version. XCDR2 caps primitive alignment at 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdrVersion {
    Xcdr1,
    Xcdr2,
}

impl CdrVersion {
    pub const fn max_alignment(self) -> usize {
        match self {
            CdrVersion::Xcdr1 => 8,
            CdrVersion::Xcdr2 => 4,
        }
    }

    /// Whether aggregates of this extensibility carry a DHEADER.
    pub const fn uses_dheader(self, extensibility: Extensibility) -> bool {
        matches!(self, CdrVersion::Xcdr2) && !matches!(extensibility, Extensibility::Final)
    }
}

/// Encapsulation header: identifier and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulationHeader {
    pub id: EncapsulationId,
    pub options: u16,
}

impl EncapsulationHeader {
    pub const fn new(id: EncapsulationId) -> Self {
        Self { id, options: 0 }
    }

    /// Trailing padding bytes announced by the options field.
    pub const fn padding(&self) -> usize {
        (self.options & OPTIONS_PADDING_MASK) as usize
    }

    pub fn to_bytes(&self) -> [u8; ENCAPSULATION_HEADER_SIZE] {
        let id = self.id.as_u16().to_be_bytes();
        let options = self.options.to_be_bytes();
        [id[0], id[1], options[0], options[1]]
    }

    pub fn parse(buf: &[u8]) -> SerResult<Self> {
        if buf.len() < ENCAPSULATION_HEADER_SIZE {
            return Err(SerError::ReadFailed {
                offset: buf.len(),
                reason: "missing encapsulation header".into(),
            });
        }
        let raw = u16::from_be_bytes([buf[0], buf[1]]);
        let id = EncapsulationId::from_u16(raw).ok_or_else(|| SerError::InvalidData {
            offset: 0,
            reason: format!("unknown encapsulation id {:#06x}", raw),
        })?;
        Ok(Self {
            id,
            options: u16::from_be_bytes([buf[2], buf[3]]),
        })
    }
}

/// Helper: compute padding to alignment
pub const fn pad_to_align(offset: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return offset;
    }
    let mask = alignment - 1;
    (offset + mask) & !mask
}

/// Body encoder over a caller-provided buffer.
pub struct CdrEncoder<'a> {
    cursor: CursorMut<'a>,
    version: CdrVersion,
    header_at: Option<usize>,
}

impl<'a> CdrEncoder<'a> {
    /// Encoder for a bare body (no encapsulation header).
    pub fn new(buffer: &'a mut [u8], version: CdrVersion, endianness: Endianness) -> Self {
        Self {
            cursor: CursorMut::with_endianness(buffer, endianness),
            version,
            header_at: None,
        }
    }

    /// Encoder that first writes an encapsulation header.
    pub fn with_encapsulation(buffer: &'a mut [u8], id: EncapsulationId) -> SerResult<Self> {
        let mut cursor = CursorMut::with_endianness(buffer, id.endianness());
        cursor.write_bytes(&EncapsulationHeader::new(id).to_bytes())?;
        cursor.set_origin_here();
        Ok(Self {
            cursor,
            version: id.version(),
            header_at: Some(0),
        })
    }

    pub fn version(&self) -> CdrVersion {
        self.version
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    fn align_for(&mut self, size: usize) -> SerResult<()> {
        self.cursor.align(size.min(self.version.max_alignment()))
    }

    pub fn write_u8(&mut self, value: u8) -> SerResult<()> {
        self.cursor.write_u8(value)
    }

    pub fn write_bool(&mut self, value: bool) -> SerResult<()> {
        self.cursor.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> SerResult<()> {
        self.align_for(2)?;
        self.cursor.write_u16(value)
    }

    pub fn write_u32(&mut self, value: u32) -> SerResult<()> {
        self.align_for(4)?;
        self.cursor.write_u32(value)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        self.cursor.write_bytes(data)
    }

    /// Write a CDR string: u32 length (NUL included), bytes, NUL.
    pub fn write_string(&mut self, value: &str) -> SerResult<()> {
        let len = u32::try_from(value.len() + 1).map_err(|_| SerError::InvalidData {
            offset: self.cursor.offset(),
            reason: "string too long for CDR".into(),
        })?;
        self.write_u32(len)?;
        self.cursor.write_bytes(value.as_bytes())?;
        self.cursor.write_u8(0)
    }

    /// Open an aggregate. Returns the DHEADER slot when one is required.
    pub fn begin_aggregate(&mut self, extensibility: Extensibility) -> SerResult<Option<usize>> {
        if !self.version.uses_dheader(extensibility) {
            return Ok(None);
        }
        self.align_for(4)?;
        let at = self.cursor.offset();
        self.cursor.write_u32(0)?;
        Ok(Some(at))
    }

    /// Close an aggregate, back-patching its DHEADER with the body length.
    pub fn end_aggregate(&mut self, slot: Option<usize>) -> SerResult<()> {
        let Some(at) = slot else {
            return Ok(());
        };
        let body = self.cursor.offset() - (at + 4);
        let body = u32::try_from(body).map_err(|_| SerError::InvalidData {
            offset: at,
            reason: "aggregate larger than u32::MAX".into(),
        })?;
        self.cursor.patch_u32(at, body)
    }

    /// Pad the body to a multiple of four when requested, record the padding
    /// in the encapsulation options, and return the total bytes written.
    pub fn finish(mut self, pad_to_four: bool) -> SerResult<usize> {
        if let Some(header_at) = self.header_at {
            if pad_to_four {
                let before = self.cursor.relative_offset();
                self.cursor.align(4)?;
                let padding = (self.cursor.relative_offset() - before) as u16;
                self.cursor
                    .patch_bytes(header_at + 2, &(padding & OPTIONS_PADDING_MASK).to_be_bytes())?;
            }
        }
        Ok(self.cursor.offset())
    }
}

/// Body decoder over a serialized buffer.
pub struct CdrDecoder<'a> {
    cursor: Cursor<'a>,
    version: CdrVersion,
}

impl<'a> CdrDecoder<'a> {
    pub fn new(buffer: &'a [u8], version: CdrVersion, endianness: Endianness) -> Self {
        Self {
            cursor: Cursor::with_endianness(buffer, endianness),
            version,
        }
    }

    /// Parse the encapsulation header and position the decoder on the body.
    pub fn with_encapsulation(buffer: &'a [u8]) -> SerResult<(Self, EncapsulationHeader)> {
        let header = EncapsulationHeader::parse(buffer)?;
        let mut cursor = Cursor::with_endianness(buffer, header.id.endianness());
        cursor.read_bytes(ENCAPSULATION_HEADER_SIZE)?;
        cursor.set_origin_here();
        Ok((
            Self {
                cursor,
                version: header.id.version(),
            },
            header,
        ))
    }

    pub fn version(&self) -> CdrVersion {
        self.version
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn align_for(&mut self, size: usize) -> SerResult<()> {
        self.cursor.align(size.min(self.version.max_alignment()))
    }

    pub fn read_u8(&mut self) -> SerResult<u8> {
        self.cursor.read_u8()
    }

    pub fn read_bool(&mut self) -> SerResult<bool> {
        let offset = self.cursor.offset();
        match self.cursor.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerError::InvalidData {
                offset,
                reason: format!("invalid boolean value {}", other),
            }),
        }
    }

    pub fn read_u16(&mut self) -> SerResult<u16> {
        self.align_for(2)?;
        self.cursor.read_u16()
    }

    pub fn read_u32(&mut self) -> SerResult<u32> {
        self.align_for(4)?;
        self.cursor.read_u32()
    }

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        self.cursor.read_bytes(len)
    }

    /// Read a CDR string, rejecting lengths past `bound` (characters, NUL excluded).
    pub fn read_string(&mut self, bound: Option<usize>) -> SerResult<String> {
        let len = self.read_u32()? as usize;
        let at = self.cursor.offset();
        if len == 0 {
            // Some writers emit a zero length for the empty string.
            return Ok(String::new());
        }
        if let Some(bound) = bound {
            if len - 1 > bound {
                return Err(SerError::InvalidData {
                    offset: at,
                    reason: format!("string length {} exceeds bound {}", len - 1, bound),
                });
            }
        }
        let bytes = self.cursor.read_bytes(len)?;
        let (text, nul) = bytes.split_at(len - 1);
        if nul != [0] {
            return Err(SerError::InvalidData {
                offset: at + len - 1,
                reason: "missing NUL terminator".into(),
            });
        }
        String::from_utf8(text.to_vec()).map_err(|_| SerError::InvalidData {
            offset: at,
            reason: "string is not valid UTF-8".into(),
        })
    }

    /// Open an aggregate. Returns the absolute end offset announced by its DHEADER.
    pub fn begin_aggregate(&mut self, extensibility: Extensibility) -> SerResult<Option<usize>> {
        if !self.version.uses_dheader(extensibility) {
            return Ok(None);
        }
        let size = self.read_u32()? as usize;
        let end = self.cursor.offset() + size;
        if size > self.cursor.remaining() {
            return Err(SerError::ReadFailed {
                offset: self.cursor.offset(),
                reason: format!("DHEADER announces {} bytes past end of buffer", size),
            });
        }
        Ok(Some(end))
    }

    /// Close an aggregate, skipping members appended by a newer type version.
    pub fn end_aggregate(&mut self, end: Option<usize>) -> SerResult<()> {
        let Some(end) = end else {
            return Ok(());
        };
        if self.cursor.offset() > end {
            return Err(SerError::InvalidData {
                offset: self.cursor.offset(),
                reason: "members overran DHEADER length".into(),
            });
        }
        self.cursor.seek(end)
    }
}

/// Serialized size accumulator mirroring `CdrEncoder` without writing.
#[derive(Debug, Clone, Copy)]
pub struct SizeCalculator {
    version: CdrVersion,
    origin: usize,
    offset: usize,
}

impl SizeCalculator {
    /// Start counting at `current_alignment` bytes past the alignment origin.
    pub const fn new(version: CdrVersion, current_alignment: usize) -> Self {
        Self {
            version,
            origin: current_alignment,
            offset: current_alignment,
        }
    }

    fn align_for(&mut self, size: usize) {
        self.offset = pad_to_align(self.offset, size.min(self.version.max_alignment()));
    }

    pub fn add_u32(&mut self) {
        self.align_for(4);
        self.offset += 4;
    }

    /// Account for a string holding `len` bytes of text.
    pub fn add_string(&mut self, len: usize) {
        self.add_u32();
        self.offset += len + 1;
    }

    pub fn begin_aggregate(&mut self, extensibility: Extensibility) {
        if self.version.uses_dheader(extensibility) {
            self.add_u32();
        }
    }

    /// Bytes accounted since construction (padding included).
    pub const fn size(&self) -> usize {
        self.offset - self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encapsulation_id_properties() {
        assert_eq!(EncapsulationId::CDR_LE.endianness(), Endianness::Little);
        assert_eq!(EncapsulationId::D_CDR2_BE.endianness(), Endianness::Big);
        assert_eq!(EncapsulationId::CDR_BE.version(), CdrVersion::Xcdr1);
        assert_eq!(EncapsulationId::D_CDR2_LE.version(), CdrVersion::Xcdr2);
        assert!(EncapsulationId::PL_CDR2_LE.is_parameter_list());
        assert!(!EncapsulationId::CDR2_LE.is_parameter_list());
        assert_eq!(EncapsulationId::from_u16(0x0004), None);
        assert_eq!(EncapsulationId::from_u16(0x000c), None);
    }

    #[test]
    fn test_select_encapsulation() {
        assert_eq!(
            EncapsulationId::select(
                DataRepresentation::Xcdr,
                Extensibility::Appendable,
                Endianness::Little
            ),
            Some(EncapsulationId::CDR_LE)
        );
        assert_eq!(
            EncapsulationId::select(
                DataRepresentation::Xcdr2,
                Extensibility::Appendable,
                Endianness::Big
            ),
            Some(EncapsulationId::D_CDR2_BE)
        );
        assert_eq!(
            EncapsulationId::select(
                DataRepresentation::Xcdr2,
                Extensibility::Final,
                Endianness::Little
            ),
            Some(EncapsulationId::CDR2_LE)
        );
        assert_eq!(
            EncapsulationId::select(
                DataRepresentation::Xml,
                Extensibility::Final,
                Endianness::Little
            ),
            None
        );
    }

    #[test]
    fn test_representation_mask() {
        let mask = DataRepresentationMask::XCDR.union(DataRepresentationMask::XCDR2);
        assert_eq!(mask.0, 5);
        assert!(mask.contains(DataRepresentation::Xcdr));
        assert!(mask.contains(DataRepresentation::Xcdr2));
        assert!(!mask.contains(DataRepresentation::Xml));
    }

    #[test]
    fn test_header_roundtrip_and_unknown_id() {
        let header = EncapsulationHeader {
            id: EncapsulationId::D_CDR2_LE,
            options: 0x0002,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0x00, 0x09, 0x00, 0x02]);
        let parsed = EncapsulationHeader::parse(&bytes).expect("valid header");
        assert_eq!(parsed, header);
        assert_eq!(parsed.padding(), 2);

        assert!(EncapsulationHeader::parse(&[0x00, 0x05, 0x00, 0x00]).is_err());
        assert!(EncapsulationHeader::parse(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_pad_to_align() {
        assert_eq!(pad_to_align(8, 4), 8);
        assert_eq!(pad_to_align(9, 4), 12);
        assert_eq!(pad_to_align(10, 8), 16);
        assert_eq!(pad_to_align(8, 1), 8);
        assert_eq!(pad_to_align(0, 4), 0);
        assert_eq!(pad_to_align(3, 4), 4);
    }

    #[test]
    fn test_string_with_padding_recorded_in_options() {
        let mut buf = [0u8; 32];
        let mut enc = EncapsulationId::CDR_LE;
        let used = {
            let mut encoder =
                CdrEncoder::with_encapsulation(&mut buf, enc).expect("header fits");
            encoder.write_string("ok").expect("string fits");
            encoder.finish(true).expect("padding fits")
        };
        assert_eq!(used, 12);
        assert_eq!(
            &buf[..12],
            &[0x00, 0x01, 0x00, 0x01, 3, 0, 0, 0, b'o', b'k', 0, 0]
        );

        enc = EncapsulationId::CDR_BE;
        let mut buf = [0u8; 32];
        let used = {
            let mut encoder =
                CdrEncoder::with_encapsulation(&mut buf, enc).expect("header fits");
            encoder.write_string("abc").expect("string fits");
            encoder.finish(true).expect("no padding needed")
        };
        assert_eq!(used, 12);
        assert_eq!(&buf[..8], &[0x00, 0x00, 0x00, 0x00, 0, 0, 0, 4]);
    }

    #[test]
    fn test_dheader_is_back_patched() {
        let mut buf = [0u8; 32];
        let used = {
            let mut encoder = CdrEncoder::with_encapsulation(&mut buf, EncapsulationId::D_CDR2_LE)
                .expect("header fits");
            let slot = encoder
                .begin_aggregate(Extensibility::Appendable)
                .expect("dheader fits");
            assert_eq!(slot, Some(4));
            encoder.write_string("hi").expect("string fits");
            encoder.end_aggregate(slot).expect("patch");
            encoder.finish(true).expect("pad")
        };
        assert_eq!(&buf[4..8], &7u32.to_le_bytes());
        assert_eq!(used, 16);

        let (mut decoder, header) = CdrDecoder::with_encapsulation(&buf[..used]).expect("header");
        assert_eq!(header.padding(), 1);
        let end = decoder
            .begin_aggregate(Extensibility::Appendable)
            .expect("dheader");
        assert_eq!(decoder.read_string(Some(8)).expect("string"), "hi");
        decoder.end_aggregate(end).expect("close");
    }

    #[test]
    fn test_decoder_skips_appended_members() {
        // DHEADER says 12 bytes: the string (7 bytes) plus members we do not know.
        let mut body = vec![0x00, 0x09, 0x00, 0x00];
        body.extend_from_slice(&12u32.to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(b"ab\0");
        body.extend_from_slice(&[0xAA; 5]);
        let (mut decoder, _) = CdrDecoder::with_encapsulation(&body).expect("header");
        let end = decoder
            .begin_aggregate(Extensibility::Appendable)
            .expect("dheader");
        assert_eq!(decoder.read_string(None).expect("string"), "ab");
        decoder.end_aggregate(end).expect("skip");
        assert_eq!(decoder.remaining(), 0);
    }

    #[test]
    fn test_read_string_rejections() {
        let mut missing_nul = 3u32.to_le_bytes().to_vec();
        missing_nul.extend_from_slice(b"abc");
        let mut decoder = CdrDecoder::new(&missing_nul, CdrVersion::Xcdr1, Endianness::Little);
        assert!(decoder.read_string(None).is_err());

        let mut too_long = 6u32.to_le_bytes().to_vec();
        too_long.extend_from_slice(b"abcde\0");
        let mut decoder = CdrDecoder::new(&too_long, CdrVersion::Xcdr1, Endianness::Little);
        assert!(decoder.read_string(Some(4)).is_err());

        let mut bad_utf8 = 3u32.to_le_bytes().to_vec();
        bad_utf8.extend_from_slice(&[0xC3, 0x28, 0x00]);
        let mut decoder = CdrDecoder::new(&bad_utf8, CdrVersion::Xcdr1, Endianness::Little);
        assert!(decoder.read_string(None).is_err());

        let zero = 0u32.to_le_bytes();
        let mut decoder = CdrDecoder::new(&zero, CdrVersion::Xcdr1, Endianness::Little);
        assert_eq!(decoder.read_string(Some(4)).expect("empty"), "");
    }

    #[test]
    fn test_size_calculator_matches_encoder() {
        for version in [CdrVersion::Xcdr1, CdrVersion::Xcdr2] {
            for text in ["", "a", "abcd", "condition stable"] {
                let mut calc = SizeCalculator::new(version, 0);
                calc.begin_aggregate(Extensibility::Appendable);
                calc.add_string(text.len());

                let mut buf = [0u8; 64];
                let mut encoder = CdrEncoder::new(&mut buf, version, Endianness::Little);
                let slot = encoder
                    .begin_aggregate(Extensibility::Appendable)
                    .expect("dheader");
                encoder.write_string(text).expect("string");
                encoder.end_aggregate(slot).expect("patch");
                assert_eq!(calc.size(), encoder.offset());
            }
        }
    }

    #[test]
    fn test_size_calculator_honours_current_alignment() {
        let mut calc = SizeCalculator::new(CdrVersion::Xcdr1, 1);
        calc.add_string(0);
        // 3 bytes of padding, 4 bytes length, 1 byte NUL
        assert_eq!(calc.size(), 8);
    }
}
