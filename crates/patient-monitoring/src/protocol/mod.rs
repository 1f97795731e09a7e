// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-level protocol pieces: CDR/XCDR encapsulation and body codec.

pub mod cdr;

pub use cdr::{
    pad_to_align, CdrDecoder, CdrEncoder, CdrVersion, DataRepresentation, DataRepresentationMask,
    EncapsulationHeader, EncapsulationId, SizeCalculator, ENCAPSULATION_HEADER_SIZE,
};
