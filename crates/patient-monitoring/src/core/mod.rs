// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Low-level infrastructure shared by the codec, XTypes and the type plugin.

/// Serialization helpers (cursors, CDR2 traits, byte order).
pub mod ser;
