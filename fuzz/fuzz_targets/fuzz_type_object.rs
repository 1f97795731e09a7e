// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use patient_monitoring::core::ser::Cdr2Decode;
use patient_monitoring::xtypes::{TypeIdentifier, TypeObject};

fuzz_target!(|data: &[u8]| {
    if let Ok((object, used)) = TypeObject::decode_cdr2_le(data) {
        assert!(used <= data.len());
        let _ = object.type_identifier();
        let _ = object.to_minimal();
    }

    let _ = TypeIdentifier::decode_cdr2_le(data);
});
