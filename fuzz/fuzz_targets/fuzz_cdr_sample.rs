// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use patient_monitoring::{PatientMonitoring, TypePlugin};

fuzz_target!(|data: &[u8]| {
    let plugin = TypePlugin::<PatientMonitoring>::default();
    let mut sample = plugin.create_data();

    // Encapsulated payload
    if let Ok(outcome) = plugin.deserialize(&mut sample, data, true) {
        assert!(outcome.consumed <= data.len());
        if !outcome.drop_sample {
            // Anything accepted must encode again in its own representation
            let repr = outcome.encapsulation.representation();
            let len = plugin
                .serialize_to_cdr_buffer(None, &sample, repr)
                .expect("accepted sample re-encodes");
            assert!(len <= plugin.get_serialized_sample_max_size(true, outcome.encapsulation, 0));
        }
    }

    // Raw body with the default representation
    let _ = plugin.deserialize(&mut sample, data, false);

    // Key path
    let _ = plugin.deserialize_key(&mut sample, data, true);
});
