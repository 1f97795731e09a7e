// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML plugin configuration loaded from disk.

#![cfg(feature = "config-file")]

use patient_monitoring::core::ser::Endianness;
use patient_monitoring::{
    DataRepresentation, Error, Participant, PatientMonitoring, PluginConfig, RuntimeConfig,
};
use std::io::Write;
use std::sync::Arc;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

#[test]
fn test_yaml_file_drives_writer_encoding() {
    let file = write_yaml(
        "data_representation: xcdr2\n\
         endianness: big\n\
         sample_pool_size: 2\n",
    );
    let config = PluginConfig::from_yaml_file(file.path()).expect("load");
    assert_eq!(config.default_representation, DataRepresentation::Xcdr2);
    assert_eq!(config.endianness, Endianness::Big);
    assert_eq!(config.sample_pool_size, 2);

    let participant = Participant::with_config(1, "yaml", Arc::new(config));
    participant
        .register_type::<PatientMonitoring>("PatientMonitoring")
        .expect("register");
    let plugin = participant
        .type_plugin::<PatientMonitoring>("PatientMonitoring")
        .expect("plugin");
    let mut buf = [0u8; 32];
    let written = plugin
        .serialize_to_cdr_buffer(
            Some(&mut buf),
            &PatientMonitoring::from("ok"),
            participant.config().default_representation,
        )
        .expect("serialize");
    assert_eq!(written, 16);
    assert_eq!(&buf[..2], &[0x00, 0x08], "D_CDR2_BE");
}

#[test]
fn test_runtime_config_from_file() {
    let file = write_yaml("pad_to_four: false\n");
    let runtime = RuntimeConfig::new(PluginConfig::from_yaml_file(file.path()).expect("load"));
    assert!(!runtime.load().pad_to_four);
}

#[test]
fn test_missing_and_invalid_files() {
    let err = PluginConfig::from_yaml_file("/nonexistent/pm.yaml").expect_err("missing");
    assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("Failed to read")));

    let file = write_yaml("data_representation: [xcdr]\n");
    let err = PluginConfig::from_yaml_file(file.path()).expect_err("invalid");
    assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("Failed to parse YAML")));
}
