// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Convenience entry points over [`TypePlugin`] for one-off conversions.
//!
//! Failures are reported as [`Error::ReturnCode`] carrying a fixed context
//! message; the underlying error is logged.

use crate::config::RuntimeConfig;
use crate::dds::{check_return_code, Error, Participant, Result};
use crate::plugin::{AllocationParams, TopicType, TypePlugin};
use crate::protocol::DataRepresentation;

const CALCULATE_SIZE_CONTEXT: &str = "Failed to calculate cdr buffer size";
const COPY_CONTEXT: &str = "Failed to copy cdr buffer";

fn plugin<T: TopicType>() -> TypePlugin<T> {
    TypePlugin::with_config(RuntimeConfig::global().load())
}

fn to_return_code_error(err: Error, context: &str) -> Error {
    log::debug!("[plugin] {}: {}", context, err);
    match check_return_code(err.return_code(), context) {
        Err(mapped) => mapped,
        Ok(()) => err,
    }
}

/// Serialize `sample` with an encapsulation header into `buffer`.
///
/// The buffer is resized to the exact payload length.
pub fn to_cdr_buffer<'a, T: TopicType>(
    buffer: &'a mut Vec<u8>,
    sample: &T,
    representation: DataRepresentation,
) -> Result<&'a mut Vec<u8>> {
    let plugin = plugin::<T>();
    let len = plugin
        .serialize_to_cdr_buffer(None, sample, representation)
        .map_err(|e| to_return_code_error(e, CALCULATE_SIZE_CONTEXT))?;
    buffer.clear();
    buffer.resize(len, 0);
    let written = plugin
        .serialize_to_cdr_buffer(Some(buffer.as_mut_slice()), sample, representation)
        .map_err(|e| to_return_code_error(e, COPY_CONTEXT))?;
    buffer.truncate(written);
    Ok(buffer)
}

/// Deserialize an encapsulated payload into `sample`.
pub fn from_cdr_buffer<T: TopicType>(sample: &mut T, buffer: &[u8]) -> Result<()> {
    plugin::<T>()
        .deserialize_from_cdr_buffer(sample, buffer)
        .map_err(|e| {
            let context = format!("Failed to create {} from cdr buffer", T::TYPE_NAME);
            to_return_code_error(e, &context)
        })
}

/// Restore `sample` to its default state.
pub fn reset_sample<T: TopicType>(sample: &mut T) {
    sample.reset();
}

/// Reserve string capacity; `None` reserves the IDL bound.
pub fn allocate_sample<T: TopicType>(sample: &mut T, max_string_length: Option<usize>) {
    sample.allocate(&AllocationParams { max_string_length });
}

/// Register `T` with `participant` under `type_name`.
pub fn register_type<T: TopicType>(participant: &Participant, type_name: &str) -> Result<()> {
    participant.register_type::<T>(type_name)
}

/// Name `T` registers under by default.
pub fn type_name<T: TopicType>() -> &'static str {
    T::TYPE_NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::ReturnCode;
    use crate::types::PatientMonitoring;

    #[test]
    fn test_to_and_from_cdr_buffer() {
        let sample = PatientMonitoring::from("ok");
        let mut buffer = vec![0xAA; 64];
        let bytes = to_cdr_buffer(&mut buffer, &sample, DataRepresentation::Xcdr)
            .expect("serialize")
            .clone();
        assert_eq!(bytes.len(), 12);
        assert_eq!(buffer, bytes);

        let mut decoded = PatientMonitoring::new();
        from_cdr_buffer(&mut decoded, &buffer).expect("deserialize");
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_copy_failure_context() {
        let mut buffer = Vec::new();
        let err = to_cdr_buffer(
            &mut buffer,
            &PatientMonitoring::from("x".repeat(129)),
            DataRepresentation::Xcdr,
        )
        .expect_err("bound");
        match err {
            Error::ReturnCode { code, context } => {
                assert_eq!(code, ReturnCode::BadParameter);
                assert_eq!(context, "Failed to copy cdr buffer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_failure_context() {
        let mut buffer = Vec::new();
        let err = to_cdr_buffer(&mut buffer, &PatientMonitoring::new(), DataRepresentation::Xml)
            .expect_err("xml");
        assert_eq!(
            err.to_string(),
            "Failed to calculate cdr buffer size (RETCODE_UNSUPPORTED)"
        );
    }

    #[test]
    fn test_from_cdr_buffer_failure_context() {
        let mut sample = PatientMonitoring::new();
        let err = from_cdr_buffer(&mut sample, &[0x00, 0x01]).expect_err("short");
        assert!(err
            .to_string()
            .starts_with("Failed to create PatientMonitoring from cdr buffer"));
    }

    #[test]
    fn test_reset_allocate_register() {
        let mut sample = PatientMonitoring::from("busy");
        reset_sample(&mut sample);
        assert_eq!(sample, PatientMonitoring::default());
        allocate_sample(&mut sample, None);
        assert!(sample.patient_condition_mut().capacity() >= 128);

        let participant = Participant::new(0, "support");
        register_type::<PatientMonitoring>(&participant, type_name::<PatientMonitoring>())
            .expect("register");
        assert!(participant.is_type_registered("PatientMonitoring"));
    }
}
