// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `PatientMonitoring` topic type.
//!
//! ```idl
//! struct PatientMonitoring {
//!     string<128> patient_condition;
//! };
//! ```
//!
//! The type is appendable: XCDR2 payloads carry a DHEADER, XCDR1 payloads
//! are a bare string.

use crate::config::{PATIENT_CONDITION_MAX_LENGTH, TYPE_NAME};
use crate::dds::{Error, Result};
use crate::plugin::{AllocationParams, TopicType};
use crate::protocol::{CdrDecoder, CdrEncoder, CdrVersion, DataRepresentationMask, SizeCalculator};
use crate::xtypes::{
    CommonStructMember, CompleteMemberDetail, CompleteStructHeader, CompleteStructMember,
    CompleteStructType, CompleteTypeDetail, CompleteTypeObject, Extensibility, MemberFlag,
    TypeIdentifier,
};
use std::fmt;

const PATIENT_CONDITION: &str = "patient_condition";

/// Condition report for one monitored patient.
///
/// The bound on `patient_condition` is not enforced on construction or
/// mutation, only when the sample is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientMonitoring {
    patient_condition: String,
}

impl PatientMonitoring {
    /// Maximum `patient_condition` length in bytes.
    pub const PATIENT_CONDITION_MAX_LENGTH: usize = PATIENT_CONDITION_MAX_LENGTH;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(patient_condition: impl Into<String>) -> Self {
        Self {
            patient_condition: patient_condition.into(),
        }
    }

    pub fn patient_condition(&self) -> &str {
        &self.patient_condition
    }

    pub fn patient_condition_mut(&mut self) -> &mut String {
        &mut self.patient_condition
    }

    pub fn set_patient_condition(&mut self, value: impl Into<String>) {
        self.patient_condition = value.into();
    }

    pub fn into_patient_condition(self) -> String {
        self.patient_condition
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.patient_condition, &mut other.patient_condition);
    }

    /// Check bounded members against their IDL bounds.
    pub fn check_bounds(&self) -> Result<()> {
        let length = self.patient_condition.len();
        if length > PATIENT_CONDITION_MAX_LENGTH {
            return Err(Error::BoundExceeded {
                member: PATIENT_CONDITION,
                length,
                bound: PATIENT_CONDITION_MAX_LENGTH,
            });
        }
        Ok(())
    }

    fn body_size(len: usize, version: CdrVersion, current_alignment: usize) -> usize {
        let mut calc = SizeCalculator::new(version, current_alignment);
        calc.begin_aggregate(Self::extensibility());
        calc.add_string(len);
        calc.size()
    }
}

impl From<&str> for PatientMonitoring {
    fn from(value: &str) -> Self {
        Self::with_condition(value)
    }
}

impl From<String> for PatientMonitoring {
    fn from(value: String) -> Self {
        Self::with_condition(value)
    }
}

impl fmt::Display for PatientMonitoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[patient_condition: {}]", self.patient_condition)
    }
}

impl TopicType for PatientMonitoring {
    const TYPE_NAME: &'static str = TYPE_NAME;

    fn extensibility() -> Extensibility {
        Extensibility::Appendable
    }

    fn allowed_representations() -> DataRepresentationMask {
        DataRepresentationMask::XCDR.union(DataRepresentationMask::XCDR2)
    }

    fn type_object() -> CompleteTypeObject {
        CompleteTypeObject::Struct(CompleteStructType {
            struct_flags: Self::extensibility().to_struct_flag(),
            header: CompleteStructHeader {
                base_type: None,
                detail: CompleteTypeDetail {
                    type_name: TYPE_NAME.to_string(),
                },
            },
            member_seq: vec![CompleteStructMember {
                common: CommonStructMember {
                    member_id: 0,
                    member_flags: MemberFlag::TRY_CONSTRUCT1,
                    member_type_id: TypeIdentifier::string(PATIENT_CONDITION_MAX_LENGTH as u32),
                },
                detail: CompleteMemberDetail {
                    name: PATIENT_CONDITION.to_string(),
                },
            }],
        })
    }

    fn validate(&self) -> Result<()> {
        self.check_bounds()
    }

    fn serialize_body(&self, enc: &mut CdrEncoder<'_>) -> Result<()> {
        self.check_bounds()?;
        let slot = enc.begin_aggregate(Self::extensibility())?;
        enc.write_string(&self.patient_condition)?;
        enc.end_aggregate(slot)?;
        Ok(())
    }

    fn deserialize_body(&mut self, dec: &mut CdrDecoder<'_>) -> Result<()> {
        let end = dec.begin_aggregate(Self::extensibility())?;
        self.patient_condition.clear();
        // An appendable body may stop before members this version knows.
        if end.map_or(true, |end| dec.offset() < end) {
            let value = dec.read_string(Some(PATIENT_CONDITION_MAX_LENGTH))?;
            self.patient_condition.push_str(&value);
        }
        dec.end_aggregate(end)?;
        Ok(())
    }

    fn serialized_body_size(&self, version: CdrVersion, current_alignment: usize) -> usize {
        Self::body_size(self.patient_condition.len(), version, current_alignment)
    }

    fn max_serialized_body_size(version: CdrVersion, current_alignment: usize) -> usize {
        Self::body_size(PATIENT_CONDITION_MAX_LENGTH, version, current_alignment)
    }

    fn min_serialized_body_size(version: CdrVersion, current_alignment: usize) -> usize {
        Self::body_size(0, version, current_alignment)
    }

    fn reset(&mut self) {
        self.patient_condition.clear();
    }

    fn allocate(&mut self, params: &AllocationParams) {
        let capacity = params
            .max_string_length
            .unwrap_or(PATIENT_CONDITION_MAX_LENGTH);
        let additional = capacity.saturating_sub(self.patient_condition.len());
        self.patient_condition.reserve(additional);
    }

    fn print(&self, desc: Option<&str>, indent: usize) -> String {
        let pad = "   ".repeat(indent);
        let mut out = String::new();
        if let Some(desc) = desc {
            out.push_str(&format!("{}{}:\n", pad, desc));
        }
        out.push_str(&format!(
            "{}   {}: \"{}\"\n",
            pad, PATIENT_CONDITION, self.patient_condition
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ser::Endianness;

    #[test]
    fn test_default_is_empty() {
        let sample = PatientMonitoring::new();
        assert_eq!(sample.patient_condition(), "");
        assert_eq!(sample, PatientMonitoring::default());
    }

    #[test]
    fn test_construct_and_mutate() {
        let mut sample = PatientMonitoring::with_condition("stable");
        assert_eq!(sample.patient_condition(), "stable");
        sample.patient_condition_mut().push_str(", improving");
        assert_eq!(sample.patient_condition(), "stable, improving");
        sample.set_patient_condition(String::from("critical"));
        assert_eq!(PatientMonitoring::from("critical"), sample);
        assert_eq!(sample.into_patient_condition(), "critical");
    }

    #[test]
    fn test_equality_is_fieldwise() {
        let a = PatientMonitoring::from("fever");
        let b = PatientMonitoring::from(String::from("fever"));
        let c = PatientMonitoring::from("calm");
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, c);
    }

    #[test]
    fn test_swap_is_involution() {
        let mut a = PatientMonitoring::from("left");
        let mut b = PatientMonitoring::from("right");
        a.swap(&mut b);
        assert_eq!(a.patient_condition(), "right");
        assert_eq!(b.patient_condition(), "left");
        a.swap(&mut b);
        assert_eq!(a.patient_condition(), "left");
        assert_eq!(b.patient_condition(), "right");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PatientMonitoring::from("stable").to_string(),
            "[patient_condition: stable]"
        );
        assert_eq!(PatientMonitoring::new().to_string(), "[patient_condition: ]");
    }

    #[test]
    fn test_bound_is_checked_at_serialization() {
        let at_bound = PatientMonitoring::from("x".repeat(128));
        assert!(at_bound.check_bounds().is_ok());

        let over = PatientMonitoring::from("x".repeat(129));
        let mut buf = [0u8; 256];
        let mut enc = CdrEncoder::new(&mut buf, CdrVersion::Xcdr1, Endianness::Little);
        match over.serialize_body(&mut enc) {
            Err(Error::BoundExceeded {
                member,
                length,
                bound,
            }) => {
                assert_eq!(member, "patient_condition");
                assert_eq!(length, 129);
                assert_eq!(bound, 128);
            }
            other => panic!("expected BoundExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_body_sizes() {
        assert_eq!(
            PatientMonitoring::max_serialized_body_size(CdrVersion::Xcdr1, 0),
            133
        );
        assert_eq!(
            PatientMonitoring::max_serialized_body_size(CdrVersion::Xcdr2, 0),
            137
        );
        assert_eq!(
            PatientMonitoring::min_serialized_body_size(CdrVersion::Xcdr1, 0),
            5
        );
        assert_eq!(
            PatientMonitoring::min_serialized_body_size(CdrVersion::Xcdr2, 0),
            9
        );
        assert_eq!(
            PatientMonitoring::from("ok").serialized_body_size(CdrVersion::Xcdr1, 0),
            7
        );
    }

    #[test]
    fn test_xcdr2_body_roundtrip() {
        let sample = PatientMonitoring::from("resting");
        let mut buf = [0u8; 64];
        let used = {
            let mut enc = CdrEncoder::new(&mut buf, CdrVersion::Xcdr2, Endianness::Big);
            sample.serialize_body(&mut enc).expect("encode");
            enc.offset()
        };
        assert_eq!(used, sample.serialized_body_size(CdrVersion::Xcdr2, 0));
        assert_eq!(&buf[..4], &12u32.to_be_bytes());

        let mut decoded = PatientMonitoring::from("stale contents");
        let mut dec = CdrDecoder::new(&buf[..used], CdrVersion::Xcdr2, Endianness::Big);
        decoded.deserialize_body(&mut dec).expect("decode");
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_empty_appendable_body_yields_default() {
        // DHEADER of zero: writer type had no members yet.
        let body = 0u32.to_le_bytes();
        let mut sample = PatientMonitoring::from("old");
        let mut dec = CdrDecoder::new(&body, CdrVersion::Xcdr2, Endianness::Little);
        sample.deserialize_body(&mut dec).expect("decode");
        assert_eq!(sample, PatientMonitoring::default());
    }

    #[test]
    fn test_reset_and_allocate() {
        let mut sample = PatientMonitoring::from("something");
        sample.allocate(&AllocationParams::default());
        assert!(sample.patient_condition_mut().capacity() >= 128);
        sample.reset();
        assert_eq!(sample, PatientMonitoring::default());

        let mut small = PatientMonitoring::new();
        small.allocate(&AllocationParams::with_max_string_length(16));
        assert!(small.patient_condition_mut().capacity() >= 16);
    }

    #[test]
    fn test_print() {
        let sample = PatientMonitoring::from("ok");
        assert_eq!(sample.print(None, 0), "   patient_condition: \"ok\"\n");
        assert_eq!(
            sample.print(Some("sample"), 1),
            "   sample:\n      patient_condition: \"ok\"\n"
        );
    }

    #[test]
    fn test_type_object_shape() {
        let CompleteTypeObject::Struct(s) = PatientMonitoring::type_object();
        assert_eq!(s.type_name(), "PatientMonitoring");
        assert_eq!(s.extensibility(), Extensibility::Appendable);
        assert_eq!(s.member_seq.len(), 1);
        assert_eq!(s.member_seq[0].detail.name, "patient_condition");
        assert_eq!(
            s.member_seq[0].common.member_type_id,
            TypeIdentifier::StringSmall { bound: 128 }
        );
    }
}
