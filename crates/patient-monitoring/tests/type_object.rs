// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeObject encoding and equivalence hashing for the registered type.

use patient_monitoring::core::ser::{Cdr2Decode, Cdr2Encode};
use patient_monitoring::xtypes::{
    CompleteTypeObject, EquivalenceHash, Extensibility, TypeIdentifier, TypeObject,
};
use patient_monitoring::{PatientMonitoring, TopicType};

#[rustfmt::skip]
const COMPLETE_GOLDEN: [u8; 84] = [
    0x50, 0x00, 0x00, 0x00,                         // DHEADER (TypeObject)
    0xf2, 0x51,                                     // EK_COMPLETE, TK_STRUCTURE
    0x02, 0x00,                                     // IS_APPENDABLE
    0x1a, 0x00, 0x00, 0x00,                         // DHEADER (CompleteStructHeader)
    0x00,                                           // base_type TK_NONE
    0x00, 0x00,                                     // ann_builtin, ann_custom absent
    0x00,                                           // pad
    0x12, 0x00, 0x00, 0x00,                         // type_name length
    b'P', b'a', b't', b'i', b'e', b'n', b't', b'M', b'o', b'n', b'i', b't', b'o', b'r',
    b'i', b'n', b'g', 0x00,
    0x00, 0x00,                                     // pad
    0x28, 0x00, 0x00, 0x00,                         // DHEADER (member_seq)
    0x01, 0x00, 0x00, 0x00,                         // 1 member
    0x20, 0x00, 0x00, 0x00,                         // DHEADER (CompleteStructMember)
    0x00, 0x00, 0x00, 0x00,                         // member_id
    0x01, 0x00,                                     // TRY_CONSTRUCT1
    0x70, 0x80,                                     // TI_STRING8_SMALL, bound 128
    0x12, 0x00, 0x00, 0x00,                         // name length
    b'p', b'a', b't', b'i', b'e', b'n', b't', b'_', b'c', b'o', b'n', b'd', b'i', b't',
    b'i', b'o', b'n', 0x00,
    0x00, 0x00,                                     // ann_builtin, ann_custom absent
];

#[cfg(feature = "xtypes")]
#[rustfmt::skip]
const MINIMAL_GOLDEN: [u8; 40] = [
    0x24, 0x00, 0x00, 0x00,                         // DHEADER (TypeObject)
    0xf1, 0x51,                                     // EK_MINIMAL, TK_STRUCTURE
    0x02, 0x00,                                     // IS_APPENDABLE
    0x01, 0x00, 0x00, 0x00,                         // DHEADER (MinimalStructHeader)
    0x00,                                           // base_type TK_NONE
    0x00, 0x00, 0x00,                               // pad
    0x14, 0x00, 0x00, 0x00,                         // DHEADER (member_seq)
    0x01, 0x00, 0x00, 0x00,                         // 1 member
    0x0c, 0x00, 0x00, 0x00,                         // DHEADER (MinimalStructMember)
    0x00, 0x00, 0x00, 0x00,                         // member_id
    0x01, 0x00,                                     // TRY_CONSTRUCT1
    0x70, 0x80,                                     // TI_STRING8_SMALL, bound 128
    0x48, 0x77, 0xfa, 0xbf,                         // MD5("patient_condition")[0..4]
];

fn complete() -> TypeObject {
    TypeObject::Complete(PatientMonitoring::type_object())
}

#[test]
fn golden_complete_type_object() {
    let bytes = complete().to_cdr2_vec().expect("encode");
    assert_eq!(bytes, COMPLETE_GOLDEN);

    let (decoded, used) = TypeObject::decode_cdr2_le(&COMPLETE_GOLDEN).expect("decode golden");
    assert_eq!(used, COMPLETE_GOLDEN.len());
    assert_eq!(decoded, complete());
}

#[cfg(feature = "xtypes")]
#[test]
fn golden_minimal_type_object() {
    let bytes = complete().to_minimal().to_cdr2_vec().expect("encode");
    assert_eq!(bytes, MINIMAL_GOLDEN);

    let (decoded, _) = TypeObject::decode_cdr2_le(&MINIMAL_GOLDEN).expect("decode golden");
    assert_eq!(decoded, complete().to_minimal());
}

#[cfg(feature = "xtypes")]
#[test]
fn golden_type_identifiers() {
    let hash = |hex: &str| {
        let mut bytes = [0u8; 14];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).expect("hex");
        }
        EquivalenceHash::from_bytes(bytes)
    };
    assert_eq!(
        complete().type_identifier().expect("complete"),
        TypeIdentifier::Complete(hash("9cf870295d433a247ac85d924f33"))
    );
    assert_eq!(
        complete().to_minimal().type_identifier().expect("minimal"),
        TypeIdentifier::Minimal(hash("8bbe82cf8c729cbab09863bc69be"))
    );
}

#[test]
fn test_type_object_layout_prefix() {
    let bytes = complete().to_cdr2_vec().expect("encode");
    // DHEADER, EK_COMPLETE, TK_STRUCTURE
    assert_eq!(
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize,
        bytes.len() - 4
    );
    assert_eq!(bytes[4], 0xF2);
    assert_eq!(bytes[5], 0x51);

    let minimal = complete().to_minimal().to_cdr2_vec().expect("encode minimal");
    assert_eq!(minimal[4], 0xF1);
    assert!(minimal.len() < bytes.len());
}

#[test]
fn test_type_object_decodes_back() {
    for object in [complete(), complete().to_minimal()] {
        let bytes = object.to_cdr2_vec().expect("encode");
        let (decoded, used) = TypeObject::decode_cdr2_le(&bytes).expect("decode");
        assert_eq!(used, bytes.len());
        assert_eq!(decoded, object);
    }
}

#[cfg(feature = "xtypes")]
#[test]
fn test_hash_is_stable_and_name_sensitive() {
    let id = complete().type_identifier().expect("id");
    assert_eq!(id, complete().type_identifier().expect("id again"));
    let TypeIdentifier::Complete(hash) = id else {
        panic!("complete objects hash to a complete identifier");
    };
    assert_ne!(hash, EquivalenceHash::zero());

    let mut renamed = PatientMonitoring::type_object();
    let CompleteTypeObject::Struct(st) = &mut renamed;
    st.member_seq[0].detail.name = "patient_status".to_string();
    let renamed_id = TypeObject::Complete(renamed).type_identifier().expect("id");
    assert_ne!(renamed_id, id);

    let minimal_id = complete().to_minimal().type_identifier().expect("minimal");
    assert!(matches!(minimal_id, TypeIdentifier::Minimal(_)));
}

#[test]
fn test_struct_header() {
    let CompleteTypeObject::Struct(st) = PatientMonitoring::type_object();
    assert_eq!(st.type_name(), "PatientMonitoring");
    assert_eq!(st.extensibility(), Extensibility::Appendable);
    assert_eq!(st.member_seq.len(), 1);
    assert_eq!(
        st.member_seq[0].common.member_type_id,
        TypeIdentifier::StringSmall { bound: 128 }
    );
}
