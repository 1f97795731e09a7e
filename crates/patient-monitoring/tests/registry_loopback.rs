// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry and in-process loopback integration tests
//!
//! Registers the type on a participant, opens topics and moves samples
//! between writers and readers, including from several threads.

#![allow(clippy::missing_panics_doc)]

use patient_monitoring::dynamic::{DynamicData, DynamicType};
use patient_monitoring::xtypes::{TypeIdentifier, TypeObject};
use patient_monitoring::{DataRepresentation, Error, Participant, PatientMonitoring};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

fn registered(name: &str) -> Participant {
    let participant = Participant::new(0, name);
    participant
        .register_type::<PatientMonitoring>("PatientMonitoring")
        .expect("register");
    participant
}

#[test]
fn test_register_then_publish() {
    let participant = registered("icu");
    assert_eq!(participant.registered_type_names(), vec!["PatientMonitoring"]);

    let topic = participant
        .topic::<PatientMonitoring>("icu/bed-3", "PatientMonitoring")
        .expect("topic");
    let reader = topic.reader().expect("reader");
    let writer = topic.writer().expect("writer");
    assert_eq!(topic.reader_count(), 1);

    writer
        .write(&PatientMonitoring::with_condition("stable"))
        .expect("write");
    let sample = reader.try_take().expect("take").expect("sample");
    assert_eq!(sample.to_string(), "[patient_condition: stable]");
}

#[test]
fn test_two_topic_handles_share_delivery() {
    let participant = registered("ward");
    let a = participant
        .topic::<PatientMonitoring>("ward/beds", "PatientMonitoring")
        .expect("topic a");
    let b = participant
        .topic::<PatientMonitoring>("ward/beds", "PatientMonitoring")
        .expect("topic b");
    let other = participant
        .topic::<PatientMonitoring>("ward/other", "PatientMonitoring")
        .expect("other");

    let reader_a = a.reader().expect("reader a");
    let reader_other = other.reader().expect("reader other");
    let writer_b = b.writer().expect("writer b");
    assert_eq!(
        writer_b.write(&PatientMonitoring::from("fever")).expect("write"),
        1
    );
    assert_eq!(reader_a.take_all().expect("take").len(), 1);
    assert!(reader_other.try_take().expect("take").is_none());
}

#[test]
fn test_mixed_representations_on_one_topic() {
    let participant = registered("mixed");
    let topic = participant
        .topic::<PatientMonitoring>("mixed/feed", "PatientMonitoring")
        .expect("topic");
    let reader = topic.reader().expect("reader");
    let xcdr = topic.writer().expect("writer");
    let mut xcdr2 = topic.writer().expect("writer");
    xcdr2
        .set_representation(DataRepresentation::Xcdr2)
        .expect("xcdr2");

    xcdr.write(&PatientMonitoring::from("one")).expect("write");
    xcdr2.write(&PatientMonitoring::from("two")).expect("write");
    let got: Vec<String> = reader
        .take_all()
        .expect("take")
        .into_iter()
        .map(PatientMonitoring::into_patient_condition)
        .collect();
    assert_eq!(got, ["one", "two"]);
}

#[test]
fn test_concurrent_writers() {
    const WRITERS: usize = 4;
    const PER_WRITER: usize = 50;

    let participant = registered("concurrent");
    let topic = participant
        .topic::<PatientMonitoring>("concurrent/feed", "PatientMonitoring")
        .expect("topic");
    let reader = topic.reader().expect("reader");

    thread::scope(|s| {
        for w in 0..WRITERS {
            let writer = topic.writer().expect("writer");
            s.spawn(move || {
                for i in 0..PER_WRITER {
                    writer
                        .write(&PatientMonitoring::from(format!("w{}-{}", w, i)))
                        .expect("write");
                }
            });
        }
    });

    let mut seen = HashSet::new();
    while let Some(sample) = reader
        .take_timeout(Duration::from_millis(20))
        .expect("take")
    {
        seen.insert(sample.into_patient_condition());
    }
    assert_eq!(seen.len(), WRITERS * PER_WRITER);
    assert!(seen.contains("w3-49"));
}

#[test]
fn test_registered_type_object_drives_dynamic_data() {
    let participant = registered("dynamic");
    let object = participant.type_object("PatientMonitoring").expect("object");
    let TypeObject::Complete(complete) = &object else {
        panic!("registry stores the complete object");
    };
    assert!(matches!(
        object.type_identifier().expect("id"),
        TypeIdentifier::Complete(_)
    ));

    let dynamic_type = std::sync::Arc::new(DynamicType::from_type_object(complete));
    let mut data = DynamicData::new(&dynamic_type);
    data.set_string("patient_condition", "sedated")
        .expect("set");

    let topic = participant
        .topic::<PatientMonitoring>("dynamic/feed", "PatientMonitoring")
        .expect("topic");
    let reader = topic.reader().expect("reader");
    let writer = topic.writer().expect("writer");
    writer
        .write(&PatientMonitoring::try_from(&data).expect("convert"))
        .expect("write");
    let sample = reader.try_take().expect("take").expect("sample");
    assert_eq!(DynamicData::from_sample(&sample), data);
}

#[test]
fn test_unregister_keeps_open_topics_working() {
    let participant = registered("unregister");
    let topic = participant
        .topic::<PatientMonitoring>("u/feed", "PatientMonitoring")
        .expect("topic");
    participant
        .unregister_type("PatientMonitoring")
        .expect("unregister");

    let reader = topic.reader().expect("reader");
    let writer = topic.writer().expect("writer");
    writer.write(&PatientMonitoring::from("still here")).expect("write");
    assert!(reader.try_take().expect("take").is_some());

    assert!(matches!(
        participant.topic::<PatientMonitoring>("u/feed", "PatientMonitoring"),
        Err(Error::TypeNotRegistered(_))
    ));
}
