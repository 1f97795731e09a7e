// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic Types
//!
//! Member access by name for tools that only know a type through its
//! TypeObject.
//!
//! # Example
//!
//! ```rust
//! use patient_monitoring::dynamic::{DynamicData, DynamicType};
//! use patient_monitoring::PatientMonitoring;
//!
//! let mut data = DynamicData::new(&DynamicType::of::<PatientMonitoring>());
//! data.set_string("patient_condition", "stable").unwrap();
//!
//! let sample = PatientMonitoring::try_from(&data).unwrap();
//! assert_eq!(sample.patient_condition(), "stable");
//! ```

mod dynamic_data;
mod dynamic_type;

pub use dynamic_data::{DynamicData, DynamicDataError};
pub use dynamic_type::{DynamicMember, DynamicType, MemberKind};
