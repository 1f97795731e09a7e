// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic data types.

mod patient_monitoring;

pub use patient_monitoring::PatientMonitoring;
