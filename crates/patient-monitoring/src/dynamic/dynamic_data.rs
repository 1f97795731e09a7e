// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container with member access by name.

use super::dynamic_type::{DynamicType, MemberKind};
use crate::plugin::TopicType;
use crate::types::PatientMonitoring;
use std::fmt;
use std::sync::Arc;

/// Errors for DynamicData operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicDataError {
    MemberNotFound(String),
    TypeMismatch { expected: String, got: String },
    BoundExceeded {
        member: String,
        length: usize,
        bound: usize,
    },
}

impl fmt::Display for DynamicDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemberNotFound(name) => write!(f, "Member not found: {}", name),
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::BoundExceeded {
                member,
                length,
                bound,
            } => write!(
                f,
                "Member '{}' length {} exceeds bound {}",
                member, length, bound
            ),
        }
    }
}

impl std::error::Error for DynamicDataError {}

#[derive(Debug, Clone, PartialEq)]
enum MemberValue {
    String(String),
    /// Members of kinds this container cannot hold.
    Opaque,
}

/// Values of one [`DynamicType`] instance. String members start empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicData {
    dynamic_type: Arc<DynamicType>,
    values: Vec<MemberValue>,
}

impl DynamicData {
    pub fn new(dynamic_type: &Arc<DynamicType>) -> Self {
        let values = dynamic_type
            .members()
            .iter()
            .map(|m| match m.kind {
                MemberKind::String { .. } => MemberValue::String(String::new()),
                _ => MemberValue::Opaque,
            })
            .collect();
        Self {
            dynamic_type: Arc::clone(dynamic_type),
            values,
        }
    }

    /// Snapshot of a typed sample.
    pub fn from_sample(sample: &PatientMonitoring) -> Self {
        let mut data = Self::new(&DynamicType::of::<PatientMonitoring>());
        if let Some(index) = data.dynamic_type.member_index("patient_condition") {
            data.values[index] = MemberValue::String(sample.patient_condition().to_string());
        }
        data
    }

    pub fn dynamic_type(&self) -> &Arc<DynamicType> {
        &self.dynamic_type
    }

    pub fn type_name(&self) -> &str {
        self.dynamic_type.name()
    }

    pub fn member_count(&self) -> usize {
        self.values.len()
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.dynamic_type
            .members()
            .iter()
            .map(|m| m.name.as_str())
            .collect()
    }

    pub fn get_string(&self, name: &str) -> Result<&str, DynamicDataError> {
        let index = self.string_member(name)?;
        match &self.values[index] {
            MemberValue::String(value) => Ok(value),
            MemberValue::Opaque => Err(self.mismatch(index)),
        }
    }

    /// Set a string member. The member bound is enforced here.
    pub fn set_string(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DynamicDataError> {
        let index = self.string_member(name)?;
        let value = value.into();
        if let MemberKind::String { bound: Some(bound) } = self.dynamic_type.members()[index].kind {
            if value.len() > bound {
                return Err(DynamicDataError::BoundExceeded {
                    member: name.to_string(),
                    length: value.len(),
                    bound,
                });
            }
        }
        self.values[index] = MemberValue::String(value);
        Ok(())
    }

    /// Reset every string member to empty.
    pub fn clear(&mut self) {
        for value in &mut self.values {
            if let MemberValue::String(s) = value {
                s.clear();
            }
        }
    }

    fn string_member(&self, name: &str) -> Result<usize, DynamicDataError> {
        let index = self
            .dynamic_type
            .member_index(name)
            .ok_or_else(|| DynamicDataError::MemberNotFound(name.to_string()))?;
        match self.dynamic_type.members()[index].kind {
            MemberKind::String { .. } => Ok(index),
            _ => Err(self.mismatch(index)),
        }
    }

    fn mismatch(&self, index: usize) -> DynamicDataError {
        DynamicDataError::TypeMismatch {
            expected: "string".to_string(),
            got: self.dynamic_type.members()[index].kind.name(),
        }
    }
}

impl fmt::Display for DynamicData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name())?;
        for (i, (member, value)) in self
            .dynamic_type
            .members()
            .iter()
            .zip(&self.values)
            .enumerate()
        {
            let sep = if i == 0 { " " } else { ", " };
            match value {
                MemberValue::String(s) => write!(f, "{}{}: {:?}", sep, member.name, s)?,
                MemberValue::Opaque => {
                    write!(f, "{}{}: <{}>", sep, member.name, member.kind.name())?
                }
            }
        }
        write!(f, " }}")
    }
}

impl From<&PatientMonitoring> for DynamicData {
    fn from(sample: &PatientMonitoring) -> Self {
        Self::from_sample(sample)
    }
}

impl TryFrom<&DynamicData> for PatientMonitoring {
    type Error = DynamicDataError;

    fn try_from(data: &DynamicData) -> Result<Self, Self::Error> {
        if data.type_name() != PatientMonitoring::TYPE_NAME {
            return Err(DynamicDataError::TypeMismatch {
                expected: PatientMonitoring::TYPE_NAME.to_string(),
                got: data.type_name().to_string(),
            });
        }
        let condition = data.get_string("patient_condition")?;
        let sample = PatientMonitoring::with_condition(condition);
        sample
            .check_bounds()
            .map_err(|_| DynamicDataError::BoundExceeded {
                member: "patient_condition".to_string(),
                length: condition.len(),
                bound: PatientMonitoring::PATIENT_CONDITION_MAX_LENGTH,
            })?;
        Ok(sample)
    }
}
