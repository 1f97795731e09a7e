// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Flat summary of a registered struct type.

use super::{CompleteTypeObject, Extensibility, TypeIdentifier};
use crate::plugin::TopicType;
use crate::protocol::{DataRepresentation, DataRepresentationMask};
use std::fmt;

/// One member of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: String,
    pub member_id: u32,
    pub type_id: TypeIdentifier,
}

/// Type name, extensibility, members and allowed representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub type_name: String,
    pub extensibility: Extensibility,
    pub members: Vec<MemberDescriptor>,
    pub allowed_representations: DataRepresentationMask,
}

impl TypeDescriptor {
    pub fn of<T: TopicType>() -> Self {
        Self::from_type_object(&T::type_object(), T::allowed_representations())
    }

    pub fn from_type_object(
        object: &CompleteTypeObject,
        allowed_representations: DataRepresentationMask,
    ) -> Self {
        let CompleteTypeObject::Struct(st) = object;
        Self {
            type_name: st.type_name().to_string(),
            extensibility: st.extensibility(),
            members: st
                .member_seq
                .iter()
                .map(|m| MemberDescriptor {
                    name: m.detail.name.clone(),
                    member_id: m.common.member_id,
                    type_id: m.common.member_type_id.clone(),
                })
                .collect(),
            allowed_representations,
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}

fn type_id_name(id: &TypeIdentifier) -> String {
    match id {
        TypeIdentifier::None => "none".to_string(),
        TypeIdentifier::Primitive(kind) => format!("{:?}", kind),
        TypeIdentifier::StringSmall { bound } => format!("string<{}>", bound),
        TypeIdentifier::StringLarge { bound } => format!("string<{}>", bound),
        TypeIdentifier::Minimal(hash) => format!("minimal {:?}", hash),
        TypeIdentifier::Complete(hash) => format!("complete {:?}", hash),
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@{} struct {} {{", self.extensibility, self.type_name)?;
        for m in &self.members {
            writeln!(
                f,
                "    {} {}; // id {}",
                type_id_name(&m.type_id),
                m.name,
                m.member_id
            )?;
        }
        write!(f, "}}")?;
        let reprs: Vec<String> = [
            DataRepresentation::Xcdr,
            DataRepresentation::Xml,
            DataRepresentation::Xcdr2,
        ]
        .into_iter()
        .filter(|r| self.allowed_representations.contains(*r))
        .map(|r| r.to_string())
        .collect();
        write!(f, " // representations: {}", reprs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatientMonitoring;

    #[test]
    fn test_descriptor_of_patient_monitoring() {
        let desc = TypeDescriptor::of::<PatientMonitoring>();
        assert_eq!(desc.type_name, "PatientMonitoring");
        assert_eq!(desc.extensibility, Extensibility::Appendable);
        assert_eq!(desc.allowed_representations.0, 5);
        let member = desc.member("patient_condition").expect("member");
        assert_eq!(member.member_id, 0);
        assert_eq!(member.type_id.string_bound(), Some(128));
        assert!(desc.member("missing").is_none());
    }

    #[test]
    fn test_display_lists_members_and_representations() {
        let text = TypeDescriptor::of::<PatientMonitoring>().to_string();
        assert!(text.starts_with("@APPENDABLE struct PatientMonitoring {"));
        assert!(text.contains("string<128> patient_condition; // id 0"));
        assert!(!text.contains("XML"));
    }
}
