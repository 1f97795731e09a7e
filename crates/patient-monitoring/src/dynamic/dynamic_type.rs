// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type built from a complete TypeObject.

use crate::plugin::TopicType;
use crate::xtypes::{CompleteTypeObject, Extensibility, TypeIdentifier, TypeKind};
use std::sync::Arc;

/// Value kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// `None` for unbounded strings.
    String { bound: Option<usize> },
    Primitive(TypeKind),
    /// Hash-referenced or otherwise unsupported member type.
    Other,
}

impl MemberKind {
    pub fn from_type_identifier(id: &TypeIdentifier) -> Self {
        match id {
            TypeIdentifier::StringSmall { .. } | TypeIdentifier::StringLarge { .. } => {
                // Bound 0 marks an unbounded string.
                let bound = id.string_bound().filter(|b| *b > 0).map(|b| b as usize);
                MemberKind::String { bound }
            }
            TypeIdentifier::Primitive(kind) => MemberKind::Primitive(*kind),
            _ => MemberKind::Other,
        }
    }

    pub(crate) fn name(&self) -> String {
        match self {
            MemberKind::String { bound: Some(b) } => format!("string<{}>", b),
            MemberKind::String { bound: None } => "string".to_string(),
            MemberKind::Primitive(kind) => format!("{:?}", kind),
            MemberKind::Other => "other".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicMember {
    pub name: String,
    pub id: u32,
    pub kind: MemberKind,
}

/// Struct type known at runtime only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicType {
    name: String,
    extensibility: Extensibility,
    members: Vec<DynamicMember>,
}

impl DynamicType {
    pub fn new(
        name: impl Into<String>,
        extensibility: Extensibility,
        members: Vec<DynamicMember>,
    ) -> Self {
        Self {
            name: name.into(),
            extensibility,
            members,
        }
    }

    pub fn from_type_object(object: &CompleteTypeObject) -> Self {
        let CompleteTypeObject::Struct(st) = object;
        Self::new(
            st.type_name(),
            st.extensibility(),
            st.member_seq
                .iter()
                .map(|m| DynamicMember {
                    name: m.detail.name.clone(),
                    id: m.common.member_id,
                    kind: MemberKind::from_type_identifier(&m.common.member_type_id),
                })
                .collect(),
        )
    }

    /// Dynamic type of a registered topic type.
    pub fn of<T: TopicType>() -> Arc<Self> {
        Arc::new(Self::from_type_object(&T::type_object()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensibility(&self) -> Extensibility {
        self.extensibility
    }

    pub fn members(&self) -> &[DynamicMember] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&DynamicMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_by_id(&self, id: u32) -> Option<&DynamicMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub(crate) fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }
}
