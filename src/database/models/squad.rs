use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::macros::object_id;
use super::range::{Range, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid object id: {0}")]
pub struct InvalidObjectId(pub String);

object_id! {
    pub struct SquadId;
}

object_id! {
    pub struct SquadMemberId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SquadMember {
    #[serde(rename = "ID")]
    pub id: SquadMemberId,
    pub range: Range,
    pub email: String,
}

impl SquadMember {
    pub fn new(email: impl Into<String>, range: Range) -> Self {
        Self {
            id: SquadMemberId::generate(),
            range,
            email: email.into(),
        }
    }
}

/// A squad with its members joined in at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Squad {
    #[serde(rename = "ID")]
    pub id: SquadId,
    #[serde(default)]
    pub members: Vec<SquadMember>,
}

impl Squad {
    pub fn new(id: SquadId, members: Vec<SquadMember>) -> Self {
        Self { id, members }
    }

    pub fn empty(id: SquadId) -> Self {
        Self::new(id, Vec::new())
    }
}

/// Keeps members whose range overlaps the window, preserving input order.
/// With no bounds the input is returned as is.
pub fn filter_members(
    members: Vec<SquadMember>,
    begin: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Vec<SquadMember> {
    if begin.is_none() && end.is_none() {
        return members;
    }

    members
        .into_iter()
        .filter(|member| member.range.overlaps(begin, end))
        .collect()
}
