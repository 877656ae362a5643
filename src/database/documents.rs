use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::database::models::{Range, Squad, SquadId, SquadMember, SquadMemberId};

pub const SQUAD_COLLECTION: &str = "squad";
pub const SQUAD_MEMBER_COLLECTION: &str = "squadMember";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadMemberDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "squadId")]
    pub squad_id: ObjectId,
    pub range: RangeDocument,
    pub email: String,
}

/// Stored as UTC BSON datetimes, so precision drops to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDocument {
    pub begin: DateTime,
    pub end: DateTime,
}

impl From<SquadId> for ObjectId {
    fn from(id: SquadId) -> Self {
        ObjectId::from_bytes(id.bytes())
    }
}

impl From<ObjectId> for SquadId {
    fn from(id: ObjectId) -> Self {
        SquadId::from_bytes(id.bytes())
    }
}

impl From<SquadMemberId> for ObjectId {
    fn from(id: SquadMemberId) -> Self {
        ObjectId::from_bytes(id.bytes())
    }
}

impl From<ObjectId> for SquadMemberId {
    fn from(id: ObjectId) -> Self {
        SquadMemberId::from_bytes(id.bytes())
    }
}

impl From<&Range> for RangeDocument {
    fn from(range: &Range) -> Self {
        Self {
            begin: DateTime::from_chrono(range.begin.to_utc()),
            end: DateTime::from_chrono(range.end.to_utc()),
        }
    }
}

impl From<RangeDocument> for Range {
    fn from(document: RangeDocument) -> Self {
        Range::new(
            document.begin.to_chrono().fixed_offset(),
            document.end.to_chrono().fixed_offset(),
        )
    }
}

impl SquadDocument {
    pub fn allocate() -> Self {
        Self {
            id: ObjectId::new(),
        }
    }
}

impl From<SquadId> for SquadDocument {
    fn from(id: SquadId) -> Self {
        Self { id: id.into() }
    }
}

impl SquadMemberDocument {
    pub fn new(member: &SquadMember, squad_id: SquadId) -> Self {
        Self {
            id: member.id.into(),
            squad_id: squad_id.into(),
            range: RangeDocument::from(&member.range),
            email: member.email.clone(),
        }
    }
}

impl From<SquadMemberDocument> for SquadMember {
    fn from(document: SquadMemberDocument) -> Self {
        Self {
            id: document.id.into(),
            range: document.range.into(),
            email: document.email,
        }
    }
}

/// Splits a roster into squad records and member records tagged with their
/// squad's foreign key.
pub fn flatten_roster(squads: &[Squad]) -> (Vec<SquadDocument>, Vec<SquadMemberDocument>) {
    let squad_documents: Vec<SquadDocument> = squads
        .iter()
        .map(|squad| SquadDocument::from(squad.id))
        .collect();
    let member_documents: Vec<SquadMemberDocument> = squads
        .iter()
        .flat_map(|squad| {
            squad
                .members
                .iter()
                .map(move |member| SquadMemberDocument::new(member, squad.id))
        })
        .collect();

    (squad_documents, member_documents)
}
