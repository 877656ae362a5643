use std::collections::{HashMap, HashSet};

use crate::database::connection::Connection;
use crate::database::documents::{SquadDocument, SquadMemberDocument, flatten_roster};
use crate::database::models::{Squad, SquadId, SquadMember, Timestamp, filter_members};
use crate::error::AppError;

/// Per-request data access. Built by `SquadRepositoryFactory::repository`
/// and owned by exactly one request until `close` is called.
pub struct SquadRepository {
    connection: Connection,
}

impl SquadRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn close(self) {
        log::debug!("Releasing {} repository handle", self.connection.backend());
    }

    pub async fn create_squad(&self) -> Result<SquadId, AppError> {
        let document = SquadDocument::allocate();
        let squad_id = SquadId::from(document.id);

        self.connection.insert_squad(document).await?;
        log::debug!("Created squad {}", squad_id);

        Ok(squad_id)
    }

    pub async fn squad_exists(&self, squad_id: SquadId) -> Result<bool, AppError> {
        let squad = self.connection.find_squad(squad_id.into()).await?;
        Ok(squad.is_some())
    }

    /// `None` when `id` is not a well-formed identifier or names no squad.
    pub async fn get_squad(
        &self,
        id: &str,
        begin: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Option<Squad>, AppError> {
        let Ok(squad_id) = id.parse::<SquadId>() else {
            log::debug!("Ignoring malformed squad id {:?}", id);
            return Ok(None);
        };

        let squad = self
            .connection
            .find_squad_with_members(squad_id.into())
            .await?
            .map(|(_, member_documents)| build_squad(squad_id, member_documents, begin, end));

        Ok(squad)
    }

    /// Squads whose filtered roster comes out empty are left out unless the
    /// call is unbounded.
    pub async fn list_squads(
        &self,
        begin: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<Squad>, AppError> {
        let (squad_documents, member_documents) = self.connection.find_roster().await?;

        let mut members_by_squad: HashMap<SquadId, Vec<SquadMemberDocument>> = HashMap::new();
        for document in member_documents {
            members_by_squad
                .entry(document.squad_id.into())
                .or_default()
                .push(document);
        }

        let unbounded = begin.is_none() && end.is_none();

        let squads = squad_documents
            .into_iter()
            .map(|document| {
                let squad_id = SquadId::from(document.id);
                let members = members_by_squad.remove(&squad_id).unwrap_or_default();
                build_squad(squad_id, members, begin, end)
            })
            .filter(|squad| unbounded || !squad.members.is_empty())
            .collect();

        Ok(squads)
    }

    /// Full replace of the member record; fields are never merged. Fails with
    /// `NotFound` when the squad does not exist.
    pub async fn upsert_member(
        &self,
        member: &SquadMember,
        squad_id: SquadId,
    ) -> Result<(), AppError> {
        if !self.squad_exists(squad_id).await? {
            log::warn!("Refusing member {} for unknown squad {}", member.id, squad_id);
            return Err(AppError::squad_not_found(&squad_id.to_string()));
        }

        self.connection
            .upsert_member(SquadMemberDocument::new(member, squad_id))
            .await?;
        log::debug!("Upserted member {} into squad {}", member.id, squad_id);

        Ok(())
    }

    /// Replaces every squad and member record with `squads` and echoes it back.
    /// A roster that repeats a squad or member id is rejected before anything
    /// is cleared.
    pub async fn overwrite_all(&self, squads: Vec<Squad>) -> Result<Vec<Squad>, AppError> {
        check_unique_ids(&squads)?;

        let (squad_documents, member_documents) = flatten_roster(&squads);
        log::debug!(
            "Overwriting roster with {} squads and {} members",
            squad_documents.len(),
            member_documents.len()
        );

        self.connection
            .replace_roster(squad_documents, member_documents)
            .await?;

        Ok(squads)
    }
}

fn check_unique_ids(squads: &[Squad]) -> Result<(), AppError> {
    let mut squad_ids = HashSet::new();
    let mut member_ids = HashSet::new();

    for squad in squads {
        if !squad_ids.insert(squad.id) {
            return Err(AppError::BadRequest(format!(
                "Squad {} appears more than once",
                squad.id
            )));
        }
        for member in &squad.members {
            if !member_ids.insert(member.id) {
                return Err(AppError::BadRequest(format!(
                    "Squad member {} appears more than once",
                    member.id
                )));
            }
        }
    }

    Ok(())
}

fn build_squad(
    squad_id: SquadId,
    member_documents: Vec<SquadMemberDocument>,
    begin: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Squad {
    let members = member_documents
        .into_iter()
        .map(SquadMember::from)
        .collect();

    Squad::new(squad_id, filter_members(members, begin, end))
}
