use std::sync::Arc;
use std::time::Duration;

use bson::{Document, doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection, Database, options::ClientOptions};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::database::documents::{
    SQUAD_COLLECTION, SQUAD_MEMBER_COLLECTION, SquadDocument, SquadMemberDocument,
};
use crate::error::AppError;

/// Handle to the document store. Clones share the parent's underlying
/// resources but are otherwise independent and owned by one request.
#[derive(Clone)]
pub enum Connection {
    Mongo(MongoConnection),
    Memory(MemoryConnection),
}

impl Connection {
    pub async fn dial(config: &Config) -> Result<Self, AppError> {
        if config.uses_memory_store() {
            log::debug!("Opening in-process document store");
            return Ok(Connection::Memory(MemoryConnection::default()));
        }

        MongoConnection::dial(
            &config.database_url,
            &config.database_name,
            config.database_timeout(),
        )
        .await
        .map(Connection::Mongo)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Connection::Mongo(_) => "mongodb",
            Connection::Memory(_) => "memory",
        }
    }

    /// Tears down the parent connection. Working copies are released by
    /// dropping them.
    pub async fn shutdown(self) {
        match self {
            Connection::Mongo(connection) => connection.client.shutdown().await,
            Connection::Memory(_) => {}
        }
    }

    pub async fn insert_squad(&self, document: SquadDocument) -> Result<(), AppError> {
        match self {
            Connection::Mongo(connection) => connection.insert_squad(document).await,
            Connection::Memory(connection) => {
                connection.store.write().await.squads.push(document);
                Ok(())
            }
        }
    }

    pub async fn find_squad(&self, id: ObjectId) -> Result<Option<SquadDocument>, AppError> {
        match self {
            Connection::Mongo(connection) => connection.find_squad(id).await,
            Connection::Memory(connection) => {
                let store = connection.store.read().await;
                Ok(store.squads.iter().find(|squad| squad.id == id).cloned())
            }
        }
    }

    /// A squad record and its members, read as one snapshot with respect to
    /// in-process roster overwrites.
    pub async fn find_squad_with_members(
        &self,
        id: ObjectId,
    ) -> Result<Option<(SquadDocument, Vec<SquadMemberDocument>)>, AppError> {
        match self {
            Connection::Mongo(connection) => connection.find_squad_with_members(id).await,
            Connection::Memory(connection) => {
                let store = connection.store.read().await;
                let Some(squad) = store.squads.iter().find(|squad| squad.id == id).cloned() else {
                    return Ok(None);
                };
                let members = store
                    .members
                    .iter()
                    .filter(|member| member.squad_id == id)
                    .cloned()
                    .collect();
                Ok(Some((squad, members)))
            }
        }
    }

    /// Every squad record and every member record, read as one snapshot with
    /// respect to in-process roster overwrites.
    pub async fn find_roster(
        &self,
    ) -> Result<(Vec<SquadDocument>, Vec<SquadMemberDocument>), AppError> {
        match self {
            Connection::Mongo(connection) => {
                let _roster = connection.roster.read().await;
                let squads: Vec<SquadDocument> = connection
                    .squads()
                    .find(doc! {})
                    .await?
                    .try_collect()
                    .await?;
                let members = connection.find_members(Document::new()).await?;
                Ok((squads, members))
            }
            Connection::Memory(connection) => {
                let store = connection.store.read().await;
                Ok((store.squads.clone(), store.members.clone()))
            }
        }
    }

    /// Insert-or-replace keyed by the member's `_id`.
    pub async fn upsert_member(&self, document: SquadMemberDocument) -> Result<(), AppError> {
        match self {
            Connection::Mongo(connection) => connection.upsert_member(document).await,
            Connection::Memory(connection) => {
                let mut store = connection.store.write().await;
                match store.members.iter().position(|member| member.id == document.id) {
                    Some(index) => store.members[index] = document,
                    None => store.members.push(document),
                }
                Ok(())
            }
        }
    }

    /// Clears both collections and bulk-inserts the replacements.
    pub async fn replace_roster(
        &self,
        squads: Vec<SquadDocument>,
        members: Vec<SquadMemberDocument>,
    ) -> Result<(), AppError> {
        match self {
            Connection::Mongo(connection) => connection.replace_roster(squads, members).await,
            Connection::Memory(connection) => {
                let mut store = connection.store.write().await;
                store.squads = squads;
                store.members = members;
                Ok(())
            }
        }
    }
}

#[derive(Clone)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    roster: Arc<RwLock<()>>,
}

impl MongoConnection {
    async fn dial(url: &str, database_name: &str, timeout: Duration) -> Result<Self, AppError> {
        log::debug!("Dialing {} with timeout {:?}", url, timeout);

        let mut options = ClientOptions::parse(url)
            .await
            .map_err(|e| AppError::DatabaseUnavailable(e.to_string()))?;
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some("squad-manager".to_string());

        let client = Client::with_options(options)
            .map_err(|e| AppError::DatabaseUnavailable(e.to_string()))?;
        let database = client.database(database_name);

        // The driver connects lazily, so ping to find out whether the server is there.
        match tokio::time::timeout(timeout, database.run_command(doc! { "ping": 1 })).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(AppError::DatabaseUnavailable(e.to_string())),
            Err(_) => {
                return Err(AppError::DatabaseUnavailable(format!(
                    "no reply from {} within {:?}",
                    url, timeout
                )));
            }
        }

        Ok(Self {
            client,
            database,
            roster: Arc::new(RwLock::new(())),
        })
    }

    fn squads(&self) -> Collection<SquadDocument> {
        self.database.collection(SQUAD_COLLECTION)
    }

    fn members(&self) -> Collection<SquadMemberDocument> {
        self.database.collection(SQUAD_MEMBER_COLLECTION)
    }

    async fn insert_squad(&self, document: SquadDocument) -> Result<(), AppError> {
        let _roster = self.roster.read().await;
        self.squads().insert_one(document).await?;
        Ok(())
    }

    async fn find_squad(&self, id: ObjectId) -> Result<Option<SquadDocument>, AppError> {
        let _roster = self.roster.read().await;
        Ok(self.squads().find_one(doc! { "_id": id }).await?)
    }

    async fn find_squad_with_members(
        &self,
        id: ObjectId,
    ) -> Result<Option<(SquadDocument, Vec<SquadMemberDocument>)>, AppError> {
        let _roster = self.roster.read().await;
        let Some(squad) = self.squads().find_one(doc! { "_id": id }).await? else {
            return Ok(None);
        };
        let members = self.find_members(doc! { "squadId": id }).await?;
        Ok(Some((squad, members)))
    }

    async fn find_members(&self, filter: Document) -> Result<Vec<SquadMemberDocument>, AppError> {
        let members: Vec<SquadMemberDocument> =
            self.members().find(filter).await?.try_collect().await?;
        Ok(members)
    }

    async fn upsert_member(&self, document: SquadMemberDocument) -> Result<(), AppError> {
        let _roster = self.roster.read().await;
        self.members()
            .replace_one(doc! { "_id": document.id }, &document)
            .upsert(true)
            .await?;
        Ok(())
    }

    // Not a transaction: another process can observe the cleared collections.
    async fn replace_roster(
        &self,
        squads: Vec<SquadDocument>,
        members: Vec<SquadMemberDocument>,
    ) -> Result<(), AppError> {
        let _roster = self.roster.write().await;

        self.squads().delete_many(doc! {}).await?;
        self.members().delete_many(doc! {}).await?;

        // insert_many rejects an empty batch
        if !squads.is_empty() {
            self.squads().insert_many(&squads).await?;
        }
        if !members.is_empty() {
            self.members().insert_many(&members).await?;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryConnection {
    store: Arc<RwLock<MemoryStore>>,
}

#[derive(Default)]
struct MemoryStore {
    squads: Vec<SquadDocument>,
    members: Vec<SquadMemberDocument>,
}
