pub mod connection;
pub mod documents;
pub mod factory;
pub mod models;
pub mod repositories;
pub mod scope;

pub use connection::Connection;
pub use factory::SquadRepositoryFactory;
pub use repositories::SquadRepository;
pub use scope::RepositoryScope;
