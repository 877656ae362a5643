pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::Config;
pub use database::{RepositoryScope, SquadRepository, SquadRepositoryFactory};
pub use error::AppError;
