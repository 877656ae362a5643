use futures_util::future::BoxFuture;

use crate::database::factory::SquadRepositoryFactory;
use crate::database::repositories::SquadRepository;
use crate::error::AppError;

#[derive(Debug)]
pub struct RepositoryScope;

impl RepositoryScope {
    /// Run a closure against a freshly acquired repository, releasing the
    /// repository afterwards whether or not the closure succeeded.
    pub async fn run<T, F>(factory: &SquadRepositoryFactory, f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(&'a SquadRepository) -> BoxFuture<'a, Result<T, AppError>>,
        T: Send,
    {
        let repository = factory.repository().await?;

        let result = f(&repository).await;
        if let Err(err) = &result {
            log::warn!("Repository operation failed: {}", err);
        }

        repository.close();
        result
    }
}
