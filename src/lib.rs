//! Recipe search with offline favorites.
//!
//! [`RecipeRepository`] fronts the remote catalog and the local favorites
//! table. The [`screens`] module drives three screen state machines on top of
//! it, each publishing a state snapshot and a one-shot navigation queue.

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod outcome;
pub mod remote;
pub mod repository;
pub mod screens;
pub mod store;

// Re-export main types for convenience
pub use builder::RepositoryBuilder;
pub use config::AppConfig;
pub use error::{AppError, FetchError, StoreError, TransportException};
pub use model::{Ingredient, Recipe, RecipeDetails};
pub use outcome::{AsyncOutcome, Pipeline};
pub use repository::RecipeRepository;

/// Load configuration and wire a repository against the configured catalog
/// and favorites file.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = recipe_finder::open_repository().await?;
/// let screen = recipe_finder::screens::favorites::launch(repository);
/// # Ok(())
/// # }
/// ```
pub async fn open_repository() -> Result<RecipeRepository, AppError> {
    let config = AppConfig::load()?;
    RecipeRepository::builder().config(config).build().await
}
