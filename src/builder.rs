use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::remote::{MealDbClient, RecipeSource};
use crate::store::{FavoritesStore, RedbFavoritesStore};
use crate::{AppError, RecipeRepository};

/// Where the favorites table lives
#[derive(Debug, Clone)]
enum FavoritesLocation {
    File(PathBuf),
    Memory,
}

/// Builder for wiring a [`RecipeRepository`]
#[derive(Default)]
pub struct RepositoryBuilder {
    config: Option<AppConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    favorites: Option<FavoritesLocation>,
    source: Option<Arc<dyn RecipeSource>>,
    store: Option<Arc<dyn FavoritesStore>>,
}

impl RepositoryBuilder {
    /// Start from a loaded configuration; explicit setters still win
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the catalog base URL
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeRepository;
    ///
    /// let builder = RecipeRepository::builder()
    ///     .base_url("https://www.themealdb.com/api/json/v1/1");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Keep favorites in the redb database at `path`
    pub fn favorites_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.favorites = Some(FavoritesLocation::File(path.into()));
        self
    }

    /// Keep favorites in memory only, mostly useful for tests
    pub fn in_memory_favorites(mut self) -> Self {
        self.favorites = Some(FavoritesLocation::Memory);
        self
    }

    /// Use a custom remote source instead of the HTTP client
    pub fn source(mut self, source: Arc<dyn RecipeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use a custom favorites store
    pub fn store(mut self, store: Arc<dyn FavoritesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the repository, opening the favorites table if needed
    ///
    /// # Errors
    /// Returns `AppError` if:
    /// - The base URL is empty
    /// - The HTTP client can't be created
    /// - The favorites database exists but can't be opened
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_finder::RecipeRepository;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let repository = RecipeRepository::builder()
    ///     .favorites_path("favorites.redb")
    ///     .build()
    ///     .await?;
    /// let recipes = repository.search_recipes("Arrabiata").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<RecipeRepository, AppError> {
        let config = self.config.unwrap_or_default();

        let source: Arc<dyn RecipeSource> = match self.source {
            Some(source) => source,
            None => {
                let mut api = config.api.clone();
                if let Some(url) = self.base_url {
                    api.base_url = url;
                }
                if let Some(timeout) = self.timeout {
                    api.timeout_secs = timeout.as_secs();
                }
                if api.base_url.trim().is_empty() {
                    return Err(AppError::Builder("Base URL cannot be empty".to_string()));
                }
                Arc::new(MealDbClient::new(&api)?)
            }
        };

        let store: Arc<dyn FavoritesStore> = match (self.store, self.favorites) {
            (Some(store), _) => store,
            (None, Some(FavoritesLocation::Memory)) => Arc::new(RedbFavoritesStore::in_memory()?),
            (None, Some(FavoritesLocation::File(path))) => {
                Arc::new(RedbFavoritesStore::open(path).await?)
            }
            (None, None) => {
                Arc::new(RedbFavoritesStore::open(config.store.favorites_path.clone()).await?)
            }
        };

        Ok(RecipeRepository::new(source, store))
    }
}

impl RecipeRepository {
    /// Creates a new builder
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }
}
