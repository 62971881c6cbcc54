//! Local favorites table.
//!
//! Reads are push-based: a [`FavoritesFeed`] yields the whole current set once
//! on subscription and again after every insert or delete. Writes go through
//! [`FavoritesStore::insert`] and [`FavoritesStore::delete`] only.

mod table;

pub use table::RedbFavoritesStore;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::model::Recipe;

/// Persisted table of favorite recipes keyed by recipe id
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Insert or overwrite the row with `recipe.id`
    async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// Remove the row with `recipe.id`; absent ids are a no-op
    async fn delete(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// Read the committed set, after any write already in progress
    async fn load_all(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Subscribe to the full favorite set
    fn observe_all(&self) -> FavoritesFeed;
}

/// Replay-latest subscription to the favorite set.
///
/// Observers that fall behind skip straight to the newest set.
#[derive(Debug, Clone)]
pub struct FavoritesFeed {
    rx: watch::Receiver<Vec<Recipe>>,
    primed: bool,
}

impl FavoritesFeed {
    pub fn new(rx: watch::Receiver<Vec<Recipe>>) -> Self {
        Self { rx, primed: false }
    }

    /// Snapshot without waiting
    pub fn current(&self) -> Vec<Recipe> {
        self.rx.borrow().clone()
    }

    /// Next emission; the first call returns immediately with the current set.
    ///
    /// Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<Recipe>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
