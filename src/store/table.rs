use async_trait::async_trait;
use log::{debug, info};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use crate::error::StoreError;
use crate::model::Recipe;
use crate::store::{FavoritesFeed, FavoritesStore};

const META: TableDefinition<&str, &str> = TableDefinition::new("meta");
/// Insertion sequence -> JSON encoded recipe; iteration order is emission order
const FAVORITES: TableDefinition<u64, &[u8]> = TableDefinition::new("favorites");
/// Recipe id -> insertion sequence
const BY_ID: TableDefinition<&str, u64> = TableDefinition::new("favorites_by_id");

const META_FORMAT_KEY: &str = "format";
const META_FORMAT_VALUE: &str = "recipe-finder-favorites";
const META_SCHEMA_VERSION: &str = "schema_version";
const CURRENT_SCHEMA: &str = "1";

/// Favorites table in a redb database.
///
/// Rows keep their first insertion position. Each mutation commits one write
/// transaction and then publishes the committed set; both happen on the
/// blocking pool, so a caller that gets cancelled can't leave the feed behind
/// the table.
pub struct RedbFavoritesStore {
    inner: Arc<Inner>,
}

struct Inner {
    db: Database,
    /// Held from `begin_write` until the set is published
    write_lock: Mutex<()>,
    tx: watch::Sender<Vec<Recipe>>,
}

fn is_corrupt_open_error(err: &redb::DatabaseError) -> bool {
    match err {
        redb::DatabaseError::Storage(redb::StorageError::Corrupted(_)) => true,
        redb::DatabaseError::Storage(redb::StorageError::Io(ioe)) => matches!(
            ioe.kind(),
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}

fn read_rows(table: &impl ReadableTable<u64, &'static [u8]>) -> Result<Vec<Recipe>, StoreError> {
    let mut rows = Vec::new();
    for row in table.iter()? {
        let (_, value) = row?;
        rows.push(serde_json::from_slice(value.value())?);
    }
    Ok(rows)
}

fn ensure_schema(db: &Database) -> Result<(), StoreError> {
    let write_tx = db.begin_write()?;
    {
        let mut meta = write_tx.open_table(META)?;
        let format = meta.get(META_FORMAT_KEY)?.map(|g| g.value().to_string());
        match format.as_deref() {
            None => {
                meta.insert(META_FORMAT_KEY, META_FORMAT_VALUE)?;
                meta.insert(META_SCHEMA_VERSION, CURRENT_SCHEMA)?;
            }
            Some(META_FORMAT_VALUE) => {
                let version = meta.get(META_SCHEMA_VERSION)?.map(|g| g.value().to_string());
                if version.as_deref() != Some(CURRENT_SCHEMA) {
                    return Err(StoreError::Corrupt);
                }
            }
            Some(_) => return Err(StoreError::Corrupt),
        }
    }
    let _ = write_tx.open_table(FAVORITES)?;
    let _ = write_tx.open_table(BY_ID)?;
    write_tx.commit()?;
    Ok(())
}

fn insert_row(write_tx: &WriteTransaction, recipe: &Recipe) -> Result<bool, StoreError> {
    let encoded = serde_json::to_vec(recipe)?;
    let mut rows = write_tx.open_table(FAVORITES)?;
    let mut by_id = write_tx.open_table(BY_ID)?;

    let existing = by_id.get(recipe.id.as_str())?.map(|g| g.value());
    let seq = match existing {
        Some(seq) => seq,
        None => {
            let next = rows.last()?.map(|(k, _)| k.value() + 1).unwrap_or(0);
            by_id.insert(recipe.id.as_str(), next)?;
            next
        }
    };
    rows.insert(seq, encoded.as_slice())?;
    Ok(true)
}

fn delete_row(write_tx: &WriteTransaction, id: &str) -> Result<bool, StoreError> {
    let mut by_id = write_tx.open_table(BY_ID)?;
    let Some(seq) = by_id.remove(id)?.map(|g| g.value()) else {
        return Ok(false);
    };
    let mut rows = write_tx.open_table(FAVORITES)?;
    rows.remove(seq)?;
    Ok(true)
}

impl Inner {
    fn new(db: Database) -> Result<Self, StoreError> {
        ensure_schema(&db)?;
        let rows = {
            let read_tx = db.begin_read()?;
            read_rows(&read_tx.open_table(FAVORITES)?)?
        };
        let (tx, _) = watch::channel(rows);
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
            tx,
        })
    }

    /// Run `change` in one write transaction; commit and publish only if it
    /// reports a modification.
    fn commit<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&WriteTransaction) -> Result<bool, StoreError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let write_tx = self.db.begin_write()?;
        if !change(&write_tx)? {
            write_tx.abort()?;
            return Ok(());
        }
        let rows = read_rows(&write_tx.open_table(FAVORITES)?)?;
        write_tx.commit()?;
        self.tx.send_replace(rows);
        Ok(())
    }

    fn committed(&self) -> Result<Vec<Recipe>, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let read_tx = self.db.begin_read()?;
        read_rows(&read_tx.open_table(FAVORITES)?)
    }
}

impl RedbFavoritesStore {
    /// Open the database at `path`, creating it (and its parent directory)
    /// when it doesn't exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let db = match Database::create(&path) {
                Ok(db) => db,
                Err(e) if is_corrupt_open_error(&e) => return Err(StoreError::Corrupt),
                Err(e) => return Err(e.into()),
            };
            let inner = Inner::new(db)?;
            info!(
                "Opened favorites table {} ({} recipes)",
                path.display(),
                inner.tx.borrow().len()
            );
            Ok(inner)
        })
        .await??;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// A table that lives only as long as this value
    pub fn in_memory() -> Result<Self, StoreError> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Ok(Self {
            inner: Arc::new(Inner::new(db)?),
        })
    }

    async fn apply<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&WriteTransaction) -> Result<bool, StoreError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.commit(change)).await?
    }
}

#[async_trait]
impl FavoritesStore for RedbFavoritesStore {
    async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        debug!("Inserting favorite {}", recipe.id);
        let recipe = recipe.clone();
        self.apply(move |write_tx| insert_row(write_tx, &recipe)).await
    }

    async fn delete(&self, recipe: &Recipe) -> Result<(), StoreError> {
        debug!("Deleting favorite {}", recipe.id);
        let id = recipe.id.clone();
        self.apply(move |write_tx| delete_row(write_tx, &id)).await
    }

    async fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.committed()).await?
    }

    fn observe_all(&self) -> FavoritesFeed {
        FavoritesFeed::new(self.inner.tx.subscribe())
    }
}
