use thiserror::Error;

/// Failure raised by the fetch mechanism itself (connectivity, timeouts, bad payloads).
///
/// The message is carried verbatim all the way up to the screen state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportException(pub String);

impl From<reqwest::Error> for TransportException {
    fn from(err: reqwest::Error) -> Self {
        TransportException(err.to_string())
    }
}

/// Errors produced by the result repository for remote lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Remote answered with a status outside 200..=299
    #[error("Failed to fetch recipes: {0}")]
    Status(u16),

    /// Well-formed search response without any match
    #[error("No recipes found")]
    NoRecipes,

    /// Well-formed details response without a record
    #[error("No recipe details found")]
    NoRecipeDetails,

    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportException),
}

/// Errors from the local favorites table
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Favorites store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Favorites row could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The file exists but is not a favorites database
    #[error("Favorites store is corrupt")]
    Corrupt,

    #[error("Favorites store is already open in this process")]
    AlreadyOpen,

    #[error("redb database error: {0}")]
    Database(Box<redb::DatabaseError>),

    #[error("redb transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),

    #[error("redb table error: {0}")]
    Table(Box<redb::TableError>),

    #[error("redb storage error: {0}")]
    Storage(Box<redb::StorageError>),

    #[error("redb commit error: {0}")]
    Commit(Box<redb::CommitError>),

    /// The blocking write task panicked
    #[error("Favorites write failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Favorites store closed")]
    Closed,
}

impl From<redb::DatabaseError> for StoreError {
    fn from(value: redb::DatabaseError) -> Self {
        match value {
            redb::DatabaseError::DatabaseAlreadyOpen => Self::AlreadyOpen,
            other => Self::Database(Box::new(other)),
        }
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(value))
    }
}

impl From<redb::TableError> for StoreError {
    fn from(value: redb::TableError) -> Self {
        Self::Table(Box::new(value))
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(value: redb::StorageError) -> Self {
        Self::Storage(Box::new(value))
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(value: redb::CommitError) -> Self {
        Self::Commit(Box::new(value))
    }
}

/// Top-level errors for wiring the application together
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
