mod dto;
mod meal_db;

pub use dto::{MealRecord, MealsEnvelope};
pub use meal_db::MealDbClient;

use async_trait::async_trait;

use crate::error::TransportException;

/// A response from the remote catalog: status code plus an optional parsed body
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse<T> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> RemoteResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn error(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Narrow contract for the remote recipe catalog
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Get the source name (e.g., "themealdb")
    fn source_name(&self) -> &str;

    /// Search recipes whose name matches `query`
    async fn search(&self, query: &str)
        -> Result<RemoteResponse<MealsEnvelope>, TransportException>;

    /// Look up one recipe by id
    async fn details(&self, id: &str) -> Result<RemoteResponse<MealsEnvelope>, TransportException>;
}
