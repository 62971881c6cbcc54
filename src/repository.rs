use log::{debug, warn};
use std::sync::Arc;

use crate::error::{FetchError, StoreError};
use crate::model::{Recipe, RecipeDetails};
use crate::remote::{MealsEnvelope, RecipeSource, RemoteResponse};
use crate::store::{FavoritesFeed, FavoritesStore};

/// Single entry point for remote lookups and the local favorites table.
///
/// Remote outcomes are normalized into [`FetchError`] here; above this layer
/// only the error message is used.
#[derive(Clone)]
pub struct RecipeRepository {
    source: Arc<dyn RecipeSource>,
    store: Arc<dyn FavoritesStore>,
}

impl RecipeRepository {
    pub fn new(source: Arc<dyn RecipeSource>, store: Arc<dyn FavoritesStore>) -> Self {
        Self { source, store }
    }

    /// Search the remote catalog. An empty or missing result list is
    /// [`FetchError::NoRecipes`], never an empty success.
    pub async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>, FetchError> {
        debug!("Searching {} for {:?}", self.source.source_name(), query);
        let meals = success_body(self.source.search(query).await?)?
            .meals
            .filter(|meals| !meals.is_empty())
            .ok_or(FetchError::NoRecipes)?;

        Ok(meals.iter().map(|m| m.to_recipe()).collect())
    }

    pub async fn fetch_recipe_details(&self, id: &str) -> Result<RecipeDetails, FetchError> {
        debug!("Fetching details for {} from {}", id, self.source.source_name());
        let meals = success_body(self.source.details(id).await?)?.meals;

        meals
            .as_deref()
            .and_then(<[_]>::first)
            .map(|m| m.to_details())
            .ok_or(FetchError::NoRecipeDetails)
    }

    pub async fn insert_favorite(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.store.insert(recipe).await.inspect_err(|e| {
            warn!("Failed to insert favorite {}: {}", recipe.id, e);
        })
    }

    pub async fn delete_favorite(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.store.delete(recipe).await.inspect_err(|e| {
            warn!("Failed to delete favorite {}: {}", recipe.id, e);
        })
    }

    pub async fn load_favorites(&self) -> Result<Vec<Recipe>, StoreError> {
        self.store.load_all().await
    }

    pub fn observe_favorites(&self) -> FavoritesFeed {
        self.store.observe_all()
    }
}

fn success_body(response: RemoteResponse<MealsEnvelope>) -> Result<MealsEnvelope, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }
    Ok(response.body.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportException;
    use crate::remote::MealRecord;
    use crate::store::RedbFavoritesStore;
    use async_trait::async_trait;

    enum Reply {
        Meals(Option<Vec<MealRecord>>),
        Status(u16),
        Throw(&'static str),
    }

    struct StubSource(Reply);

    impl StubSource {
        fn respond(&self) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
            match &self.0 {
                Reply::Meals(meals) => Ok(RemoteResponse::ok(MealsEnvelope {
                    meals: meals.clone(),
                })),
                Reply::Status(code) => Ok(RemoteResponse::error(*code)),
                Reply::Throw(msg) => Err(TransportException(msg.to_string())),
            }
        }
    }

    #[async_trait]
    impl RecipeSource for StubSource {
        fn source_name(&self) -> &str {
            "stub"
        }

        async fn search(
            &self,
            _query: &str,
        ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
            self.respond()
        }

        async fn details(
            &self,
            _id: &str,
        ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
            self.respond()
        }
    }

    fn repo(reply: Reply) -> RecipeRepository {
        RecipeRepository::new(
            Arc::new(StubSource(reply)),
            Arc::new(RedbFavoritesStore::in_memory().unwrap()),
        )
    }

    fn meal(id: &str, name: &str) -> MealRecord {
        MealRecord {
            id_meal: id.to_string(),
            str_meal: Some(name.to_string()),
            str_area: Some("India".to_string()),
            str_tags: Some("tag1,tag2".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_success_keeps_order() {
        let repo = repo(Reply::Meals(Some(vec![meal("2", "B"), meal("1", "A")])));
        let recipes = repo.search_recipes("chicken").await.unwrap();

        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(recipes[0].area, "India");
    }

    #[tokio::test]
    async fn test_search_null_or_empty_is_not_found() {
        let err = repo(Reply::Meals(None)).search_recipes("x").await.unwrap_err();
        assert_eq!(err, FetchError::NoRecipes);
        assert_eq!(err.to_string(), "No recipes found");

        let err = repo(Reply::Meals(Some(vec![])))
            .search_recipes("x")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NoRecipes);
    }

    #[tokio::test]
    async fn test_search_backend_status() {
        let err = repo(Reply::Status(404)).search_recipes("x").await.unwrap_err();
        assert_eq!(err, FetchError::Status(404));
        assert_eq!(err.to_string(), "Failed to fetch recipes: 404");
    }

    #[tokio::test]
    async fn test_search_exception_message_verbatim() {
        let err = repo(Reply::Throw("error")).search_recipes("x").await.unwrap_err();
        assert_eq!(err.to_string(), "error");
    }

    #[tokio::test]
    async fn test_details_takes_first_record() {
        let repo = repo(Reply::Meals(Some(vec![meal("1", "A"), meal("2", "B")])));
        let details = repo.fetch_recipe_details("1").await.unwrap();
        assert_eq!(details.id, "1");
        assert_eq!(details.name, "A");
    }

    #[tokio::test]
    async fn test_details_missing_is_not_found() {
        for reply in [Reply::Meals(None), Reply::Meals(Some(vec![]))] {
            let err = repo(reply).fetch_recipe_details("id").await.unwrap_err();
            assert_eq!(err.to_string(), "No recipe details found");
        }
    }

    #[tokio::test]
    async fn test_details_status_and_exception() {
        let err = repo(Reply::Status(500))
            .fetch_recipe_details("id")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch recipes: 500");

        let err = repo(Reply::Throw("connection reset"))
            .fetch_recipe_details("id")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_insert_then_delete_round_trip() {
        let repo = repo(Reply::Meals(None));
        let recipe = meal("idMeal", "Chicken").to_recipe();

        repo.insert_favorite(&recipe).await.unwrap();
        assert_eq!(repo.observe_favorites().current(), vec![recipe.clone()]);
        assert_eq!(repo.load_favorites().await.unwrap(), vec![recipe.clone()]);

        repo.delete_favorite(&recipe).await.unwrap();
        assert!(repo.observe_favorites().current().is_empty());
        assert!(repo.load_favorites().await.unwrap().is_empty());
    }
}
