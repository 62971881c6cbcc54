#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use recipe_finder::remote::{MealRecord, MealsEnvelope, RecipeSource, RemoteResponse};
use recipe_finder::store::RedbFavoritesStore;
use recipe_finder::{RecipeRepository, TransportException};

/// How the fake catalog answers one query
#[derive(Debug, Clone)]
pub enum Reply {
    Meals(Vec<MealRecord>),
    NullMeals,
    Status(u16),
    Throw(String),
}

#[derive(Debug, Clone)]
struct Scripted {
    reply: Reply,
    delay: Duration,
}

/// Scripted catalog that records which requests ran to completion
#[derive(Default)]
pub struct FakeSource {
    search: HashMap<String, Scripted>,
    details: HashMap<String, Scripted>,
    completed: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(mut self, query: &str, reply: Reply, delay: Duration) -> Self {
        self.search
            .insert(query.to_string(), Scripted { reply, delay });
        self
    }

    pub fn on_details(mut self, id: &str, reply: Reply, delay: Duration) -> Self {
        self.details.insert(id.to_string(), Scripted { reply, delay });
        self
    }

    /// Requests that got all the way to a reply, as `search:<q>` / `details:<id>`
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    async fn answer(
        &self,
        scripted: Option<&Scripted>,
        label: String,
    ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        let Some(scripted) = scripted else {
            return Ok(RemoteResponse::error(404));
        };
        tokio::time::sleep(scripted.delay).await;
        self.completed.lock().unwrap().push(label);

        match &scripted.reply {
            Reply::Meals(meals) => Ok(RemoteResponse::ok(MealsEnvelope::new(meals.clone()))),
            Reply::NullMeals => Ok(RemoteResponse::ok(MealsEnvelope::default())),
            Reply::Status(code) => Ok(RemoteResponse::error(*code)),
            Reply::Throw(message) => Err(TransportException(message.clone())),
        }
    }
}

#[async_trait]
impl RecipeSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(
        &self,
        query: &str,
    ) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        self.answer(self.search.get(query), format!("search:{query}"))
            .await
    }

    async fn details(&self, id: &str) -> Result<RemoteResponse<MealsEnvelope>, TransportException> {
        self.answer(self.details.get(id), format!("details:{id}"))
            .await
    }
}

pub fn meal(id: &str, name: &str) -> MealRecord {
    serde_json::from_value(serde_json::json!({
        "idMeal": id,
        "strMeal": name,
        "strArea": "British",
        "strCategory": "Dessert",
        "strMealThumb": format!("https://example.com/{id}.jpg"),
        "strTags": "Baking,Sweet",
        "strInstructions": format!("Make the {name}."),
        "strYoutube": format!("https://www.youtube.com/watch?v=vid{id}"),
        "strIngredient1": "flour",
        "strMeasure1": "200g",
        "strIngredient2": "sugar",
        "strMeasure2": "100g",
        "strIngredient3": "",
        "strMeasure3": ""
    }))
    .unwrap()
}

pub fn repository(source: FakeSource) -> (RecipeRepository, Arc<FakeSource>) {
    let source = Arc::new(source);
    let repository = RecipeRepository::new(
        source.clone(),
        Arc::new(RedbFavoritesStore::in_memory().unwrap()),
    );
    (repository, source)
}

/// Wait (in virtual time) until the state matches
pub async fn wait_for<S: Clone>(rx: &mut watch::Receiver<S>, done: impl FnMut(&S) -> bool) -> S {
    tokio::time::timeout(Duration::from_secs(60), rx.wait_for(done))
        .await
        .expect("timed out waiting for state")
        .expect("screen closed")
        .clone()
}
