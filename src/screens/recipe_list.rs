//! Search screen: query the catalog, open a result, open favorites.
//!
//! A new search replaces the one in flight; the old pipeline is dropped
//! before the new one starts, so its outcomes never reach the state.

use tokio::sync::mpsc;

use crate::model::Recipe;
use crate::outcome::{next_outcome, AsyncOutcome, Pipeline};
use crate::repository::RecipeRepository;
use crate::screens::{ScreenHandle, ScreenScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    SearchRecipe(String),
    GotoRecipeDetails(String),
    OpenFavorites,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchNavigation {
    GotoRecipeDetails(String),
    OpenFavorites,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Default,
    Loading,
    Success(Vec<Recipe>),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// Start a search, cancelling any running one
    Search(String),
    Navigate(SearchNavigation),
}

impl SearchState {
    pub fn on_event(self, event: SearchEvent) -> (Self, Vec<SearchEffect>) {
        match event {
            SearchEvent::SearchRecipe(query) => (self, vec![SearchEffect::Search(query)]),
            SearchEvent::GotoRecipeDetails(id) => (
                self,
                vec![SearchEffect::Navigate(SearchNavigation::GotoRecipeDetails(
                    id,
                ))],
            ),
            SearchEvent::OpenFavorites => (
                self,
                vec![SearchEffect::Navigate(SearchNavigation::OpenFavorites)],
            ),
        }
    }

    pub fn on_outcome(self, outcome: AsyncOutcome<Vec<Recipe>>) -> Self {
        match outcome {
            AsyncOutcome::Loading => SearchState::Loading,
            AsyncOutcome::Success(recipes) => SearchState::Success(recipes),
            AsyncOutcome::Error(message) => SearchState::Failure(message),
        }
    }
}

/// Flat view of [`SearchState`] for rendering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchUiState {
    pub is_loading: bool,
    pub is_failure: bool,
    pub error_message: Option<String>,
    pub recipes: Option<Vec<Recipe>>,
}

impl From<&SearchState> for SearchUiState {
    fn from(state: &SearchState) -> Self {
        match state {
            SearchState::Default => SearchUiState::default(),
            SearchState::Loading => SearchUiState {
                is_loading: true,
                ..Default::default()
            },
            SearchState::Success(recipes) => SearchUiState {
                recipes: Some(recipes.clone()),
                ..Default::default()
            },
            SearchState::Failure(message) => SearchUiState {
                is_failure: true,
                error_message: Some(message.clone()),
                ..Default::default()
            },
        }
    }
}

pub type RecipeListScreen = ScreenHandle<SearchEvent, SearchState, SearchNavigation>;

/// Start the search screen. It waits for a `SearchRecipe` event before fetching.
pub fn launch(repository: RecipeRepository) -> RecipeListScreen {
    ScreenHandle::launch("recipe_list", SearchState::Default, move |inbox, scope| {
        run(repository, inbox, scope)
    })
}

async fn run(
    repository: RecipeRepository,
    mut inbox: mpsc::UnboundedReceiver<SearchEvent>,
    scope: ScreenScope<SearchState, SearchNavigation>,
) {
    let mut state = SearchState::Default;
    let mut search: Option<Pipeline<Vec<Recipe>>> = None;

    loop {
        tokio::select! {
            event = inbox.recv() => {
                let Some(event) = event else { break };
                let (next, effects) = state.on_event(event);
                state = next;
                scope.set_state(state.clone());

                for effect in effects {
                    match effect {
                        SearchEffect::Search(query) => {
                            drop(search.take());
                            let repository = repository.clone();
                            search = Some(Pipeline::launch(async move {
                                repository.search_recipes(&query).await
                            }));
                        }
                        SearchEffect::Navigate(intent) => scope.navigate(intent),
                    }
                }
            }
            outcome = next_outcome(&mut search) => {
                state = state.on_outcome(outcome);
                scope.set_state(state.clone());
            }
        }
    }
}
