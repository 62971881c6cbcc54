//! Details screen: fetch one recipe, toggle it as a favorite, open its video.

use log::debug;
use tokio::sync::mpsc;

use crate::model::{video_id, Recipe, RecipeDetails};
use crate::outcome::{next_outcome, AsyncOutcome, Pipeline};
use crate::repository::RecipeRepository;
use crate::screens::{ScreenHandle, ScreenScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsEvent {
    FetchDetails(String),
    InsertFavorite(RecipeDetails),
    DeleteFavorite(RecipeDetails),
    GoBack,
    /// Carries the recipe's video link as-is
    OpenPlayer(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsNavigation {
    GoBack,
    OpenPlayer { video_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailsState {
    #[default]
    Default,
    Loading,
    Success(RecipeDetails),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsEffect {
    Fetch(String),
    InsertFavorite(Recipe),
    DeleteFavorite(Recipe),
    Navigate(DetailsNavigation),
}

impl DetailsState {
    pub fn on_event(self, event: DetailsEvent) -> (Self, Vec<DetailsEffect>) {
        let effect = match event {
            DetailsEvent::FetchDetails(id) => DetailsEffect::Fetch(id),
            DetailsEvent::InsertFavorite(details) => {
                DetailsEffect::InsertFavorite(details.to_recipe())
            }
            DetailsEvent::DeleteFavorite(details) => {
                DetailsEffect::DeleteFavorite(details.to_recipe())
            }
            DetailsEvent::GoBack => DetailsEffect::Navigate(DetailsNavigation::GoBack),
            DetailsEvent::OpenPlayer(link) => {
                DetailsEffect::Navigate(DetailsNavigation::OpenPlayer {
                    video_id: video_id(&link).to_string(),
                })
            }
        };
        (self, vec![effect])
    }

    pub fn on_outcome(self, outcome: AsyncOutcome<RecipeDetails>) -> Self {
        match outcome {
            AsyncOutcome::Loading => DetailsState::Loading,
            AsyncOutcome::Success(details) => DetailsState::Success(details),
            AsyncOutcome::Error(message) => DetailsState::Failure(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailsUiState {
    pub is_loading: bool,
    pub is_failure: bool,
    pub error_message: Option<String>,
    pub recipe_details: Option<RecipeDetails>,
}

impl From<&DetailsState> for DetailsUiState {
    fn from(state: &DetailsState) -> Self {
        match state {
            DetailsState::Default => DetailsUiState::default(),
            DetailsState::Loading => DetailsUiState {
                is_loading: true,
                ..Default::default()
            },
            DetailsState::Success(details) => DetailsUiState {
                recipe_details: Some(details.clone()),
                ..Default::default()
            },
            DetailsState::Failure(message) => DetailsUiState {
                is_failure: true,
                error_message: Some(message.clone()),
                ..Default::default()
            },
        }
    }
}

pub type RecipeDetailsScreen = ScreenHandle<DetailsEvent, DetailsState, DetailsNavigation>;

pub fn launch(repository: RecipeRepository) -> RecipeDetailsScreen {
    ScreenHandle::launch(
        "recipe_details",
        DetailsState::Default,
        move |inbox, scope| run(repository, inbox, scope),
    )
}

async fn run(
    repository: RecipeRepository,
    mut inbox: mpsc::UnboundedReceiver<DetailsEvent>,
    mut scope: ScreenScope<DetailsState, DetailsNavigation>,
) {
    let mut state = DetailsState::Default;
    let mut fetch: Option<Pipeline<RecipeDetails>> = None;

    loop {
        tokio::select! {
            event = inbox.recv() => {
                let Some(event) = event else { break };
                let (next, effects) = state.on_event(event);
                state = next;
                scope.set_state(state.clone());

                for effect in effects {
                    match effect {
                        DetailsEffect::Fetch(id) => {
                            drop(fetch.take());
                            let repository = repository.clone();
                            fetch = Some(Pipeline::launch(async move {
                                repository.fetch_recipe_details(&id).await
                            }));
                        }
                        DetailsEffect::InsertFavorite(recipe) => {
                            let repository = repository.clone();
                            scope.spawn_detached(async move {
                                if repository.insert_favorite(&recipe).await.is_ok() {
                                    debug!("Saved {} to favorites", recipe.id);
                                }
                            });
                        }
                        DetailsEffect::DeleteFavorite(recipe) => {
                            let repository = repository.clone();
                            scope.spawn_detached(async move {
                                if repository.delete_favorite(&recipe).await.is_ok() {
                                    debug!("Removed {} from favorites", recipe.id);
                                }
                            });
                        }
                        DetailsEffect::Navigate(intent) => scope.navigate(intent),
                    }
                }
            }
            outcome = next_outcome(&mut fetch) => {
                state = state.on_outcome(outcome);
                scope.set_state(state.clone());
            }
            _ = scope.reap() => {}
        }
    }
}
