//! Favorites screen: live view of the favorites table with client-side sorting.
//!
//! The machine keeps the set in the order the store emitted it and derives
//! the displayed list from that plus the active [`SortOrder`]. Sorting never
//! touches the stored order, and deletes only show up once the store
//! re-emits.

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::error::StoreError;
use crate::model::Recipe;
use crate::repository::RecipeRepository;
use crate::screens::{ScreenHandle, ScreenScope};
use crate::store::FavoritesFeed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    AlphabeticalSort,
    LessIngredientsSort,
    ResetSort,
    Delete(Recipe),
    OpenDetails(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesNavigation {
    GotoRecipeDetails(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FavoritesState {
    #[default]
    Loading,
    Success(Vec<Recipe>),
    Error(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEffect {
    Delete(Recipe),
    Navigate(FavoritesNavigation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Order of the store's emission
    #[default]
    Natural,
    /// By recipe name
    Alphabetical,
    /// By instructions length in UTF-16 code units, which stands in for the
    /// ingredient count. Favorites don't carry their ingredient list.
    FewerIngredients,
}

impl SortOrder {
    pub fn apply(self, favorites: &[Recipe]) -> Vec<Recipe> {
        let mut display = favorites.to_vec();
        match self {
            SortOrder::Natural => {}
            SortOrder::Alphabetical => display.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOrder::FewerIngredients => {
                display.sort_by_key(|r| r.instructions.encode_utf16().count())
            }
        }
        display
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoritesMachine {
    /// Latest set from the store, untouched by sorting
    favorites: Option<Vec<Recipe>>,
    sort: SortOrder,
    error: Option<String>,
}

impl FavoritesMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn favorites(&self) -> Option<&[Recipe]> {
        self.favorites.as_deref()
    }

    pub fn state(&self) -> FavoritesState {
        if let Some(message) = &self.error {
            return FavoritesState::Error(message.clone());
        }
        match &self.favorites {
            None => FavoritesState::Loading,
            Some(list) if list.is_empty() => FavoritesState::Empty,
            Some(list) => FavoritesState::Success(self.sort.apply(list)),
        }
    }

    pub fn on_event(mut self, event: FavoritesEvent) -> (Self, Vec<FavoritesEffect>) {
        let effects = match event {
            FavoritesEvent::AlphabeticalSort => {
                self.sort = SortOrder::Alphabetical;
                vec![]
            }
            FavoritesEvent::LessIngredientsSort => {
                self.sort = SortOrder::FewerIngredients;
                vec![]
            }
            FavoritesEvent::ResetSort => {
                self.sort = SortOrder::Natural;
                vec![]
            }
            FavoritesEvent::Delete(recipe) => vec![FavoritesEffect::Delete(recipe)],
            FavoritesEvent::OpenDetails(id) => vec![FavoritesEffect::Navigate(
                FavoritesNavigation::GotoRecipeDetails(id),
            )],
        };
        (self, effects)
    }

    /// The store emitted a new set; the active sort order carries over
    pub fn on_favorites(mut self, favorites: Vec<Recipe>) -> Self {
        self.favorites = Some(favorites);
        self.error = None;
        self
    }

    pub fn on_store_closed(mut self) -> Self {
        self.error = Some(StoreError::Closed.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoritesUiState {
    pub is_loading: bool,
    pub is_error: bool,
    pub error: String,
    pub data: Option<Vec<Recipe>>,
}

impl From<&FavoritesState> for FavoritesUiState {
    fn from(state: &FavoritesState) -> Self {
        match state {
            FavoritesState::Loading => FavoritesUiState {
                is_loading: true,
                ..Default::default()
            },
            FavoritesState::Success(list) => FavoritesUiState {
                data: Some(list.clone()),
                ..Default::default()
            },
            FavoritesState::Empty => FavoritesUiState {
                data: Some(Vec::new()),
                ..Default::default()
            },
            FavoritesState::Error(message) => FavoritesUiState {
                is_error: true,
                error: message.clone(),
                ..Default::default()
            },
        }
    }
}

pub type FavoritesScreen = ScreenHandle<FavoritesEvent, FavoritesState, FavoritesNavigation>;

/// Start the favorites screen; it subscribes to the table right away
pub fn launch(repository: RecipeRepository) -> FavoritesScreen {
    ScreenHandle::launch("favorites", FavoritesState::Loading, move |inbox, scope| {
        run(repository, inbox, scope)
    })
}

async fn run(
    repository: RecipeRepository,
    mut inbox: mpsc::UnboundedReceiver<FavoritesEvent>,
    mut scope: ScreenScope<FavoritesState, FavoritesNavigation>,
) {
    let mut machine = FavoritesMachine::new();
    let mut feed = Some(repository.observe_favorites());

    loop {
        tokio::select! {
            event = inbox.recv() => {
                let Some(event) = event else { break };
                let (next, effects) = machine.on_event(event);
                machine = next;
                scope.set_state(machine.state());

                for effect in effects {
                    match effect {
                        FavoritesEffect::Delete(recipe) => {
                            let repository = repository.clone();
                            scope.spawn_detached(async move {
                                let _ = repository.delete_favorite(&recipe).await;
                            });
                        }
                        FavoritesEffect::Navigate(intent) => scope.navigate(intent),
                    }
                }
            }
            emitted = next_favorites(&mut feed) => {
                machine = match emitted {
                    Some(favorites) => {
                        debug!("Favorites updated: {} recipes", favorites.len());
                        machine.on_favorites(favorites)
                    }
                    None => {
                        warn!("Favorites feed ended");
                        feed = None;
                        machine.on_store_closed()
                    }
                };
                scope.set_state(machine.state());
            }
            _ = scope.reap() => {}
        }
    }
}

async fn next_favorites(feed: &mut Option<FavoritesFeed>) -> Option<Vec<Recipe>> {
    match feed {
        Some(feed) => feed.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, name: &str, instructions: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            instructions: instructions.to_string(),
            ..Default::default()
        }
    }

    fn stored() -> Vec<Recipe> {
        vec![
            recipe("1", "Pancakes", "Mix and fry the batter."),
            recipe("2", "Apple Pie", "Bake."),
            recipe("3", "Lasagne", "Layer pasta, sauce and cheese, then bake for an hour."),
        ]
    }

    fn names(state: &FavoritesState) -> Vec<String> {
        match state {
            FavoritesState::Success(list) => list.iter().map(|r| r.name.clone()).collect(),
            other => panic!("Expected Success, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        assert_eq!(FavoritesMachine::new().state(), FavoritesState::Loading);
    }

    #[test]
    fn test_empty_emission() {
        let machine = FavoritesMachine::new().on_favorites(vec![]);
        assert_eq!(machine.state(), FavoritesState::Empty);
    }

    #[test]
    fn test_alphabetical_sort_then_reset_restores_store_order() {
        let machine = FavoritesMachine::new().on_favorites(stored());
        let natural = machine.state();

        let (machine, effects) = machine.on_event(FavoritesEvent::AlphabeticalSort);
        assert!(effects.is_empty());
        assert_eq!(
            names(&machine.state()),
            vec!["Apple Pie", "Lasagne", "Pancakes"]
        );
        assert_eq!(machine.favorites(), Some(stored().as_slice()));

        let (machine, _) = machine.on_event(FavoritesEvent::ResetSort);
        assert_eq!(machine.state(), natural);
    }

    #[test]
    fn test_alphabetical_sort_is_idempotent() {
        let machine = FavoritesMachine::new().on_favorites(stored());
        let (once, _) = machine.on_event(FavoritesEvent::AlphabeticalSort);
        let (twice, _) = once.clone().on_event(FavoritesEvent::AlphabeticalSort);
        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn test_less_ingredients_sort_orders_by_instructions_length() {
        // Ranks by instructions text, not by ingredient count
        let machine = FavoritesMachine::new().on_favorites(stored());
        let (machine, _) = machine.on_event(FavoritesEvent::LessIngredientsSort);
        assert_eq!(machine.sort_order(), SortOrder::FewerIngredients);
        assert_eq!(
            names(&machine.state()),
            vec!["Apple Pie", "Pancakes", "Lasagne"]
        );
    }

    #[test]
    fn test_less_ingredients_sort_counts_utf16_units() {
        // "🍰" is one char but two UTF-16 units
        let machine = FavoritesMachine::new().on_favorites(vec![
            recipe("1", "Cake", "🍰🍰"),
            recipe("2", "Toast", "abc"),
        ]);
        let (machine, _) = machine.on_event(FavoritesEvent::LessIngredientsSort);
        assert_eq!(names(&machine.state()), vec!["Toast", "Cake"]);
    }

    #[test]
    fn test_sort_survives_reemission() {
        let machine = FavoritesMachine::new().on_favorites(stored());
        let (machine, _) = machine.on_event(FavoritesEvent::AlphabeticalSort);

        let mut updated = stored();
        updated.push(recipe("4", "Borscht", "Boil beets."));
        let machine = machine.on_favorites(updated);

        assert_eq!(
            names(&machine.state()),
            vec!["Apple Pie", "Borscht", "Lasagne", "Pancakes"]
        );
    }

    #[test]
    fn test_delete_does_not_touch_display_list() {
        let machine = FavoritesMachine::new().on_favorites(stored());
        let before = machine.state();

        let (machine, effects) = machine.on_event(FavoritesEvent::Delete(stored()[0].clone()));
        assert_eq!(effects, vec![FavoritesEffect::Delete(stored()[0].clone())]);
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn test_open_details_navigates() {
        let (_, effects) =
            FavoritesMachine::new().on_event(FavoritesEvent::OpenDetails("3".to_string()));
        assert_eq!(
            effects,
            vec![FavoritesEffect::Navigate(
                FavoritesNavigation::GotoRecipeDetails("3".to_string())
            )]
        );
    }

    #[test]
    fn test_store_closed_is_error() {
        let machine = FavoritesMachine::new()
            .on_favorites(stored())
            .on_store_closed();
        assert_eq!(
            machine.state(),
            FavoritesState::Error("Favorites store closed".to_string())
        );
        let ui = FavoritesUiState::from(&machine.state());
        assert!(ui.is_error);
        assert_eq!(ui.error, "Favorites store closed");
    }
}
