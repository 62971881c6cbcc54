use log::{debug, info};
use std::env;
use std::error::Error;
use tokio::sync::watch;

use recipe_finder::screens::favorites::{self, FavoritesEvent, FavoritesState, SortOrder};
use recipe_finder::screens::recipe_details::{self, DetailsEvent, DetailsState};
use recipe_finder::screens::recipe_list::{self, SearchEvent, SearchState};
use recipe_finder::{open_repository, Recipe, RecipeRepository};

const USAGE: &str = "Usage: recipe-finder <command>

Commands:
  search <query>                   Search the catalog
  details <id>                     Show one recipe
  favorite <id>                    Save a recipe to favorites
  unfavorite <id>                  Remove a recipe from favorites
  favorites [alpha|instructions]   List favorites, optionally sorted";

/// Wait until the screen state satisfies `done` and return that state
async fn settle<S: Clone>(
    rx: &mut watch::Receiver<S>,
    done: impl FnMut(&S) -> bool,
) -> Result<S, Box<dyn Error>> {
    Ok(rx.wait_for(done).await?.clone())
}

fn print_recipes(recipes: &[Recipe]) {
    for recipe in recipes {
        println!("{:>8}  {} ({}, {})", recipe.id, recipe.name, recipe.area, recipe.category);
    }
}

async fn search(repository: RecipeRepository, query: &str) -> Result<(), Box<dyn Error>> {
    let screen = recipe_list::launch(repository);
    let mut state = screen.watch_state();
    screen.on_event(SearchEvent::SearchRecipe(query.to_string()));

    match settle(&mut state, |s| {
        matches!(s, SearchState::Success(_) | SearchState::Failure(_))
    })
    .await?
    {
        SearchState::Success(recipes) => print_recipes(&recipes),
        SearchState::Failure(message) => return Err(message.into()),
        other => return Err(format!("Unexpected state {other:?}").into()),
    }
    Ok(())
}

async fn details(repository: RecipeRepository, id: &str) -> Result<(), Box<dyn Error>> {
    let screen = recipe_details::launch(repository);
    let mut state = screen.watch_state();
    screen.on_event(DetailsEvent::FetchDetails(id.to_string()));

    match settle(&mut state, |s| {
        matches!(s, DetailsState::Success(_) | DetailsState::Failure(_))
    })
    .await?
    {
        DetailsState::Success(details) => {
            println!("{} [{}]", details.name, details.id);
            println!("{} / {}", details.area, details.category);
            if !details.tags.is_empty() {
                println!("Tags: {}", details.tags);
            }
            println!();
            for ingredient in &details.ingredients {
                println!("  - {} {}", ingredient.measure, ingredient.name);
            }
            println!();
            println!("{}", details.instructions);
            if !details.youtube.is_empty() {
                screen.on_event(DetailsEvent::OpenPlayer(details.youtube.clone()));
                if let Some(intent) = screen.navigation().recv().await {
                    println!();
                    println!("Video: {:?}", intent);
                }
            }
        }
        DetailsState::Failure(message) => return Err(message.into()),
        other => return Err(format!("Unexpected state {other:?}").into()),
    }
    Ok(())
}

async fn favorite(repository: RecipeRepository, id: &str) -> Result<(), Box<dyn Error>> {
    let mut feed = repository.observe_favorites();
    // Skip the replay so only the insert below can satisfy the wait
    feed.next().await;
    let screen = recipe_details::launch(repository);
    let mut state = screen.watch_state();
    screen.on_event(DetailsEvent::FetchDetails(id.to_string()));

    let details = match settle(&mut state, |s| {
        matches!(s, DetailsState::Success(_) | DetailsState::Failure(_))
    })
    .await?
    {
        DetailsState::Success(details) => details,
        DetailsState::Failure(message) => return Err(message.into()),
        other => return Err(format!("Unexpected state {other:?}").into()),
    };

    screen.on_event(DetailsEvent::InsertFavorite(details.clone()));
    while let Some(favorites) = feed.next().await {
        if favorites.iter().any(|r| r.id == details.id) {
            info!("Saved {} to favorites", details.name);
            println!("Saved {}", details.name);
            return Ok(());
        }
    }
    Err("Favorites store closed before the recipe was saved".into())
}

async fn unfavorite(repository: RecipeRepository, id: &str) -> Result<(), Box<dyn Error>> {
    let stored = repository.load_favorites().await?;
    let Some(recipe) = stored.into_iter().find(|r| r.id == id) else {
        return Err(format!("Recipe {id} is not a favorite").into());
    };

    let screen = favorites::launch(repository);
    let mut state = screen.watch_state();
    settle(&mut state, |s| !matches!(s, FavoritesState::Loading)).await?;

    screen.on_event(FavoritesEvent::Delete(recipe.clone()));
    let shown = settle(&mut state, |s| match s {
        FavoritesState::Success(list) => list.iter().all(|r| r.id != recipe.id),
        _ => true,
    })
    .await?;
    if let FavoritesState::Error(message) = shown {
        return Err(message.into());
    }
    println!("Removed {}", recipe.name);
    Ok(())
}

async fn list_favorites(
    repository: RecipeRepository,
    sort: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let screen = favorites::launch(repository);
    let mut state = screen.watch_state();
    settle(&mut state, |s| !matches!(s, FavoritesState::Loading)).await?;

    let order = match sort {
        Some("alpha") => SortOrder::Alphabetical,
        Some("instructions") => SortOrder::FewerIngredients,
        Some(other) => return Err(format!("Unknown sort order: {other}").into()),
        None => SortOrder::Natural,
    };
    match order {
        SortOrder::Alphabetical => screen.on_event(FavoritesEvent::AlphabeticalSort),
        SortOrder::FewerIngredients => screen.on_event(FavoritesEvent::LessIngredientsSort),
        SortOrder::Natural => {}
    }

    let shown = settle(&mut state, |s| match s {
        FavoritesState::Success(list) => *list == order.apply(list),
        _ => true,
    })
    .await?;

    match shown {
        FavoritesState::Success(recipes) => print_recipes(&recipes),
        FavoritesState::Empty => println!("No favorites yet"),
        FavoritesState::Error(message) => return Err(message.into()),
        FavoritesState::Loading => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, arg) = match args.as_slice() {
        [command] => (command.as_str(), None),
        [command, arg, ..] => (command.as_str(), Some(arg.as_str())),
        _ => return Err(USAGE.into()),
    };

    let repository = open_repository().await?;
    debug!("Running {command} {arg:?}");

    match (command, arg) {
        ("search", Some(query)) => search(repository, query).await,
        ("details", Some(id)) => details(repository, id).await,
        ("favorite", Some(id)) => favorite(repository, id).await,
        ("unfavorite", Some(id)) => unfavorite(repository, id).await,
        ("favorites", sort) => list_favorites(repository, sort).await,
        _ => Err(USAGE.into()),
    }
}
