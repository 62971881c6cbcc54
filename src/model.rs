use serde::{Deserialize, Serialize};

/// A recipe as shown in search results and stored as a favorite.
///
/// `id` is stable between the remote catalog and the local table; the store
/// keys rows by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub area: String,
    pub category: String,
    pub thumbnail: String,
    /// Comma-joined tag list, e.g. `"Pasta,Curry"`
    pub tags: String,
    pub instructions: String,
    pub youtube: String,
}

impl Recipe {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// Full recipe record including its ordered ingredient list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub id: String,
    pub name: String,
    pub area: String,
    pub category: String,
    pub thumbnail: String,
    pub tags: String,
    pub instructions: String,
    pub youtube: String,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeDetails {
    /// Drops the ingredient pairs, which is what gets persisted as a favorite
    pub fn to_recipe(&self) -> Recipe {
        Recipe {
            id: self.id.clone(),
            name: self.name.clone(),
            area: self.area.clone(),
            category: self.category.clone(),
            thumbnail: self.thumbnail.clone(),
            tags: self.tags.clone(),
            instructions: self.instructions.clone(),
            youtube: self.youtube.clone(),
        }
    }

    pub fn video_id(&self) -> &str {
        video_id(&self.youtube)
    }
}

impl From<RecipeDetails> for Recipe {
    fn from(details: RecipeDetails) -> Self {
        details.to_recipe()
    }
}

/// Player id for a video link: the text after the last `v=`, or the whole
/// link when there is none.
pub fn video_id(video_ref: &str) -> &str {
    video_ref.rsplit("v=").next().unwrap_or(video_ref)
}
