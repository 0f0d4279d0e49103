use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Ordered list of ingredients making up a drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(pub Vec<Ingredient>);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    #[error("recipe must contain at least one ingredient")]
    Empty,

    #[error("malformed recipe: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl Recipe {
    /// Parse a request payload holding either one ingredient object or a list of them
    pub fn parse(value: &Value) -> Result<Self, RecipeError> {
        let ingredients = match RecipeInput::deserialize(value) {
            Ok(RecipeInput::Many(list)) => list,
            Ok(RecipeInput::One(single)) => vec![single],
            Err(e) => return Err(RecipeError::Malformed(e.to_string())),
        };

        if ingredients.is_empty() {
            return Err(RecipeError::Empty);
        }
        if let Some(bad) = ingredients.iter().find(|i| i.name.trim().is_empty()) {
            return Err(RecipeError::Malformed(format!(
                "ingredient with color '{}' has no name",
                bad.color
            )));
        }

        Ok(Self(ingredients))
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Recipe,
}

#[derive(Debug, Clone)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
