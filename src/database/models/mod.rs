pub mod category;
pub mod drink;
pub mod question;

pub use category::Category;
pub use drink::{Drink, DrinkChanges, Ingredient, NewDrink, Recipe, RecipeError};
pub use question::{NewQuestion, Question};
